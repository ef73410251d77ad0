//! Database seeder for Plata development and demos.
//!
//! Seeds a demo user with accounts, a month of transactions, budgets, and
//! savings goals for local development.
//!
//! Usage: cargo run --bin seeder

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use plata_core::auth::hash_password;
use plata_db::entities::{
    accounts, budgets, categories, goals,
    sea_orm_active_enums::{AccountType, BudgetPeriod, TransactionType},
    transactions, users,
};

/// Demo user ID (consistent for all seeds)
const DEMO_USER_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Demo login email.
const DEMO_EMAIL: &str = "demo@finanzasfaciles.cl";
/// Demo login password.
const DEMO_PASSWORD: &str = "demo1234";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = plata_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    // Check if the demo user already exists
    if users::Entity::find_by_id(demo_user_id())
        .one(&db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("Demo user already exists, nothing to do.");
        return;
    }

    println!("Loading default categories...");
    let category_ids = default_category_ids(&db).await;

    println!("Seeding demo user...");
    seed_demo_user(&db).await;

    println!("Seeding demo accounts...");
    let demo_accounts = seed_demo_accounts(&db).await;

    println!("Seeding demo transactions...");
    seed_demo_transactions(&db, &demo_accounts, &category_ids).await;

    println!("Seeding demo budgets...");
    seed_demo_budgets(&db, &category_ids).await;

    println!("Seeding demo goals...");
    seed_demo_goals(&db).await;

    println!("Seeding complete!");
    println!("  Login: {DEMO_EMAIL} / {DEMO_PASSWORD}");
}

fn demo_user_id() -> Uuid {
    Uuid::parse_str(DEMO_USER_ID).unwrap()
}

/// The demo accounts, keyed by how the transactions reference them.
struct DemoAccounts {
    cash: Uuid,
    bank: Uuid,
    card: Uuid,
}

/// Loads the default categories seeded by the migrations, keyed by name.
async fn default_category_ids(db: &DatabaseConnection) -> HashMap<String, Uuid> {
    let defaults = categories::Entity::find()
        .filter(categories::Column::IsDefault.eq(true))
        .all(db)
        .await
        .expect("Failed to load default categories (run the migrator first)");

    defaults.into_iter().map(|c| (c.name, c.id)).collect()
}

/// Seeds the demo user with a real password hash.
async fn seed_demo_user(db: &DatabaseConnection) {
    let password_hash = hash_password(DEMO_PASSWORD).expect("Failed to hash demo password");

    let user = users::ActiveModel {
        id: Set(demo_user_id()),
        email: Set(DEMO_EMAIL.to_string()),
        password_hash: Set(password_hash),
        full_name: Set("Carlos Demo".to_string()),
        currency: Set("CLP".to_string()),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };

    if let Err(e) = user.insert(db).await {
        eprintln!("Failed to insert demo user: {e}");
    } else {
        println!("  Created demo user: {DEMO_EMAIL}");
    }
}

/// Seeds the three demo accounts and returns their ids.
async fn seed_demo_accounts(db: &DatabaseConnection) -> DemoAccounts {
    let user_id = demo_user_id();
    let demo = DemoAccounts {
        cash: Uuid::new_v4(),
        bank: Uuid::new_v4(),
        card: Uuid::new_v4(),
    };

    let rows = [
        accounts::ActiveModel {
            id: Set(demo.cash),
            user_id: Set(user_id),
            name: Set("Efectivo".to_string()),
            account_type: Set(AccountType::Cash),
            balance: Set(Decimal::from(150_000_i64)),
            credit_limit: Set(None),
            closing_day: Set(None),
            due_day: Set(None),
            color: Set("#22c55e".to_string()),
            icon: Set("wallet".to_string()),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        },
        accounts::ActiveModel {
            id: Set(demo.bank),
            user_id: Set(user_id),
            name: Set("Cuenta Corriente".to_string()),
            account_type: Set(AccountType::Bank),
            balance: Set(Decimal::from(1_250_300_i64)),
            credit_limit: Set(None),
            closing_day: Set(None),
            due_day: Set(None),
            color: Set("#3b82f6".to_string()),
            icon: Set("bank".to_string()),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        },
        accounts::ActiveModel {
            id: Set(demo.card),
            user_id: Set(user_id),
            name: Set("Banco Estado Visa".to_string()),
            account_type: Set(AccountType::CreditCard),
            balance: Set(Decimal::from(450_300_i64)),
            credit_limit: Set(Some(Decimal::from(2_000_000_i64))),
            closing_day: Set(Some(25)),
            due_day: Set(Some(10)),
            color: Set("#f97316".to_string()),
            icon: Set("credit-card".to_string()),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        },
    ];

    let names = ["Efectivo", "Cuenta Corriente", "Banco Estado Visa"];
    for (row, name) in rows.into_iter().zip(names) {
        if let Err(e) = row.insert(db).await {
            eprintln!("Failed to insert account {name}: {e}");
        } else {
            println!("  Created account: {name}");
        }
    }

    demo
}

/// Seeds one month of demo transactions dated within the current month.
async fn seed_demo_transactions(
    db: &DatabaseConnection,
    demo: &DemoAccounts,
    category_ids: &HashMap<String, Uuid>,
) {
    // (day, amount, type, category, description, account)
    let rows: [(u32, i64, TransactionType, &str, &str, Uuid); 10] = [
        (
            1,
            2_100_000,
            TransactionType::Income,
            "Sueldo",
            "Sueldo Febrero",
            demo.bank,
        ),
        (
            2,
            500_000,
            TransactionType::Expense,
            "Arriendo",
            "Arriendo",
            demo.bank,
        ),
        (
            5,
            85_000,
            TransactionType::Expense,
            "Cuentas Básicas",
            "Luz, agua, gas",
            demo.bank,
        ),
        (
            10,
            125_000,
            TransactionType::Expense,
            "Supermercado",
            "Supermercado Lider",
            demo.bank,
        ),
        (
            12,
            8_900,
            TransactionType::Expense,
            "Uber/Taxi",
            "Uber",
            demo.card,
        ),
        (
            15,
            11_300,
            TransactionType::Expense,
            "Streaming",
            "Netflix",
            demo.card,
        ),
        (
            18,
            45_300,
            TransactionType::Expense,
            "Supermercado",
            "Supermercado",
            demo.cash,
        ),
        (
            20,
            25_000,
            TransactionType::Expense,
            "Restaurantes",
            "Almuerzo",
            demo.card,
        ),
        (
            22,
            18_000,
            TransactionType::Expense,
            "Uber/Taxi",
            "Uber",
            demo.card,
        ),
        (
            23,
            32_000,
            TransactionType::Expense,
            "Restaurantes",
            "Cena",
            demo.card,
        ),
    ];

    let today = Utc::now().date_naive();
    let mut inserted = 0;

    for (day, amount, transaction_type, category, description, account_id) in rows {
        let Some(&category_id) = category_ids.get(category) else {
            eprintln!("Default category {category} not found, skipping transaction");
            continue;
        };
        let date =
            NaiveDate::from_ymd_opt(today.year(), today.month(), day).unwrap_or(today);

        let transaction = transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(demo_user_id()),
            transaction_type: Set(transaction_type),
            transaction_date: Set(date),
            amount: Set(Decimal::from(amount)),
            description: Set(description.to_string()),
            category_id: Set(Some(category_id)),
            from_account_id: Set(account_id),
            to_account_id: Set(None),
            voided: Set(false),
            voided_by: Set(None),
            reverses: Set(None),
            created_at: Set(Utc::now().into()),
        };

        if let Err(e) = transaction.insert(db).await {
            eprintln!("Failed to insert transaction {description}: {e}");
        } else {
            inserted += 1;
        }
    }

    println!("  Created {inserted} transactions");
}

/// Seeds the demo budgets.
async fn seed_demo_budgets(db: &DatabaseConnection, category_ids: &HashMap<String, Uuid>) {
    let rows: [(&str, i64); 2] = [("Supermercado", 200_000), ("Streaming", 50_000)];

    for (category, amount) in rows {
        let Some(&category_id) = category_ids.get(category) else {
            eprintln!("Default category {category} not found, skipping budget");
            continue;
        };

        let budget = budgets::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(demo_user_id()),
            category_id: Set(category_id),
            amount: Set(Decimal::from(amount)),
            period: Set(BudgetPeriod::Monthly),
            alert_threshold: Set(80),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        };

        if let Err(e) = budget.insert(db).await {
            eprintln!("Failed to insert budget for {category}: {e}");
        } else {
            println!("  Created budget: {category}");
        }
    }
}

/// Seeds the demo savings goals.
async fn seed_demo_goals(db: &DatabaseConnection) {
    let year = Utc::now().year();
    let rows = [
        (
            "Viaje a Europa",
            3_000_000_i64,
            800_000_i64,
            NaiveDate::from_ymd_opt(year, 12, 31),
            "#3b82f6",
            "plane",
        ),
        (
            "Auto Nuevo",
            2_000_000_i64,
            200_000_i64,
            NaiveDate::from_ymd_opt(year + 1, 6, 30),
            "#f97316",
            "car",
        ),
    ];

    for (name, target, current, target_date, color, icon) in rows {
        let goal = goals::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(demo_user_id()),
            name: Set(name.to_string()),
            target_amount: Set(Decimal::from(target)),
            current_amount: Set(Decimal::from(current)),
            target_date: Set(target_date),
            color: Set(color.to_string()),
            icon: Set(icon.to_string()),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        };

        if let Err(e) = goal.insert(db).await {
            eprintln!("Failed to insert goal {name}: {e}");
        } else {
            println!("  Created goal: {name}");
        }
    }
}
