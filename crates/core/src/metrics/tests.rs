//! Scenario tests for the derived metrics.
//!
//! Each test builds a small ledger through the engine and checks the
//! numbers the dashboard would show, with `today` pinned so results do
//! not depend on the wall clock.

use chrono::{NaiveDate, Utc};
use rust_decimal_macros::dec;

use plata_shared::types::{AccountId, BudgetId, CategoryId, GoalId, Money, UserId};

use crate::ledger::{
    AccountKind, Budget, BudgetPeriod, CardTerms, CategoryKind, Goal, Ledger, LedgerSnapshot,
    NewAccount, NewBudget, NewCategory, NewGoal, NewTransaction, TransactionKind,
};

use super::service::MetricsService;
use super::types::{KpiConfig, UNBOUNDED_AUTONOMY_DAYS};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn today() -> NaiveDate {
    date(2026, 8, 21)
}

struct Fixture {
    ledger: Ledger,
    bank: AccountId,
    cash: AccountId,
    card: AccountId,
    salary: CategoryId,
    groceries: CategoryId,
    streaming: CategoryId,
}

/// Bank with 1,000,000, cash with 150,000, a card carrying 450,300 of
/// debt (closing day 25, due day 10), and one category per use.
fn fixture() -> Fixture {
    let mut ledger = Ledger::new(UserId::new());
    let bank = ledger
        .create_account(NewAccount {
            name: "Cuenta Corriente".to_string(),
            kind: AccountKind::Bank,
            opening_balance: Money::from(1_000_000),
            color: "#3B82F6".to_string(),
            icon: "bank".to_string(),
        })
        .unwrap()
        .id;
    let cash = ledger
        .create_account(NewAccount {
            name: "Efectivo".to_string(),
            kind: AccountKind::Cash,
            opening_balance: Money::from(150_000),
            color: "#22C55E".to_string(),
            icon: "wallet".to_string(),
        })
        .unwrap()
        .id;
    let card = ledger
        .create_account(NewAccount {
            name: "Visa".to_string(),
            kind: AccountKind::CreditCard(CardTerms {
                credit_limit: Money::from(2_000_000),
                closing_day: 25,
                due_day: 10,
            }),
            opening_balance: Money::from(450_300),
            color: "#EF4444".to_string(),
            icon: "credit-card".to_string(),
        })
        .unwrap()
        .id;
    let salary = ledger
        .create_category(NewCategory {
            name: "Sueldo".to_string(),
            kind: CategoryKind::Income,
            icon: "💰".to_string(),
            color: "#10B981".to_string(),
            parent_id: None,
        })
        .unwrap()
        .id;
    let groceries = ledger
        .create_category(NewCategory {
            name: "Supermercado".to_string(),
            kind: CategoryKind::Expense,
            icon: "🛒".to_string(),
            color: "#F59E0B".to_string(),
            parent_id: None,
        })
        .unwrap()
        .id;
    let streaming = ledger
        .create_category(NewCategory {
            name: "Streaming".to_string(),
            kind: CategoryKind::Expense,
            icon: "📺".to_string(),
            color: "#8B5CF6".to_string(),
            parent_id: None,
        })
        .unwrap()
        .id;
    Fixture {
        ledger,
        bank,
        cash,
        card,
        salary,
        groceries,
        streaming,
    }
}

impl Fixture {
    fn income(&mut self, date: NaiveDate, amount: i64) {
        self.ledger
            .apply(NewTransaction {
                date,
                amount: Money::from(amount),
                kind: TransactionKind::Income {
                    account_id: self.bank,
                    category_id: self.salary,
                },
                description: "ingreso".to_string(),
            })
            .unwrap();
    }

    fn expense(
        &mut self,
        date: NaiveDate,
        amount: i64,
        account: AccountId,
        category: CategoryId,
    ) -> plata_shared::types::TransactionId {
        self.ledger
            .apply(NewTransaction {
                date,
                amount: Money::from(amount),
                kind: TransactionKind::Expense {
                    account_id: account,
                    category_id: category,
                },
                description: "gasto".to_string(),
            })
            .unwrap()
            .transaction
            .id
    }
}

#[test]
fn test_kpis_full_scenario() {
    let mut fx = fixture();
    fx.income(date(2026, 8, 3), 850_000);
    fx.expense(date(2026, 8, 5), 120_000, fx.bank, fx.groceries);
    fx.expense(date(2026, 8, 10), 64_000, fx.cash, fx.groceries);
    fx.expense(date(2026, 8, 12), 20_000, fx.card, fx.streaming);

    let kpis = MetricsService::kpis(&fx.ledger, today(), &KpiConfig::default());

    assert_eq!(kpis.liquid_balance, Money::from(1_816_000));
    assert_eq!(kpis.total_debt, Money::from(470_300));
    assert_eq!(kpis.real_balance, Money::from(1_345_700));
    assert_eq!(kpis.monthly_income, Money::from(850_000));
    assert_eq!(kpis.monthly_expense, Money::from(204_000));
    // (850000 - 204000) / 850000 * 100
    assert_eq!(kpis.savings_rate, dec!(76));
    // 204000 over 30 days burns 6800/day; floor(1816000 / 6800)
    assert_eq!(kpis.days_of_autonomy, 267);
    // 470300 / 850000 * 100
    assert_eq!(kpis.financial_load, dec!(55.33));
}

#[test]
fn test_kpis_without_income_fall_back() {
    let fx = fixture();

    let kpis = MetricsService::kpis(&fx.ledger, today(), &KpiConfig::default());
    assert_eq!(kpis.savings_rate, dec!(0));
    assert_eq!(kpis.days_of_autonomy, UNBOUNDED_AUTONOMY_DAYS);
    // 450300 / 2100000 * 100 against the default reference income.
    assert_eq!(kpis.financial_load, dec!(21.44));

    let no_reference = KpiConfig {
        fallback_monthly_income: Money::ZERO,
    };
    let kpis = MetricsService::kpis(&fx.ledger, today(), &no_reference);
    assert_eq!(kpis.financial_load, dec!(0));
}

#[test]
fn test_autonomy_ignores_spending_older_than_the_window() {
    let mut fx = fixture();
    fx.expense(date(2026, 6, 1), 300_000, fx.bank, fx.groceries);

    let kpis = MetricsService::kpis(&fx.ledger, today(), &KpiConfig::default());
    assert_eq!(kpis.days_of_autonomy, UNBOUNDED_AUTONOMY_DAYS);
    assert_eq!(kpis.monthly_expense, Money::from(0));
}

#[test]
fn test_transfers_and_payments_are_not_income_or_expense() {
    let mut fx = fixture();
    fx.ledger
        .apply(NewTransaction {
            date: date(2026, 8, 8),
            amount: Money::from(100_000),
            kind: TransactionKind::Transfer {
                from_account_id: fx.bank,
                to_account_id: fx.cash,
            },
            description: "retiro".to_string(),
        })
        .unwrap();
    fx.ledger
        .apply(NewTransaction {
            date: date(2026, 8, 9),
            amount: Money::from(50_000),
            kind: TransactionKind::CreditCardPayment {
                from_account_id: fx.bank,
                card_account_id: fx.card,
            },
            description: "pago tarjeta".to_string(),
        })
        .unwrap();

    let kpis = MetricsService::kpis(&fx.ledger, today(), &KpiConfig::default());
    assert_eq!(kpis.monthly_income, Money::ZERO);
    assert_eq!(kpis.monthly_expense, Money::ZERO);
    assert_eq!(kpis.total_debt, Money::from(400_300));
    assert!(MetricsService::category_breakdown(&fx.ledger, 2026, 8).is_empty());
}

#[test]
fn test_card_statement_scenario() {
    let mut fx = fixture();
    fx.expense(date(2026, 8, 12), 20_000, fx.card, fx.streaming);
    // Same month but paid in cash: not part of the card statement.
    fx.expense(date(2026, 8, 13), 99_000, fx.cash, fx.groceries);

    let statements = MetricsService::card_statements(&fx.ledger, today());
    assert_eq!(statements.len(), 1, "one statement per credit card");

    let statement = &statements[0];
    assert_eq!(statement.account_id, fx.card);
    assert_eq!(statement.account_name, "Visa");
    assert_eq!(statement.amount_due, Money::from(20_000));
    assert_eq!(statement.period_start, date(2026, 7, 25));
    assert_eq!(statement.closing_date, date(2026, 8, 25));
    assert_eq!(statement.due_date, date(2026, 8, 10));
}

#[test]
fn test_card_statement_period_is_half_open() {
    let mut fx = fixture();
    fx.expense(date(2026, 7, 25), 5_000, fx.card, fx.streaming);
    fx.expense(date(2026, 8, 25), 7_000, fx.card, fx.streaming);

    let statements = MetricsService::card_statements(&fx.ledger, today());
    // The period start counts, the closing date belongs to the next cycle.
    assert_eq!(statements[0].amount_due, Money::from(5_000));
}

#[test]
fn test_category_breakdown_groups_and_sorts() {
    let mut fx = fixture();
    fx.expense(date(2026, 8, 5), 180_000, fx.bank, fx.groceries);
    fx.expense(date(2026, 8, 12), 20_000, fx.card, fx.streaming);

    let slices = MetricsService::category_breakdown(&fx.ledger, 2026, 8);
    assert_eq!(slices.len(), 2);
    assert_eq!(slices[0].name, "Supermercado");
    assert_eq!(slices[0].amount, Money::from(180_000));
    assert_eq!(slices[0].percentage, dec!(90));
    assert_eq!(slices[1].name, "Streaming");
    assert_eq!(slices[1].percentage, dec!(10));

    assert!(
        MetricsService::category_breakdown(&fx.ledger, 2026, 7).is_empty(),
        "months without spending produce no slices"
    );
}

#[test]
fn test_category_breakdown_percentages_sum_to_100() {
    let mut fx = fixture();
    let pets = fx
        .ledger
        .create_category(NewCategory {
            name: "Mascotas".to_string(),
            kind: CategoryKind::Expense,
            icon: "🐶".to_string(),
            color: "#F97316".to_string(),
            parent_id: None,
        })
        .unwrap()
        .id;
    fx.expense(date(2026, 8, 1), 33_333, fx.bank, fx.groceries);
    fx.expense(date(2026, 8, 2), 33_333, fx.bank, fx.streaming);
    fx.expense(date(2026, 8, 3), 33_334, fx.bank, pets);

    let slices = MetricsService::category_breakdown(&fx.ledger, 2026, 8);
    let total: rust_decimal::Decimal = slices.iter().map(|s| s.percentage).sum();
    assert!(
        (total - dec!(100)).abs() <= dec!(0.05),
        "percentages sum to 100 within rounding, got {total}"
    );
}

#[test]
fn test_daily_expenses_ascending_by_date() {
    let mut fx = fixture();
    fx.expense(date(2026, 8, 10), 7_000, fx.cash, fx.groceries);
    fx.expense(date(2026, 8, 3), 10_000, fx.bank, fx.groceries);
    fx.expense(date(2026, 8, 3), 5_000, fx.cash, fx.streaming);

    let series = MetricsService::daily_expenses(&fx.ledger, 2026, 8);
    assert_eq!(series.len(), 2);
    assert_eq!(series[0].date, date(2026, 8, 3));
    assert_eq!(series[0].amount, Money::from(15_000));
    assert_eq!(series[1].date, date(2026, 8, 10));
    assert_eq!(series[1].amount, Money::from(7_000));
}

#[test]
fn test_monthly_summary() {
    let mut fx = fixture();
    fx.income(date(2026, 8, 3), 850_000);
    fx.expense(date(2026, 8, 5), 204_000, fx.bank, fx.groceries);

    let summary = MetricsService::monthly_summary(&fx.ledger, 2026, 8);
    assert_eq!(summary.income, Money::from(850_000));
    assert_eq!(summary.expense, Money::from(204_000));
    assert_eq!(summary.savings, Money::from(646_000));

    let july = MetricsService::monthly_summary(&fx.ledger, 2026, 7);
    assert_eq!(july.income, Money::ZERO);
    assert_eq!(july.expense, Money::ZERO);
    assert_eq!(july.savings, Money::ZERO);
}

#[test]
fn test_budget_status_crosses_default_threshold() {
    let mut fx = fixture();
    let budget = fx
        .ledger
        .create_budget(NewBudget {
            category_id: fx.groceries,
            amount: Money::from(200_000),
            period: BudgetPeriod::Monthly,
            alert_threshold: None,
        })
        .unwrap();
    let idle = fx
        .ledger
        .create_budget(NewBudget {
            category_id: fx.streaming,
            amount: Money::from(50_000),
            period: BudgetPeriod::Monthly,
            alert_threshold: None,
        })
        .unwrap();
    fx.expense(date(2026, 8, 5), 120_000, fx.bank, fx.groceries);
    fx.expense(date(2026, 8, 10), 60_000, fx.cash, fx.groceries);
    // Last month's spending does not count against this month's cap.
    fx.expense(date(2026, 7, 10), 500_000, fx.bank, fx.groceries);

    let statuses = MetricsService::budget_statuses(&fx.ledger, today());
    assert_eq!(statuses.len(), 2);

    let groceries = statuses.iter().find(|s| s.budget_id == budget.id).unwrap();
    assert_eq!(groceries.category_name, "Supermercado");
    assert_eq!(groceries.spent, Money::from(180_000));
    assert_eq!(groceries.remaining, Money::from(20_000));
    assert_eq!(groceries.percentage, dec!(90));
    assert!(groceries.over_threshold);

    let streaming = statuses.iter().find(|s| s.budget_id == idle.id).unwrap();
    assert_eq!(streaming.spent, Money::ZERO);
    assert_eq!(streaming.percentage, dec!(0));
    assert!(!streaming.over_threshold);
}

#[test]
fn test_voided_pair_drops_out_of_every_metric() {
    let mut fx = fixture();
    fx.ledger
        .create_budget(NewBudget {
            category_id: fx.groceries,
            amount: Money::from(200_000),
            period: BudgetPeriod::Monthly,
            alert_threshold: None,
        })
        .unwrap();
    let id = fx.expense(date(2026, 8, 5), 50_000, fx.bank, fx.groceries);
    fx.ledger.void(id).unwrap();

    let kpis = MetricsService::kpis(&fx.ledger, today(), &KpiConfig::default());
    assert_eq!(kpis.monthly_expense, Money::ZERO);
    assert_eq!(kpis.liquid_balance, Money::from(1_150_000));
    assert!(MetricsService::category_breakdown(&fx.ledger, 2026, 8).is_empty());
    assert!(MetricsService::daily_expenses(&fx.ledger, 2026, 8).is_empty());
    assert_eq!(
        MetricsService::budget_statuses(&fx.ledger, today())[0].spent,
        Money::ZERO
    );
}

#[test]
fn test_goal_progress() {
    let mut fx = fixture();
    fx.ledger
        .create_goal(NewGoal {
            name: "Viaje a Europa".to_string(),
            target_amount: Money::from(3_000_000),
            current_amount: Money::from(800_000),
            target_date: None,
            color: "#8B5CF6".to_string(),
            icon: "plane".to_string(),
        })
        .unwrap();

    let progress = MetricsService::goal_progress(&fx.ledger);
    assert_eq!(progress.len(), 1);
    assert_eq!(progress[0].name, "Viaje a Europa");
    assert_eq!(progress[0].percentage, dec!(26.67));
    assert_eq!(progress[0].remaining, Money::from(2_200_000));
}

#[test]
fn test_zero_denominators_are_guarded() {
    // The engine refuses zero amounts, but stored data predating a rule
    // change could still carry them; metrics must not divide by zero.
    let fx = fixture();
    let user_id = fx.ledger.user_id();
    let now = Utc::now();
    let ledger = Ledger::from_snapshot(LedgerSnapshot {
        user_id,
        accounts: fx.ledger.accounts().to_vec(),
        categories: fx.ledger.categories().to_vec(),
        transactions: Vec::new(),
        budgets: vec![Budget {
            id: BudgetId::new(),
            user_id,
            category_id: fx.groceries,
            amount: Money::ZERO,
            period: BudgetPeriod::Monthly,
            alert_threshold: 80,
            created_at: now,
            updated_at: now,
        }],
        goals: vec![Goal {
            id: GoalId::new(),
            user_id,
            name: "Meta vacía".to_string(),
            target_amount: Money::ZERO,
            current_amount: Money::ZERO,
            target_date: None,
            color: "#6B7280".to_string(),
            icon: "target".to_string(),
            created_at: now,
            updated_at: now,
        }],
    });

    let statuses = MetricsService::budget_statuses(&ledger, today());
    assert_eq!(statuses[0].percentage, dec!(0));
    assert!(!statuses[0].over_threshold);

    let progress = MetricsService::goal_progress(&ledger);
    assert_eq!(progress[0].percentage, dec!(0));
    assert_eq!(progress[0].remaining, Money::ZERO);
}
