//! Finance repository: durable storage behind the in-memory ledger.
//!
//! Loads a user's complete financial state as a `LedgerSnapshot` and
//! mirrors every ledger mutation back to Postgres. Multi-row writes
//! (recording a transaction together with its balance changes) run
//! inside a database transaction.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use plata_core::ledger::{
    Account, AccountKind, AppliedTransaction, Budget, BudgetPeriod, CardTerms, Category,
    CategoryKind, Contribution, Goal, LedgerSnapshot, Transaction, TransactionKind, VoidOutcome,
};
use plata_shared::types::{AccountId, BudgetId, CategoryId, GoalId, Money, TransactionId, UserId};

use crate::entities::{
    accounts, budgets, categories, goals,
    sea_orm_active_enums::{
        AccountType, BudgetPeriod as DbBudgetPeriod, CategoryType, TransactionType,
    },
    transactions,
};

/// Error types for finance storage operations.
#[derive(Debug, thiserror::Error)]
pub enum FinanceError {
    /// A stored row is inconsistent with its declared kind.
    #[error("Corrupt {table} row {id}: {reason}")]
    CorruptRow {
        /// Table the row lives in.
        table: &'static str,
        /// Primary key of the offending row.
        id: Uuid,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Finance repository bridging the domain ledger and Postgres.
#[derive(Debug, Clone)]
pub struct FinanceRepository {
    db: DatabaseConnection,
}

impl FinanceRepository {
    /// Creates a new finance repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    // ========== Snapshot loading ==========

    /// Loads everything a user owns into a ledger snapshot.
    ///
    /// Runs inside a single database transaction so the snapshot is
    /// internally consistent. Categories include the global defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails or a stored row is corrupt.
    pub async fn load_snapshot(&self, user_id: UserId) -> Result<LedgerSnapshot, FinanceError> {
        let uid = user_id.into_inner();
        let txn = self.db.begin().await?;

        let account_rows = accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(uid))
            .order_by_asc(accounts::Column::CreatedAt)
            .all(&txn)
            .await?;

        let category_rows = categories::Entity::find()
            .filter(
                Condition::any()
                    .add(categories::Column::UserId.eq(uid))
                    .add(categories::Column::UserId.is_null()),
            )
            .order_by_asc(categories::Column::CreatedAt)
            .all(&txn)
            .await?;

        // Ascending creation order keeps the ledger history append-ordered.
        let transaction_rows = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(uid))
            .order_by_asc(transactions::Column::CreatedAt)
            .order_by_asc(transactions::Column::Id)
            .all(&txn)
            .await?;

        let budget_rows = budgets::Entity::find()
            .filter(budgets::Column::UserId.eq(uid))
            .order_by_asc(budgets::Column::CreatedAt)
            .all(&txn)
            .await?;

        let goal_rows = goals::Entity::find()
            .filter(goals::Column::UserId.eq(uid))
            .order_by_asc(goals::Column::CreatedAt)
            .all(&txn)
            .await?;

        txn.commit().await?;

        let snapshot = LedgerSnapshot {
            user_id,
            accounts: account_rows
                .into_iter()
                .map(map_account)
                .collect::<Result<_, _>>()?,
            categories: category_rows.into_iter().map(map_category).collect(),
            transactions: transaction_rows
                .into_iter()
                .map(map_transaction)
                .collect::<Result<_, _>>()?,
            budgets: budget_rows.into_iter().map(map_budget).collect(),
            goals: goal_rows.into_iter().map(map_goal).collect(),
        };

        tracing::debug!(
            user_id = %uid,
            accounts = snapshot.accounts.len(),
            transactions = snapshot.transactions.len(),
            "loaded ledger snapshot"
        );

        Ok(snapshot)
    }

    // ========== Accounts ==========

    /// Persists a newly created account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn insert_account(&self, account: &Account) -> Result<(), FinanceError> {
        account_active_model(account).insert(&self.db).await?;
        Ok(())
    }

    /// Persists the current state of an existing account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn update_account(&self, account: &Account) -> Result<(), FinanceError> {
        let mut model = account_active_model(account);
        model.created_at = sea_orm::ActiveValue::NotSet;
        model.update(&self.db).await?;
        Ok(())
    }

    /// Deletes an account row.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete_account(&self, id: AccountId) -> Result<(), FinanceError> {
        accounts::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await?;
        Ok(())
    }

    // ========== Categories ==========

    /// Persists a newly created category.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn insert_category(&self, category: &Category) -> Result<(), FinanceError> {
        category_active_model(category).insert(&self.db).await?;
        Ok(())
    }

    /// Persists the current state of an existing category.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn update_category(&self, category: &Category) -> Result<(), FinanceError> {
        let mut model = category_active_model(category);
        model.created_at = sea_orm::ActiveValue::NotSet;
        model.update(&self.db).await?;
        Ok(())
    }

    /// Deletes a category row.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete_category(&self, id: CategoryId) -> Result<(), FinanceError> {
        categories::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await?;
        Ok(())
    }

    // ========== Budgets ==========

    /// Persists a newly created budget.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn insert_budget(&self, budget: &Budget) -> Result<(), FinanceError> {
        budget_active_model(budget).insert(&self.db).await?;
        Ok(())
    }

    /// Persists the current state of an existing budget.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn update_budget(&self, budget: &Budget) -> Result<(), FinanceError> {
        let mut model = budget_active_model(budget);
        model.created_at = sea_orm::ActiveValue::NotSet;
        model.update(&self.db).await?;
        Ok(())
    }

    /// Deletes a budget row.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete_budget(&self, id: BudgetId) -> Result<(), FinanceError> {
        budgets::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await?;
        Ok(())
    }

    // ========== Goals ==========

    /// Persists a newly created goal.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn insert_goal(&self, goal: &Goal) -> Result<(), FinanceError> {
        goal_active_model(goal).insert(&self.db).await?;
        Ok(())
    }

    /// Persists the current state of an existing goal.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn update_goal(&self, goal: &Goal) -> Result<(), FinanceError> {
        let mut model = goal_active_model(goal);
        model.created_at = sea_orm::ActiveValue::NotSet;
        model.update(&self.db).await?;
        Ok(())
    }

    /// Deletes a goal row.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete_goal(&self, id: GoalId) -> Result<(), FinanceError> {
        goals::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await?;
        Ok(())
    }

    // ========== Transactions ==========

    /// Records an applied transaction and its balance changes atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert or update fails; nothing is
    /// persisted in that case.
    pub async fn record_applied(&self, applied: &AppliedTransaction) -> Result<(), FinanceError> {
        let txn = self.db.begin().await?;

        transaction_active_model(&applied.transaction)
            .insert(&txn)
            .await?;
        for account in &applied.accounts {
            update_balance(&txn, account).await?;
        }

        txn.commit().await?;
        Ok(())
    }

    /// Records a void: the reversal row, the voided flags on the
    /// original, and the restored balances, atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert or update fails; nothing is
    /// persisted in that case.
    pub async fn record_void(&self, outcome: &VoidOutcome) -> Result<(), FinanceError> {
        let txn = self.db.begin().await?;

        transaction_active_model(&outcome.reversal)
            .insert(&txn)
            .await?;
        transactions::ActiveModel {
            id: Set(outcome.original.id.into_inner()),
            voided: Set(true),
            voided_by: Set(outcome.original.voided_by.map(TransactionId::into_inner)),
            ..Default::default()
        }
        .update(&txn)
        .await?;
        for account in &outcome.accounts {
            update_balance(&txn, account).await?;
        }

        txn.commit().await?;
        Ok(())
    }

    /// Records a goal contribution: the goal's new saved amount and the
    /// source account's new balance, atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if either update fails; nothing is persisted in
    /// that case.
    pub async fn record_contribution(
        &self,
        contribution: &Contribution,
    ) -> Result<(), FinanceError> {
        let txn = self.db.begin().await?;

        goals::ActiveModel {
            id: Set(contribution.goal.id.into_inner()),
            current_amount: Set(contribution.goal.current_amount.into_inner()),
            updated_at: Set(contribution.goal.updated_at.into()),
            ..Default::default()
        }
        .update(&txn)
        .await?;
        update_balance(&txn, &contribution.account).await?;

        txn.commit().await?;
        Ok(())
    }
}

async fn update_balance(
    txn: &DatabaseTransaction,
    account: &Account,
) -> Result<(), FinanceError> {
    accounts::ActiveModel {
        id: Set(account.id.into_inner()),
        balance: Set(account.balance.into_inner()),
        updated_at: Set(account.updated_at.into()),
        ..Default::default()
    }
    .update(txn)
    .await?;
    Ok(())
}

// ========== Row -> domain mapping ==========

fn map_account(row: accounts::Model) -> Result<Account, FinanceError> {
    let kind = match row.account_type {
        AccountType::Cash => AccountKind::Cash,
        AccountType::Bank => AccountKind::Bank,
        AccountType::CreditCard => {
            let (Some(credit_limit), Some(closing_day), Some(due_day)) =
                (row.credit_limit, row.closing_day, row.due_day)
            else {
                return Err(FinanceError::CorruptRow {
                    table: "accounts",
                    id: row.id,
                    reason: "credit card row without card terms",
                });
            };
            AccountKind::CreditCard(CardTerms {
                credit_limit: Money::new(credit_limit),
                closing_day: day_from_db(closing_day, row.id)?,
                due_day: day_from_db(due_day, row.id)?,
            })
        }
    };

    Ok(Account {
        id: AccountId::from_uuid(row.id),
        user_id: UserId::from_uuid(row.user_id),
        name: row.name,
        kind,
        balance: Money::new(row.balance),
        color: row.color,
        icon: row.icon,
        created_at: row.created_at.to_utc(),
        updated_at: row.updated_at.to_utc(),
    })
}

fn day_from_db(day: i32, row_id: Uuid) -> Result<u32, FinanceError> {
    u32::try_from(day).map_err(|_| FinanceError::CorruptRow {
        table: "accounts",
        id: row_id,
        reason: "negative card day",
    })
}

fn map_category(row: categories::Model) -> Category {
    Category {
        id: CategoryId::from_uuid(row.id),
        user_id: row.user_id.map(UserId::from_uuid),
        name: row.name,
        kind: match row.category_type {
            CategoryType::Income => CategoryKind::Income,
            CategoryType::Expense => CategoryKind::Expense,
        },
        icon: row.icon,
        color: row.color,
        parent_id: row.parent_id.map(CategoryId::from_uuid),
        is_default: row.is_default,
    }
}

fn map_transaction(row: transactions::Model) -> Result<Transaction, FinanceError> {
    let corrupt = |reason: &'static str| FinanceError::CorruptRow {
        table: "transactions",
        id: row.id,
        reason,
    };

    let kind = match row.transaction_type {
        TransactionType::Income => TransactionKind::Income {
            account_id: AccountId::from_uuid(row.from_account_id),
            category_id: CategoryId::from_uuid(
                row.category_id.ok_or_else(|| corrupt("income row without category"))?,
            ),
        },
        TransactionType::Expense => TransactionKind::Expense {
            account_id: AccountId::from_uuid(row.from_account_id),
            category_id: CategoryId::from_uuid(
                row.category_id.ok_or_else(|| corrupt("expense row without category"))?,
            ),
        },
        TransactionType::Transfer => TransactionKind::Transfer {
            from_account_id: AccountId::from_uuid(row.from_account_id),
            to_account_id: AccountId::from_uuid(
                row.to_account_id
                    .ok_or_else(|| corrupt("transfer row without target account"))?,
            ),
        },
        TransactionType::CreditCardPayment => TransactionKind::CreditCardPayment {
            from_account_id: AccountId::from_uuid(row.from_account_id),
            card_account_id: AccountId::from_uuid(
                row.to_account_id
                    .ok_or_else(|| corrupt("card payment row without card account"))?,
            ),
        },
    };

    Ok(Transaction {
        id: TransactionId::from_uuid(row.id),
        user_id: UserId::from_uuid(row.user_id),
        date: row.transaction_date,
        amount: Money::new(row.amount),
        kind,
        description: row.description,
        voided: row.voided,
        voided_by: row.voided_by.map(TransactionId::from_uuid),
        reverses: row.reverses.map(TransactionId::from_uuid),
        created_at: row.created_at.to_utc(),
    })
}

fn map_budget(row: budgets::Model) -> Budget {
    Budget {
        id: BudgetId::from_uuid(row.id),
        user_id: UserId::from_uuid(row.user_id),
        category_id: CategoryId::from_uuid(row.category_id),
        amount: Money::new(row.amount),
        period: match row.period {
            DbBudgetPeriod::Monthly => BudgetPeriod::Monthly,
            DbBudgetPeriod::Weekly => BudgetPeriod::Weekly,
        },
        alert_threshold: row.alert_threshold.unsigned_abs(),
        created_at: row.created_at.to_utc(),
        updated_at: row.updated_at.to_utc(),
    }
}

fn map_goal(row: goals::Model) -> Goal {
    Goal {
        id: GoalId::from_uuid(row.id),
        user_id: UserId::from_uuid(row.user_id),
        name: row.name,
        target_amount: Money::new(row.target_amount),
        current_amount: Money::new(row.current_amount),
        target_date: row.target_date,
        color: row.color,
        icon: row.icon,
        created_at: row.created_at.to_utc(),
        updated_at: row.updated_at.to_utc(),
    }
}

// ========== Domain -> row mapping ==========

fn account_active_model(account: &Account) -> accounts::ActiveModel {
    let (account_type, credit_limit, closing_day, due_day) = match &account.kind {
        AccountKind::Cash => (AccountType::Cash, None, None, None),
        AccountKind::Bank => (AccountType::Bank, None, None, None),
        AccountKind::CreditCard(terms) => (
            AccountType::CreditCard,
            Some(terms.credit_limit.into_inner()),
            Some(day_to_db(terms.closing_day)),
            Some(day_to_db(terms.due_day)),
        ),
    };

    accounts::ActiveModel {
        id: Set(account.id.into_inner()),
        user_id: Set(account.user_id.into_inner()),
        name: Set(account.name.clone()),
        account_type: Set(account_type),
        balance: Set(account.balance.into_inner()),
        credit_limit: Set(credit_limit),
        closing_day: Set(closing_day),
        due_day: Set(due_day),
        color: Set(account.color.clone()),
        icon: Set(account.icon.clone()),
        created_at: Set(account.created_at.into()),
        updated_at: Set(account.updated_at.into()),
    }
}

// Card days are validated to 1..=31 before they reach storage; the zero
// fallback would be rejected by the chk_closing_day constraint.
fn day_to_db(day: u32) -> i32 {
    i32::try_from(day).unwrap_or_default()
}

fn category_active_model(category: &Category) -> categories::ActiveModel {
    let now = Utc::now().into();
    categories::ActiveModel {
        id: Set(category.id.into_inner()),
        user_id: Set(category.user_id.map(UserId::into_inner)),
        name: Set(category.name.clone()),
        category_type: Set(match category.kind {
            CategoryKind::Income => CategoryType::Income,
            CategoryKind::Expense => CategoryType::Expense,
        }),
        icon: Set(category.icon.clone()),
        color: Set(category.color.clone()),
        parent_id: Set(category.parent_id.map(CategoryId::into_inner)),
        is_default: Set(category.is_default),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

fn budget_active_model(budget: &Budget) -> budgets::ActiveModel {
    budgets::ActiveModel {
        id: Set(budget.id.into_inner()),
        user_id: Set(budget.user_id.into_inner()),
        category_id: Set(budget.category_id.into_inner()),
        amount: Set(budget.amount.into_inner()),
        period: Set(match budget.period {
            BudgetPeriod::Monthly => DbBudgetPeriod::Monthly,
            BudgetPeriod::Weekly => DbBudgetPeriod::Weekly,
        }),
        alert_threshold: Set(i32::try_from(budget.alert_threshold).unwrap_or_default()),
        created_at: Set(budget.created_at.into()),
        updated_at: Set(budget.updated_at.into()),
    }
}

fn goal_active_model(goal: &Goal) -> goals::ActiveModel {
    goals::ActiveModel {
        id: Set(goal.id.into_inner()),
        user_id: Set(goal.user_id.into_inner()),
        name: Set(goal.name.clone()),
        target_amount: Set(goal.target_amount.into_inner()),
        current_amount: Set(goal.current_amount.into_inner()),
        target_date: Set(goal.target_date),
        color: Set(goal.color.clone()),
        icon: Set(goal.icon.clone()),
        created_at: Set(goal.created_at.into()),
        updated_at: Set(goal.updated_at.into()),
    }
}

fn transaction_active_model(tx: &Transaction) -> transactions::ActiveModel {
    let (transaction_type, category_id, from_account_id, to_account_id) = match tx.kind {
        TransactionKind::Income {
            account_id,
            category_id,
        } => (
            TransactionType::Income,
            Some(category_id.into_inner()),
            account_id.into_inner(),
            None,
        ),
        TransactionKind::Expense {
            account_id,
            category_id,
        } => (
            TransactionType::Expense,
            Some(category_id.into_inner()),
            account_id.into_inner(),
            None,
        ),
        TransactionKind::Transfer {
            from_account_id,
            to_account_id,
        } => (
            TransactionType::Transfer,
            None,
            from_account_id.into_inner(),
            Some(to_account_id.into_inner()),
        ),
        TransactionKind::CreditCardPayment {
            from_account_id,
            card_account_id,
        } => (
            TransactionType::CreditCardPayment,
            None,
            from_account_id.into_inner(),
            Some(card_account_id.into_inner()),
        ),
    };

    transactions::ActiveModel {
        id: Set(tx.id.into_inner()),
        user_id: Set(tx.user_id.into_inner()),
        transaction_type: Set(transaction_type),
        transaction_date: Set(tx.date),
        amount: Set(tx.amount.into_inner()),
        description: Set(tx.description.clone()),
        category_id: Set(category_id),
        from_account_id: Set(from_account_id),
        to_account_id: Set(to_account_id),
        voided: Set(tx.voided),
        voided_by: Set(tx.voided_by.map(TransactionId::into_inner)),
        reverses: Set(tx.reverses.map(TransactionId::into_inner)),
        created_at: Set(tx.created_at.into()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use super::*;

    fn card_row() -> accounts::Model {
        accounts::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Banco Estado Visa".to_string(),
            account_type: AccountType::CreditCard,
            balance: dec!(450_300),
            credit_limit: Some(dec!(2_000_000)),
            closing_day: Some(25),
            due_day: Some(10),
            color: "#f97316".to_string(),
            icon: "credit-card".to_string(),
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_card_account_round_trip() {
        let row = card_row();
        let account = map_account(row.clone()).unwrap();

        assert!(account.kind.is_credit_card());
        let terms = account.kind.card_terms().unwrap();
        assert_eq!(terms.credit_limit, Money::from(2_000_000));
        assert_eq!(terms.closing_day, 25);
        assert_eq!(terms.due_day, 10);

        let model = account_active_model(&account);
        assert_eq!(model.credit_limit.clone().unwrap(), Some(dec!(2_000_000)));
        assert_eq!(model.closing_day.clone().unwrap(), Some(25));
        assert_eq!(model.balance.clone().unwrap(), dec!(450_300));
    }

    #[test]
    fn test_card_row_without_terms_is_corrupt() {
        let mut row = card_row();
        row.closing_day = None;

        let err = map_account(row).unwrap_err();
        assert!(matches!(err, FinanceError::CorruptRow { table: "accounts", .. }));
    }

    #[test]
    fn test_cash_row_ignores_card_columns() {
        let mut row = card_row();
        row.account_type = AccountType::Cash;
        row.credit_limit = None;
        row.closing_day = None;
        row.due_day = None;

        let account = map_account(row).unwrap();
        assert_eq!(account.kind, AccountKind::Cash);
    }

    fn expense_row() -> transactions::Model {
        transactions::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            transaction_type: TransactionType::Expense,
            transaction_date: NaiveDate::from_ymd_opt(2026, 8, 18).unwrap(),
            amount: dec!(45_300),
            description: "Supermercado".to_string(),
            category_id: Some(Uuid::new_v4()),
            from_account_id: Uuid::new_v4(),
            to_account_id: None,
            voided: false,
            voided_by: None,
            reverses: None,
            created_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_expense_row_maps_to_expense_kind() {
        let row = expense_row();
        let category_id = row.category_id.unwrap();
        let account_id = row.from_account_id;

        let tx = map_transaction(row).unwrap();
        match tx.kind {
            TransactionKind::Expense {
                account_id: a,
                category_id: c,
            } => {
                assert_eq!(a.into_inner(), account_id);
                assert_eq!(c.into_inner(), category_id);
            }
            other => panic!("expected expense kind, got {other:?}"),
        }
        assert_eq!(tx.amount, Money::from(45_300));
        assert!(tx.is_effective());
    }

    #[test]
    fn test_expense_row_without_category_is_corrupt() {
        let mut row = expense_row();
        row.category_id = None;

        let err = map_transaction(row).unwrap_err();
        assert!(matches!(err, FinanceError::CorruptRow { table: "transactions", .. }));
    }

    #[test]
    fn test_transfer_row_without_target_is_corrupt() {
        let mut row = expense_row();
        row.transaction_type = TransactionType::Transfer;
        row.category_id = None;
        row.to_account_id = None;

        let err = map_transaction(row).unwrap_err();
        assert!(matches!(err, FinanceError::CorruptRow { .. }));
    }

    #[test]
    fn test_card_payment_row_round_trip() {
        let mut row = expense_row();
        row.transaction_type = TransactionType::CreditCardPayment;
        row.category_id = None;
        row.to_account_id = Some(Uuid::new_v4());

        let tx = map_transaction(row).unwrap();
        assert!(matches!(tx.kind, TransactionKind::CreditCardPayment { .. }));

        let model = transaction_active_model(&tx);
        assert_eq!(
            model.transaction_type.clone().unwrap(),
            TransactionType::CreditCardPayment
        );
        assert!(model.category_id.clone().unwrap().is_none());
        assert!(model.to_account_id.clone().unwrap().is_some());
    }

    #[test]
    fn test_voided_pair_flags_survive_mapping() {
        let reversal_id = Uuid::new_v4();
        let mut row = expense_row();
        row.voided = true;
        row.voided_by = Some(reversal_id);

        let tx = map_transaction(row).unwrap();
        assert!(tx.voided);
        assert_eq!(tx.voided_by.unwrap().into_inner(), reversal_id);
        assert!(!tx.is_effective());
    }

    #[test]
    fn test_budget_and_goal_mapping() {
        let budget_row = budgets::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            category_id: Uuid::new_v4(),
            amount: dec!(200_000),
            period: DbBudgetPeriod::Monthly,
            alert_threshold: 80,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        };
        let budget = map_budget(budget_row);
        assert_eq!(budget.amount, Money::from(200_000));
        assert_eq!(budget.period, BudgetPeriod::Monthly);
        assert_eq!(budget.alert_threshold, 80);

        let goal_row = goals::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Viaje a Europa".to_string(),
            target_amount: dec!(3_000_000),
            current_amount: dec!(800_000),
            target_date: NaiveDate::from_ymd_opt(2026, 12, 31),
            color: "#3b82f6".to_string(),
            icon: "plane".to_string(),
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        };
        let goal = map_goal(goal_row);
        assert_eq!(goal.target_amount, Money::from(3_000_000));
        assert_eq!(goal.current_amount, Money::from(800_000));
        assert!(goal.target_date.is_some());
    }

    #[test]
    fn test_default_category_has_no_owner() {
        let row = categories::Model {
            id: Uuid::new_v4(),
            user_id: None,
            name: "Supermercado".to_string(),
            category_type: CategoryType::Expense,
            icon: "🛒".to_string(),
            color: "#f97316".to_string(),
            parent_id: None,
            is_default: true,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        };

        let category = map_category(row);
        assert!(category.is_read_only());
        assert_eq!(category.kind, CategoryKind::Expense);
    }
}
