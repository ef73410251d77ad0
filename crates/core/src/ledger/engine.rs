//! The in-memory ledger engine.
//!
//! A [`Ledger`] holds one user's complete financial state and is the only
//! place balances change. Every mutating operation validates its inputs
//! against the current state before touching anything, so a returned error
//! always means nothing happened.
//!
//! Persistence is the caller's problem: operations return the entities
//! they touched so a storage adapter can write exactly those rows.

use chrono::{NaiveDate, Utc};

use plata_shared::types::{AccountId, BudgetId, CategoryId, GoalId, Money, TransactionId, UserId};

use super::account::{Account, AccountKind, AccountUpdate, NewAccount};
use super::budget::{Budget, BudgetUpdate, DEFAULT_ALERT_THRESHOLD, NewBudget};
use super::category::{Category, CategoryKind, CategoryUpdate, NewCategory};
use super::effect::{BalanceEffect, effects_of};
use super::error::LedgerError;
use super::goal::{Goal, GoalUpdate, NewGoal};
use super::transaction::{NewTransaction, Transaction};

/// A fully materialized ledger state, as loaded from storage.
#[derive(Debug, Clone)]
pub struct LedgerSnapshot {
    /// The owning user.
    pub user_id: UserId,
    /// All of the user's accounts.
    pub accounts: Vec<Account>,
    /// Global default categories plus the user's own.
    pub categories: Vec<Category>,
    /// Full transaction history, oldest first.
    pub transactions: Vec<Transaction>,
    /// The user's budgets.
    pub budgets: Vec<Budget>,
    /// The user's goals.
    pub goals: Vec<Goal>,
}

/// Result of applying a transaction: the recorded entry plus every
/// account it moved, carrying updated balances.
#[derive(Debug, Clone)]
pub struct AppliedTransaction {
    /// The newly recorded transaction.
    pub transaction: Transaction,
    /// Accounts whose balances changed.
    pub accounts: Vec<Account>,
}

/// Result of voiding a transaction.
#[derive(Debug, Clone)]
pub struct VoidOutcome {
    /// The original transaction, now flagged voided.
    pub original: Transaction,
    /// The compensating entry that was appended.
    pub reversal: Transaction,
    /// Accounts whose balances changed.
    pub accounts: Vec<Account>,
}

/// Result of a goal contribution.
#[derive(Debug, Clone)]
pub struct Contribution {
    /// The goal with its increased saved amount.
    pub goal: Goal,
    /// The source account with its decreased balance.
    pub account: Account,
}

/// One user's complete financial state.
#[derive(Debug, Clone)]
pub struct Ledger {
    user_id: UserId,
    accounts: Vec<Account>,
    categories: Vec<Category>,
    transactions: Vec<Transaction>,
    budgets: Vec<Budget>,
    goals: Vec<Goal>,
}

impl Ledger {
    /// Creates an empty ledger for a user.
    #[must_use]
    pub const fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            accounts: Vec::new(),
            categories: Vec::new(),
            transactions: Vec::new(),
            budgets: Vec::new(),
            goals: Vec::new(),
        }
    }

    /// Rebuilds a ledger from stored state.
    #[must_use]
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Self {
        Self {
            user_id: snapshot.user_id,
            accounts: snapshot.accounts,
            categories: snapshot.categories,
            transactions: snapshot.transactions,
            budgets: snapshot.budgets,
            goals: snapshot.goals,
        }
    }

    // ========== Read Access ==========

    /// The owning user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// All accounts.
    #[must_use]
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// Looks up one account.
    #[must_use]
    pub fn account(&self, id: AccountId) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    /// All visible categories: global defaults plus the user's own.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Looks up one category.
    #[must_use]
    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Full transaction history, oldest first.
    #[must_use]
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Looks up one transaction.
    #[must_use]
    pub fn transaction(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|tx| tx.id == id)
    }

    /// Transactions filtered by account and date range, newest first.
    #[must_use]
    pub fn transactions_filtered(
        &self,
        account_id: Option<AccountId>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Vec<&Transaction> {
        let mut matches: Vec<&Transaction> = self
            .transactions
            .iter()
            .filter(|tx| account_id.is_none_or(|id| tx.kind.touches(id)))
            .filter(|tx| from.is_none_or(|d| tx.date >= d))
            .filter(|tx| to.is_none_or(|d| tx.date <= d))
            .collect();
        matches.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        matches
    }

    /// All budgets.
    #[must_use]
    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    /// Looks up one budget.
    #[must_use]
    pub fn budget(&self, id: BudgetId) -> Option<&Budget> {
        self.budgets.iter().find(|b| b.id == id)
    }

    /// All goals.
    #[must_use]
    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    /// Looks up one goal.
    #[must_use]
    pub fn goal(&self, id: GoalId) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == id)
    }

    // ========== Accounts ==========

    /// Creates an account.
    pub fn create_account(&mut self, new: NewAccount) -> Result<Account, LedgerError> {
        if new.name.trim().is_empty() {
            return Err(LedgerError::EmptyAccountName);
        }
        if let AccountKind::CreditCard(terms) = &new.kind {
            if !terms.is_valid() {
                return Err(LedgerError::InvalidCardTerms);
            }
        }

        let now = Utc::now();
        let account = Account {
            id: AccountId::new(),
            user_id: self.user_id,
            name: new.name,
            kind: new.kind,
            balance: new.opening_balance,
            color: new.color,
            icon: new.icon,
            created_at: now,
            updated_at: now,
        };
        self.accounts.push(account.clone());
        Ok(account)
    }

    /// Updates an account's display fields or card terms.
    ///
    /// Balance and kind cannot be changed here: balances move only through
    /// transactions and contributions, and the kind is fixed at creation.
    pub fn update_account(
        &mut self,
        id: AccountId,
        update: AccountUpdate,
    ) -> Result<Account, LedgerError> {
        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(LedgerError::EmptyAccountName);
            }
        }
        if let Some(terms) = &update.card_terms {
            if !terms.is_valid() {
                return Err(LedgerError::InvalidCardTerms);
            }
        }
        let idx = self.account_index(id)?;
        if update.card_terms.is_some() && !self.accounts[idx].kind.is_credit_card() {
            return Err(LedgerError::NotACreditCard(id));
        }

        let account = &mut self.accounts[idx];
        if let Some(name) = update.name {
            account.name = name;
        }
        if let Some(color) = update.color {
            account.color = color;
        }
        if let Some(icon) = update.icon {
            account.icon = icon;
        }
        if let Some(terms) = update.card_terms {
            account.kind = AccountKind::CreditCard(terms);
        }
        account.updated_at = Utc::now();
        Ok(account.clone())
    }

    /// Deletes an account that no transaction references.
    ///
    /// Blocking deletion keeps history replayable; orphaning transactions
    /// against a dangling account id would break every derived metric.
    pub fn delete_account(&mut self, id: AccountId) -> Result<(), LedgerError> {
        let idx = self.account_index(id)?;
        if self.transactions.iter().any(|tx| tx.kind.touches(id)) {
            return Err(LedgerError::AccountInUse(id));
        }
        self.accounts.remove(idx);
        Ok(())
    }

    // ========== Categories ==========

    /// Creates a user category.
    pub fn create_category(&mut self, new: NewCategory) -> Result<Category, LedgerError> {
        if new.name.trim().is_empty() {
            return Err(LedgerError::EmptyCategoryName);
        }
        if let Some(parent_id) = new.parent_id {
            if self.category(parent_id).is_none() {
                return Err(LedgerError::CategoryNotFound(parent_id));
            }
        }

        let category = Category {
            id: CategoryId::new(),
            user_id: Some(self.user_id),
            name: new.name,
            kind: new.kind,
            icon: new.icon,
            color: new.color,
            parent_id: new.parent_id,
            is_default: false,
        };
        self.categories.push(category.clone());
        Ok(category)
    }

    /// Updates a user category's display fields.
    pub fn update_category(
        &mut self,
        id: CategoryId,
        update: CategoryUpdate,
    ) -> Result<Category, LedgerError> {
        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(LedgerError::EmptyCategoryName);
            }
        }
        let idx = self.category_index(id)?;
        if self.categories[idx].is_read_only() {
            return Err(LedgerError::DefaultCategoryReadOnly);
        }

        let category = &mut self.categories[idx];
        if let Some(name) = update.name {
            category.name = name;
        }
        if let Some(icon) = update.icon {
            category.icon = icon;
        }
        if let Some(color) = update.color {
            category.color = color;
        }
        Ok(category.clone())
    }

    /// Deletes a user category that nothing references.
    pub fn delete_category(&mut self, id: CategoryId) -> Result<(), LedgerError> {
        let idx = self.category_index(id)?;
        if self.categories[idx].is_read_only() {
            return Err(LedgerError::DefaultCategoryReadOnly);
        }
        let referenced = self
            .transactions
            .iter()
            .any(|tx| tx.kind.category_id() == Some(id))
            || self.budgets.iter().any(|b| b.category_id == id)
            || self.categories.iter().any(|c| c.parent_id == Some(id));
        if referenced {
            return Err(LedgerError::CategoryInUse(id));
        }
        self.categories.remove(idx);
        Ok(())
    }

    // ========== Budgets ==========

    /// Creates a budget capping one expense category.
    pub fn create_budget(&mut self, new: NewBudget) -> Result<Budget, LedgerError> {
        if !new.amount.is_positive() {
            return Err(LedgerError::InvalidAmount);
        }
        let threshold = new.alert_threshold.unwrap_or(DEFAULT_ALERT_THRESHOLD);
        if !(1..=100).contains(&threshold) {
            return Err(LedgerError::InvalidAlertThreshold);
        }
        let category = self
            .category(new.category_id)
            .ok_or(LedgerError::CategoryNotFound(new.category_id))?;
        if category.kind != CategoryKind::Expense {
            return Err(LedgerError::CategoryKindMismatch {
                category_id: new.category_id,
                category_kind: category.kind,
            });
        }

        let now = Utc::now();
        let budget = Budget {
            id: BudgetId::new(),
            user_id: self.user_id,
            category_id: new.category_id,
            amount: new.amount,
            period: new.period,
            alert_threshold: threshold,
            created_at: now,
            updated_at: now,
        };
        self.budgets.push(budget.clone());
        Ok(budget)
    }

    /// Updates a budget.
    pub fn update_budget(
        &mut self,
        id: BudgetId,
        update: BudgetUpdate,
    ) -> Result<Budget, LedgerError> {
        if let Some(amount) = update.amount {
            if !amount.is_positive() {
                return Err(LedgerError::InvalidAmount);
            }
        }
        if let Some(threshold) = update.alert_threshold {
            if !(1..=100).contains(&threshold) {
                return Err(LedgerError::InvalidAlertThreshold);
            }
        }
        let budget = self
            .budgets
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(LedgerError::BudgetNotFound(id))?;

        if let Some(amount) = update.amount {
            budget.amount = amount;
        }
        if let Some(period) = update.period {
            budget.period = period;
        }
        if let Some(threshold) = update.alert_threshold {
            budget.alert_threshold = threshold;
        }
        budget.updated_at = Utc::now();
        Ok(budget.clone())
    }

    /// Deletes a budget.
    pub fn delete_budget(&mut self, id: BudgetId) -> Result<(), LedgerError> {
        let idx = self
            .budgets
            .iter()
            .position(|b| b.id == id)
            .ok_or(LedgerError::BudgetNotFound(id))?;
        self.budgets.remove(idx);
        Ok(())
    }

    // ========== Goals ==========

    /// Creates a savings goal.
    pub fn create_goal(&mut self, new: NewGoal) -> Result<Goal, LedgerError> {
        if new.name.trim().is_empty() {
            return Err(LedgerError::EmptyGoalName);
        }
        if !new.target_amount.is_positive() {
            return Err(LedgerError::InvalidAmount);
        }
        if new.current_amount.is_negative() {
            return Err(LedgerError::NegativeGoalAmount);
        }

        let now = Utc::now();
        let goal = Goal {
            id: GoalId::new(),
            user_id: self.user_id,
            name: new.name,
            target_amount: new.target_amount,
            current_amount: new.current_amount,
            target_date: new.target_date,
            color: new.color,
            icon: new.icon,
            created_at: now,
            updated_at: now,
        };
        self.goals.push(goal.clone());
        Ok(goal)
    }

    /// Updates a goal.
    pub fn update_goal(&mut self, id: GoalId, update: GoalUpdate) -> Result<Goal, LedgerError> {
        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(LedgerError::EmptyGoalName);
            }
        }
        if let Some(target) = update.target_amount {
            if !target.is_positive() {
                return Err(LedgerError::InvalidAmount);
            }
        }
        let goal = self
            .goals
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or(LedgerError::GoalNotFound(id))?;

        if let Some(name) = update.name {
            goal.name = name;
        }
        if let Some(target) = update.target_amount {
            goal.target_amount = target;
        }
        if let Some(date) = update.target_date {
            goal.target_date = date;
        }
        if let Some(color) = update.color {
            goal.color = color;
        }
        if let Some(icon) = update.icon {
            goal.icon = icon;
        }
        goal.updated_at = Utc::now();
        Ok(goal.clone())
    }

    /// Deletes a goal. Money already contributed stays gone from its
    /// source accounts; the goal record is simply dropped.
    pub fn delete_goal(&mut self, id: GoalId) -> Result<(), LedgerError> {
        let idx = self
            .goals
            .iter()
            .position(|g| g.id == id)
            .ok_or(LedgerError::GoalNotFound(id))?;
        self.goals.remove(idx);
        Ok(())
    }

    // ========== Transactions ==========

    /// Records a transaction and applies its balance effects.
    ///
    /// Overdrafts are allowed: spending below zero or above a card's limit
    /// is the user's business, the ledger only reports it.
    pub fn apply(&mut self, new: NewTransaction) -> Result<AppliedTransaction, LedgerError> {
        if !new.amount.is_positive() {
            return Err(LedgerError::InvalidAmount);
        }
        self.validate_endpoints(&new)?;

        let transaction = Transaction {
            id: TransactionId::new(),
            user_id: self.user_id,
            date: new.date,
            amount: new.amount,
            kind: new.kind,
            description: new.description,
            voided: false,
            voided_by: None,
            reverses: None,
            created_at: Utc::now(),
        };

        let effects = effects_of(&transaction.kind, transaction.amount, |id| {
            self.account(id).is_some_and(|a| a.kind.is_credit_card())
        });
        self.apply_effects(&effects);

        let accounts = self.touched_accounts(&effects);
        self.transactions.push(transaction.clone());
        Ok(AppliedTransaction {
            transaction,
            accounts,
        })
    }

    /// Voids a transaction by appending a compensating entry.
    ///
    /// The original record keeps its amount and date; only the voided flag
    /// and the back-reference to the compensating entry change. The
    /// compensating entry reuses the original's kind and amount and undoes
    /// its balance effects exactly. Compensating entries themselves can
    /// never be voided, and voiding twice is rejected before any state
    /// changes, so balances can never be double-reversed.
    pub fn void(&mut self, id: TransactionId) -> Result<VoidOutcome, LedgerError> {
        let idx = self
            .transactions
            .iter()
            .position(|tx| tx.id == id)
            .ok_or(LedgerError::TransactionNotFound(id))?;
        let original = &self.transactions[idx];
        if original.voided {
            return Err(LedgerError::AlreadyVoided(id));
        }
        if original.is_reversal() {
            return Err(LedgerError::NotVoidable(id));
        }

        let reversal = Transaction {
            id: TransactionId::new(),
            user_id: original.user_id,
            date: original.date,
            amount: original.amount,
            kind: original.kind,
            description: format!("Anulación: {}", original.description),
            voided: false,
            voided_by: None,
            reverses: Some(original.id),
            created_at: Utc::now(),
        };
        let inverse: Vec<BalanceEffect> =
            effects_of(&original.kind, original.amount, |account_id| {
                self.account(account_id)
                    .is_some_and(|a| a.kind.is_credit_card())
            })
            .iter()
            .map(BalanceEffect::inverse)
            .collect();

        self.transactions[idx].voided = true;
        self.transactions[idx].voided_by = Some(reversal.id);
        self.apply_effects(&inverse);

        let original = self.transactions[idx].clone();
        let accounts = self.touched_accounts(&inverse);
        self.transactions.push(reversal.clone());
        Ok(VoidOutcome {
            original,
            reversal,
            accounts,
        })
    }

    // ========== Goal Contributions ==========

    /// Moves money from an account into a goal's saved amount.
    ///
    /// This bypasses the transaction history, so unlike spending it must
    /// not overdraw: there is no record to void if the user changes their
    /// mind, only the explicit balances.
    pub fn contribute(
        &mut self,
        goal_id: GoalId,
        account_id: AccountId,
        amount: Money,
    ) -> Result<Contribution, LedgerError> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidAmount);
        }
        let goal_idx = self
            .goals
            .iter()
            .position(|g| g.id == goal_id)
            .ok_or(LedgerError::GoalNotFound(goal_id))?;
        let account_idx = self.account_index(account_id)?;
        let available = self.accounts[account_idx].balance;
        if available < amount {
            return Err(LedgerError::InsufficientFunds {
                available,
                requested: amount,
            });
        }

        let now = Utc::now();
        let account = &mut self.accounts[account_idx];
        account.balance -= amount;
        account.updated_at = now;
        let account = account.clone();

        let goal = &mut self.goals[goal_idx];
        goal.current_amount += amount;
        goal.updated_at = now;
        Ok(Contribution {
            goal: goal.clone(),
            account,
        })
    }

    // ========== Internal Helpers ==========

    fn account_index(&self, id: AccountId) -> Result<usize, LedgerError> {
        self.accounts
            .iter()
            .position(|a| a.id == id)
            .ok_or(LedgerError::AccountNotFound(id))
    }

    fn category_index(&self, id: CategoryId) -> Result<usize, LedgerError> {
        self.categories
            .iter()
            .position(|c| c.id == id)
            .ok_or(LedgerError::CategoryNotFound(id))
    }

    /// Checks that a new transaction's endpoints exist and fit its kind.
    fn validate_endpoints(&self, new: &NewTransaction) -> Result<(), LedgerError> {
        use super::transaction::TransactionKind;

        match new.kind {
            TransactionKind::Income {
                account_id,
                category_id,
            } => {
                self.account_index(account_id)?;
                self.require_category_kind(category_id, CategoryKind::Income)
            }
            TransactionKind::Expense {
                account_id,
                category_id,
            } => {
                self.account_index(account_id)?;
                self.require_category_kind(category_id, CategoryKind::Expense)
            }
            TransactionKind::Transfer {
                from_account_id,
                to_account_id,
            } => {
                if from_account_id == to_account_id {
                    return Err(LedgerError::SameAccount);
                }
                self.account_index(from_account_id)?;
                self.account_index(to_account_id)?;
                Ok(())
            }
            TransactionKind::CreditCardPayment {
                from_account_id,
                card_account_id,
            } => {
                if from_account_id == card_account_id {
                    return Err(LedgerError::SameAccount);
                }
                self.account_index(from_account_id)?;
                let card_idx = self.account_index(card_account_id)?;
                if !self.accounts[card_idx].kind.is_credit_card() {
                    return Err(LedgerError::PaymentTargetNotCard);
                }
                Ok(())
            }
        }
    }

    fn require_category_kind(
        &self,
        category_id: CategoryId,
        expected: CategoryKind,
    ) -> Result<(), LedgerError> {
        let category = self
            .category(category_id)
            .ok_or(LedgerError::CategoryNotFound(category_id))?;
        if category.kind == expected {
            Ok(())
        } else {
            Err(LedgerError::CategoryKindMismatch {
                category_id,
                category_kind: category.kind,
            })
        }
    }

    /// Applies balance deltas. Callers must have validated that every
    /// referenced account exists.
    fn apply_effects(&mut self, effects: &[BalanceEffect]) {
        let now = Utc::now();
        for effect in effects {
            if let Some(account) = self.accounts.iter_mut().find(|a| a.id == effect.account_id) {
                account.balance += effect.delta;
                account.updated_at = now;
            }
        }
    }

    fn touched_accounts(&self, effects: &[BalanceEffect]) -> Vec<Account> {
        effects
            .iter()
            .filter_map(|e| self.account(e.account_id).cloned())
            .collect()
    }
}
