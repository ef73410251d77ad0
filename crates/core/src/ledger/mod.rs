//! The single-entry personal ledger.
//!
//! This module implements the core ledger functionality:
//! - Accounts (cash, bank, credit cards) and their balances
//! - Transactions with a typed kind and a positive stored amount
//! - The balance effect table shared by apply and void
//! - Voiding via compensating entries that preserve history
//! - Categories, budgets, and savings goals
//! - Error types for ledger operations
//! - The in-memory engine that ties it all together

pub mod account;
pub mod budget;
pub mod category;
pub mod effect;
pub mod engine;
pub mod error;
pub mod goal;
pub mod transaction;

#[cfg(test)]
mod engine_props;

pub use account::{Account, AccountKind, AccountUpdate, CardTerms, NewAccount};
pub use budget::{Budget, BudgetPeriod, BudgetUpdate, DEFAULT_ALERT_THRESHOLD, NewBudget};
pub use category::{Category, CategoryKind, CategoryUpdate, NewCategory};
pub use effect::{BalanceEffect, effects_of};
pub use engine::{AppliedTransaction, Contribution, Ledger, LedgerSnapshot, VoidOutcome};
pub use error::LedgerError;
pub use goal::{Goal, GoalUpdate, NewGoal};
pub use transaction::{NewTransaction, Transaction, TransactionKind};
