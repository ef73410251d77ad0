//! Ledger error types for validation and state errors.
//!
//! This module defines all errors that can occur while mutating a user's
//! ledger: input validation failures, lookups that miss, and operations
//! rejected because of the current state of an account, category, or
//! transaction.

use thiserror::Error;

use plata_shared::types::{AccountId, BudgetId, CategoryId, GoalId, Money, TransactionId};

use super::category::CategoryKind;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Transaction and contribution amounts must be strictly positive.
    #[error("Amount must be positive")]
    InvalidAmount,

    /// Account name cannot be empty.
    #[error("Account name cannot be empty")]
    EmptyAccountName,

    /// Category name cannot be empty.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// Goal name cannot be empty.
    #[error("Goal name cannot be empty")]
    EmptyGoalName,

    /// Credit card terms are out of range.
    #[error("Card terms are invalid: closing and due days must be between 1 and 31, credit limit must not be negative")]
    InvalidCardTerms,

    /// Transfers and card payments need two distinct accounts.
    #[error("Source and destination accounts must be different")]
    SameAccount,

    /// Credit card payments must pay into a credit card account.
    #[error("Credit card payments must target a credit card account")]
    PaymentTargetNotCard,

    /// The category's kind does not match the transaction's kind.
    #[error("Category {category_id} is an {category_kind} category and cannot be used here")]
    CategoryKindMismatch {
        /// The category that was supplied.
        category_id: CategoryId,
        /// The kind that category actually has.
        category_kind: CategoryKind,
    },

    /// Budget alert thresholds are percentages.
    #[error("Alert threshold must be between 1 and 100")]
    InvalidAlertThreshold,

    /// Goal target and contribution amounts cannot be negative.
    #[error("Goal amounts cannot be negative")]
    NegativeGoalAmount,

    /// Card terms can only be set on credit card accounts.
    #[error("Account {0} is not a credit card")]
    NotACreditCard(AccountId),

    // ========== Not Found Errors ==========
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Category not found.
    #[error("Category not found: {0}")]
    CategoryNotFound(CategoryId),

    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),

    /// Budget not found.
    #[error("Budget not found: {0}")]
    BudgetNotFound(BudgetId),

    /// Goal not found.
    #[error("Goal not found: {0}")]
    GoalNotFound(GoalId),

    // ========== State Errors ==========
    /// The transaction has already been voided.
    #[error("Transaction {0} is already voided")]
    AlreadyVoided(TransactionId),

    /// Reversal entries cannot themselves be voided.
    #[error("Transaction {0} is a reversal and cannot be voided")]
    NotVoidable(TransactionId),

    /// Goal contributions cannot overdraw the source account.
    #[error("Insufficient funds: available {available}, requested {requested}")]
    InsufficientFunds {
        /// Balance currently held by the source account.
        available: Money,
        /// Amount the contribution asked for.
        requested: Money,
    },

    /// Accounts with transaction history cannot be deleted.
    #[error("Account {0} has transactions and cannot be deleted")]
    AccountInUse(AccountId),

    /// Categories referenced by transactions or budgets cannot be deleted.
    #[error("Category {0} is in use by transactions or budgets and cannot be deleted")]
    CategoryInUse(CategoryId),

    /// Built-in categories are shared across users.
    #[error("Default categories cannot be modified or deleted")]
    DefaultCategoryReadOnly,
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount => "INVALID_AMOUNT",
            Self::EmptyAccountName => "EMPTY_ACCOUNT_NAME",
            Self::EmptyCategoryName => "EMPTY_CATEGORY_NAME",
            Self::EmptyGoalName => "EMPTY_GOAL_NAME",
            Self::InvalidCardTerms => "INVALID_CARD_TERMS",
            Self::SameAccount => "SAME_ACCOUNT",
            Self::PaymentTargetNotCard => "PAYMENT_TARGET_NOT_CARD",
            Self::CategoryKindMismatch { .. } => "CATEGORY_KIND_MISMATCH",
            Self::InvalidAlertThreshold => "INVALID_ALERT_THRESHOLD",
            Self::NegativeGoalAmount => "NEGATIVE_GOAL_AMOUNT",
            Self::NotACreditCard(_) => "NOT_A_CREDIT_CARD",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::CategoryNotFound(_) => "CATEGORY_NOT_FOUND",
            Self::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::BudgetNotFound(_) => "BUDGET_NOT_FOUND",
            Self::GoalNotFound(_) => "GOAL_NOT_FOUND",
            Self::AlreadyVoided(_) => "ALREADY_VOIDED",
            Self::NotVoidable(_) => "NOT_VOIDABLE",
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::AccountInUse(_) => "ACCOUNT_IN_USE",
            Self::CategoryInUse(_) => "CATEGORY_IN_USE",
            Self::DefaultCategoryReadOnly => "DEFAULT_CATEGORY_READ_ONLY",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::InvalidAmount
            | Self::EmptyAccountName
            | Self::EmptyCategoryName
            | Self::EmptyGoalName
            | Self::InvalidCardTerms
            | Self::SameAccount
            | Self::PaymentTargetNotCard
            | Self::CategoryKindMismatch { .. }
            | Self::InvalidAlertThreshold
            | Self::NegativeGoalAmount
            | Self::NotACreditCard(_) => 400,

            // 403 Forbidden - shared defaults are read-only
            Self::DefaultCategoryReadOnly => 403,

            // 404 Not Found
            Self::AccountNotFound(_)
            | Self::CategoryNotFound(_)
            | Self::TransactionNotFound(_)
            | Self::BudgetNotFound(_)
            | Self::GoalNotFound(_) => 404,

            // 409 Conflict - the entity's current state forbids the operation
            Self::AlreadyVoided(_)
            | Self::NotVoidable(_)
            | Self::AccountInUse(_)
            | Self::CategoryInUse(_) => 409,

            // 422 Unprocessable Entity - valid request, not enough money
            Self::InsufficientFunds { .. } => 422,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(LedgerError::InvalidAmount.error_code(), "INVALID_AMOUNT");
        assert_eq!(LedgerError::SameAccount.error_code(), "SAME_ACCOUNT");
        assert_eq!(
            LedgerError::AccountNotFound(AccountId::new()).error_code(),
            "ACCOUNT_NOT_FOUND"
        );
        assert_eq!(
            LedgerError::AlreadyVoided(TransactionId::new()).error_code(),
            "ALREADY_VOIDED"
        );
        assert_eq!(
            LedgerError::InsufficientFunds {
                available: Money::from(100),
                requested: Money::from(500),
            }
            .error_code(),
            "INSUFFICIENT_FUNDS"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(LedgerError::InvalidAmount.http_status_code(), 400);
        assert_eq!(LedgerError::DefaultCategoryReadOnly.http_status_code(), 403);
        assert_eq!(
            LedgerError::GoalNotFound(GoalId::new()).http_status_code(),
            404
        );
        assert_eq!(
            LedgerError::NotVoidable(TransactionId::new()).http_status_code(),
            409
        );
        assert_eq!(
            LedgerError::CategoryInUse(CategoryId::new()).http_status_code(),
            409
        );
        assert_eq!(
            LedgerError::InsufficientFunds {
                available: Money::ZERO,
                requested: Money::from(1),
            }
            .http_status_code(),
            422
        );
    }

    #[test]
    fn test_error_display() {
        let err = LedgerError::InsufficientFunds {
            available: Money::from(150_000),
            requested: Money::from(200_000),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient funds: available 150000, requested 200000"
        );

        let id = BudgetId::new();
        assert_eq!(
            LedgerError::BudgetNotFound(id).to_string(),
            format!("Budget not found: {id}")
        );
    }
}
