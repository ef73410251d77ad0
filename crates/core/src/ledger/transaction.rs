//! Ledger transactions and their tagged kinds.

use chrono::{DateTime, NaiveDate, Utc};
use plata_shared::types::{AccountId, CategoryId, Money, TransactionId, UserId};
use serde::{Deserialize, Serialize};

/// What a transaction does to balances, with its endpoints.
///
/// The shape is a sum type so malformed records (a transfer without a
/// destination, an income without a category) cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransactionKind {
    /// Money entering an account (salary, refunds).
    Income {
        /// Receiving account.
        account_id: AccountId,
        /// Income category.
        category_id: CategoryId,
    },
    /// Money spent from an account. Spending on a credit card grows its
    /// debt instead of draining it.
    Expense {
        /// Paying account.
        account_id: AccountId,
        /// Expense category.
        category_id: CategoryId,
    },
    /// Money moved between two owned accounts.
    Transfer {
        /// Account the money leaves.
        from_account_id: AccountId,
        /// Account the money enters.
        to_account_id: AccountId,
    },
    /// Paying down a credit card from another account.
    CreditCardPayment {
        /// Account the payment is made from.
        from_account_id: AccountId,
        /// The credit card account being paid.
        card_account_id: AccountId,
    },
}

impl TransactionKind {
    /// Returns the wire name of this kind.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Income { .. } => "income",
            Self::Expense { .. } => "expense",
            Self::Transfer { .. } => "transfer",
            Self::CreditCardPayment { .. } => "credit_card_payment",
        }
    }

    /// The primary account: where income lands, or where money leaves.
    #[must_use]
    pub const fn source_account_id(&self) -> AccountId {
        match self {
            Self::Income { account_id, .. } | Self::Expense { account_id, .. } => *account_id,
            Self::Transfer {
                from_account_id, ..
            }
            | Self::CreditCardPayment {
                from_account_id, ..
            } => *from_account_id,
        }
    }

    /// The counterparty account for transfers and card payments.
    #[must_use]
    pub const fn destination_account_id(&self) -> Option<AccountId> {
        match self {
            Self::Income { .. } | Self::Expense { .. } => None,
            Self::Transfer { to_account_id, .. } => Some(*to_account_id),
            Self::CreditCardPayment {
                card_account_id, ..
            } => Some(*card_account_id),
        }
    }

    /// The category, present only on income and expenses.
    #[must_use]
    pub const fn category_id(&self) -> Option<CategoryId> {
        match self {
            Self::Income { category_id, .. } | Self::Expense { category_id, .. } => {
                Some(*category_id)
            }
            Self::Transfer { .. } | Self::CreditCardPayment { .. } => None,
        }
    }

    /// Returns true if the given account participates in this kind.
    #[must_use]
    pub fn touches(&self, account_id: AccountId) -> bool {
        self.source_account_id() == account_id
            || self.destination_account_id() == Some(account_id)
    }
}

/// A recorded ledger transaction.
///
/// Amounts are always stored positive; sign conventions live in the
/// balance effect table. Once recorded, a transaction is never edited:
/// undo happens by voiding, which appends a compensating entry and flags
/// the original.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier.
    pub id: TransactionId,
    /// Owning user.
    pub user_id: UserId,
    /// Transaction date.
    pub date: NaiveDate,
    /// Amount, strictly positive.
    pub amount: Money,
    /// Kind with endpoints.
    pub kind: TransactionKind,
    /// Free-form description.
    pub description: String,
    /// True once this transaction has been voided.
    pub voided: bool,
    /// The compensating entry that voided this transaction, if any.
    pub voided_by: Option<TransactionId>,
    /// For compensating entries, the original they reverse.
    pub reverses: Option<TransactionId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Returns true if this record is a compensating (reversal) entry.
    #[must_use]
    pub const fn is_reversal(&self) -> bool {
        self.reverses.is_some()
    }

    /// Returns true when the record counts toward reports and sums.
    ///
    /// A voided original and its compensating entry both drop out, so a
    /// voided pair contributes nothing to any derived metric.
    #[must_use]
    pub const fn is_effective(&self) -> bool {
        !self.voided && self.reverses.is_none()
    }

    /// Amount with presentation sign: compensating entries read negative.
    #[must_use]
    pub fn signed_amount(&self) -> Money {
        if self.is_reversal() {
            -self.amount
        } else {
            self.amount
        }
    }
}

/// Input for recording a transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTransaction {
    /// Transaction date.
    pub date: NaiveDate,
    /// Amount, must be strictly positive.
    pub amount: Money,
    /// Kind with endpoints.
    pub kind: TransactionKind,
    /// Free-form description.
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample(kind: TransactionKind) -> Transaction {
        Transaction {
            id: TransactionId::new(),
            user_id: UserId::new(),
            date: NaiveDate::from_ymd_opt(2026, 8, 15).unwrap(),
            amount: Money::new(dec!(25000)),
            kind,
            description: "Supermercado Líder".to_string(),
            voided: false,
            voided_by: None,
            reverses: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_kind_accessors() {
        let account = AccountId::new();
        let category = CategoryId::new();
        let other = AccountId::new();

        let income = TransactionKind::Income {
            account_id: account,
            category_id: category,
        };
        assert_eq!(income.source_account_id(), account);
        assert_eq!(income.destination_account_id(), None);
        assert_eq!(income.category_id(), Some(category));

        let transfer = TransactionKind::Transfer {
            from_account_id: account,
            to_account_id: other,
        };
        assert_eq!(transfer.destination_account_id(), Some(other));
        assert_eq!(transfer.category_id(), None);
        assert!(transfer.touches(account));
        assert!(transfer.touches(other));
        assert!(!transfer.touches(AccountId::new()));
    }

    #[test]
    fn test_kind_wire_names() {
        let a = AccountId::new();
        let c = CategoryId::new();
        assert_eq!(
            TransactionKind::Income {
                account_id: a,
                category_id: c
            }
            .type_name(),
            "income"
        );
        assert_eq!(
            TransactionKind::CreditCardPayment {
                from_account_id: a,
                card_account_id: AccountId::new()
            }
            .type_name(),
            "credit_card_payment"
        );
    }

    #[test]
    fn test_kind_serde_tag() {
        let kind = TransactionKind::Expense {
            account_id: AccountId::new(),
            category_id: CategoryId::new(),
        };
        let json = serde_json::to_value(kind).unwrap();
        assert_eq!(json["type"], "expense");
    }

    #[test]
    fn test_effective_and_signed_amount() {
        let mut original = sample(TransactionKind::Transfer {
            from_account_id: AccountId::new(),
            to_account_id: AccountId::new(),
        });
        assert!(original.is_effective());
        assert_eq!(original.signed_amount(), Money::new(dec!(25000)));

        let mut reversal = original.clone();
        reversal.id = TransactionId::new();
        reversal.reverses = Some(original.id);
        original.voided = true;
        original.voided_by = Some(reversal.id);

        assert!(!original.is_effective());
        assert!(!reversal.is_effective());
        assert!(reversal.is_reversal());
        assert_eq!(reversal.signed_amount(), Money::new(dec!(-25000)));
    }
}
