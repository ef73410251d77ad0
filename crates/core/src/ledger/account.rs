//! Money accounts: cash, bank, and credit cards.

use chrono::{DateTime, Utc};
use plata_shared::types::{AccountId, Money, UserId};
use serde::{Deserialize, Serialize};

/// Credit card terms: limit and statement cycle days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardTerms {
    /// Credit limit.
    pub credit_limit: Money,
    /// Day of month the statement closes (1-31, clamped to month end).
    pub closing_day: u32,
    /// Day of month the payment is due (1-31, clamped to month end).
    pub due_day: u32,
}

impl CardTerms {
    /// Returns true if both cycle days are valid days of month and the
    /// limit is not negative.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (1..=31).contains(&self.closing_day)
            && (1..=31).contains(&self.due_day)
            && !self.credit_limit.is_negative()
    }
}

/// The kind of an account, fixed at creation.
///
/// For `CreditCard` accounts the balance is the debt owed: spending on the
/// card increases it, payments decrease it. Changing an account's kind
/// after creation is not allowed; reversal math relies on the kind a
/// transaction was applied under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AccountKind {
    /// Physical cash.
    Cash,
    /// Bank (checking or savings) account.
    Bank,
    /// Credit card; balance tracks debt owed.
    CreditCard(CardTerms),
}

impl AccountKind {
    /// Returns true for accounts whose balance is spendable money.
    #[must_use]
    pub const fn is_liquid(&self) -> bool {
        matches!(self, Self::Cash | Self::Bank)
    }

    /// Returns true for credit card accounts.
    #[must_use]
    pub const fn is_credit_card(&self) -> bool {
        matches!(self, Self::CreditCard(_))
    }

    /// Returns the card terms for credit card accounts.
    #[must_use]
    pub const fn card_terms(&self) -> Option<&CardTerms> {
        match self {
            Self::CreditCard(terms) => Some(terms),
            _ => None,
        }
    }

    /// Returns the wire name of this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Bank => "bank",
            Self::CreditCard(_) => "credit_card",
        }
    }
}

impl std::fmt::Display for AccountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A money account owned by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Owning user.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Account kind, fixed at creation.
    pub kind: AccountKind,
    /// Current balance (debt owed for credit cards).
    pub balance: Money,
    /// Display color (hex).
    pub color: String,
    /// Display icon name.
    pub icon: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an account.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
    /// Display name.
    pub name: String,
    /// Account kind (with card terms for credit cards).
    pub kind: AccountKind,
    /// Opening balance (debt owed for credit cards).
    pub opening_balance: Money,
    /// Display color (hex).
    pub color: String,
    /// Display icon name.
    pub icon: String,
}

/// Partial update for an account.
///
/// Balance and kind are deliberately absent: balances move only through
/// transactions and goal contributions, and kinds are fixed at creation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New display color.
    pub color: Option<String>,
    /// New display icon.
    pub icon: Option<String>,
    /// New card terms (credit cards only).
    pub card_terms: Option<CardTerms>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn terms(limit: i64, closing: u32, due: u32) -> CardTerms {
        CardTerms {
            credit_limit: Money::new(rust_decimal::Decimal::from(limit)),
            closing_day: closing,
            due_day: due,
        }
    }

    #[test]
    fn test_card_terms_validity() {
        assert!(terms(2_000_000, 25, 10).is_valid());
        assert!(!terms(2_000_000, 0, 10).is_valid());
        assert!(!terms(2_000_000, 25, 32).is_valid());
        assert!(!terms(-1, 25, 10).is_valid());
    }

    #[test]
    fn test_kind_classification() {
        assert!(AccountKind::Cash.is_liquid());
        assert!(AccountKind::Bank.is_liquid());
        assert!(!AccountKind::CreditCard(terms(1, 25, 10)).is_liquid());
        assert!(AccountKind::CreditCard(terms(1, 25, 10)).is_credit_card());
    }

    #[test]
    fn test_kind_wire_names() {
        assert_eq!(AccountKind::Cash.as_str(), "cash");
        assert_eq!(AccountKind::Bank.as_str(), "bank");
        assert_eq!(AccountKind::CreditCard(terms(1, 25, 10)).as_str(), "credit_card");
    }

    #[test]
    fn test_kind_serde_tagged() {
        let kind = AccountKind::CreditCard(CardTerms {
            credit_limit: Money::new(dec!(2000000)),
            closing_day: 25,
            due_day: 10,
        });
        let json = serde_json::to_value(&kind).unwrap();
        assert_eq!(json["type"], "credit_card");
        assert_eq!(json["closing_day"], 25);

        let cash = serde_json::to_value(AccountKind::Cash).unwrap();
        assert_eq!(cash["type"], "cash");
    }
}
