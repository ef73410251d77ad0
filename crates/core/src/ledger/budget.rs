//! Spending budgets per category.

use chrono::{DateTime, Utc};
use plata_shared::types::{BudgetId, CategoryId, Money, UserId};
use serde::{Deserialize, Serialize};

/// Default alert threshold, in percent of the budgeted amount.
pub const DEFAULT_ALERT_THRESHOLD: u32 = 80;

/// Nominal budget period.
///
/// Status evaluation always runs over the current calendar month; the
/// period is display metadata carried for the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetPeriod {
    /// Budget resets monthly.
    Monthly,
    /// Budget resets weekly.
    Weekly,
}

impl BudgetPeriod {
    /// Returns the wire name of this period.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Weekly => "weekly",
        }
    }
}

/// A spending cap for one category.
///
/// Spent/remaining/percentage are never stored; they are derived live by
/// the metrics service from the current month's transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    /// Unique identifier.
    pub id: BudgetId,
    /// Owning user.
    pub user_id: UserId,
    /// Category the cap applies to.
    pub category_id: CategoryId,
    /// Budgeted amount per period.
    pub amount: Money,
    /// Nominal period.
    pub period: BudgetPeriod,
    /// Alert threshold in percent (1-100).
    pub alert_threshold: u32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a budget.
#[derive(Debug, Clone, Deserialize)]
pub struct NewBudget {
    /// Category the cap applies to.
    pub category_id: CategoryId,
    /// Budgeted amount per period.
    pub amount: Money,
    /// Nominal period.
    pub period: BudgetPeriod,
    /// Alert threshold in percent; defaults to 80.
    pub alert_threshold: Option<u32>,
}

/// Partial update for a budget.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BudgetUpdate {
    /// New budgeted amount.
    pub amount: Option<Money>,
    /// New nominal period.
    pub period: Option<BudgetPeriod>,
    /// New alert threshold in percent.
    pub alert_threshold: Option<u32>,
}
