//! Savings goals.

use chrono::{DateTime, NaiveDate, Utc};
use plata_shared::types::{GoalId, Money, UserId};
use serde::{Deserialize, Serialize};

/// A savings goal funded by explicit contributions.
///
/// Contributions move money straight from an account into
/// `current_amount` without touching the transaction history; the goal
/// is a bucket, not an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    /// Unique identifier.
    pub id: GoalId,
    /// Owning user.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Amount to reach.
    pub target_amount: Money,
    /// Amount saved so far.
    pub current_amount: Money,
    /// Optional target date.
    pub target_date: Option<NaiveDate>,
    /// Display color (hex).
    pub color: String,
    /// Display icon name.
    pub icon: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a goal.
#[derive(Debug, Clone, Deserialize)]
pub struct NewGoal {
    /// Display name.
    pub name: String,
    /// Amount to reach.
    pub target_amount: Money,
    /// Starting saved amount; defaults to zero.
    #[serde(default)]
    pub current_amount: Money,
    /// Optional target date.
    pub target_date: Option<NaiveDate>,
    /// Display color (hex).
    pub color: String,
    /// Display icon name.
    pub icon: String,
}

/// Partial update for a goal.
///
/// `target_date` uses a double option: `None` leaves the date unchanged,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoalUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New target amount.
    pub target_amount: Option<Money>,
    /// New target date (`Some(None)` clears it).
    pub target_date: Option<Option<NaiveDate>>,
    /// New display color.
    pub color: Option<String>,
    /// New display icon.
    pub icon: Option<String>,
}
