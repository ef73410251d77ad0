//! Transaction categories.

use plata_shared::types::{CategoryId, UserId};
use serde::{Deserialize, Serialize};

/// Whether a category classifies income or expenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    /// Categories for money coming in.
    Income,
    /// Categories for money going out.
    Expense,
}

impl CategoryKind {
    /// Returns the wire name of this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A transaction category.
///
/// Categories with no owning user are global defaults seeded by the system
/// and visible to everyone; they cannot be edited or deleted through the
/// engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier.
    pub id: CategoryId,
    /// Owning user; `None` for global defaults.
    pub user_id: Option<UserId>,
    /// Display name.
    pub name: String,
    /// Income or expense.
    pub kind: CategoryKind,
    /// Display icon (emoji or icon name).
    pub icon: String,
    /// Display color (hex).
    pub color: String,
    /// Optional parent category for grouping.
    pub parent_id: Option<CategoryId>,
    /// True for system-seeded defaults.
    pub is_default: bool,
}

impl Category {
    /// Returns true when the category cannot be modified by users.
    #[must_use]
    pub const fn is_read_only(&self) -> bool {
        self.is_default || self.user_id.is_none()
    }
}

/// Input for creating a user category.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCategory {
    /// Display name.
    pub name: String,
    /// Income or expense.
    pub kind: CategoryKind,
    /// Display icon.
    pub icon: String,
    /// Display color (hex).
    pub color: String,
    /// Optional parent category.
    pub parent_id: Option<CategoryId>,
}

/// Partial update for a user category.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New display icon.
    pub icon: Option<String>,
    /// New display color.
    pub color: Option<String>,
}
