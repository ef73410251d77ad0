//! Derived metric data types.

use chrono::NaiveDate;
use plata_shared::types::{AccountId, BudgetId, CategoryId, GoalId, Money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Days-of-autonomy sentinel meaning "no recent spending, unbounded runway".
pub const UNBOUNDED_AUTONOMY_DAYS: i64 = 999;

/// Tunables for KPI computation.
#[derive(Debug, Clone)]
pub struct KpiConfig {
    /// Reference income for the financial load ratio when the current
    /// month has no income yet.
    pub fallback_monthly_income: Money,
}

impl Default for KpiConfig {
    fn default() -> Self {
        Self {
            fallback_monthly_income: Money::from(2_100_000),
        }
    }
}

/// Headline indicators for the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Kpis {
    /// Sum of cash and bank balances.
    pub liquid_balance: Money,
    /// Sum of credit card debt.
    pub total_debt: Money,
    /// Liquid balance minus debt.
    pub real_balance: Money,
    /// Income recorded in the current calendar month.
    pub monthly_income: Money,
    /// Expenses recorded in the current calendar month.
    pub monthly_expense: Money,
    /// Percent of monthly income kept, rounded to 2 decimals; 0 when the
    /// month has no income.
    pub savings_rate: Decimal,
    /// Days the liquid balance lasts at the trailing 30-day burn rate;
    /// [`UNBOUNDED_AUTONOMY_DAYS`] when there is no recent spending.
    pub days_of_autonomy: i64,
    /// Debt as a percent of reference income, rounded to 2 decimals.
    pub financial_load: Decimal,
}

/// Projected statement for one credit card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardStatement {
    /// The credit card account.
    pub account_id: AccountId,
    /// Its display name.
    pub account_name: String,
    /// Card expenses accumulated in the current billing period.
    pub amount_due: Money,
    /// First day of the billing period (inclusive).
    pub period_start: NaiveDate,
    /// Statement closing date (exclusive end of the period).
    pub closing_date: NaiveDate,
    /// Payment due date.
    pub due_date: NaiveDate,
}

/// One category's share of a month's spending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySlice {
    /// The category.
    pub category_id: CategoryId,
    /// Its display name.
    pub name: String,
    /// Its display color.
    pub color: String,
    /// Its display icon.
    pub icon: String,
    /// Total spent in the category.
    pub amount: Money,
    /// Share of the month's total spending, rounded to 2 decimals.
    pub percentage: Decimal,
}

/// Total spending on one calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyExpense {
    /// The day.
    pub date: NaiveDate,
    /// Total spent that day.
    pub amount: Money,
}

/// Income, spending, and the difference for one month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// Calendar year.
    pub year: i32,
    /// Calendar month (1-12).
    pub month: u32,
    /// Total income in the month.
    pub income: Money,
    /// Total expenses in the month.
    pub expense: Money,
    /// Income minus expenses.
    pub savings: Money,
}

/// Live evaluation of one budget against the current month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetStatus {
    /// The budget.
    pub budget_id: BudgetId,
    /// The capped category.
    pub category_id: CategoryId,
    /// The category's display name.
    pub category_name: String,
    /// Budgeted amount.
    pub amount: Money,
    /// Spent in the category this month.
    pub spent: Money,
    /// Amount minus spent; negative when over budget.
    pub remaining: Money,
    /// Spent as a percent of the budgeted amount, rounded to 2 decimals;
    /// 0 when the budgeted amount is 0.
    pub percentage: Decimal,
    /// True once the percentage reaches the budget's alert threshold.
    pub over_threshold: bool,
}

/// Progress toward one savings goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalProgress {
    /// The goal.
    pub goal_id: GoalId,
    /// Its display name.
    pub name: String,
    /// Amount to reach.
    pub target_amount: Money,
    /// Amount saved so far.
    pub current_amount: Money,
    /// Saved as a percent of the target, rounded to 2 decimals; 0 when
    /// the target is 0.
    pub percentage: Decimal,
    /// Target minus saved; negative when overfunded.
    pub remaining: Money,
}
