//! Derived metrics over ledger state.
//!
//! Dashboard KPIs, credit card statement projections, category and daily
//! spending breakdowns, monthly summaries, and live budget and goal
//! status. Everything is a pure read over the ledger; nothing here holds
//! state of its own.

pub mod billing;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use billing::{billing_period, closing_date, due_date};
pub use service::MetricsService;
pub use types::{
    BudgetStatus, CardStatement, CategorySlice, DailyExpense, GoalProgress, KpiConfig, Kpis,
    MonthlySummary, UNBOUNDED_AUTONOMY_DAYS,
};
