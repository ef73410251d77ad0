//! Derived metric computation.
//!
//! Everything here is a pure function over a [`Ledger`]'s current state:
//! nothing is cached, nothing is mutated, and every figure can be
//! re-derived at any time. Sums only ever see effective transactions, so
//! a voided original and its compensating entry cancel out of every
//! metric instead of double-counting.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use plata_shared::types::{CategoryId, Money};

use crate::ledger::{Ledger, Transaction, TransactionKind};

use super::billing::{billing_period, due_date};
use super::types::{
    BudgetStatus, CardStatement, CategorySlice, DailyExpense, GoalProgress, KpiConfig, Kpis,
    MonthlySummary, UNBOUNDED_AUTONOMY_DAYS,
};

/// Trailing window length for the burn-rate average, in days.
const AUTONOMY_WINDOW_DAYS: u64 = 30;

/// Service computing dashboard metrics from ledger state.
///
/// `today` is always an explicit parameter so the same state yields the
/// same numbers in tests regardless of the wall clock.
pub struct MetricsService;

impl MetricsService {
    /// Computes the headline KPIs as of `today`.
    #[must_use]
    pub fn kpis(ledger: &Ledger, today: NaiveDate, config: &KpiConfig) -> Kpis {
        let liquid_balance: Money = ledger
            .accounts()
            .iter()
            .filter(|a| a.kind.is_liquid())
            .map(|a| a.balance)
            .sum();
        let total_debt: Money = ledger
            .accounts()
            .iter()
            .filter(|a| a.kind.is_credit_card())
            .map(|a| a.balance)
            .sum();
        let real_balance = liquid_balance - total_debt;

        let monthly_income = sum_effective(ledger, |tx| {
            matches!(tx.kind, TransactionKind::Income { .. })
                && in_month(tx.date, today.year(), today.month())
        });
        let monthly_expense = sum_effective(ledger, |tx| {
            matches!(tx.kind, TransactionKind::Expense { .. })
                && in_month(tx.date, today.year(), today.month())
        });

        let savings_rate = if monthly_income.is_positive() {
            ((monthly_income - monthly_expense).into_inner() / monthly_income.into_inner()
                * Decimal::ONE_HUNDRED)
                .round_dp(2)
        } else {
            Decimal::ZERO
        };

        let window_start = today
            .checked_sub_days(Days::new(AUTONOMY_WINDOW_DAYS))
            .unwrap_or(NaiveDate::MIN);
        let trailing_expense = sum_effective(ledger, |tx| {
            matches!(tx.kind, TransactionKind::Expense { .. }) && tx.date >= window_start
        });
        let avg_daily_expense =
            trailing_expense.into_inner() / Decimal::from(AUTONOMY_WINDOW_DAYS);
        let days_of_autonomy = if avg_daily_expense.is_zero() {
            UNBOUNDED_AUTONOMY_DAYS
        } else {
            (liquid_balance.into_inner() / avg_daily_expense)
                .floor()
                .to_i64()
                .unwrap_or(i64::MAX)
        };

        let reference = if monthly_income.is_positive() {
            monthly_income
        } else {
            config.fallback_monthly_income
        };
        let financial_load = if reference.is_positive() {
            (total_debt.into_inner() / reference.into_inner() * Decimal::ONE_HUNDRED).round_dp(2)
        } else {
            Decimal::ZERO
        };

        Kpis {
            liquid_balance,
            total_debt,
            real_balance,
            monthly_income,
            monthly_expense,
            savings_rate,
            days_of_autonomy,
            financial_load,
        }
    }

    /// Projects the current statement for every credit card.
    ///
    /// Cards whose cycle days cannot produce valid dates are skipped
    /// rather than failing the whole projection.
    #[must_use]
    pub fn card_statements(ledger: &Ledger, today: NaiveDate) -> Vec<CardStatement> {
        ledger
            .accounts()
            .iter()
            .filter_map(|account| {
                let terms = account.kind.card_terms()?;
                let (period_start, closing) = billing_period(today, terms.closing_day)?;
                let due = due_date(closing, terms.due_day)?;
                let amount_due = sum_effective(ledger, |tx| {
                    matches!(tx.kind, TransactionKind::Expense { account_id, .. } if account_id == account.id)
                        && tx.date >= period_start
                        && tx.date < closing
                });
                Some(CardStatement {
                    account_id: account.id,
                    account_name: account.name.clone(),
                    amount_due,
                    period_start,
                    closing_date: closing,
                    due_date: due,
                })
            })
            .collect()
    }

    /// Spending per category for one month, largest first.
    ///
    /// Returns an empty list when the month has no spending; percentages
    /// are shares of the month total.
    #[must_use]
    pub fn category_breakdown(ledger: &Ledger, year: i32, month: u32) -> Vec<CategorySlice> {
        let mut totals: BTreeMap<CategoryId, Money> = BTreeMap::new();
        for tx in effective(ledger) {
            if !in_month(tx.date, year, month) {
                continue;
            }
            if let TransactionKind::Expense { category_id, .. } = tx.kind {
                *totals.entry(category_id).or_default() += tx.amount;
            }
        }

        let total: Money = totals.values().copied().sum();
        if !total.is_positive() {
            return Vec::new();
        }

        let mut slices: Vec<CategorySlice> = totals
            .into_iter()
            .map(|(category_id, amount)| {
                let (name, color, icon) = ledger.category(category_id).map_or_else(
                    || ("Sin categoría".to_string(), String::new(), String::new()),
                    |c| (c.name.clone(), c.color.clone(), c.icon.clone()),
                );
                let percentage = (amount.into_inner() / total.into_inner()
                    * Decimal::ONE_HUNDRED)
                    .round_dp(2);
                CategorySlice {
                    category_id,
                    name,
                    color,
                    icon,
                    amount,
                    percentage,
                }
            })
            .collect();
        slices.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.name.cmp(&b.name)));
        slices
    }

    /// Spending per calendar day for one month, ascending by date.
    #[must_use]
    pub fn daily_expenses(ledger: &Ledger, year: i32, month: u32) -> Vec<DailyExpense> {
        let mut per_day: BTreeMap<NaiveDate, Money> = BTreeMap::new();
        for tx in effective(ledger) {
            if !in_month(tx.date, year, month) {
                continue;
            }
            if matches!(tx.kind, TransactionKind::Expense { .. }) {
                *per_day.entry(tx.date).or_default() += tx.amount;
            }
        }
        per_day
            .into_iter()
            .map(|(date, amount)| DailyExpense { date, amount })
            .collect()
    }

    /// Income, spending, and savings for one month.
    #[must_use]
    pub fn monthly_summary(ledger: &Ledger, year: i32, month: u32) -> MonthlySummary {
        let income = sum_effective(ledger, |tx| {
            matches!(tx.kind, TransactionKind::Income { .. }) && in_month(tx.date, year, month)
        });
        let expense = sum_effective(ledger, |tx| {
            matches!(tx.kind, TransactionKind::Expense { .. }) && in_month(tx.date, year, month)
        });
        MonthlySummary {
            year,
            month,
            income,
            expense,
            savings: income - expense,
        }
    }

    /// Evaluates every budget against the current calendar month.
    ///
    /// The nominal weekly/monthly period is display metadata only; spend
    /// is always measured over the month containing `today`.
    #[must_use]
    pub fn budget_statuses(ledger: &Ledger, today: NaiveDate) -> Vec<BudgetStatus> {
        ledger
            .budgets()
            .iter()
            .map(|budget| {
                let spent = sum_effective(ledger, |tx| {
                    matches!(tx.kind, TransactionKind::Expense { category_id, .. } if category_id == budget.category_id)
                        && in_month(tx.date, today.year(), today.month())
                });
                let percentage = if budget.amount.is_positive() {
                    (spent.into_inner() / budget.amount.into_inner() * Decimal::ONE_HUNDRED)
                        .round_dp(2)
                } else {
                    Decimal::ZERO
                };
                BudgetStatus {
                    budget_id: budget.id,
                    category_id: budget.category_id,
                    category_name: ledger
                        .category(budget.category_id)
                        .map_or_else(String::new, |c| c.name.clone()),
                    amount: budget.amount,
                    spent,
                    remaining: budget.amount - spent,
                    percentage,
                    over_threshold: percentage >= Decimal::from(budget.alert_threshold),
                }
            })
            .collect()
    }

    /// Progress for every goal, in creation order.
    #[must_use]
    pub fn goal_progress(ledger: &Ledger) -> Vec<GoalProgress> {
        ledger
            .goals()
            .iter()
            .map(|goal| {
                let percentage = if goal.target_amount.is_positive() {
                    (goal.current_amount.into_inner() / goal.target_amount.into_inner()
                        * Decimal::ONE_HUNDRED)
                        .round_dp(2)
                } else {
                    Decimal::ZERO
                };
                GoalProgress {
                    goal_id: goal.id,
                    name: goal.name.clone(),
                    target_amount: goal.target_amount,
                    current_amount: goal.current_amount,
                    percentage,
                    remaining: goal.target_amount - goal.current_amount,
                }
            })
            .collect()
    }
}

fn effective(ledger: &Ledger) -> impl Iterator<Item = &Transaction> {
    ledger.transactions().iter().filter(|tx| tx.is_effective())
}

fn sum_effective<F>(ledger: &Ledger, predicate: F) -> Money
where
    F: Fn(&Transaction) -> bool,
{
    effective(ledger)
        .filter(|tx| predicate(tx))
        .map(|tx| tx.amount)
        .sum()
}

fn in_month(date: NaiveDate, year: i32, month: u32) -> bool {
    date.year() == year && date.month() == month
}
