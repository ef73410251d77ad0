//! Credit card statement cycle dates.
//!
//! Cycle days are plain days-of-month. Months too short for the
//! configured day clamp to their last day: a closing day of 31 closes on
//! January 31, February 28 (or 29), and April 30. Every helper returns
//! `None` instead of panicking on out-of-range inputs.

use chrono::{Datelike, Months, NaiveDate};

/// The next occurrence of `closing_day` at or after `today`, clamped to
/// month end.
#[must_use]
pub fn closing_date(today: NaiveDate, closing_day: u32) -> Option<NaiveDate> {
    let this_month = clamp_to_month(today.year(), today.month(), closing_day)?;
    if this_month >= today {
        return Some(this_month);
    }
    let next = today.checked_add_months(Months::new(1))?;
    clamp_to_month(next.year(), next.month(), closing_day)
}

/// The current billing period as a half-open range `[start, closing)`,
/// where `start` is one month before the closing date.
#[must_use]
pub fn billing_period(today: NaiveDate, closing_day: u32) -> Option<(NaiveDate, NaiveDate)> {
    let closing = closing_date(today, closing_day)?;
    let start = closing.checked_sub_months(Months::new(1))?;
    Some((start, closing))
}

/// The payment due date: the closing date with its day-of-month replaced
/// by `due_day`, clamped to month end.
#[must_use]
pub fn due_date(closing: NaiveDate, due_day: u32) -> Option<NaiveDate> {
    clamp_to_month(closing.year(), closing.month(), due_day)
}

fn clamp_to_month(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let last = last_day_of_month(year, month)?;
    NaiveDate::from_ymd_opt(year, month, day.min(last))
}

fn last_day_of_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = first.checked_add_months(Months::new(1))?;
    Some(next_first.pred_opt()?.day())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_closing_date_same_month() {
        assert_eq!(
            closing_date(date(2026, 8, 21), 25),
            Some(date(2026, 8, 25))
        );
        // The closing day itself still closes this month.
        assert_eq!(
            closing_date(date(2026, 8, 25), 25),
            Some(date(2026, 8, 25))
        );
    }

    #[test]
    fn test_closing_date_rolls_to_next_month() {
        assert_eq!(
            closing_date(date(2026, 8, 27), 25),
            Some(date(2026, 9, 25))
        );
        assert_eq!(
            closing_date(date(2026, 12, 28), 25),
            Some(date(2027, 1, 25))
        );
    }

    #[test]
    fn test_closing_date_clamps_short_months() {
        assert_eq!(
            closing_date(date(2026, 2, 10), 31),
            Some(date(2026, 2, 28))
        );
        assert_eq!(
            closing_date(date(2026, 4, 15), 31),
            Some(date(2026, 4, 30))
        );
        // Leap year February.
        assert_eq!(
            closing_date(date(2028, 2, 1), 30),
            Some(date(2028, 2, 29))
        );
    }

    #[test]
    fn test_billing_period_is_one_month_ending_at_closing() {
        assert_eq!(
            billing_period(date(2026, 8, 21), 25),
            Some((date(2026, 7, 25), date(2026, 8, 25)))
        );
        // Subtracting a month from a clamped closing date clamps again.
        assert_eq!(
            billing_period(date(2026, 3, 5), 31),
            Some((date(2026, 2, 28), date(2026, 3, 31)))
        );
    }

    #[test]
    fn test_due_date_replaces_day_in_closing_month() {
        assert_eq!(due_date(date(2026, 8, 25), 10), Some(date(2026, 8, 10)));
        assert_eq!(due_date(date(2026, 2, 28), 31), Some(date(2026, 2, 28)));
    }

    #[test]
    fn test_invalid_days_yield_none() {
        assert_eq!(closing_date(date(2026, 8, 21), 0), None);
        assert_eq!(due_date(date(2026, 8, 25), 0), None);
    }
}
