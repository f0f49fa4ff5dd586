// SPDX-License-Identifier: MIT

//! Calendar-date windows for period-scoped trip queries.
//!
//! The backend stores `trip_date` as a plain DATE column, so windows are
//! computed and compared as calendar dates, never timestamps. The current
//! month is deliberately open-ended upward so today's trips are always
//! included without needing to know "now" twice.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// An inclusive calendar-date window. `end == None` means unbounded upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
}

impl DateWindow {
    /// Window for the month containing `reference`, open upward.
    pub fn current_month(reference: NaiveDate) -> Self {
        let start = first_of_month(reference.year(), reference.month());
        Self { start, end: None }
    }

    /// Window for the month immediately before the one containing
    /// `reference`, bounded by that month's last day (inclusive).
    /// Handles year rollover (January → December of the prior year).
    pub fn previous_month(reference: NaiveDate) -> Self {
        let (year, month) = if reference.month() == 1 {
            (reference.year() - 1, 12)
        } else {
            (reference.year(), reference.month() - 1)
        };
        let start = first_of_month(year, month);
        // Last day of the previous month = day before the first of the
        // reference month.
        let end = first_of_month(reference.year(), reference.month())
            .pred_opt()
            .expect("date range underflow");
        Self {
            start,
            end: Some(end),
        }
    }

    /// Whether a calendar date falls inside this window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && self.end.is_none_or(|end| date <= end)
    }
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).expect("valid first-of-month date")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_current_month_is_open_ended() {
        let window = DateWindow::current_month(date(2026, 8, 7));
        assert_eq!(window.start, date(2026, 8, 1));
        assert_eq!(window.end, None);
    }

    #[test]
    fn test_previous_month_bounds() {
        let window = DateWindow::previous_month(date(2026, 8, 7));
        assert_eq!(window.start, date(2026, 7, 1));
        assert_eq!(window.end, Some(date(2026, 7, 31)));
    }

    #[test]
    fn test_previous_month_year_rollover() {
        let window = DateWindow::previous_month(date(2026, 1, 15));
        assert_eq!(window.start, date(2025, 12, 1));
        assert_eq!(window.end, Some(date(2025, 12, 31)));
    }

    #[test]
    fn test_previous_month_leap_february() {
        let window = DateWindow::previous_month(date(2024, 3, 10));
        assert_eq!(window.start, date(2024, 2, 1));
        assert_eq!(window.end, Some(date(2024, 2, 29)));
    }

    #[test]
    fn test_contains_inclusive_bounds() {
        let window = DateWindow::previous_month(date(2026, 8, 7));
        assert!(window.contains(date(2026, 7, 1)));
        assert!(window.contains(date(2026, 7, 31)));
        assert!(!window.contains(date(2026, 6, 30)));
        assert!(!window.contains(date(2026, 8, 1)));
    }

    #[test]
    fn test_contains_open_upper_bound() {
        let window = DateWindow::current_month(date(2026, 8, 7));
        assert!(window.contains(date(2026, 8, 31)));
        assert!(window.contains(date(2027, 1, 1)));
        assert!(!window.contains(date(2026, 7, 31)));
    }
}
