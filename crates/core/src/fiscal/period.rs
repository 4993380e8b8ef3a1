//! Fiscal periods.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use ohada_shared::types::UserId;
use serde::{Deserialize, Serialize};

/// A period (normally one calendar month) of a fiscal year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    /// Position within the fiscal year, starting at 1.
    pub number: u32,
    /// Period name (e.g., "March 2024").
    pub name: String,
    /// First day of the period.
    pub start_date: NaiveDate,
    /// Last day of the period.
    pub end_date: NaiveDate,
    /// Closed periods reject entries. A closed period never reopens.
    pub is_closed: bool,
    /// User who closed the period.
    pub closed_by: Option<UserId>,
    /// When the period was closed.
    pub closed_at: Option<DateTime<Utc>>,
}

impl Period {
    /// Creates an open period.
    #[must_use]
    pub fn new(number: u32, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            number,
            name: format!("{} {}", month_name(start_date.month()), start_date.year()),
            start_date,
            end_date,
            is_closed: false,
            closed_by: None,
            closed_at: None,
        }
    }

    /// Returns true if the given date falls within this period.
    #[must_use]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

/// Splits `[start_date, end_date]` into calendar-month periods.
///
/// The first and last periods are truncated when the range does not start or
/// end on a month boundary.
#[must_use]
pub fn generate_monthly_periods(start_date: NaiveDate, end_date: NaiveDate) -> Vec<Period> {
    let mut periods = Vec::new();
    let mut current = start_date;
    let mut number = 1;

    while current <= end_date {
        let month_end = last_day_of_month(current);
        let period_end = month_end.min(end_date);
        periods.push(Period::new(number, current, period_end));

        let Some(next) = period_end.succ_opt() else {
            break;
        };
        current = next;
        number += 1;
    }

    periods
}

/// Last day of the month containing `date`.
#[must_use]
pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let first_of_next = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    };

    first_of_next
        .and_then(|d| d.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_generate_monthly_periods_full_year() {
        let periods = generate_monthly_periods(date(2024, 1, 1), date(2024, 12, 31));

        assert_eq!(periods.len(), 12);
        assert_eq!(periods[0].name, "January 2024");
        assert_eq!(periods[1].end_date, date(2024, 2, 29));
        assert_eq!(periods[11].number, 12);
        assert_eq!(periods[11].end_date, date(2024, 12, 31));
        assert!(periods.iter().all(|p| !p.is_closed));
    }

    #[test]
    fn test_generate_monthly_periods_offset_year() {
        let periods = generate_monthly_periods(date(2024, 7, 1), date(2025, 6, 30));

        assert_eq!(periods.len(), 12);
        assert_eq!(periods[0].name, "July 2024");
        assert_eq!(periods[6].start_date, date(2025, 1, 1));
        assert_eq!(periods[11].name, "June 2025");
    }

    #[test]
    fn test_generate_monthly_periods_mid_month_start() {
        let periods = generate_monthly_periods(date(2024, 1, 15), date(2025, 1, 14));

        assert_eq!(periods.len(), 13);
        assert_eq!(periods[0].end_date, date(2024, 1, 31));
        assert_eq!(periods[12].start_date, date(2025, 1, 1));
        assert_eq!(periods[12].end_date, date(2025, 1, 14));
    }

    #[test]
    fn test_periods_tile_range() {
        let periods = generate_monthly_periods(date(2024, 1, 1), date(2024, 12, 31));
        for pair in periods.windows(2) {
            assert_eq!(pair[0].end_date.succ_opt(), Some(pair[1].start_date));
        }
    }

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(last_day_of_month(date(2023, 2, 10)), date(2023, 2, 28));
        assert_eq!(last_day_of_month(date(2024, 12, 1)), date(2024, 12, 31));
        assert_eq!(last_day_of_month(date(2024, 4, 30)), date(2024, 4, 30));
    }

    #[test]
    fn test_contains_date() {
        let period = Period::new(3, date(2024, 3, 1), date(2024, 3, 31));
        assert!(period.contains_date(date(2024, 3, 1)));
        assert!(period.contains_date(date(2024, 3, 31)));
        assert!(!period.contains_date(date(2024, 4, 1)));
    }
}
