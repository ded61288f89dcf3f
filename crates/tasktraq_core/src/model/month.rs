//! Calendar month ranges over ISO date strings.
//!
//! # Invariants
//! - `start` is the first day of the month and `end` the first day of the
//!   next month, both rendered as zero-padded `YYYY-MM-DD`.
//! - Membership is the half-open test `start <= date < end`.

use chrono::{Datelike, NaiveDate};

const MIN_YEAR: i32 = 0;
const MAX_YEAR: i32 = 9999;

/// Half-open `[start, end)` range covering one calendar month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthRange {
    first_day: NaiveDate,
    start: String,
    end: String,
}

impl MonthRange {
    /// Builds the range for `year`/`month`.
    ///
    /// Returns `None` when `month` is outside `1..=12` or either bound cannot
    /// be written with a four-digit year.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return None;
        }
        let first_day = NaiveDate::from_ymd_opt(year, month, 1)?;
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        if next_year > MAX_YEAR {
            return None;
        }

        Some(Self {
            first_day,
            start: format!("{year:04}-{month:02}-01"),
            end: format!("{next_year:04}-{next_month:02}-01"),
        })
    }

    /// Inclusive lower bound.
    pub fn start(&self) -> &str {
        &self.start
    }

    /// Exclusive upper bound.
    pub fn end(&self) -> &str {
        &self.end
    }

    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    /// Number of days in the month (28..=31).
    pub fn days_in_month(&self) -> u32 {
        // The day before the next month's first day is this month's last day.
        self.first_day
            .checked_add_months(chrono::Months::new(1))
            .and_then(|next| next.pred_opt())
            .map_or(31, |last| last.day())
    }

    /// Returns whether `date` falls inside the range by string comparison.
    pub fn contains(&self, date: &str) -> bool {
        self.start.as_str() <= date && date < self.end.as_str()
    }

    /// Returns the 1-based day of month for a well-formed date in range.
    pub fn day_of(&self, date: &str) -> Option<u32> {
        if !self.contains(date) {
            return None;
        }
        let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
        (parsed.year() == self.year() && parsed.month() == self.month()).then(|| parsed.day())
    }
}

#[cfg(test)]
mod tests {
    use super::MonthRange;

    #[test]
    fn bounds_are_zero_padded_and_roll_over_december() {
        let march = MonthRange::new(2024, 3).unwrap();
        assert_eq!(march.start(), "2024-03-01");
        assert_eq!(march.end(), "2024-04-01");

        let december = MonthRange::new(2023, 12).unwrap();
        assert_eq!(december.start(), "2023-12-01");
        assert_eq!(december.end(), "2024-01-01");
    }

    #[test]
    fn invalid_month_or_year_has_no_range() {
        assert!(MonthRange::new(2024, 0).is_none());
        assert!(MonthRange::new(2024, 13).is_none());
        assert!(MonthRange::new(10_000, 1).is_none());
        assert!(MonthRange::new(9999, 12).is_none());
        assert!(MonthRange::new(-1, 1).is_none());
    }

    #[test]
    fn contains_rejects_unpadded_and_neighbouring_dates() {
        let march = MonthRange::new(2024, 3).unwrap();
        assert!(march.contains("2024-03-01"));
        assert!(march.contains("2024-03-31"));
        assert!(!march.contains("2024-3-01"));
        assert!(!march.contains("2024-02-29"));
        assert!(!march.contains("2024-04-01"));
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(MonthRange::new(2024, 2).unwrap().days_in_month(), 29);
        assert_eq!(MonthRange::new(2023, 2).unwrap().days_in_month(), 28);
        assert_eq!(MonthRange::new(2024, 4).unwrap().days_in_month(), 30);
        assert_eq!(MonthRange::new(2024, 12).unwrap().days_in_month(), 31);
    }

    #[test]
    fn day_of_parses_only_well_formed_dates() {
        let march = MonthRange::new(2024, 3).unwrap();
        assert_eq!(march.day_of("2024-03-05"), Some(5));
        assert_eq!(march.day_of("2024-03-5x"), None);
        assert_eq!(march.day_of("2024-04-05"), None);
    }
}
