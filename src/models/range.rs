//! Inclusive calendar date windows
//!
//! Every projection and report runs over a `DateRange`. The constructor is the
//! single place where `start <= end` is enforced.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{FinanceError, FinanceResult};

/// An inclusive `[start, end]` window of calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a window, failing with `InvalidRange` when `start > end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> FinanceResult<Self> {
        if start > end {
            return Err(FinanceError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// A window covering a single day
    pub fn day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// The calendar month containing `date`
    pub fn month_of(date: NaiveDate) -> Self {
        let start = date.with_day(1).unwrap_or(date);
        let end = start
            .checked_add_months(chrono::Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(date);
        Self { start, end }
    }

    /// The seven-day week containing `date`, starting on `week_start`
    pub fn week_of(date: NaiveDate, week_start: Weekday) -> Self {
        let offset = (7 + date.weekday().num_days_from_monday()
            - week_start.num_days_from_monday())
            % 7;
        let start = date - Duration::days(i64::from(offset));
        Self {
            start,
            end: start + Duration::days(6),
        }
    }

    /// The calendar year containing `date`
    pub fn year_of(date: NaiveDate) -> Self {
        let start = NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date);
        let end = NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap_or(date);
        Self { start, end }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `date` falls inside the window (both ends inclusive)
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days in the window, counting both ends
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Intersect with an item's active span. `None` when they do not overlap.
    pub fn clip(&self, start: NaiveDate, end: Option<NaiveDate>) -> Option<Self> {
        let lo = self.start.max(start);
        let hi = match end {
            Some(end) => self.end.min(end),
            None => self.end,
        };
        (lo <= hi).then_some(Self { start: lo, end: hi })
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_rejects_inverted_window() {
        let err = DateRange::new(date(2024, 2, 1), date(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, FinanceError::InvalidRange { .. }));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap();
        assert!(range.contains(date(2024, 1, 1)));
        assert!(range.contains(date(2024, 1, 31)));
        assert!(!range.contains(date(2024, 2, 1)));
        assert_eq!(range.num_days(), 31);
    }

    #[test]
    fn test_month_of_leap_february() {
        let range = DateRange::month_of(date(2024, 2, 14));
        assert_eq!(range.start(), date(2024, 2, 1));
        assert_eq!(range.end(), date(2024, 2, 29));
    }

    #[test]
    fn test_week_and_year_windows() {
        // 2024-03-14 is a Thursday
        let monday = DateRange::week_of(date(2024, 3, 14), Weekday::Mon);
        assert_eq!(monday.start(), date(2024, 3, 11));
        assert_eq!(monday.end(), date(2024, 3, 17));

        let sunday = DateRange::week_of(date(2024, 3, 14), Weekday::Sun);
        assert_eq!(sunday.start(), date(2024, 3, 10));

        let same_day = DateRange::week_of(date(2024, 3, 11), Weekday::Mon);
        assert_eq!(same_day.start(), date(2024, 3, 11));

        let year = DateRange::year_of(date(2024, 6, 1));
        assert_eq!(year.num_days(), 366);
    }

    #[test]
    fn test_clip() {
        let range = DateRange::new(date(2024, 1, 1), date(2024, 12, 31)).unwrap();
        let clipped = range.clip(date(2024, 3, 1), Some(date(2025, 1, 1))).unwrap();
        assert_eq!(clipped.start(), date(2024, 3, 1));
        assert_eq!(clipped.end(), date(2024, 12, 31));

        assert!(range.clip(date(2025, 1, 1), None).is_none());
        assert!(range.clip(date(2023, 1, 1), Some(date(2023, 12, 31))).is_none());
    }
}
