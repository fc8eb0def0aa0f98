//! Recurrence cadence
//!
//! A cadence is the unit by which a recurring entry repeats. Occurrences are
//! always computed from the entry's anchor date, never from the previous
//! occurrence, so month-end clamping does not drift (Jan 31 -> Feb 29 -> Mar 31).

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::range::DateRange;

/// How often a recurring entry repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    Weekly,
    Monthly,
    Yearly,
}

impl Recurrence {
    /// All cadences in display order
    pub fn all() -> &'static [Self] {
        &[Self::Weekly, Self::Monthly, Self::Yearly]
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
            Self::Yearly => "Yearly",
        }
    }

    /// The `step`-th occurrence of a schedule anchored at `anchor`.
    ///
    /// Monthly steps keep the anchor's day-of-month, clamped to the last day of
    /// shorter months. Yearly steps keep month and day; a Feb 29 anchor lands
    /// on Feb 28 in non-leap years. Returns `None` past chrono's date range.
    pub fn nth_after(&self, anchor: NaiveDate, step: u32) -> Option<NaiveDate> {
        match self {
            Self::Weekly => anchor.checked_add_days(Days::new(7 * u64::from(step))),
            Self::Monthly => anchor.checked_add_months(Months::new(step)),
            Self::Yearly => anchor.checked_add_months(Months::new(step.checked_mul(12)?)),
        }
    }

    /// Index of the first step whose date is on or after `date`.
    ///
    /// Used to jump straight to the query window instead of walking every
    /// occurrence since the anchor. May undershoot by one for monthly and
    /// yearly cadences because of clamping; callers skip dates before `date`.
    pub fn first_step_on_or_after(&self, anchor: NaiveDate, date: NaiveDate) -> u32 {
        if date <= anchor {
            return 0;
        }
        let steps = match self {
            Self::Weekly => {
                let days = (date - anchor).num_days();
                (days + 6) / 7
            }
            Self::Monthly => {
                let months = months_between(anchor, date);
                (months - 1).max(0)
            }
            Self::Yearly => {
                let years = i64::from(date.year() - anchor.year());
                (years - 1).max(0)
            }
        };
        u32::try_from(steps).unwrap_or(u32::MAX)
    }

    /// How many cadence periods a window touches.
    ///
    /// Weekly counts started 7-day blocks from the window start; monthly and
    /// yearly count distinct calendar months or years.
    pub fn periods_in(&self, range: &DateRange) -> i64 {
        match self {
            Self::Weekly => (range.num_days() + 6) / 7,
            Self::Monthly => months_between(range.start(), range.end()) + 1,
            Self::Yearly => i64::from(range.end().year() - range.start().year()) + 1,
        }
    }
}

fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    let years = i64::from(to.year() - from.year());
    let months = i64::from(to.month()) - i64::from(from.month());
    years * 12 + months
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl FromStr for Recurrence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" | "week" | "w" => Ok(Self::Weekly),
            "monthly" | "month" | "m" => Ok(Self::Monthly),
            "yearly" | "year" | "annual" | "y" => Ok(Self::Yearly),
            other => Err(format!(
                "Unknown recurrence '{}', expected weekly, monthly or yearly",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_weekly_steps() {
        let anchor = date(2024, 1, 1);
        assert_eq!(Recurrence::Weekly.nth_after(anchor, 0), Some(anchor));
        assert_eq!(Recurrence::Weekly.nth_after(anchor, 3), Some(date(2024, 1, 22)));
    }

    #[test]
    fn test_monthly_clamps_without_drift() {
        let anchor = date(2024, 1, 31);
        let dates: Vec<_> = (0..4)
            .map(|k| Recurrence::Monthly.nth_after(anchor, k).unwrap())
            .collect();
        assert_eq!(
            dates,
            vec![
                date(2024, 1, 31),
                date(2024, 2, 29),
                date(2024, 3, 31),
                date(2024, 4, 30)
            ]
        );
        assert_eq!(Recurrence::Monthly.nth_after(date(2023, 1, 31), 1), Some(date(2023, 2, 28)));
    }

    #[test]
    fn test_yearly_leap_anchor() {
        let anchor = date(2024, 2, 29);
        assert_eq!(Recurrence::Yearly.nth_after(anchor, 1), Some(date(2025, 2, 28)));
        assert_eq!(Recurrence::Yearly.nth_after(anchor, 4), Some(date(2028, 2, 29)));
    }

    #[test]
    fn test_first_step_never_overshoots() {
        let anchor = date(2024, 1, 31);
        for cadence in Recurrence::all() {
            for target in [date(2024, 3, 1), date(2025, 2, 28), date(2030, 7, 15)] {
                let step = cadence.first_step_on_or_after(anchor, target);
                if step > 0 {
                    let previous = cadence.nth_after(anchor, step - 1).unwrap();
                    assert!(previous < target, "{:?} overshoots {}", cadence, target);
                }
            }
        }
    }

    #[test]
    fn test_periods_in() {
        let range = DateRange::new(date(2024, 1, 15), date(2024, 3, 2)).unwrap();
        assert_eq!(Recurrence::Monthly.periods_in(&range), 3);
        assert_eq!(Recurrence::Yearly.periods_in(&range), 1);
        assert_eq!(Recurrence::Weekly.periods_in(&range), 7);
    }

    #[test]
    fn test_parse() {
        assert_eq!("Monthly".parse::<Recurrence>(), Ok(Recurrence::Monthly));
        assert_eq!("annual".parse::<Recurrence>(), Ok(Recurrence::Yearly));
        assert!("daily".parse::<Recurrence>().is_err());
    }

    #[test]
    fn test_serialization() {
        assert_eq!(serde_json::to_string(&Recurrence::Weekly).unwrap(), "\"weekly\"");
    }
}
