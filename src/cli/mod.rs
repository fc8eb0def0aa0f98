//! CLI command handlers
//!
//! Bridges clap argument parsing with the reducer and the reports. Every
//! change is expressed as a `Command` and applied through `Storage::apply`.

pub mod budget;
pub mod category;
pub mod entry;
pub mod goal;
pub mod receipt;

pub use budget::{handle_budget_command, BudgetCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use entry::{handle_entry_command, EntryCommands};
pub use goal::{handle_goal_command, GoalCommands};
pub use receipt::{handle_receipt_command, ReceiptCommands};

use chrono::{Local, NaiveDate};
use clap::Args;

use crate::config::settings::Settings;
use crate::error::{FinanceError, FinanceResult};
use crate::models::{DateRange, Money};

/// Date window selection shared by reporting commands
#[derive(Args, Debug, Clone, Default)]
pub struct RangeArgs {
    /// First day of the window (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Last day of the window, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// A calendar month (YYYY-MM)
    #[arg(long, conflicts_with_all = ["from", "to", "year", "week"])]
    pub month: Option<String>,

    /// A calendar year
    #[arg(long, conflicts_with_all = ["from", "to", "week"])]
    pub year: Option<i32>,

    /// The current week
    #[arg(long, conflicts_with_all = ["from", "to"])]
    pub week: bool,
}

impl RangeArgs {
    /// Resolve to a window; defaults to the current month, and a lone
    /// `--from` or `--to` keeps the other end of the current month
    pub fn resolve(&self, settings: &Settings) -> FinanceResult<DateRange> {
        let today = today();

        if let Some(month) = &self.month {
            let first = parse_date(&format!("{}-01", month.trim()))?;
            return Ok(DateRange::month_of(first));
        }
        if let Some(year) = self.year {
            let day = NaiveDate::from_ymd_opt(year, 1, 1)
                .ok_or_else(|| FinanceError::Validation(format!("Invalid year: {}", year)))?;
            return Ok(DateRange::year_of(day));
        }
        if self.week {
            return Ok(DateRange::week_of(today, settings.week_starts_on));
        }

        let current = DateRange::month_of(today);
        let start = match &self.from {
            Some(from) => parse_date(from)?,
            None => current.start(),
        };
        let end = match &self.to {
            Some(to) => parse_date(to)?,
            None => current.end(),
        };
        DateRange::new(start, end)
    }
}

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse `YYYY-MM-DD`, or the word `today`
pub fn parse_date(s: &str) -> FinanceResult<NaiveDate> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("today") {
        return Ok(today());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
        FinanceError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", s))
    })
}

/// Parse an amount such as `12.50` or `€12.50`
pub fn parse_money(s: &str) -> FinanceResult<Money> {
    Money::parse(s).map_err(|e| FinanceError::Validation(format!("Invalid amount: {}", e)))
}

/// Print a value as pretty JSON
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> FinanceResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_explicit_range() {
        let args = RangeArgs {
            from: Some("2024-01-01".into()),
            to: Some("2024-04-30".into()),
            ..Default::default()
        };
        let range = args.resolve(&Settings::default()).unwrap();
        assert_eq!(range.start(), date(2024, 1, 1));
        assert_eq!(range.end(), date(2024, 4, 30));
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let args = RangeArgs {
            from: Some("2024-05-01".into()),
            to: Some("2024-04-30".into()),
            ..Default::default()
        };
        assert!(matches!(
            args.resolve(&Settings::default()),
            Err(FinanceError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_month_and_year() {
        let month = RangeArgs {
            month: Some("2024-02".into()),
            ..Default::default()
        };
        assert_eq!(month.resolve(&Settings::default()).unwrap().end(), date(2024, 2, 29));

        let year = RangeArgs {
            year: Some(2023),
            ..Default::default()
        };
        assert_eq!(year.resolve(&Settings::default()).unwrap().num_days(), 365);
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_date("2024-12-05").unwrap(), date(2024, 12, 5));
        assert!(parse_date("05.12.2024").unwrap_err().is_validation());
        assert_eq!(parse_money("€12.50").unwrap(), Money::from_cents(1250));
        assert!(parse_money("twelve").unwrap_err().is_validation());
    }
}
