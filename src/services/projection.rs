//! Recurrence projection
//!
//! Expands recurring entries into dated occurrences inside a query window and
//! folds occurrences (plus one-time entries) into totals. Everything here is a
//! pure function of its inputs; the caller decides what "today" is.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::FinanceResult;
use crate::models::{Category, CategoryId, DateRange, EntryId, Money, OneTimeEntry, RecurringEntry};

/// One recurring entry materialized on a specific date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    pub source_id: EntryId,
    pub date: NaiveDate,
    pub amount: Money,
}

/// Occurrences of `entry` inside `[range_start, range_end]`.
///
/// Fails with `InvalidRange` when `range_start > range_end`.
pub fn occurrences_in_range(
    entry: &RecurringEntry,
    range_start: NaiveDate,
    range_end: NaiveDate,
) -> FinanceResult<Vec<Occurrence>> {
    let range = DateRange::new(range_start, range_end)?;
    Ok(occurrences_within(entry, &range))
}

/// Occurrences of `entry` inside an already validated window
pub fn occurrences_within(entry: &RecurringEntry, range: &DateRange) -> Vec<Occurrence> {
    let Some(active) = range.clip(entry.start_date, entry.end_date) else {
        return Vec::new();
    };

    let cadence = entry.recurrence;
    let mut step = cadence.first_step_on_or_after(entry.start_date, active.start());
    let mut occurrences = Vec::new();

    while let Some(date) = cadence.nth_after(entry.start_date, step) {
        if date > active.end() {
            break;
        }
        if date >= active.start() {
            occurrences.push(Occurrence {
                source_id: entry.id,
                date,
                amount: entry.amount,
            });
        }
        step = match step.checked_add(1) {
            Some(next) => next,
            None => break,
        };
    }

    tracing::trace!(
        entry = %entry.id,
        window = %range,
        count = occurrences.len(),
        "projected recurring entry"
    );
    occurrences
}

/// A recurring or one-time entry, borrowed for aggregation
#[derive(Debug, Clone, Copy)]
pub enum LedgerItem<'a> {
    Recurring(&'a RecurringEntry),
    OneTime(&'a OneTimeEntry),
}

impl<'a> LedgerItem<'a> {
    pub fn id(&self) -> EntryId {
        match self {
            Self::Recurring(entry) => entry.id,
            Self::OneTime(entry) => entry.id,
        }
    }

    pub fn name(&self) -> &'a str {
        match *self {
            Self::Recurring(entry) => &entry.name,
            Self::OneTime(entry) => &entry.name,
        }
    }

    pub fn category_id(&self) -> Option<CategoryId> {
        match self {
            Self::Recurring(entry) => entry.category_id,
            Self::OneTime(entry) => entry.category_id,
        }
    }

    /// Occurrences of this item inside `range`; a one-time entry yields at
    /// most one
    pub fn occurrences(&self, range: &DateRange) -> Vec<Occurrence> {
        match self {
            Self::Recurring(entry) => occurrences_within(entry, range),
            Self::OneTime(entry) if range.contains(entry.date) => vec![Occurrence {
                source_id: entry.id,
                date: entry.date,
                amount: entry.amount,
            }],
            Self::OneTime(_) => Vec::new(),
        }
    }

    /// Sum of this item's occurrences inside `range`
    pub fn total(&self, range: &DateRange) -> Money {
        self.occurrences(range).iter().map(|o| o.amount).sum()
    }
}

impl<'a> From<&'a RecurringEntry> for LedgerItem<'a> {
    fn from(entry: &'a RecurringEntry) -> Self {
        Self::Recurring(entry)
    }
}

impl<'a> From<&'a OneTimeEntry> for LedgerItem<'a> {
    fn from(entry: &'a OneTimeEntry) -> Self {
        Self::OneTime(entry)
    }
}

/// Total of all occurrences of `items` inside `[range_start, range_end]`
pub fn total_in_range<'a, I>(
    items: I,
    range_start: NaiveDate,
    range_end: NaiveDate,
) -> FinanceResult<Money>
where
    I: IntoIterator<Item = LedgerItem<'a>>,
{
    let range = DateRange::new(range_start, range_end)?;
    Ok(total_within(items, &range))
}

/// Total of all occurrences of `items` inside an already validated window
pub fn total_within<'a, I>(items: I, range: &DateRange) -> Money
where
    I: IntoIterator<Item = LedgerItem<'a>>,
{
    items.into_iter().map(|item| item.total(range)).sum()
}

/// An entry whose category reference points at a missing category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrphanReference {
    pub entry_id: EntryId,
    pub entry_name: String,
    pub category_id: CategoryId,
}

/// Per-category totals plus the entries that could not be grouped
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryTotals {
    pub totals: BTreeMap<CategoryId, Money>,
    pub orphans: Vec<OrphanReference>,
}

impl CategoryTotals {
    /// Total for one category, zero when it had no occurrences
    pub fn get(&self, category_id: CategoryId) -> Money {
        self.totals.get(&category_id).copied().unwrap_or_default()
    }

    /// Sum across all grouped categories
    pub fn grand_total(&self) -> Money {
        self.totals.values().copied().sum()
    }
}

/// Group occurrence totals by category.
///
/// Items without a category are ignored. Items referencing a category that is
/// not in `categories` are left out of the totals and listed as orphans, but
/// only when they actually occur inside `range`.
pub fn totals_by_category<'a, I>(
    items: I,
    categories: &[Category],
    range: &DateRange,
) -> CategoryTotals
where
    I: IntoIterator<Item = LedgerItem<'a>>,
{
    let known: HashSet<CategoryId> = categories.iter().map(|c| c.id).collect();
    let mut result = CategoryTotals::default();

    for item in items {
        let Some(category_id) = item.category_id() else {
            continue;
        };
        let occurrences = item.occurrences(range);
        if occurrences.is_empty() {
            continue;
        }
        let amount: Money = occurrences.iter().map(|o| o.amount).sum();

        if known.contains(&category_id) {
            *result.totals.entry(category_id).or_default() += amount;
        } else {
            tracing::debug!(entry = %item.id(), category = %category_id, "orphan category reference");
            result.orphans.push(OrphanReference {
                entry_id: item.id(),
                entry_name: item.name().to_string(),
                category_id,
            });
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FinanceError;
    use crate::models::Recurrence;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn monthly(amount: i64, start: NaiveDate) -> RecurringEntry {
        RecurringEntry::income("Item", Money::from_cents(amount), Recurrence::Monthly, start)
    }

    fn dates(occurrences: &[Occurrence]) -> Vec<NaiveDate> {
        occurrences.iter().map(|o| o.date).collect()
    }

    #[test]
    fn test_month_end_anchor_scenario() {
        let item = monthly(10000, date(2024, 1, 31));
        let occurrences =
            occurrences_in_range(&item, date(2024, 1, 1), date(2024, 4, 30)).unwrap();

        assert_eq!(
            dates(&occurrences),
            vec![
                date(2024, 1, 31),
                date(2024, 2, 29),
                date(2024, 3, 31),
                date(2024, 4, 30)
            ]
        );
        assert!(occurrences.iter().all(|o| o.source_id == item.id));

        let total =
            total_in_range([LedgerItem::from(&item)], date(2024, 1, 1), date(2024, 4, 30))
                .unwrap();
        assert_eq!(total, Money::from_cents(40000));
    }

    #[test]
    fn test_inverted_window_is_rejected() {
        let item = monthly(100, date(2024, 1, 1));
        let err = occurrences_in_range(&item, date(2024, 2, 1), date(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, FinanceError::InvalidRange { .. }));
        assert!(total_in_range([LedgerItem::from(&item)], date(2024, 2, 1), date(2024, 1, 1))
            .is_err());
    }

    #[test]
    fn test_weekly_occurrences_are_seven_days_apart() {
        let item = RecurringEntry::income(
            "Pocket money",
            Money::from_cents(2000),
            Recurrence::Weekly,
            date(2023, 12, 29),
        );
        let occurrences =
            occurrences_in_range(&item, date(2024, 1, 10), date(2024, 6, 30)).unwrap();

        assert_eq!(occurrences.first().map(|o| o.date), Some(date(2024, 1, 12)));
        for pair in occurrences.windows(2) {
            assert_eq!((pair[1].date - pair[0].date).num_days(), 7);
        }
    }

    #[test]
    fn test_monthly_day_is_kept_unless_clamped() {
        let item = monthly(100, date(2023, 10, 30));
        let occurrences =
            occurrences_in_range(&item, date(2023, 10, 1), date(2024, 12, 31)).unwrap();
        for occurrence in &occurrences {
            use chrono::Datelike;
            let last_day = DateRange::month_of(occurrence.date).end().day();
            assert_eq!(occurrence.date.day(), 30.min(last_day));
        }
        assert_eq!(occurrences.len(), 15);
    }

    #[test]
    fn test_yearly_leap_day_anchor() {
        let item = RecurringEntry::income(
            "Insurance refund",
            Money::from_cents(5000),
            Recurrence::Yearly,
            date(2024, 2, 29),
        );
        let occurrences =
            occurrences_in_range(&item, date(2024, 1, 1), date(2028, 12, 31)).unwrap();
        assert_eq!(
            dates(&occurrences),
            vec![
                date(2024, 2, 29),
                date(2025, 2, 28),
                date(2026, 2, 28),
                date(2027, 2, 28),
                date(2028, 2, 29)
            ]
        );
    }

    #[test]
    fn test_empty_outside_active_span() {
        let item = monthly(100, date(2024, 6, 1)).ending(date(2024, 9, 1));

        assert!(occurrences_in_range(&item, date(2024, 1, 1), date(2024, 5, 31))
            .unwrap()
            .is_empty());
        assert!(occurrences_in_range(&item, date(2024, 9, 2), date(2025, 1, 1))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_end_date_is_inclusive() {
        let item = monthly(100, date(2024, 1, 15)).ending(date(2024, 3, 15));
        let occurrences =
            occurrences_in_range(&item, date(2024, 1, 1), date(2024, 12, 31)).unwrap();
        assert_eq!(
            dates(&occurrences),
            vec![date(2024, 1, 15), date(2024, 2, 15), date(2024, 3, 15)]
        );
    }

    #[test]
    fn test_single_day_item() {
        let item = monthly(100, date(2024, 5, 5)).ending(date(2024, 5, 5));
        let inside = occurrences_in_range(&item, date(2024, 5, 1), date(2024, 5, 31)).unwrap();
        assert_eq!(dates(&inside), vec![date(2024, 5, 5)]);

        let outside = occurrences_in_range(&item, date(2024, 6, 1), date(2024, 6, 30)).unwrap();
        assert!(outside.is_empty());
    }

    #[test]
    fn test_window_starting_mid_schedule() {
        let item = monthly(100, date(2020, 1, 31));
        let occurrences =
            occurrences_in_range(&item, date(2024, 2, 1), date(2024, 3, 31)).unwrap();
        assert_eq!(dates(&occurrences), vec![date(2024, 2, 29), date(2024, 3, 31)]);
    }

    #[test]
    fn test_total_over_single_occurrence_day() {
        let item = monthly(12345, date(2024, 1, 10));
        let total =
            total_in_range([LedgerItem::from(&item)], date(2024, 3, 10), date(2024, 3, 10))
                .unwrap();
        assert_eq!(total, Money::from_cents(12345));
    }

    #[test]
    fn test_total_mixes_recurring_and_one_time() {
        let salary = monthly(300000, date(2024, 1, 25));
        let bonus = OneTimeEntry::income("Bonus", Money::from_cents(50000), date(2024, 2, 10));
        let old_bonus = OneTimeEntry::income("Old", Money::from_cents(99999), date(2023, 2, 10));

        let items = [
            LedgerItem::from(&salary),
            LedgerItem::from(&bonus),
            LedgerItem::from(&old_bonus),
        ];
        let total = total_in_range(items, date(2024, 1, 1), date(2024, 2, 29)).unwrap();
        assert_eq!(total, Money::from_cents(650000));
    }

    #[test]
    fn test_totals_by_category_reports_orphans() {
        let groceries = Category::new("Groceries");
        let missing = CategoryId::new();

        let food = RecurringEntry::expense(
            "Food box",
            Money::from_cents(2500),
            Recurrence::Weekly,
            date(2024, 1, 1),
            groceries.id,
        );
        let market = OneTimeEntry::expense("Market", Money::from_cents(1000), date(2024, 1, 3), groceries.id);
        let gym = RecurringEntry::expense(
            "Gym",
            Money::from_cents(3000),
            Recurrence::Monthly,
            date(2024, 1, 1),
            missing,
        );
        let stale = OneTimeEntry::expense("Stale", Money::from_cents(1), date(2019, 1, 1), missing);
        let salary = monthly(300000, date(2024, 1, 1));

        let items = [
            LedgerItem::from(&food),
            LedgerItem::from(&market),
            LedgerItem::from(&gym),
            LedgerItem::from(&stale),
            LedgerItem::from(&salary),
        ];
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap();
        let grouped = totals_by_category(items, &[groceries.clone()], &range);

        // five Mondays in January 2024 plus the market run
        assert_eq!(grouped.get(groceries.id), Money::from_cents(13500));
        assert_eq!(grouped.grand_total(), Money::from_cents(13500));
        assert_eq!(grouped.orphans.len(), 1);
        assert_eq!(grouped.orphans[0].entry_id, gym.id);
        assert_eq!(grouped.orphans[0].category_id, missing);
    }

    #[test]
    fn test_projection_is_deterministic() {
        let item = monthly(100, date(2024, 1, 31));
        let range = DateRange::new(date(2024, 1, 1), date(2025, 1, 1)).unwrap();
        assert_eq!(occurrences_within(&item, &range), occurrences_within(&item, &range));
    }
}
