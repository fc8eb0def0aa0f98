//! Income and expense entries
//!
//! Recurring entries repeat on a cadence between a start date and an optional
//! inclusive end date; one-time entries happen on a single date. Whether an
//! entry is income or expense is decided by the list it lives in, so stored
//! amounts are never negative. Expenses carry a category reference.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CategoryId, EntryId};
use super::money::Money;
use super::recurrence::Recurrence;

/// Whether an entry adds to or takes from the user's balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flow {
    Income,
    Expense,
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flow::Income => write!(f, "Income"),
            Flow::Expense => write!(f, "Expense"),
        }
    }
}

/// An income or expense that repeats on a cadence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringEntry {
    pub id: EntryId,
    pub name: String,
    pub amount: Money,
    pub recurrence: Recurrence,
    pub start_date: NaiveDate,
    /// Last day the entry may occur on (inclusive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Set on expenses only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
}

impl RecurringEntry {
    /// Create a recurring income
    pub fn income(
        name: impl Into<String>,
        amount: Money,
        recurrence: Recurrence,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            id: EntryId::new(),
            name: name.into(),
            amount,
            recurrence,
            start_date,
            end_date: None,
            category_id: None,
        }
    }

    /// Create a recurring expense in a category
    pub fn expense(
        name: impl Into<String>,
        amount: Money,
        recurrence: Recurrence,
        start_date: NaiveDate,
        category_id: CategoryId,
    ) -> Self {
        let mut entry = Self::income(name, amount, recurrence, start_date);
        entry.category_id = Some(category_id);
        entry
    }

    /// Builder-style end date
    pub fn ending(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn validate(&self) -> Result<(), EntryValidationError> {
        validate_common(&self.name, self.amount)?;
        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(EntryValidationError::EndBeforeStart {
                    start: self.start_date,
                    end,
                });
            }
        }
        Ok(())
    }
}

/// An income or expense that happens once
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OneTimeEntry {
    pub id: EntryId,
    pub name: String,
    pub amount: Money,
    pub date: NaiveDate,
    /// Set on expenses only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
}

impl OneTimeEntry {
    /// Create a one-time income
    pub fn income(name: impl Into<String>, amount: Money, date: NaiveDate) -> Self {
        Self {
            id: EntryId::new(),
            name: name.into(),
            amount,
            date,
            category_id: None,
        }
    }

    /// Create a one-time expense in a category
    pub fn expense(
        name: impl Into<String>,
        amount: Money,
        date: NaiveDate,
        category_id: CategoryId,
    ) -> Self {
        let mut entry = Self::income(name, amount, date);
        entry.category_id = Some(category_id);
        entry
    }

    pub fn validate(&self) -> Result<(), EntryValidationError> {
        validate_common(&self.name, self.amount)
    }
}

fn validate_common(name: &str, amount: Money) -> Result<(), EntryValidationError> {
    if name.trim().is_empty() {
        return Err(EntryValidationError::EmptyName);
    }
    if amount.is_negative() {
        return Err(EntryValidationError::NegativeAmount);
    }
    Ok(())
}

/// Validation errors for entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValidationError {
    EmptyName,
    NegativeAmount,
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
}

impl fmt::Display for EntryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Entry name cannot be empty"),
            Self::NegativeAmount => write!(f, "Entry amount cannot be negative"),
            Self::EndBeforeStart { start, end } => {
                write!(f, "End date {} is before start date {}", end, start)
            }
        }
    }
}

impl std::error::Error for EntryValidationError {}
