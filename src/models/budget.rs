//! Category budgets and budget alerts
//!
//! A budget caps spending in one category per cadence period. Alerts watch a
//! category budget and fire once spending reaches a percentage of it.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AlertId, BudgetId, CategoryId};
use super::money::Money;
use super::recurrence::Recurrence;

/// A spending limit for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBudget {
    pub id: BudgetId,
    pub category_id: CategoryId,
    /// Limit per cadence period
    pub amount: Money,
    #[serde(default = "default_cadence")]
    pub cadence: Recurrence,
}

fn default_cadence() -> Recurrence {
    Recurrence::Monthly
}

impl CategoryBudget {
    pub fn new(category_id: CategoryId, amount: Money, cadence: Recurrence) -> Self {
        Self {
            id: BudgetId::new(),
            category_id,
            amount,
            cadence,
        }
    }

    pub fn monthly(category_id: CategoryId, amount: Money) -> Self {
        Self::new(category_id, amount, Recurrence::Monthly)
    }

    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if self.amount.is_negative() {
            return Err(BudgetValidationError::NegativeAmount);
        }
        Ok(())
    }
}

/// Fires when spending in a category reaches `threshold_percent` of its budget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetAlert {
    pub id: AlertId,
    pub category_id: CategoryId,
    pub threshold_percent: u16,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl BudgetAlert {
    pub fn new(category_id: CategoryId, threshold_percent: u16) -> Self {
        Self {
            id: AlertId::new(),
            category_id,
            threshold_percent,
            enabled: true,
        }
    }

    /// Whether the alert fires for the given usage percentage
    pub fn is_triggered(&self, percent_used: f64) -> bool {
        self.enabled && percent_used >= f64::from(self.threshold_percent)
    }

    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if self.threshold_percent == 0 || self.threshold_percent > 1000 {
            return Err(BudgetValidationError::InvalidThreshold(self.threshold_percent));
        }
        Ok(())
    }
}

/// Validation errors for budgets and alerts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    NegativeAmount,
    InvalidThreshold(u16),
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeAmount => write!(f, "Budget amount cannot be negative"),
            Self::InvalidThreshold(p) => {
                write!(f, "Alert threshold must be between 1 and 1000 percent, got {}", p)
            }
        }
    }
}

impl std::error::Error for BudgetValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_validation() {
        let cat = CategoryId::new();
        assert!(CategoryBudget::monthly(cat, Money::from_cents(40000)).validate().is_ok());
        assert_eq!(
            CategoryBudget::monthly(cat, Money::from_cents(-1)).validate(),
            Err(BudgetValidationError::NegativeAmount)
        );
    }

    #[test]
    fn test_alert_trigger() {
        let mut alert = BudgetAlert::new(CategoryId::new(), 80);
        assert!(!alert.is_triggered(79.9));
        assert!(alert.is_triggered(80.0));
        alert.enabled = false;
        assert!(!alert.is_triggered(150.0));
    }

    #[test]
    fn test_alert_threshold_bounds() {
        assert!(BudgetAlert::new(CategoryId::new(), 0).validate().is_err());
        assert!(BudgetAlert::new(CategoryId::new(), 120).validate().is_ok());
    }

    #[test]
    fn test_missing_cadence_defaults_to_monthly() {
        let json = format!(
            r#"{{"id":"{}","categoryId":"{}","amount":5000}}"#,
            uuid::Uuid::new_v4(),
            uuid::Uuid::new_v4()
        );
        let budget: CategoryBudget = serde_json::from_str(&json).unwrap();
        assert_eq!(budget.cadence, Recurrence::Monthly);
    }
}
