//! Savings goals, milestones and contributions

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{ContributionId, GoalId, MilestoneId};
use super::money::Money;

/// Something the user is saving towards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    pub id: GoalId,
    pub name: String,
    pub target_amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
}

impl SavingsGoal {
    pub fn new(name: impl Into<String>, target_amount: Money) -> Self {
        Self {
            id: GoalId::new(),
            name: name.into(),
            target_amount,
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn validate(&self) -> Result<(), GoalValidationError> {
        if self.name.trim().is_empty() {
            return Err(GoalValidationError::EmptyName);
        }
        if !self.target_amount.is_positive() {
            return Err(GoalValidationError::NonPositiveTarget);
        }
        Ok(())
    }
}

/// A checkpoint on the way to a goal (e.g. "half way")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalMilestone {
    pub id: MilestoneId,
    pub goal_id: GoalId,
    pub name: String,
    pub amount: Money,
}

impl GoalMilestone {
    pub fn new(goal_id: GoalId, name: impl Into<String>, amount: Money) -> Self {
        Self {
            id: MilestoneId::new(),
            goal_id,
            name: name.into(),
            amount,
        }
    }

    pub fn validate(&self) -> Result<(), GoalValidationError> {
        if self.name.trim().is_empty() {
            return Err(GoalValidationError::EmptyName);
        }
        if self.amount.is_negative() {
            return Err(GoalValidationError::NegativeAmount);
        }
        Ok(())
    }
}

/// Money put towards a goal on a given day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalContribution {
    pub id: ContributionId,
    pub goal_id: GoalId,
    pub amount: Money,
    pub date: NaiveDate,
    #[serde(default)]
    pub note: String,
}

impl GoalContribution {
    pub fn new(goal_id: GoalId, amount: Money, date: NaiveDate) -> Self {
        Self {
            id: ContributionId::new(),
            goal_id,
            amount,
            date,
            note: String::new(),
        }
    }

    pub fn validate(&self) -> Result<(), GoalValidationError> {
        if self.amount.is_negative() {
            return Err(GoalValidationError::NegativeAmount);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalValidationError {
    EmptyName,
    NonPositiveTarget,
    NegativeAmount,
}

impl fmt::Display for GoalValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Name cannot be empty"),
            Self::NonPositiveTarget => write!(f, "Goal target must be greater than zero"),
            Self::NegativeAmount => write!(f, "Amount cannot be negative"),
        }
    }
}

impl std::error::Error for GoalValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_validation() {
        assert!(SavingsGoal::new("Holiday", Money::from_cents(150000)).validate().is_ok());
        assert_eq!(
            SavingsGoal::new("Holiday", Money::zero()).validate(),
            Err(GoalValidationError::NonPositiveTarget)
        );
    }

    #[test]
    fn test_contribution_validation() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let contribution = GoalContribution::new(GoalId::new(), Money::from_cents(-100), date);
        assert_eq!(contribution.validate(), Err(GoalValidationError::NegativeAmount));
    }
}
