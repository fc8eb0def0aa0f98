//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::diff::diff_values;
use crate::state::{Command, FinanceState, Record};

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
        }
    }
}

/// The persisted entity kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityType {
    Category,
    RecurringIncome,
    RecurringExpense,
    OneTimeIncome,
    OneTimeExpense,
    CategoryBudget,
    SavingsGoal,
    BudgetAlert,
    GoalMilestone,
    GoalContribution,
}

impl EntityType {
    /// Human label, also used in error messages
    pub const fn label(&self) -> &'static str {
        match self {
            EntityType::Category => "Category",
            EntityType::RecurringIncome => "Recurring income",
            EntityType::RecurringExpense => "Recurring expense",
            EntityType::OneTimeIncome => "One-time income",
            EntityType::OneTimeExpense => "One-time expense",
            EntityType::CategoryBudget => "Category budget",
            EntityType::SavingsGoal => "Savings goal",
            EntityType::BudgetAlert => "Budget alert",
            EntityType::GoalMilestone => "Goal milestone",
            EntityType::GoalContribution => "Goal contribution",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A single audit log entry
///
/// Records one applied command with the JSON form of the entity before and
/// after it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub operation: Operation,
    pub entity_type: EntityType,
    /// Short display id (`cat-1a2b3c4d`)
    pub entity_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    pub fn create<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Create,
            entity_type,
            entity_id: entity_id.into(),
            entity_name,
            before: None,
            after: serde_json::to_value(entity).ok(),
            diff_summary: None,
        }
    }

    /// An update entry; the diff summary is derived from the two values
    pub fn update<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Self {
        let before = serde_json::to_value(before).ok();
        let after = serde_json::to_value(after).ok();
        let diff_summary = match (&before, &after) {
            (Some(b), Some(a)) => diff_values(b, a),
            _ => None,
        };

        Self {
            timestamp: Utc::now(),
            operation: Operation::Update,
            entity_type,
            entity_id: entity_id.into(),
            entity_name,
            before,
            after,
            diff_summary,
        }
    }

    pub fn delete<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Delete,
            entity_type,
            entity_id: entity_id.into(),
            entity_name,
            before: serde_json::to_value(entity).ok(),
            after: None,
            diff_summary: None,
        }
    }

    /// Describe `command` as it applies to `before`, the state it was
    /// reduced from. Returns `None` when the command targets nothing in it.
    pub fn for_command(before: &FinanceState, command: &Command) -> Option<Self> {
        match command {
            Command::Add(record) => {
                let key = record.key();
                Some(Self::create(
                    key.entity_type(),
                    key.id_string(),
                    record.label(),
                    record,
                ))
            }
            Command::Update(record) => {
                let key = record.key();
                let previous: Record = before.get(key)?;
                Some(Self::update(
                    key.entity_type(),
                    key.id_string(),
                    record.label(),
                    &previous,
                    record,
                ))
            }
            Command::Delete(key) => {
                let previous = before.get(*key)?;
                Some(Self::delete(
                    key.entity_type(),
                    key.id_string(),
                    previous.label(),
                    &previous,
                ))
            }
        }
    }

    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if let Some(name) = &self.entity_name {
            output.push_str(&format!(" ({})", name));
        }

        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}
