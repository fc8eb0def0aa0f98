//! Core data models for fintrack
//!
//! Plain values describing the user's record set: categories, recurring and
//! one-time entries, budgets, goals, plus the derived types the projector and
//! receipt extractor produce.

pub mod budget;
pub mod category;
pub mod entry;
pub mod goal;
pub mod ids;
pub mod money;
pub mod range;
pub mod receipt;
pub mod recurrence;

pub use budget::{BudgetAlert, CategoryBudget};
pub use category::Category;
pub use entry::{Flow, OneTimeEntry, RecurringEntry};
pub use goal::{GoalContribution, GoalMilestone, SavingsGoal};
pub use ids::{AlertId, BudgetId, CategoryId, ContributionId, EntryId, GoalId, MilestoneId};
pub use money::Money;
pub use range::DateRange;
pub use receipt::{Currency, ReceiptFields};
pub use recurrence::Recurrence;
