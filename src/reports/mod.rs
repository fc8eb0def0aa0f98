//! Reports built on the recurrence projector
//!
//! - `PeriodSummary`: income, expenses, net and the per-category breakdown
//! - `BudgetStatus`: category budgets against projected spending, with alerts
//! - `GoalProgress`: savings goal progress as of a date

pub mod budget;
pub mod goals;
pub mod summary;

pub use budget::{BudgetLine, BudgetStatus, TriggeredAlert};
pub use goals::{format_goal_progress, GoalProgress, MilestoneMark};
pub use summary::{CategoryLine, PeriodSummary};
