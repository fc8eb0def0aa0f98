//! Savings goal progress

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{GoalId, Money, SavingsGoal};
use crate::state::FinanceState;

/// A milestone as seen from a progress report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MilestoneMark {
    pub name: String,
    pub amount: Money,
}

/// Progress of one goal as of a given day
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub goal_id: GoalId,
    pub name: String,
    pub target: Money,
    /// Contributions dated on or before `as_of`
    pub saved: Money,
    pub percent_complete: f64,
    pub reached: Vec<MilestoneMark>,
    pub next_milestone: Option<MilestoneMark>,
    /// Days until the deadline; negative once it has passed
    pub days_remaining: Option<i64>,
}

impl GoalProgress {
    /// Progress of every goal, in stored order
    pub fn evaluate(state: &FinanceState, as_of: NaiveDate) -> Vec<Self> {
        state
            .savings_goals
            .iter()
            .map(|goal| Self::for_goal(state, goal, as_of))
            .collect()
    }

    pub fn for_goal(state: &FinanceState, goal: &SavingsGoal, as_of: NaiveDate) -> Self {
        let saved: Money = state
            .contributions_for(goal.id)
            .filter(|c| c.date <= as_of)
            .map(|c| c.amount)
            .sum();

        let mut milestones: Vec<MilestoneMark> = state
            .milestones_for(goal.id)
            .map(|m| MilestoneMark {
                name: m.name.clone(),
                amount: m.amount,
            })
            .collect();
        milestones.sort_by(|a, b| a.amount.cmp(&b.amount).then_with(|| a.name.cmp(&b.name)));

        let split = milestones.partition_point(|m| m.amount <= saved);
        let next_milestone = milestones.get(split).cloned();
        milestones.truncate(split);

        Self {
            goal_id: goal.id,
            name: goal.name.clone(),
            target: goal.target_amount,
            saved,
            percent_complete: saved.percent_of(goal.target_amount).unwrap_or(0.0),
            reached: milestones,
            next_milestone,
            days_remaining: goal.deadline.map(|d| (d - as_of).num_days()),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.saved >= self.target
    }

    pub fn remaining(&self) -> Money {
        if self.is_complete() {
            Money::zero()
        } else {
            self.target - self.saved
        }
    }
}

/// Render goal progress for the terminal
pub fn format_goal_progress(goals: &[GoalProgress]) -> String {
    if goals.is_empty() {
        return "No savings goals.\n".to_string();
    }

    let mut output = String::new();
    for goal in goals {
        let filled = (goal.percent_complete.clamp(0.0, 100.0) / 5.0).round() as usize;
        output.push_str(&format!(
            "{} ({})\n  [{}{}] {:.1}%  {} of {}\n",
            goal.name,
            goal.goal_id,
            "#".repeat(filled),
            ".".repeat(20 - filled),
            goal.percent_complete,
            goal.saved,
            goal.target
        ));

        if let Some(days) = goal.days_remaining {
            if goal.is_complete() {
                output.push_str("  Completed\n");
            } else if days < 0 {
                output.push_str(&format!("  Deadline passed {} day(s) ago\n", -days));
            } else {
                output.push_str(&format!(
                    "  {} day(s) left, {} to go\n",
                    days,
                    goal.remaining()
                ));
            }
        }
        if let Some(next) = &goal.next_milestone {
            output.push_str(&format!("  Next milestone: {} at {}\n", next.name, next.amount));
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GoalContribution, GoalMilestone};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn holiday_state() -> FinanceState {
        let goal = SavingsGoal::new("Holiday", Money::from_cents(200000)).with_deadline(date(2024, 7, 1));
        let id = goal.id;
        FinanceState {
            goal_milestones: vec![
                GoalMilestone::new(id, "Flights", Money::from_cents(60000)),
                GoalMilestone::new(id, "Hotel", Money::from_cents(150000)),
                GoalMilestone::new(id, "Deposit", Money::from_cents(20000)),
            ],
            goal_contributions: vec![
                GoalContribution::new(id, Money::from_cents(50000), date(2024, 1, 31)),
                GoalContribution::new(id, Money::from_cents(30000), date(2024, 2, 29)),
                GoalContribution::new(id, Money::from_cents(40000), date(2024, 3, 31)),
            ],
            savings_goals: vec![goal],
            ..FinanceState::default()
        }
    }

    #[test]
    fn test_progress_as_of() {
        let state = holiday_state();
        let progress = GoalProgress::evaluate(&state, date(2024, 3, 1));
        let goal = &progress[0];

        assert_eq!(goal.saved, Money::from_cents(80000));
        assert!((goal.percent_complete - 40.0).abs() < 1e-9);
        let reached: Vec<_> = goal.reached.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(reached, vec!["Deposit", "Flights"]);
        assert_eq!(goal.next_milestone.as_ref().map(|m| m.name.as_str()), Some("Hotel"));
        assert_eq!(goal.days_remaining, Some(122));
        assert_eq!(goal.remaining(), Money::from_cents(120000));
    }

    #[test]
    fn test_overdue_and_complete() {
        let mut state = holiday_state();
        let id = state.savings_goals[0].id;
        state
            .goal_contributions
            .push(GoalContribution::new(id, Money::from_cents(90000), date(2024, 6, 1)));

        let goal = &GoalProgress::evaluate(&state, date(2024, 8, 1))[0];
        assert!(goal.is_complete());
        assert_eq!(goal.days_remaining, Some(-31));
        assert!(goal.next_milestone.is_none());
        assert!(format_goal_progress(&[goal.clone()]).contains("Completed"));
    }

    #[test]
    fn test_no_goals() {
        assert!(GoalProgress::evaluate(&FinanceState::default(), date(2024, 1, 1)).is_empty());
        assert_eq!(format_goal_progress(&[]), "No savings goals.\n");
    }
}
