//! Savings goal CLI commands

use clap::Subcommand;

use crate::error::FinanceResult;
use crate::models::{GoalContribution, GoalMilestone, SavingsGoal};
use crate::reports::{format_goal_progress, GoalProgress};
use crate::state::{Command, Record, RecordKey};
use crate::storage::Storage;

use super::{parse_date, parse_money, print_json, today};

/// Goal subcommands
#[derive(Subcommand)]
pub enum GoalCommands {
    /// Create a savings goal
    Create {
        /// Goal name
        name: String,
        /// Target amount
        target: String,
        /// Deadline (YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<String>,
    },

    /// Show progress of every goal
    Progress {
        /// Count contributions up to this day (default: today)
        #[arg(long)]
        as_of: Option<String>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Add a milestone to a goal
    Milestone {
        /// Goal name or ID
        goal: String,
        /// Milestone name
        name: String,
        /// Amount at which the milestone is reached
        amount: String,
    },

    /// Record a contribution towards a goal
    Contribute {
        /// Goal name or ID
        goal: String,
        /// Amount contributed
        amount: String,
        /// Contribution date (default: today)
        #[arg(short, long)]
        date: Option<String>,
        /// Free-form note
        #[arg(short, long)]
        note: Option<String>,
    },

    /// Delete a goal with its milestones and contributions
    Delete {
        /// Goal name or ID
        goal: String,
    },
}

/// Handle a goal command
pub fn handle_goal_command(storage: &Storage, cmd: GoalCommands) -> FinanceResult<()> {
    match cmd {
        GoalCommands::Create {
            name,
            target,
            deadline,
        } => {
            let mut goal = SavingsGoal::new(name.trim(), parse_money(&target)?);
            if let Some(deadline) = deadline {
                goal = goal.with_deadline(parse_date(&deadline)?);
            }

            storage.apply(Command::Add(Record::SavingsGoal(goal.clone())))?;
            println!("Created goal: {} ({})", goal.name, goal.id);
            println!("  Target: {}", goal.target_amount);
            if let Some(deadline) = goal.deadline {
                println!("  Deadline: {}", deadline);
            }
        }

        GoalCommands::Progress { as_of, json } => {
            let as_of = match as_of {
                Some(d) => parse_date(&d)?,
                None => today(),
            };
            let state = storage.load()?;
            let progress = GoalProgress::evaluate(&state, as_of);

            if json {
                print_json(&progress)?;
            } else {
                print!("{}", format_goal_progress(&progress));
            }
        }

        GoalCommands::Milestone { goal, name, amount } => {
            let state = storage.load()?;
            let goal = state.resolve_goal(&goal)?;
            let milestone = GoalMilestone::new(goal.id, name.trim(), parse_money(&amount)?);

            storage.apply(Command::Add(Record::GoalMilestone(milestone.clone())))?;
            println!(
                "Added milestone '{}' at {} to {}",
                milestone.name, milestone.amount, goal.name
            );
        }

        GoalCommands::Contribute {
            goal,
            amount,
            date,
            note,
        } => {
            let state = storage.load()?;
            let goal = state.resolve_goal(&goal)?;
            let date = match date {
                Some(d) => parse_date(&d)?,
                None => today(),
            };
            let mut contribution = GoalContribution::new(goal.id, parse_money(&amount)?, date);
            contribution.note = note.unwrap_or_default();

            let state = storage.apply(Command::Add(Record::GoalContribution(contribution.clone())))?;
            let progress = GoalProgress::evaluate(&state, date)
                .into_iter()
                .find(|p| p.goal_id == goal.id);

            println!("Contributed {} to {} on {}", contribution.amount, goal.name, date);
            if let Some(progress) = progress {
                println!(
                    "  Saved {} of {} ({:.1}%)",
                    progress.saved, progress.target, progress.percent_complete
                );
            }
        }

        GoalCommands::Delete { goal } => {
            let state = storage.load()?;
            let goal = state.resolve_goal(&goal)?;
            let milestones = state.milestones_for(goal.id).count();
            let contributions = state.contributions_for(goal.id).count();

            storage.apply(Command::Delete(RecordKey::SavingsGoal(goal.id)))?;
            println!(
                "Deleted goal: {} ({} milestone(s), {} contribution(s))",
                goal.name, milestones, contributions
            );
        }
    }

    Ok(())
}
