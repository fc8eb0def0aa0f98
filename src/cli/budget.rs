//! Budget CLI commands
//!
//! Category budgets, their alerts, and the budget status report.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::error::{FinanceError, FinanceResult};
use crate::models::{BudgetAlert, CategoryBudget, Recurrence};
use crate::reports::BudgetStatus;
use crate::state::{Command, Record, RecordKey};
use crate::storage::Storage;

use super::{parse_money, print_json, RangeArgs};

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Set (or replace) the budget for a category
    Set {
        /// Category name or ID
        category: String,
        /// Limit per period (e.g., "300" or "300.00")
        amount: String,
        /// Budget period: weekly, monthly or yearly
        #[arg(long, default_value = "monthly")]
        cadence: Recurrence,
    },

    /// Remove a category's budget
    Remove {
        /// Category name or ID
        category: String,
    },

    /// Add an alert that fires at a percentage of the budget
    Alert {
        /// Category name or ID
        category: String,
        /// Threshold in percent (e.g., 80)
        threshold: u16,
    },

    /// Delete an alert
    #[command(name = "remove-alert")]
    RemoveAlert {
        /// Alert ID
        alert: String,
    },

    /// Show spending against budgets
    Status {
        #[command(flatten)]
        range: RangeArgs,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BudgetCommands,
) -> FinanceResult<()> {
    match cmd {
        BudgetCommands::Set {
            category,
            amount,
            cadence,
        } => {
            let state = storage.load()?;
            let category = state.resolve_category(&category)?.clone();
            let amount = parse_money(&amount)?;

            let existing = state
                .category_budgets
                .iter()
                .find(|b| b.category_id == category.id);
            let command = match existing {
                Some(budget) => Command::Update(Record::CategoryBudget(CategoryBudget {
                    amount,
                    cadence,
                    ..budget.clone()
                })),
                None => Command::Add(Record::CategoryBudget(CategoryBudget::new(
                    category.id,
                    amount,
                    cadence,
                ))),
            };

            storage.apply(command)?;
            println!(
                "Budget for {}: {} ({})",
                category.name,
                amount,
                cadence.description()
            );
        }

        BudgetCommands::Remove { category } => {
            let state = storage.load()?;
            let category = state.resolve_category(&category)?;
            let budget = state
                .category_budgets
                .iter()
                .find(|b| b.category_id == category.id)
                .ok_or_else(|| FinanceError::NotFound {
                    entity_type: "Category budget",
                    identifier: category.name.clone(),
                })?;

            storage.apply(Command::Delete(RecordKey::CategoryBudget(budget.id)))?;
            println!("Removed budget for {}", category.name);
        }

        BudgetCommands::Alert {
            category,
            threshold,
        } => {
            let state = storage.load()?;
            let category = state.resolve_category(&category)?;
            let alert = BudgetAlert::new(category.id, threshold);

            storage.apply(Command::Add(Record::BudgetAlert(alert.clone())))?;
            println!(
                "Alert {} for {} at {}%",
                alert.id, category.name, alert.threshold_percent
            );
        }

        BudgetCommands::RemoveAlert { alert } => {
            let state = storage.load()?;
            let target = state
                .budget_alerts
                .iter()
                .find(|a| a.id.matches_short(&alert))
                .ok_or_else(|| FinanceError::NotFound {
                    entity_type: "Budget alert",
                    identifier: alert.clone(),
                })?;

            storage.apply(Command::Delete(RecordKey::BudgetAlert(target.id)))?;
            println!("Removed alert {}", target.id);
        }

        BudgetCommands::Status { range, json } => {
            let range = range.resolve(settings)?;
            let state = storage.load()?;
            let status = BudgetStatus::evaluate(&state, range);

            if json {
                print_json(&status)?;
            } else {
                print!("{}", status.format_terminal());
            }
        }
    }

    Ok(())
}
