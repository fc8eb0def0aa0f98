//! Income and expense CLI commands
//!
//! Entries are recurring when `--every` is given and one-time otherwise.

use clap::Subcommand;

use crate::display::entry::{format_entry_list, format_occurrences, format_one_time, format_recurring};
use crate::error::{FinanceError, FinanceResult};
use crate::models::{Flow, OneTimeEntry, Recurrence, RecurringEntry};
use crate::services::projection::LedgerItem;
use crate::state::{Command, FinanceState, Record};
use crate::config::settings::Settings;
use crate::storage::Storage;

use super::{parse_date, parse_money, print_json, today, RangeArgs};

/// Entry subcommands
#[derive(Subcommand)]
pub enum EntryCommands {
    /// Add an income or expense
    Add {
        /// Entry name
        name: String,
        /// Amount (e.g., "49.99")
        amount: String,
        /// Record as income instead of expense
        #[arg(long)]
        income: bool,
        /// Category name or ID (required for expenses)
        #[arg(short, long)]
        category: Option<String>,
        /// Repeat weekly, monthly or yearly; omit for a one-time entry
        #[arg(short, long)]
        every: Option<Recurrence>,
        /// Date of a one-time entry, or first date of a recurring one (default: today)
        #[arg(short, long)]
        date: Option<String>,
        /// Last date of a recurring entry (inclusive)
        #[arg(long)]
        until: Option<String>,
    },

    /// List entries
    List {
        /// Only incomes
        #[arg(long, conflicts_with = "expenses")]
        incomes: bool,
        /// Only expenses
        #[arg(long)]
        expenses: bool,
    },

    /// Edit an entry
    Edit {
        /// Entry name or ID
        entry: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        amount: Option<String>,
        /// New category (expenses only)
        #[arg(short, long)]
        category: Option<String>,
        /// New end date (recurring only)
        #[arg(long, conflicts_with = "clear_until")]
        until: Option<String>,
        /// Remove the end date (recurring only)
        #[arg(long)]
        clear_until: bool,
    },

    /// Delete an entry
    Delete {
        /// Entry name or ID
        entry: String,
    },

    /// List the dates an entry occurs on inside a window
    Occurrences {
        /// Entry name or ID
        entry: String,
        #[command(flatten)]
        range: RangeArgs,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

/// Handle an entry command
pub fn handle_entry_command(
    storage: &Storage,
    settings: &Settings,
    cmd: EntryCommands,
) -> FinanceResult<()> {
    match cmd {
        EntryCommands::Add {
            name,
            amount,
            income,
            category,
            every,
            date,
            until,
        } => {
            let state = storage.load()?;
            let amount = parse_money(&amount)?;
            let date = match date {
                Some(d) => parse_date(&d)?,
                None => today(),
            };
            let category_id = match (&category, income) {
                (Some(_), true) => {
                    return Err(FinanceError::Validation(
                        "Incomes do not take a category".into(),
                    ))
                }
                (Some(c), false) => Some(state.resolve_category(c)?.id),
                (None, _) => None,
            };

            let record = match every {
                Some(recurrence) => {
                    let mut entry = RecurringEntry::income(name.trim(), amount, recurrence, date);
                    entry.category_id = category_id;
                    if let Some(until) = until {
                        entry.end_date = Some(parse_date(&until)?);
                    }
                    if income {
                        Record::RecurringIncome(entry)
                    } else {
                        Record::RecurringExpense(entry)
                    }
                }
                None => {
                    if until.is_some() {
                        return Err(FinanceError::Validation(
                            "--until only applies to recurring entries (use --every)".into(),
                        ));
                    }
                    let mut entry = OneTimeEntry::income(name.trim(), amount, date);
                    entry.category_id = category_id;
                    if income {
                        Record::OneTimeIncome(entry)
                    } else {
                        Record::OneTimeExpense(entry)
                    }
                }
            };

            let state = storage.apply(Command::Add(record.clone()))?;
            println!("Added {}", describe(&state, &record));
        }

        EntryCommands::List { incomes, expenses } => {
            let state = storage.load()?;
            let flow = match (incomes, expenses) {
                (true, _) => Some(Flow::Income),
                (_, true) => Some(Flow::Expense),
                _ => None,
            };
            print!("{}", format_entry_list(&state, flow));
        }

        EntryCommands::Edit {
            entry,
            name,
            amount,
            category,
            until,
            clear_until,
        } => {
            if name.is_none() && amount.is_none() && category.is_none() && until.is_none() && !clear_until {
                println!("No changes specified. Use --name, --amount, --category, --until or --clear-until.");
                return Ok(());
            }

            let state = storage.load()?;
            let key = state.resolve_entry(&entry)?;
            let mut record = state
                .get(key)
                .ok_or_else(|| FinanceError::entry_not_found(&entry))?;

            let amount = amount.map(|a| parse_money(&a)).transpose()?;
            let category_id = category
                .map(|c| state.resolve_category(&c).map(|c| c.id))
                .transpose()?;
            let end_date = until.map(|u| parse_date(&u)).transpose()?;

            match &mut record {
                Record::RecurringIncome(e) | Record::RecurringExpense(e) => {
                    apply_common(&mut e.name, &mut e.amount, &name, amount);
                    if clear_until {
                        e.end_date = None;
                    } else if end_date.is_some() {
                        e.end_date = end_date;
                    }
                }
                Record::OneTimeIncome(e) | Record::OneTimeExpense(e) => {
                    if end_date.is_some() || clear_until {
                        return Err(FinanceError::Validation(
                            "One-time entries have no end date".into(),
                        ));
                    }
                    apply_common(&mut e.name, &mut e.amount, &name, amount);
                }
                _ => return Err(FinanceError::entry_not_found(&entry)),
            }

            if let Some(category_id) = category_id {
                match &mut record {
                    Record::RecurringExpense(e) => e.category_id = Some(category_id),
                    Record::OneTimeExpense(e) => e.category_id = Some(category_id),
                    _ => {
                        return Err(FinanceError::Validation(
                            "Incomes do not take a category".into(),
                        ))
                    }
                }
            }

            let state = storage.apply(Command::Update(record.clone()))?;
            println!("Updated {}", describe(&state, &record));
        }

        EntryCommands::Delete { entry } => {
            let state = storage.load()?;
            let key = state.resolve_entry(&entry)?;
            let label = state
                .get(key)
                .and_then(|r| r.label())
                .unwrap_or_else(|| key.id_string());

            storage.apply(Command::Delete(key))?;
            println!("Deleted {}: {}", key.entity_type(), label);
        }

        EntryCommands::Occurrences { entry, range, json } => {
            let range = range.resolve(settings)?;
            let state = storage.load()?;
            let key = state.resolve_entry(&entry)?;
            let record = state
                .get(key)
                .ok_or_else(|| FinanceError::entry_not_found(&entry))?;

            let item = match &record {
                Record::RecurringIncome(e) | Record::RecurringExpense(e) => LedgerItem::from(e),
                Record::OneTimeIncome(e) | Record::OneTimeExpense(e) => LedgerItem::from(e),
                _ => return Err(FinanceError::entry_not_found(&entry)),
            };
            let occurrences = item.occurrences(&range);

            if json {
                print_json(&occurrences)?;
            } else {
                print!("{}", format_occurrences(item.name(), &occurrences));
            }
        }
    }

    Ok(())
}

fn apply_common(
    name_slot: &mut String,
    amount_slot: &mut crate::models::Money,
    name: &Option<String>,
    amount: Option<crate::models::Money>,
) {
    if let Some(name) = name {
        *name_slot = name.trim().to_string();
    }
    if let Some(amount) = amount {
        *amount_slot = amount;
    }
}

fn describe(state: &FinanceState, record: &Record) -> String {
    match record {
        Record::RecurringIncome(e) => format!("recurring income {}", format_recurring(state, e)),
        Record::RecurringExpense(e) => format!("recurring expense {}", format_recurring(state, e)),
        Record::OneTimeIncome(e) => format!("income {}", format_one_time(state, e)),
        Record::OneTimeExpense(e) => format!("expense {}", format_one_time(state, e)),
        other => other.key().id_string(),
    }
}
