//! Income/expense and occurrence formatting

use crate::models::{Flow, OneTimeEntry, RecurringEntry};
use crate::services::projection::Occurrence;
use crate::state::FinanceState;

/// Format every entry, recurring first, grouped by flow
pub fn format_entry_list(state: &FinanceState, flow: Option<Flow>) -> String {
    let mut output = String::new();

    for current in [Flow::Income, Flow::Expense] {
        if flow.is_some_and(|f| f != current) {
            continue;
        }
        let (recurring, one_time) = match current {
            Flow::Income => (&state.recurring_incomes, &state.one_time_incomes),
            Flow::Expense => (&state.recurring_expenses, &state.one_time_expenses),
        };

        output.push_str(&format!("{}\n", current));
        if recurring.is_empty() && one_time.is_empty() {
            output.push_str("  (none)\n");
        }
        for entry in recurring {
            output.push_str(&format!("  {}\n", format_recurring(state, entry)));
        }
        for entry in one_time {
            output.push_str(&format!("  {}\n", format_one_time(state, entry)));
        }
        output.push('\n');
    }

    output
}

fn category_suffix(state: &FinanceState, entry_category: Option<crate::models::CategoryId>) -> String {
    match entry_category {
        Some(id) => match state.category(id) {
            Some(category) => format!(" [{}]", category.name),
            None => format!(" [missing {}]", id),
        },
        None => String::new(),
    }
}

pub fn format_recurring(state: &FinanceState, entry: &RecurringEntry) -> String {
    let until = entry
        .end_date
        .map(|d| format!(" until {}", d))
        .unwrap_or_default();
    format!(
        "{}  {:<24} {:>12}  {} from {}{}{}",
        entry.id,
        entry.name,
        entry.amount,
        entry.recurrence,
        entry.start_date,
        until,
        category_suffix(state, entry.category_id)
    )
}

pub fn format_one_time(state: &FinanceState, entry: &OneTimeEntry) -> String {
    format!(
        "{}  {:<24} {:>12}  on {}{}",
        entry.id,
        entry.name,
        entry.amount,
        entry.date,
        category_suffix(state, entry.category_id)
    )
}

/// Format projected occurrences with a closing total
pub fn format_occurrences(name: &str, occurrences: &[Occurrence]) -> String {
    if occurrences.is_empty() {
        return format!("{}: no occurrences in range\n", name);
    }

    let mut output = format!("{}\n", name);
    for occurrence in occurrences {
        output.push_str(&format!(
            "  {}  {:>12}\n",
            occurrence.date.format("%a %Y-%m-%d"),
            occurrence.amount
        ));
    }
    let total: crate::models::Money = occurrences.iter().map(|o| o.amount).sum();
    output.push_str(&format!(
        "  {:<14}  {:>12}\n",
        format!("{} total", occurrences.len()),
        total
    ));
    output
}
