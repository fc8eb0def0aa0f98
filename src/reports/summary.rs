//! Period summary
//!
//! Income, expenses and the per-category breakdown for one date window.

use serde::Serialize;

use crate::models::{CategoryId, DateRange, Money};
use crate::services::projection::{total_within, totals_by_category, OrphanReference};
use crate::state::FinanceState;

/// Expense total for one category
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryLine {
    pub category_id: CategoryId,
    pub name: String,
    pub color: String,
    pub total: Money,
    /// Share of all categorized expenses
    pub percentage: f64,
}

/// Summary of one date window
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSummary {
    pub range: DateRange,
    pub income_total: Money,
    pub expense_total: Money,
    pub net: Money,
    /// Categories with spending, largest first
    pub by_category: Vec<CategoryLine>,
    pub orphans: Vec<OrphanReference>,
}

impl PeriodSummary {
    pub fn generate(state: &FinanceState, range: DateRange) -> Self {
        let income_total = total_within(state.incomes(), &range);
        let expense_total = total_within(state.expenses(), &range);
        let grouped = totals_by_category(state.expenses(), &state.categories, &range);
        let categorized = grouped.grand_total();

        let mut by_category: Vec<CategoryLine> = state
            .categories
            .iter()
            .filter_map(|category| {
                let total = grouped.get(category.id);
                if total.is_zero() {
                    return None;
                }
                Some(CategoryLine {
                    category_id: category.id,
                    name: category.name.clone(),
                    color: category.color.clone(),
                    total,
                    percentage: total.percent_of(categorized).unwrap_or(0.0),
                })
            })
            .collect();
        by_category.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));

        Self {
            range,
            income_total,
            expense_total,
            net: income_total - expense_total,
            by_category,
            orphans: grouped.orphans,
        }
    }

    /// Format the summary for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Summary: {} to {}\n",
            self.range.start(),
            self.range.end()
        ));
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!("{:<30} {:>14}\n", "Income", self.income_total));
        output.push_str(&format!("{:<30} {:>14}\n", "Expenses", self.expense_total));
        output.push_str(&format!("{:<30} {:>14}\n", "Net", self.net));

        if !self.by_category.is_empty() {
            output.push_str(&format!(
                "\n{:<30} {:>14} {:>7}\n",
                "Category", "Spent", "%"
            ));
            output.push_str(&"-".repeat(60));
            output.push('\n');
            for line in &self.by_category {
                output.push_str(&format!(
                    "{:<30} {:>14} {:>6.1}%\n",
                    line.name, line.total, line.percentage
                ));
            }
        }

        if !self.orphans.is_empty() {
            output.push_str("\nWarning: expenses referencing missing categories\n");
            for orphan in &self.orphans {
                output.push_str(&format!(
                    "  {} ({}) -> {}\n",
                    orphan.entry_name, orphan.entry_id, orphan.category_id
                ));
            }
        }

        output
    }
}
