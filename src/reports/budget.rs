//! Category budget status
//!
//! Compares projected spending in each budgeted category with its limit over
//! a date window and evaluates the category's alerts.

use serde::Serialize;

use crate::models::{AlertId, BudgetId, CategoryId, DateRange, Money, Recurrence};
use crate::services::projection::totals_by_category;
use crate::state::FinanceState;

/// An alert whose threshold has been reached
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggeredAlert {
    pub alert_id: AlertId,
    pub threshold_percent: u16,
}

/// Status of one category budget
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetLine {
    pub budget_id: BudgetId,
    pub category_id: CategoryId,
    pub category_name: String,
    pub cadence: Recurrence,
    /// Cadence periods the window touches
    pub periods: i64,
    /// Budget amount scaled by `periods`
    pub limit: Money,
    pub spent: Money,
    /// Negative when over budget
    pub remaining: Money,
    /// `None` when the limit is zero
    pub percent_used: Option<f64>,
    pub triggered: Vec<TriggeredAlert>,
}

impl BudgetLine {
    pub fn is_over_budget(&self) -> bool {
        self.spent > self.limit
    }
}

/// Budget status for every category budget over one window
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatus {
    pub range: DateRange,
    pub lines: Vec<BudgetLine>,
}

impl BudgetStatus {
    pub fn evaluate(state: &FinanceState, range: DateRange) -> Self {
        let spending = totals_by_category(state.expenses(), &state.categories, &range);

        let lines = state
            .category_budgets
            .iter()
            .map(|budget| {
                let periods = budget.cadence.periods_in(&range);
                let limit = budget.amount.times(periods);
                let spent = spending.get(budget.category_id);
                let percent_used = spent.percent_of(limit);

                // A zero limit is exceeded by any spending at all
                let effective_percent = percent_used.unwrap_or(if spent.is_positive() {
                    f64::INFINITY
                } else {
                    0.0
                });
                let triggered = state
                    .budget_alerts
                    .iter()
                    .filter(|alert| alert.category_id == budget.category_id)
                    .filter(|alert| alert.is_triggered(effective_percent))
                    .map(|alert| TriggeredAlert {
                        alert_id: alert.id,
                        threshold_percent: alert.threshold_percent,
                    })
                    .collect::<Vec<_>>();

                let category_name = state
                    .category(budget.category_id)
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| budget.category_id.to_string());

                if !triggered.is_empty() {
                    tracing::info!(
                        category = %category_name,
                        percent = effective_percent,
                        alerts = triggered.len(),
                        "budget alerts triggered"
                    );
                }

                BudgetLine {
                    budget_id: budget.id,
                    category_id: budget.category_id,
                    category_name,
                    cadence: budget.cadence,
                    periods,
                    limit,
                    spent,
                    remaining: limit - spent,
                    percent_used,
                    triggered,
                }
            })
            .collect();

        Self { range, lines }
    }

    /// Lines with at least one triggered alert
    pub fn alerts(&self) -> impl Iterator<Item = &BudgetLine> {
        self.lines.iter().filter(|line| !line.triggered.is_empty())
    }

    /// Format the status for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Budgets: {} to {}\n",
            self.range.start(),
            self.range.end()
        ));
        output.push_str(&"=".repeat(72));
        output.push('\n');

        if self.lines.is_empty() {
            output.push_str("No category budgets defined.\n");
            return output;
        }

        output.push_str(&format!(
            "{:<22} {:>12} {:>12} {:>12} {:>8}\n",
            "Category", "Limit", "Spent", "Remaining", "Used"
        ));
        output.push_str(&"-".repeat(72));
        output.push('\n');

        for line in &self.lines {
            let used = match line.percent_used {
                Some(p) => format!("{:.0}%", p),
                None => "-".to_string(),
            };
            let marker = if line.is_over_budget() { " OVER" } else { "" };
            output.push_str(&format!(
                "{:<22} {:>12} {:>12} {:>12} {:>8}{}\n",
                truncate(&line.category_name, 22),
                line.limit,
                line.spent,
                line.remaining,
                used,
                marker
            ));
        }

        let alerting: Vec<_> = self.alerts().collect();
        if !alerting.is_empty() {
            output.push_str("\nAlerts:\n");
            for line in alerting {
                let thresholds: Vec<String> = line
                    .triggered
                    .iter()
                    .map(|t| format!("{}%", t.threshold_percent))
                    .collect();
                output.push_str(&format!(
                    "  {} reached {}\n",
                    line.category_name,
                    thresholds.join(", ")
                ));
            }
        }

        output
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}
