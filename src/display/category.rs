//! Category display formatting

use crate::models::Category;
use crate::state::FinanceState;

/// Format categories as a table with their usage counts
pub fn format_category_list(state: &FinanceState) -> String {
    if state.categories.is_empty() {
        return "No categories found.\n\nRun 'fintrack init' to create default categories.\n"
            .to_string();
    }

    let name_width = state
        .categories
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = format!(
        "{:<width$}  {:<8}  {:<12}  {}\n",
        "Name",
        "Color",
        "ID",
        "Used by",
        width = name_width
    );
    output.push_str(&format!("{}\n", "-".repeat(name_width + 36)));

    for category in &state.categories {
        output.push_str(&format!(
            "{:<width$}  {:<8}  {:<12}  {}\n",
            category.name,
            category.color,
            category.id,
            state.category_references(category.id),
            width = name_width
        ));
    }

    output
}

/// One-line confirmation after a category change
pub fn format_category_line(category: &Category) -> String {
    format!("{} {} ({})", category.name, category.color, category.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryBudget, Money};

    #[test]
    fn test_empty_list_hints_init() {
        let output = format_category_list(&FinanceState::default());
        assert!(output.contains("fintrack init"));
    }

    #[test]
    fn test_list_shows_usage() {
        let rent = Category::with_color("Rent", "#112233");
        let budget = CategoryBudget::monthly(rent.id, Money::from_cents(100000));
        let state = FinanceState {
            categories: vec![rent],
            category_budgets: vec![budget],
            ..FinanceState::default()
        };

        let output = format_category_list(&state);
        let row = output.lines().nth(2).unwrap();
        assert!(row.starts_with("Rent"));
        assert!(row.contains("#112233"));
        assert!(row.trim_end().ends_with('1'));
    }
}
