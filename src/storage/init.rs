//! First-run setup
//!
//! Creates the settings file and seeds one category per entry of the keyword
//! table, so receipt suggestions have somewhere to land.

use crate::config::paths::FinancePaths;
use crate::config::settings::Settings;
use crate::error::FinanceError;
use crate::models::Category;
use crate::services::categorize::KeywordMap;
use crate::state::FinanceState;

use super::file_io::{read_json, write_json_atomic};

/// Colors cycled through for seeded categories
const SEED_COLORS: &[&str] = &[
    "#4CAF50", "#FF9800", "#2196F3", "#E91E63", "#9C27B0", "#00BCD4", "#FFC107",
];

/// Initialize storage for a fresh installation.
///
/// Existing settings and records are left alone; returns whether anything
/// was created.
pub fn initialize_storage(paths: &FinancePaths) -> Result<bool, FinanceError> {
    paths.ensure_directories()?;
    let mut created = false;

    let settings = Settings::load_or_create(paths)?;
    if !paths.is_initialized() {
        settings.save(paths)?;
        created = true;
    }

    if !paths.finance_file().exists() {
        let state = seed_state(&KeywordMap::from_settings(&settings));
        write_json_atomic(paths.finance_file(), &state)?;
        tracing::info!(categories = state.categories.len(), "seeded record set");
        created = true;
    }

    Ok(created)
}

fn seed_state(keywords: &KeywordMap) -> FinanceState {
    let categories = keywords
        .categories()
        .zip(SEED_COLORS.iter().cycle())
        .map(|(name, color)| Category::with_color(name, *color))
        .collect();

    FinanceState {
        categories,
        ..FinanceState::default()
    }
}

/// Whether the record file exists and parses
pub fn is_valid(paths: &FinancePaths) -> bool {
    paths.finance_file().exists() && read_json::<FinanceState, _>(paths.finance_file()).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_seeds_categories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinancePaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(initialize_storage(&paths).unwrap());
        assert!(paths.is_initialized());
        assert!(is_valid(&paths));

        let state: FinanceState = read_json(paths.finance_file()).unwrap();
        let names: Vec<_> = state.categories.iter().map(|c| c.name.as_str()).collect();
        assert!(names.contains(&"Groceries"));
        assert!(state.categories.iter().all(|c| c.validate().is_ok()));
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinancePaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(initialize_storage(&paths).unwrap());
        let first: FinanceState = read_json(paths.finance_file()).unwrap();

        assert!(!initialize_storage(&paths).unwrap());
        let second: FinanceState = read_json(paths.finance_file()).unwrap();
        assert_eq!(first, second);
    }
}
