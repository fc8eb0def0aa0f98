//! Storage layer for fintrack
//!
//! The whole record set lives in one JSON file written atomically. Changes go
//! through [`Storage::apply`], which reduces a command against the current
//! snapshot, persists the result and appends to the audit log.

pub mod file_io;
pub mod init;

pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;

use crate::audit::AuditLogger;
use crate::config::paths::FinancePaths;
use crate::error::FinanceError;
use crate::state::{reduce, Command, FinanceState};

/// Owns the on-disk record set and its audit log
pub struct Storage {
    paths: FinancePaths,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance, creating directories as needed
    pub fn new(paths: FinancePaths) -> Result<Self, FinanceError> {
        paths.ensure_directories()?;

        Ok(Self {
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    pub fn paths(&self) -> &FinancePaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load the record set; a missing file is an empty set
    pub fn load(&self) -> Result<FinanceState, FinanceError> {
        let state: FinanceState = read_json(self.paths.finance_file())?;
        tracing::debug!(
            categories = state.categories.len(),
            incomes = state.recurring_incomes.len() + state.one_time_incomes.len(),
            expenses = state.recurring_expenses.len() + state.one_time_expenses.len(),
            "record set loaded"
        );
        Ok(state)
    }

    /// Replace the record set on disk
    pub fn save(&self, state: &FinanceState) -> Result<(), FinanceError> {
        write_json_atomic(self.paths.finance_file(), state)
    }

    /// Load, reduce, save and audit one command. Returns the new snapshot.
    pub fn apply(&self, command: Command) -> Result<FinanceState, FinanceError> {
        let before = self.load()?;
        let after = reduce(&before, command.clone()).map_err(|e| {
            tracing::warn!(error = %e, "command rejected");
            e
        })?;
        self.save(&after)?;

        self.audit.record(&before, &command)?;
        Ok(after)
    }

    /// Check if fintrack has been initialized (settings file exists)
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Money, OneTimeEntry};
    use crate::state::{Record, RecordKey};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn storage() -> (Storage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinancePaths::with_base_dir(temp_dir.path().to_path_buf());
        (Storage::new(paths).unwrap(), temp_dir)
    }

    #[test]
    fn test_storage_creation() {
        let (storage, temp_dir) = storage();

        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.is_initialized());
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn test_apply_persists_and_audits() {
        let (storage, _temp) = storage();
        let category = Category::new("Dining");
        let cat_id = category.id;

        storage.apply(Command::Add(Record::Category(category))).unwrap();
        let lunch = OneTimeEntry::expense(
            "Lunch",
            Money::from_cents(1450),
            NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            cat_id,
        );
        storage.apply(Command::Add(Record::OneTimeExpense(lunch))).unwrap();

        let reloaded = storage.load().unwrap();
        assert_eq!(reloaded.categories.len(), 1);
        assert_eq!(reloaded.one_time_expenses.len(), 1);
        assert_eq!(storage.audit().read_all().unwrap().len(), 2);
        assert!(storage.paths().finance_file().exists());
    }

    #[test]
    fn test_rejected_command_changes_nothing() {
        let (storage, _temp) = storage();
        let category = Category::new("Rent");
        let cat_id = category.id;
        storage.apply(Command::Add(Record::Category(category))).unwrap();

        storage.apply(Command::Delete(RecordKey::Category(cat_id))).unwrap();
        let err = storage
            .apply(Command::Delete(RecordKey::Category(cat_id)))
            .unwrap_err();
        assert!(err.is_not_found());

        assert!(storage.load().unwrap().categories.is_empty());
        assert_eq!(storage.audit().read_all().unwrap().len(), 2);
    }
}
