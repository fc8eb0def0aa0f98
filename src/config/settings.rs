//! User settings for fintrack
//!
//! Display preferences, the receipt currency fallback, an optional override
//! of the categorization keyword table and the OCR command.

use std::collections::BTreeMap;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::paths::FinancePaths;
use crate::error::FinanceError;
use crate::models::Currency;

/// User settings for fintrack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency assumed when a receipt names none
    #[serde(default)]
    pub default_currency: Currency,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// First day of the week, used by `--week` report windows
    #[serde(default = "default_week_start")]
    pub week_starts_on: Weekday,

    /// Replaces the built-in keyword table when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categorization_keywords: Option<BTreeMap<String, Vec<String>>>,

    /// Name or path of the tesseract binary
    #[serde(default = "default_ocr_command")]
    pub ocr_command: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_week_start() -> Weekday {
    Weekday::Mon
}

fn default_ocr_command() -> String {
    "tesseract".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            default_currency: Currency::default(),
            date_format: default_date_format(),
            week_starts_on: default_week_start(),
            categorization_keywords: None,
            ocr_command: default_ocr_command(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &FinancePaths) -> Result<Self, FinanceError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                FinanceError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                FinanceError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Not persisted until the caller saves
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &FinancePaths) -> Result<(), FinanceError> {
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            FinanceError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(&settings_path, contents).map_err(|e| {
            FinanceError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }

    /// Format a date with the configured format
    pub fn format_date(&self, date: chrono::NaiveDate) -> String {
        date.format(&self.date_format).to_string()
    }
}
