//! Configuration module for fintrack
//!
//! - Path resolution for the settings file, record set and audit log
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::FinancePaths;
pub use settings::Settings;
