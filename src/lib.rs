//! fintrack - personal finance tracking from the command line
//!
//! Recurring and one-time incomes and expenses, category budgets with
//! alerts, savings goals, and receipt field extraction from OCR text.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `models`: Plain records (categories, entries, budgets, goals) and values
//! - `state`: The record set and the pure `reduce` function that changes it
//! - `services`: Recurrence projection, receipt extraction, OCR, categorization
//! - `reports`: Period summaries, budget status and goal progress
//! - `storage`: JSON file persistence of the record set
//! - `audit`: Audit log of applied commands
//! - `config`: Paths and settings
//! - `cli` / `display`: Command handlers and terminal formatting
//!
//! # Example
//!
//! ```rust,ignore
//! use fintrack::config::{paths::FinancePaths, settings::Settings};
//! use fintrack::storage::Storage;
//!
//! let paths = FinancePaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::new(paths)?;
//! let state = storage.load()?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod reports;
pub mod services;
pub mod state;
pub mod storage;

pub use error::{FinanceError, FinanceResult};
