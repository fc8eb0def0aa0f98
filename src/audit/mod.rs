//! Audit log of applied commands
//!
//! Every command the CLI reduces successfully is recorded as one JSON line
//! with the entity before and after the change.
//!
//! - `AuditEntry`: one logged operation, built from a command with
//!   [`AuditEntry::for_command`]
//! - `AuditLogger`: appends entries to and reads them from the log file
//! - `diff_values`: the one-line change summary stored on updates

mod diff;
mod entry;
mod logger;

pub use diff::diff_values;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
