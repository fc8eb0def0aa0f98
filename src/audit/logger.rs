//! Append-only audit log
//!
//! One JSON object per line. Entries are built from the applied command and
//! the snapshot it was applied to, so updates and deletes keep the record
//! they replaced.

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, Write};
use std::path::PathBuf;

use crate::error::{FinanceError, FinanceResult};
use crate::state::{Command, FinanceState};

use super::entry::AuditEntry;

/// The JSONL file applied commands are recorded in
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Record `command` as applied to `before`.
    ///
    /// Returns the entry written, or `None` when the command names a record
    /// absent from `before` and there is nothing to describe.
    pub fn record(
        &self,
        before: &FinanceState,
        command: &Command,
    ) -> FinanceResult<Option<AuditEntry>> {
        let Some(entry) = AuditEntry::for_command(before, command) else {
            tracing::debug!(?command, "command left no audit trail");
            return Ok(None);
        };

        let mut line = serde_json::to_vec(&entry)?;
        line.push(b'\n');
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?
            .write_all(&line)?;

        tracing::trace!(
            operation = %entry.operation,
            entity = %entry.entity_type,
            id = %entry.entity_id,
            "audit entry written"
        );
        Ok(Some(entry))
    }

    /// Every entry, oldest first. A log that was never written is empty.
    pub fn read_all(&self) -> FinanceResult<Vec<AuditEntry>> {
        let file = match File::open(&self.log_path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        serde_json::Deserializer::from_reader(BufReader::new(file))
            .into_iter::<AuditEntry>()
            .map(|entry| entry.map_err(FinanceError::from))
            .collect()
    }

    /// The last `count` entries, oldest first
    pub fn read_recent(&self, count: usize) -> FinanceResult<Vec<AuditEntry>> {
        let entries = self.read_all()?;
        let skip = entries.len().saturating_sub(count);
        Ok(entries.into_iter().skip(skip).collect())
    }
}
