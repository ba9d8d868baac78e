//! The append-only registration audit log.

use crate::error::{ErrorKind, Result};
use crate::stamp;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// The audit log header, exactly.
pub const AUDIT_HEADER: [&str; 4] = ["SysUID", "LocalID", "RegisDateTime", "RegisPerson"];

/// One identifier-assignment event. Appended once per successful
/// registration, never rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    #[serde(rename = "SysUID")]
    pub system_id: String,
    #[serde(rename = "LocalID")]
    pub local_id: String,
    #[serde(rename = "RegisDateTime")]
    pub registered_at: String,
    #[serde(rename = "RegisPerson")]
    pub person: String,
}

impl AuditEntry {
    /// Build an entry stamped with the current wall-clock time.
    pub fn now(system_id: impl Into<String>, local_id: impl Into<String>, person: impl Into<String>) -> Self {
        Self {
            system_id: system_id.into(),
            local_id: local_id.into(),
            registered_at: stamp::ledger(stamp::now()),
            person: person.into(),
        }
    }
}

/// Append-only ledger of identifier assignments, one per batch
/// (`log4preservation.csv` at the batch root).
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    /// Open the batch's audit log, creating it with its header row if and
    /// only if it does not already exist. An existing log is **never**
    /// truncated — re-running a batch keeps appending to the same history.
    pub fn ensure(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            let mut writer = csv::Writer::from_path(&path).map_err(ErrorKind::Csv)?;
            writer.write_record(AUDIT_HEADER).map_err(ErrorKind::Csv)?;
            writer.flush().map_err(ErrorKind::Io)?;
            tracing::info!(path = %path.display(), "created registration audit log");
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry.
    pub fn append(&self, entry: &AuditEntry) -> Result<()> {
        let file =
            OpenOptions::new().append(true).open(&self.path).map_err(ErrorKind::Io)?;
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        writer.serialize(entry).map_err(ErrorKind::Csv)?;
        writer.flush().map_err(ErrorKind::Io)?;
        Ok(())
    }

    /// Read back every entry (reporting and tests; the pipeline itself
    /// only ever appends).
    pub fn entries(&self) -> Result<Vec<AuditEntry>> {
        let mut reader = csv::Reader::from_path(&self.path).map_err(ErrorKind::Csv)?;
        let entries = reader.deserialize().collect::<csv::Result<Vec<_>>>().map_err(ErrorKind::Csv)?;
        Ok(entries)
    }
}
