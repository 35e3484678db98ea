//! Viewer-owned JSON snapshot of every displayed entry.
//!
//! The snapshot is independent of the message log: it is loaded once at
//! viewer startup and rewritten in full after every addition.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::models::LogEntry;
use crate::{AppError, Result};

/// In-memory entry list mirrored to a pretty-printed JSON array on disk.
#[derive(Debug)]
pub struct SnapshotStore {
    path: PathBuf,
    entries: Vec<LogEntry>,
}

impl SnapshotStore {
    /// Load the snapshot at `path`.
    ///
    /// A missing file yields an empty store. An unreadable or corrupt file
    /// is logged and also yields an empty store so the viewer still starts.
    #[must_use]
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match Self::read_entries(&path) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(path = %path.display(), %err, "failed to load viewer snapshot; starting empty");
                Vec::new()
            }
        };
        Self { path, entries }
    }

    fn read_entries(path: &Path) -> Result<Vec<LogEntry>> {
        match fs::read_to_string(path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(AppError::Io(format!(
                "failed to read snapshot {}: {err}",
                path.display()
            ))),
        }
    }

    /// All entries in display order.
    #[must_use]
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Snapshot file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record an entry and rewrite the snapshot file.
    ///
    /// The entry is kept in memory even when the write fails.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Snapshot` or `AppError::Io` if the file cannot be
    /// serialized or written.
    pub fn push(&mut self, entry: LogEntry) -> Result<()> {
        self.entries.push(entry);
        self.save()
    }

    fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, json).map_err(|err| {
            AppError::Io(format!(
                "failed to write snapshot {}: {err}",
                self.path.display()
            ))
        })
    }
}
