//! Append-only message log shared by the relay and the viewer.
//!
//! Every append is an independent open/write/close with the whole line
//! handed to a single `write_all`, so concurrent writers (the inbound
//! listener and tool calls) rely only on the operating system's append
//! atomicity for small writes. No in-process lock is taken.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::models::entry::{now_timestamp, LogEntry};
use crate::{AppError, Result};

/// Number of lines returned by [`LogStore::read_recent`] callers by default.
pub const DEFAULT_RECENT_LINES: usize = 10;

/// Outcome of reading the tail of the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecentMessages {
    /// The log file does not exist yet.
    NoLog,
    /// The last raw lines of the log, oldest first.
    Lines(Vec<String>),
}

/// Handle to the append-only log file.
#[derive(Debug, Clone)]
pub struct LogStore {
    path: PathBuf,
}

impl LogStore {
    /// Create a store backed by `path`. The file is created on first append.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the underlying log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one `[<timestamp>] <sender>: <message>` line.
    ///
    /// The timestamp is generated from the local clock when `timestamp` is
    /// `None`. Returns the entry that was written.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the file cannot be opened or written.
    pub fn append(
        &self,
        sender: &str,
        message: &str,
        timestamp: Option<&str>,
    ) -> Result<LogEntry> {
        let timestamp = timestamp.map_or_else(now_timestamp, str::to_owned);
        let entry = LogEntry::new(timestamp, sender, message);
        self.append_raw(&entry.to_line())?;
        Ok(entry)
    }

    /// Append a preformatted line (header or informational text).
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the file cannot be opened or written.
    pub fn append_raw(&self, line: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|err| {
                AppError::Io(format!("failed to open log {}: {err}", self.path.display()))
            })?;

        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');

        file.write_all(buf.as_bytes()).map_err(|err| {
            AppError::Io(format!("failed to append to log {}: {err}", self.path.display()))
        })?;
        debug!(path = %self.path.display(), bytes = buf.len(), "log line appended");
        Ok(())
    }

    /// Return the last `n` raw lines of the log in file order.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the file exists but cannot be read.
    pub fn read_recent(&self, n: usize) -> Result<RecentMessages> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(RecentMessages::NoLog),
            Err(err) => {
                return Err(AppError::Io(format!(
                    "failed to read log {}: {err}",
                    self.path.display()
                )))
            }
        };

        let lines: Vec<&str> = contents.lines().collect();
        let start = lines.len().saturating_sub(n);
        Ok(RecentMessages::Lines(
            lines[start..].iter().map(|line| (*line).to_owned()).collect(),
        ))
    }
}
