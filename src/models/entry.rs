//! Message log entry model shared by the relay and the viewer.

use chrono::Local;
use serde::{Deserialize, Serialize};

/// `strftime` pattern used for every timestamp written to the log.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Sender label used for entries the relay or viewer generates itself.
pub const SYSTEM_SENDER: &str = "System";

/// Current local time rendered with [`TIMESTAMP_FORMAT`].
#[must_use]
pub fn now_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// A single sent or received message.
///
/// Serialized with the `from_user` key so the viewer snapshot keeps the
/// same shape as the inbound webhook payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogEntry {
    /// Human-readable timestamp (`YYYY-MM-DD HH:MM:SS`).
    pub timestamp: String,
    /// Sender label (`You`, `Partner`, `System`, or a partner-chosen name).
    #[serde(rename = "from_user")]
    pub sender: String,
    /// Message body.
    pub message: String,
}

impl LogEntry {
    /// Construct an entry with an explicit timestamp.
    #[must_use]
    pub fn new(
        timestamp: impl Into<String>,
        sender: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            sender: sender.into(),
            message: message.into(),
        }
    }

    /// Construct an entry stamped with the current local time.
    #[must_use]
    pub fn now(sender: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(now_timestamp(), sender, message)
    }

    /// Render as a single log line without the trailing newline.
    ///
    /// Embedded line breaks are flattened to spaces so one entry always
    /// occupies exactly one line of the log.
    #[must_use]
    pub fn to_line(&self) -> String {
        format!(
            "[{}] {}: {}",
            self.timestamp,
            flatten(&self.sender),
            flatten(&self.message)
        )
    }

    /// Whether the entry was written by the local user.
    #[must_use]
    pub fn is_own(&self) -> bool {
        self.sender.eq_ignore_ascii_case("you")
    }
}

fn flatten(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}
