//! Parsing of raw log lines into viewer entries.

use crate::models::entry::{now_timestamp, SYSTEM_SENDER};
use crate::models::LogEntry;

/// Prefix of header lines the server writes at startup.
pub const HEADER_MARKER: &str = "===";

/// Parse one raw log line.
///
/// Returns `None` for blank lines and header lines. Lines of the form
/// `[<ts>] <sender>: <message>` keep their timestamp; `<sender>: <message>`
/// lines are stamped with the current time. Anything else is kept verbatim
/// under the `System` sender rather than dropped.
#[must_use]
pub fn parse_line(raw: &str) -> Option<LogEntry> {
    let line = raw.trim();
    if line.is_empty() || line.starts_with(HEADER_MARKER) {
        return None;
    }

    let parsed = if let Some(rest) = line.strip_prefix('[') {
        rest.split_once("] ").and_then(|(timestamp, body)| {
            body.split_once(": ")
                .map(|(sender, message)| LogEntry::new(timestamp, sender, message))
        })
    } else {
        line.split_once(": ")
            .map(|(sender, message)| LogEntry::new(now_timestamp(), sender, message))
    };

    Some(parsed.unwrap_or_else(|| LogEntry::new(now_timestamp(), SYSTEM_SENDER, line)))
}
