//! Shared utilities for MCP tool handlers.

use rmcp::model::{CallToolResult, Content};
use serde::de::DeserializeOwned;

/// Decode tool arguments into a typed input struct.
///
/// Absent arguments decode as an empty object so tools without required
/// parameters accept both `{}` and no arguments at all.
///
/// # Errors
///
/// Returns `rmcp::ErrorData::invalid_params` naming the tool when the
/// arguments do not match the expected shape.
pub fn parse_input<T: DeserializeOwned>(
    tool: &str,
    arguments: Option<serde_json::Map<String, serde_json::Value>>,
) -> Result<T, rmcp::ErrorData> {
    let args = arguments.unwrap_or_default();
    serde_json::from_value(serde_json::Value::Object(args)).map_err(|err| {
        rmcp::ErrorData::invalid_params(format!("invalid {tool} parameters: {err}"), None)
    })
}

/// Wrap a user-facing string as a successful tool result.
#[must_use]
pub fn text_result(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

/// Shorten `text` to at most `max_chars` characters for log fields,
/// appending `"..."` when truncation occurs.
#[must_use]
pub fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}
