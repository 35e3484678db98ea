//! `get_messages` MCP tool handler.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolCallContext;
use rmcp::model::CallToolResult;
use tracing::debug;

use super::util::text_result;
use crate::mcp::handler::RelayServer;

/// Handle the `get_messages` tool call.
///
/// # Errors
///
/// Returns `rmcp::ErrorData` only if the blocking read task panics; read
/// errors are reported in the returned text.
pub async fn handle(
    context: ToolCallContext<'_, RelayServer>,
) -> Result<CallToolResult, rmcp::ErrorData> {
    let state = Arc::clone(context.service.state());
    let reply = tokio::task::spawn_blocking(move || state.relay.recent_messages())
        .await
        .map_err(|err| {
            rmcp::ErrorData::internal_error(format!("get_messages task failed: {err}"), None)
        })?;
    debug!(bytes = reply.len(), "get_messages completed");
    Ok(text_result(reply))
}
