//! `start_ui` MCP tool handler.
//!
//! Spawns the viewer binary as an independent process so the MCP stdio
//! transport is never blocked by the viewer's lifetime.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolCallContext;
use rmcp::model::CallToolResult;
use tracing::{info, info_span, warn, Instrument};

use super::util::text_result;
use crate::mcp::handler::RelayServer;
use crate::viewer::launcher;

/// Handle the `start_ui` tool call.
///
/// # Errors
///
/// Never fails; spawn errors are reported in the returned text.
pub async fn handle(
    context: ToolCallContext<'_, RelayServer>,
) -> Result<CallToolResult, rmcp::ErrorData> {
    let state = Arc::clone(context.service.state());
    let span = info_span!("start_ui");

    async move {
        let reply = match launcher::launch(&state.config) {
            Ok(pid) => {
                info!(pid, "viewer process started");
                "Message viewer UI started in a separate process".to_owned()
            }
            Err(err) => {
                warn!(%err, "failed to start viewer");
                format!("Error starting UI: {err}")
            }
        };
        Ok(text_result(reply))
    }
    .instrument(span)
    .await
}
