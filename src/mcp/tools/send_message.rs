//! `send_message` MCP tool handler.
//!
//! Posts the message to the partner's receive endpoint once. The outcome,
//! including every failure kind, comes back to the agent as text; the
//! agent decides whether to retry.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolCallContext;
use rmcp::model::CallToolResult;
use tracing::{debug, info, info_span, Instrument};

use super::util::{parse_input, preview, text_result};
use crate::mcp::handler::RelayServer;

#[derive(Debug, serde::Deserialize)]
struct SendMessageInput {
    /// Message body delivered to the partner.
    message: String,
}

/// Handle the `send_message` tool call.
///
/// # Errors
///
/// Returns `rmcp::ErrorData` when the `message` argument is missing.
pub async fn handle(
    context: ToolCallContext<'_, RelayServer>,
) -> Result<CallToolResult, rmcp::ErrorData> {
    let state = Arc::clone(context.service.state());
    let input: SendMessageInput = parse_input("send_message", context.arguments)?;

    let span = info_span!("send_message", chars = input.message.chars().count());

    async move {
        let reply = state.relay.send_message(&input.message).await;
        info!(reply_chars = reply.chars().count(), "send_message completed");
        debug!(reply = %preview(&reply, 80), "send_message reply");
        Ok(text_result(reply))
    }
    .instrument(span)
    .await
}
