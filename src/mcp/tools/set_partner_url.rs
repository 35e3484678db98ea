//! `set_partner_url` MCP tool handler.
//!
//! Normalizes and stores the partner's base URL. The value lives only as
//! long as the process.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolCallContext;
use rmcp::model::CallToolResult;
use tracing::{info, info_span, Instrument};

use super::util::{parse_input, text_result};
use crate::mcp::handler::RelayServer;

#[derive(Debug, serde::Deserialize)]
struct SetPartnerInput {
    /// Partner base URL, with or without scheme.
    url: String,
}

/// Handle the `set_partner_url` tool call.
///
/// # Errors
///
/// Returns `rmcp::ErrorData` when the `url` argument is missing.
pub async fn handle(
    context: ToolCallContext<'_, RelayServer>,
) -> Result<CallToolResult, rmcp::ErrorData> {
    let state = Arc::clone(context.service.state());
    let input: SetPartnerInput = parse_input("set_partner_url", context.arguments)?;

    let span = info_span!("set_partner_url");

    async move {
        let reply = state.relay.set_partner(&input.url).await;
        info!(%reply, "set_partner_url completed");
        Ok(text_result(reply))
    }
    .instrument(span)
    .await
}
