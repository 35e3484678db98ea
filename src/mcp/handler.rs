//! MCP server handler, shared application state, and tool router.

use std::sync::Arc;

use rmcp::handler::server::{
    tool::{ToolRoute, ToolRouter},
    ServerHandler,
};
use rmcp::model::{Implementation, ServerCapabilities, ServerInfo, Tool};
use rmcp::tool_handler;

use crate::config::GlobalConfig;
use crate::relay::Relay;

/// Names of every tool exposed by [`RelayServer`], in registration order.
pub const TOOL_NAMES: [&str; 4] = ["set_partner_url", "send_message", "start_ui", "get_messages"];

/// Shared application state accessible by all MCP tool handlers.
#[derive(Debug)]
pub struct AppState {
    /// Global configuration.
    pub config: Arc<GlobalConfig>,
    /// Message relay owning the partner endpoint and the log.
    pub relay: Arc<Relay>,
}

impl AppState {
    /// Build state around an existing relay.
    #[must_use]
    pub fn new(relay: Arc<Relay>) -> Self {
        Self {
            config: Arc::clone(relay.config()),
            relay,
        }
    }
}

/// MCP server implementation that exposes the messaging tools.
#[derive(Clone)]
pub struct RelayServer {
    state: Arc<AppState>,
    tool_router: ToolRouter<Self>,
}

impl RelayServer {
    /// Create a new MCP server bound to shared application state.
    #[must_use]
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            tool_router: Self::tool_router(),
        }
    }

    /// Access the shared application state.
    #[must_use]
    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    fn tool_router() -> ToolRouter<Self> {
        let mut router = ToolRouter::new();
        router.add_route(ToolRoute::new_dyn(Self::set_partner_url_tool(), |context| {
            Box::pin(crate::mcp::tools::set_partner_url::handle(context))
        }));
        router.add_route(ToolRoute::new_dyn(Self::send_message_tool(), |context| {
            Box::pin(crate::mcp::tools::send_message::handle(context))
        }));
        router.add_route(ToolRoute::new_dyn(Self::start_ui_tool(), |context| {
            Box::pin(crate::mcp::tools::start_ui::handle(context))
        }));
        router.add_route(ToolRoute::new_dyn(Self::get_messages_tool(), |context| {
            Box::pin(crate::mcp::tools::get_messages::handle(context))
        }));
        router
    }

    /// Convert a `serde_json::Value::Object` into the `Arc<Map>` expected by `Tool`.
    fn schema(value: serde_json::Value) -> Arc<serde_json::Map<String, serde_json::Value>> {
        match value {
            serde_json::Value::Object(map) => Arc::new(map),
            _ => Arc::new(serde_json::Map::default()),
        }
    }

    /// Definitions of every tool this server exposes, in [`TOOL_NAMES`] order.
    #[must_use]
    pub fn all_tools() -> Vec<Tool> {
        vec![
            Self::set_partner_url_tool(),
            Self::send_message_tool(),
            Self::start_ui_tool(),
            Self::get_messages_tool(),
        ]
    }

    fn set_partner_url_tool() -> Tool {
        Tool::new(
            "set_partner_url",
            "Set the partner's public URL (for example an ngrok tunnel) used when \
             sending messages. A missing scheme defaults to https.",
            Self::schema(serde_json::json!({
                "type": "object",
                "properties": {
                    "url": { "type": "string" }
                },
                "required": ["url"]
            })),
        )
    }

    fn send_message_tool() -> Tool {
        Tool::new(
            "send_message",
            "Send a message to your partner via their relay URL. Returns a \
             description of the outcome; failures are not retried.",
            Self::schema(serde_json::json!({
                "type": "object",
                "properties": {
                    "message": { "type": "string" }
                },
                "required": ["message"]
            })),
        )
    }

    fn start_ui_tool() -> Tool {
        Tool::new(
            "start_ui",
            "Start the message viewer as a separate process.",
            Self::schema(serde_json::json!({
                "type": "object",
                "properties": {}
            })),
        )
    }

    fn get_messages_tool() -> Tool {
        Tool::new(
            "get_messages",
            "Get the 10 most recent lines from the message log.",
            Self::schema(serde_json::json!({
                "type": "object",
                "properties": {}
            })),
        )
    }
}

#[tool_handler]
impl ServerHandler for RelayServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Implementation::from_build_env()
            },
            instructions: Some(
                "Peer-to-peer messaging. Call set_partner_url once per session, then \
                 send_message and get_messages."
                    .into(),
            ),
            ..ServerInfo::default()
        }
    }
}
