//! MCP tool handlers.

pub mod get_messages;
pub mod send_message;
pub mod set_partner_url;
pub mod start_ui;
pub mod util;
