#![forbid(unsafe_code)]

//! `partner-relay`: peer-to-peer messaging bridge for AI assistants.
//!
//! Exposes MCP tools to send and read messages, accepts partner
//! deliveries on an HTTP webhook, records everything in an append-only
//! log, and ships a terminal viewer that tails that log.

pub mod config;
pub mod errors;
pub mod inbound;
pub mod mcp;
pub mod models;
pub mod persistence;
pub mod relay;
pub mod viewer;

pub use config::GlobalConfig;
pub use errors::{AppError, Result};
