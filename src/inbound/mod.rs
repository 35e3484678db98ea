//! Inbound webhook listener that accepts messages from the partner.

pub mod server;

pub use server::{router, serve_inbound, serve_on, ReceiveResponse, ReceiveStatus};
