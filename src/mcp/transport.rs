//! MCP transport for the assistant that owns this relay.
//!
//! The assistant launches `partner-relay` as a child process and speaks
//! newline-delimited JSON-RPC over its stdin/stdout. [`serve_io`] accepts
//! any byte stream pair so the same server can run over an in-memory pipe.

use std::sync::Arc;

use rmcp::service::ServiceExt;
use rmcp::transport::io::stdio;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::handler::{AppState, RelayServer};
use crate::{AppError, Result};

/// Serve the relay tools over stdin/stdout until the assistant closes
/// the stream or `ct` fires.
///
/// # Errors
///
/// Returns `AppError::Mcp` if the MCP handshake or session fails.
pub async fn serve_stdio(state: Arc<AppState>, ct: CancellationToken) -> Result<()> {
    let (stdin, stdout) = stdio();
    info!("starting stdio MCP transport");
    serve_io(state, stdin, stdout, ct).await
}

/// Serve the relay tools over an arbitrary reader/writer pair.
///
/// # Errors
///
/// Returns `AppError::Mcp` if the MCP handshake or session fails.
pub async fn serve_io<R, W>(
    state: Arc<AppState>,
    reader: R,
    writer: W,
    ct: CancellationToken,
) -> Result<()>
where
    R: AsyncRead + Send + Unpin + 'static,
    W: AsyncWrite + Send + Unpin + 'static,
{
    let service = RelayServer::new(state)
        .serve_with_ct((reader, writer), ct)
        .await
        .map_err(|err| AppError::Mcp(format!("MCP handshake failed: {err}")))?;

    let reason = service
        .waiting()
        .await
        .map_err(|err| AppError::Mcp(format!("MCP session ended abnormally: {err}")))?;

    info!(?reason, "MCP session closed");
    Ok(())
}
