//! HTTP webhook listener for partner deliveries.
//!
//! Mounts three routes on an axum router:
//!
//! - `GET /`: static status payload
//! - `GET /health`: plain-text liveness probe
//! - `POST /receive_message`: append a partner message to the log
//!
//! The receive route answers every request with HTTP 200 and a
//! `{status, message}` body, including malformed or empty payloads.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, info_span, warn, Instrument};

use crate::relay::Relay;
use crate::{AppError, Result};

/// Payload posted by a partner relay.
#[derive(Debug, Deserialize)]
struct ReceiveRequest {
    message: String,
    #[serde(default)]
    from_user: Option<String>,
}

/// Outcome marker in a receive response.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReceiveStatus {
    /// The message was appended to the log.
    Success,
    /// The message was rejected or could not be stored.
    Error,
}

/// Body returned by `POST /receive_message`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReceiveResponse {
    /// Outcome marker.
    pub status: ReceiveStatus,
    /// Human-readable detail.
    pub message: String,
}

impl ReceiveResponse {
    fn success() -> Self {
        Self {
            status: ReceiveStatus::Success,
            message: "Message received".into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: ReceiveStatus::Error,
            message: message.into(),
        }
    }
}

/// Status payload for `GET /`.
#[derive(Debug, Serialize)]
struct RootStatus {
    message: &'static str,
    status: &'static str,
}

async fn root() -> Json<RootStatus> {
    Json(RootStatus {
        message: "Partner Relay Webhook Server",
        status: "ok",
    })
}

/// Handler for `GET /health`; returns 200 OK with a plain-text body.
async fn health() -> &'static str {
    "ok"
}

async fn receive_message(
    State(relay): State<Arc<Relay>>,
    payload: std::result::Result<Json<ReceiveRequest>, JsonRejection>,
) -> Json<ReceiveResponse> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(%rejection, "malformed inbound payload");
            return Json(ReceiveResponse::error(format!(
                "Error processing message: {}",
                rejection.body_text()
            )));
        }
    };

    let sender = request
        .from_user
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| relay.config().inbound.default_sender.clone());

    let span = info_span!("receive_message", from_user = %sender);
    async move {
        if request.message.is_empty() {
            warn!("inbound payload had an empty message");
            return Json(ReceiveResponse::error("No message provided"));
        }

        match relay.log().append(&sender, &request.message, None) {
            Ok(_) => {
                info!(chars = request.message.chars().count(), "inbound message logged");
                Json(ReceiveResponse::success())
            }
            Err(err) => {
                warn!(%err, "failed to log inbound message");
                Json(ReceiveResponse::error(format!(
                    "Error processing message: {err}"
                )))
            }
        }
    }
    .instrument(span)
    .await
}

/// Build the webhook router bound to `relay`.
#[must_use]
pub fn router(relay: Arc<Relay>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/receive_message", post(receive_message))
        .with_state(relay)
}

/// Bind the configured `inbound.host:inbound.port` and serve until `ct`
/// is cancelled.
///
/// # Errors
///
/// Returns `AppError::Config` if the address cannot be bound or the
/// server fails.
pub async fn serve_inbound(relay: Arc<Relay>, ct: CancellationToken) -> Result<()> {
    let bind = format!(
        "{}:{}",
        relay.config().inbound.host,
        relay.config().inbound.port
    );
    let listener = TcpListener::bind(&bind)
        .await
        .map_err(|err| AppError::Config(format!("failed to bind inbound listener on {bind}: {err}")))?;
    serve_on(listener, relay, ct).await
}

/// Serve the webhook router on an already-bound listener.
///
/// # Errors
///
/// Returns `AppError::Io` if the server fails while running.
pub async fn serve_on(listener: TcpListener, relay: Arc<Relay>, ct: CancellationToken) -> Result<()> {
    let local = listener
        .local_addr()
        .map_err(|err| AppError::Io(format!("inbound listener has no local address: {err}")))?;
    info!(%local, "starting inbound webhook listener");

    axum::serve(listener, router(relay))
        .with_graceful_shutdown(async move { ct.cancelled().await })
        .await
        .map_err(|err| AppError::Io(format!("inbound listener error: {err}")))?;

    info!("inbound webhook listener shut down");
    Ok(())
}
