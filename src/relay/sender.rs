//! Outbound sender: one POST to the partner's receive endpoint.
//!
//! Every failure is reported as a [`SendOutcome`] variant; nothing is
//! retried and no error escapes [`OutboundSender::send`].

use std::fmt::{Display, Formatter};

use serde::Serialize;
use tracing::{info, warn};

use crate::config::OutboundConfig;
use crate::models::PartnerEndpoint;
use crate::persistence::LogStore;
use crate::{AppError, Result};

/// JSON body accepted by a partner's `/receive_message` endpoint.
#[derive(Debug, Serialize)]
struct OutboundPayload<'a> {
    message: &'a str,
    from_user: &'a str,
}

/// Result of a single send attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The partner answered 200 and the message was logged locally.
    Delivered(String),
    /// No partner endpoint has been configured.
    PartnerNotSet,
    /// The partner answered with a non-200 status.
    Rejected(u16),
    /// The request did not complete within the configured timeout.
    TimedOut,
    /// No connection could be established.
    ConnectFailed,
    /// Any other failure, including a local log write error after delivery.
    Failed(String),
}

impl SendOutcome {
    /// Whether the partner accepted the message.
    #[must_use]
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered(_))
    }
}

impl Display for SendOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Delivered(message) => write!(f, "Message sent successfully: {message}"),
            Self::PartnerNotSet => {
                f.write_str("Error: Partner URL not set. Use set_partner_url first.")
            }
            Self::Rejected(status) => write!(f, "Failed to send message. Status: {status}"),
            Self::TimedOut => {
                f.write_str("Error: Request timed out. Check if partner's server is running.")
            }
            Self::ConnectFailed => {
                f.write_str("Error: Could not connect to partner. Check the URL and network.")
            }
            Self::Failed(detail) => write!(f, "Error sending message: {detail}"),
        }
    }
}

/// HTTP client bound to the outbound configuration and the local log.
#[derive(Debug, Clone)]
pub struct OutboundSender {
    client: reqwest::Client,
    config: OutboundConfig,
    log: LogStore,
}

impl OutboundSender {
    /// Build a sender with the configured request timeout.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Http` if the HTTP client cannot be constructed.
    pub fn new(config: OutboundConfig, log: LogStore) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|err| AppError::Http(format!("failed to build http client: {err}")))?;
        Ok(Self {
            client,
            config,
            log,
        })
    }

    /// Deliver `message` to `partner` and log it on success.
    pub async fn send(&self, partner: Option<&PartnerEndpoint>, message: &str) -> SendOutcome {
        let Some(partner) = partner else {
            warn!("send attempted before a partner was set");
            return SendOutcome::PartnerNotSet;
        };

        let target = match partner.receive_url(self.config.local_port) {
            Ok(target) => target,
            Err(err) => return SendOutcome::Failed(err.to_string()),
        };

        let payload = OutboundPayload {
            message,
            from_user: &self.config.sender_label,
        };

        let response = match self.client.post(&target).json(&payload).send().await {
            Ok(response) => response,
            Err(err) if err.is_timeout() => {
                warn!(%target, "partner request timed out");
                return SendOutcome::TimedOut;
            }
            Err(err) if err.is_connect() => {
                warn!(%target, %err, "could not connect to partner");
                return SendOutcome::ConnectFailed;
            }
            Err(err) => {
                warn!(%target, %err, "partner request failed");
                return SendOutcome::Failed(err.to_string());
            }
        };

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            warn!(%target, status = status.as_u16(), "partner rejected message");
            return SendOutcome::Rejected(status.as_u16());
        }

        if let Err(err) = self.log.append(&self.config.local_label, message, None) {
            warn!(%err, "message delivered but local log append failed");
            return SendOutcome::Failed(format!("message delivered but not logged: {err}"));
        }

        info!(%target, chars = message.chars().count(), "message delivered");
        SendOutcome::Delivered(message.to_owned())
    }
}
