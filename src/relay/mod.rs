//! Message relay: partner registry, outbound sender, and the shared log.
//!
//! [`Relay`] is the single owner of the partner endpoint. Tool handlers
//! and the inbound listener go through it rather than touching global
//! state, and every operation here returns a user-facing string instead
//! of an error.

pub mod registry;
pub mod sender;

use std::sync::Arc;

use tracing::warn;

use crate::config::GlobalConfig;
use crate::models::entry::SYSTEM_SENDER;
use crate::persistence::log_store::DEFAULT_RECENT_LINES;
use crate::persistence::{LogStore, RecentMessages};
use crate::Result;

pub use registry::PartnerRegistry;
pub use sender::{OutboundSender, SendOutcome};

/// Relay state shared by the MCP tools and the inbound listener.
#[derive(Debug)]
pub struct Relay {
    config: Arc<GlobalConfig>,
    log: LogStore,
    partner: PartnerRegistry,
    sender: OutboundSender,
}

impl Relay {
    /// Build a relay writing to `config.log_path`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Http` if the outbound HTTP client cannot be built.
    pub fn new(config: Arc<GlobalConfig>) -> Result<Self> {
        let log = LogStore::new(config.log_path.clone());
        let sender = OutboundSender::new(config.outbound.clone(), log.clone())?;
        Ok(Self {
            config,
            log,
            partner: PartnerRegistry::new(),
            sender,
        })
    }

    /// Global configuration.
    #[must_use]
    pub fn config(&self) -> &Arc<GlobalConfig> {
        &self.config
    }

    /// The shared message log.
    #[must_use]
    pub fn log(&self) -> &LogStore {
        &self.log
    }

    /// The partner registry.
    #[must_use]
    pub fn partner(&self) -> &PartnerRegistry {
        &self.partner
    }

    /// Set the partner endpoint and record the change in the log.
    pub async fn set_partner(&self, url: &str) -> String {
        match self.partner.set(url).await {
            Ok(endpoint) => {
                let note = format!("Partner URL set to: {endpoint}");
                if let Err(err) = self.log.append(SYSTEM_SENDER, &note, None) {
                    warn!(%err, "failed to record partner change in log");
                }
                note
            }
            Err(err) => format!("Error setting partner URL: {err}"),
        }
    }

    /// Send `message` to the current partner.
    pub async fn send_message(&self, message: &str) -> String {
        let partner = self.partner.get().await;
        self.sender.send(partner.as_ref(), message).await.to_string()
    }

    /// Render the last [`DEFAULT_RECENT_LINES`] log lines for the agent.
    #[must_use]
    pub fn recent_messages(&self) -> String {
        match self.log.read_recent(DEFAULT_RECENT_LINES) {
            Ok(RecentMessages::Lines(lines)) => {
                let mut out = String::from("Recent messages:\n");
                for line in lines {
                    out.push_str(&line);
                    out.push('\n');
                }
                out
            }
            Ok(RecentMessages::NoLog) => "No messages found".to_owned(),
            Err(err) => format!("Error reading messages: {err}"),
        }
    }
}
