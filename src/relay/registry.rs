//! Partner registry: the single partner endpoint owned by the relay.

use tokio::sync::RwLock;
use tracing::info;

use crate::models::PartnerEndpoint;
use crate::Result;

/// Holds the current partner endpoint for the lifetime of the process.
///
/// Nothing is persisted; the operator sets the partner again after every
/// restart.
#[derive(Debug, Default)]
pub struct PartnerRegistry {
    current: RwLock<Option<PartnerEndpoint>>,
}

impl PartnerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize and store `url`, replacing any previous partner.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when `url` is empty; the registry is left
    /// unchanged in that case.
    pub async fn set(&self, url: &str) -> Result<PartnerEndpoint> {
        let endpoint = PartnerEndpoint::parse(url)?;
        let previous = self.current.write().await.replace(endpoint.clone());
        info!(
            partner = %endpoint,
            replaced = previous.is_some(),
            "partner endpoint set"
        );
        Ok(endpoint)
    }

    /// The current partner endpoint, if one has been set.
    pub async fn get(&self) -> Option<PartnerEndpoint> {
        self.current.read().await.clone()
    }
}
