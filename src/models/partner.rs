//! Partner endpoint model and URL normalization.

use std::fmt::{Display, Formatter};

use reqwest::Url;

use crate::{AppError, Result};

/// Path on the partner's inbound listener that accepts messages.
pub const RECEIVE_PATH: &str = "/receive_message";

/// Normalized base URL of the partner's inbound listener.
///
/// Always carries an `http://` or `https://` scheme and never ends with a
/// trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartnerEndpoint(String);

impl PartnerEndpoint {
    /// Normalize a user-supplied URL.
    ///
    /// Trims surrounding whitespace, prefixes `https://` when no scheme is
    /// present, and strips a single trailing slash.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when the URL is empty.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AppError::Config("partner URL must not be empty".into()));
        }

        let mut url = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.to_owned()
        } else {
            format!("https://{trimmed}")
        };

        if url.ends_with('/') {
            url.pop();
        }

        Ok(Self(url))
    }

    /// The normalized base URL.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Full URL of the partner's receive endpoint.
    ///
    /// When the host is `localhost` and the URL has no explicit port,
    /// `local_port` is inserted; tunnelled endpoints handle port mapping
    /// themselves and are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Http` when the stored value is not a valid URL.
    pub fn receive_url(&self, local_port: Option<u16>) -> Result<String> {
        let mut url = Url::parse(&self.0)
            .map_err(|err| AppError::Http(format!("invalid partner URL {}: {err}", self.0)))?;

        if let Some(port) = local_port {
            if url.host_str() == Some("localhost") && url.port().is_none() {
                url.set_port(Some(port))
                    .map_err(|()| AppError::Http(format!("cannot set port on {}", self.0)))?;
            }
        }

        Ok(format!(
            "{}{RECEIVE_PATH}",
            url.as_str().trim_end_matches('/')
        ))
    }
}

impl Display for PartnerEndpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
