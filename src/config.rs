//! Global configuration parsing and validation.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::{AppError, Result};

/// Inbound webhook listener settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", default)]
pub struct InboundConfig {
    /// Interface the listener binds to.
    pub host: String,
    /// TCP port the listener binds to; 0 asks the OS for an ephemeral port.
    pub port: u16,
    /// Sender label used when a payload omits `from_user`.
    pub default_sender: String,
}

impl Default for InboundConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: DEFAULT_PORT,
            default_sender: default_partner_label(),
        }
    }
}

/// Outbound sender settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", default)]
pub struct OutboundConfig {
    /// Request timeout for the partner POST.
    pub timeout_seconds: u64,
    /// `from_user` label placed in the outbound payload.
    pub sender_label: String,
    /// Sender label recorded in the local log for sent messages.
    pub local_label: String,
    /// Port inserted when the partner host is `localhost` without a port.
    pub local_port: Option<u16>,
}

impl Default for OutboundConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            sender_label: default_partner_label(),
            local_label: "You".into(),
            local_port: Some(DEFAULT_PORT),
        }
    }
}

impl OutboundConfig {
    /// Request timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Viewer settings shared by the launcher and the viewer binary.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", default)]
pub struct ViewerConfig {
    /// JSON snapshot maintained by the viewer.
    pub snapshot_path: PathBuf,
    /// Tailer poll interval.
    pub poll_interval_ms: u64,
    /// Delay after a read error before polling resumes.
    pub retry_interval_ms: u64,
    /// Explicit viewer executable; defaults to a sibling of the server binary.
    pub binary: Option<PathBuf>,
    /// Launcher prefix (a terminal emulator) for `start_ui`; empty runs the
    /// viewer directly.
    pub terminal: Vec<String>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from("inbox.json"),
            poll_interval_ms: 1000,
            retry_interval_ms: 5000,
            binary: None,
            terminal: default_terminal(),
        }
    }
}

impl ViewerConfig {
    /// Poll interval as a [`Duration`].
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Error back-off interval as a [`Duration`].
    #[must_use]
    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }
}

const DEFAULT_PORT: u16 = 8001;

/// Launcher prefix that gives the viewer its own console window.
fn default_terminal() -> Vec<String> {
    if cfg!(windows) {
        vec!["cmd".into(), "/C".into(), "start".into(), String::new()]
    } else if cfg!(target_os = "linux") {
        vec!["x-terminal-emulator".into(), "-e".into()]
    } else {
        Vec::new()
    }
}

fn default_partner_label() -> String {
    "Partner".into()
}

fn default_log_path() -> PathBuf {
    PathBuf::from("messaging.log")
}

/// Global configuration parsed from `config.toml`.
///
/// Every field has a default, so an empty document (or no file at all)
/// yields a working configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GlobalConfig {
    /// Append-only message log shared by the server and the viewer.
    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,
    /// Inbound webhook listener settings.
    #[serde(default)]
    pub inbound: InboundConfig,
    /// Outbound sender settings.
    #[serde(default)]
    pub outbound: OutboundConfig,
    /// Viewer settings.
    #[serde(default)]
    pub viewer: ViewerConfig,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_path: default_log_path(),
            inbound: InboundConfig::default(),
            outbound: OutboundConfig::default(),
            viewer: ViewerConfig::default(),
        }
    }
}

impl GlobalConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Load from `path` when given, otherwise fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file is given but cannot be loaded.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Ok(Self::default()),
        }
    }

    /// Parse configuration from a TOML string and validate it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` describing the first violated constraint.
    pub fn validate(&self) -> Result<()> {
        if self.outbound.timeout_seconds == 0 {
            return Err(AppError::Config(
                "outbound.timeout_seconds must be greater than zero".into(),
            ));
        }

        if self.viewer.poll_interval_ms == 0 || self.viewer.retry_interval_ms == 0 {
            return Err(AppError::Config(
                "viewer intervals must be greater than zero".into(),
            ));
        }

        let labels = [
            ("inbound.default_sender", &self.inbound.default_sender),
            ("outbound.sender_label", &self.outbound.sender_label),
            ("outbound.local_label", &self.outbound.local_label),
        ];
        if let Some((name, _)) = labels.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(AppError::Config(format!("{name} must not be empty")));
        }

        if self.log_path.as_os_str().is_empty() {
            return Err(AppError::Config("log_path must not be empty".into()));
        }

        Ok(())
    }
}
