#![forbid(unsafe_code)]

//! `partner-relay-viewer`: terminal viewer for the partner-relay log.
//!
//! Tails the message log written by `partner-relay`, renders each entry
//! with sender-based colors, and keeps a JSON snapshot of everything it
//! has shown.

use std::io::stdout;
use std::path::PathBuf;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use partner_relay::config::GlobalConfig;
use partner_relay::viewer::{self, TerminalView};
use partner_relay::{AppError, Result};

#[derive(Debug, Parser)]
#[command(
    name = "partner-relay-viewer",
    about = "Terminal viewer for partner-relay messages",
    version,
    long_about = None
)]
struct Cli {
    /// Path to the TOML configuration file shared with the server.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Message log to tail (overrides `log_path`).
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Snapshot file to maintain (overrides `viewer.snapshot_path`).
    #[arg(long)]
    snapshot_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Keep diagnostics quiet by default; they share the terminal with messages.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?;

    let mut config = GlobalConfig::load_or_default(args.config.as_deref())?;
    if let Some(log_file) = args.log_file {
        config.log_path = log_file;
    }
    if let Some(snapshot_file) = args.snapshot_file {
        config.viewer.snapshot_path = snapshot_file;
    }
    config.validate()?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(async move {
            let ct = CancellationToken::new();
            let signal_ct = ct.clone();
            tokio::spawn(async move {
                if let Err(err) = tokio::signal::ctrl_c().await {
                    warn!(%err, "ctrl-c signal handler failed");
                }
                signal_ct.cancel();
            });

            let mut view = TerminalView::new(stdout());
            view.banner()?;
            info!(log = %config.log_path.display(), "viewer tailing log");
            viewer::run(&config, &mut view, ct).await
        })
}
