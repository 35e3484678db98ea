#![forbid(unsafe_code)]

//! `partner-relay`: MCP messaging server binary.
//!
//! Bootstraps configuration, writes the log header, starts the inbound
//! webhook listener, and serves the MCP tools over stdio.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use partner_relay::config::GlobalConfig;
use partner_relay::inbound::serve_inbound;
use partner_relay::mcp::handler::AppState;
use partner_relay::mcp::transport;
use partner_relay::models::entry::now_timestamp;
use partner_relay::relay::Relay;
use partner_relay::{AppError, Result};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "partner-relay", about = "MCP peer-to-peer messaging server", version, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log output format (text or json). Diagnostics always go to stderr.
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Override the message log path.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Override the inbound webhook port.
    #[arg(long)]
    port: Option<u16>,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format)?;
    info!("partner-relay server bootstrap");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?;
    let outcome = runtime.block_on(run(args));
    // A pending stdin read cannot be cancelled; do not wait on it forever.
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    outcome
}

async fn run(args: Cli) -> Result<()> {
    // ── Load configuration ──────────────────────────────
    let mut config = GlobalConfig::load_or_default(args.config.as_deref())?;
    if let Some(log_file) = args.log_file {
        config.log_path = log_file;
    }
    if let Some(port) = args.port {
        config.inbound.port = port;
    }
    config.validate()?;
    let config = Arc::new(config);
    info!(log = %config.log_path.display(), "configuration loaded");

    // ── Build shared state ──────────────────────────────
    let relay = Arc::new(Relay::new(Arc::clone(&config))?);
    let header = format!("=== partner-relay started at {} ===", now_timestamp());
    if let Err(err) = relay.log().append_raw(&header) {
        warn!(%err, "failed to write log header");
    }
    let state = Arc::new(AppState::new(Arc::clone(&relay)));

    // ── Start inbound listener ──────────────────────────
    let ct = CancellationToken::new();
    let inbound_ct = ct.clone();
    let inbound_relay = Arc::clone(&relay);
    let inbound_handle = tokio::spawn(async move {
        if let Err(err) = serve_inbound(inbound_relay, inbound_ct).await {
            error!(%err, "inbound listener failed");
        }
    });

    // ── Start MCP transport ─────────────────────────────
    let stdio_ct = ct.clone();
    let mut stdio_handle = tokio::spawn(async move {
        if let Err(err) = transport::serve_stdio(state, stdio_ct).await {
            error!(%err, "stdio transport failed");
        }
    });

    info!("MCP server ready");

    // ── Wait for shutdown signal or host disconnect ─────
    let host_gone = tokio::select! {
        () = shutdown_signal() => {
            info!("shutdown signal received");
            false
        }
        joined = &mut stdio_handle => {
            if let Err(err) = joined {
                warn!(%err, "stdio transport task failed");
            }
            info!("MCP host disconnected");
            true
        }
    };
    ct.cancel();

    if !host_gone {
        if let Err(err) = stdio_handle.await {
            warn!(%err, "stdio transport task failed");
        }
    }
    if let Err(err) = inbound_handle.await {
        warn!(%err, "inbound listener task failed");
    }
    info!("partner-relay shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(err) => {
                warn!(%err, "failed to register SIGTERM handler, using ctrl-c only");
                let _ = ctrl_c.await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(err) = ctrl_c.await {
            error!(%err, "ctrl-c signal handler failed");
        }
    }
}

fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // stdout carries the MCP protocol.
    let subscriber = fmt().with_env_filter(env_filter).with_writer(std::io::stderr);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}
