//! Viewer process launcher used by the `start_ui` tool.
//!
//! The viewer runs as an independent process with null stdio so it can
//! never write into the MCP stdio stream.

use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{info, info_span};

use crate::config::GlobalConfig;
use crate::{AppError, Result};

/// File name of the viewer executable next to the server binary.
pub const VIEWER_BIN: &str = "partner-relay-viewer";

/// Resolve the viewer executable.
///
/// Uses `viewer.binary` when configured, otherwise the sibling of the
/// running executable.
///
/// # Errors
///
/// Returns `AppError::Io` if the current executable cannot be located.
pub fn viewer_binary(config: &GlobalConfig) -> Result<PathBuf> {
    if let Some(ref binary) = config.viewer.binary {
        return Ok(binary.clone());
    }
    let current = std::env::current_exe()
        .map_err(|err| AppError::Io(format!("cannot locate current executable: {err}")))?;
    Ok(current.with_file_name(format!("{VIEWER_BIN}{}", std::env::consts::EXE_SUFFIX)))
}

/// Program and argument list used to start the viewer.
///
/// When `viewer.terminal` is set its entries come first and the viewer
/// command is appended as the terminal's payload.
///
/// # Errors
///
/// Returns `AppError::Io` if the viewer binary cannot be resolved.
pub fn viewer_argv(config: &GlobalConfig) -> Result<Vec<String>> {
    let binary = viewer_binary(config)?;
    let mut argv: Vec<String> = config.viewer.terminal.clone();
    argv.push(binary.to_string_lossy().into_owned());
    argv.push("--log-file".into());
    argv.push(config.log_path.to_string_lossy().into_owned());
    argv.push("--snapshot-file".into());
    argv.push(config.viewer.snapshot_path.to_string_lossy().into_owned());
    Ok(argv)
}

/// Spawn the viewer and return its process id.
///
/// The child is not awaited; the runtime reaps it when it exits.
///
/// # Errors
///
/// Returns `AppError::Io` if the process cannot be spawned.
pub fn launch(config: &GlobalConfig) -> Result<u32> {
    let argv = viewer_argv(config)?;
    let span = info_span!("launch_viewer", program = %argv[0]);
    let _guard = span.enter();

    let mut cmd = Command::new(&argv[0]);
    cmd.args(&argv[1..])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(false);

    let child = cmd
        .spawn()
        .map_err(|err| AppError::Io(format!("failed to spawn {}: {err}", argv[0])))?;
    let pid = child.id().unwrap_or_default();
    info!(pid, "viewer spawned");
    Ok(pid)
}
