//! Message viewer: tails the log and renders entries.
//!
//! The tailer runs on a background task and sends [`ViewerEvent`]s over a
//! bounded channel. [`run`] is the only code that touches the
//! [`MessageView`], so every display update happens on the render loop.

pub mod display;
pub mod launcher;
pub mod parse;
pub mod tailer;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::GlobalConfig;
use crate::models::entry::SYSTEM_SENDER;
use crate::models::LogEntry;
use crate::persistence::SnapshotStore;
use crate::Result;

pub use display::{MessageStyle, MessageView, TerminalView};
pub use tailer::{spawn_tailer, LogTailer};

const EVENT_CAPACITY: usize = 256;

/// Greeting entries added to the view (and snapshot) at every start.
pub const WELCOME_MESSAGES: [&str; 3] = [
    "Partner Relay viewer started",
    "Messages appear here as they are written to the log",
    "Use your AI assistant to send and receive messages",
];

/// Update delivered from the tailer to the render loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerEvent {
    /// A parsed log entry to display and record.
    Entry(LogEntry),
    /// A transient status notice, such as a read error.
    Status(String),
}

/// Run the viewer until `ct` is cancelled.
///
/// Restores the snapshot into `view`, adds the welcome entries, then
/// renders every entry the tailer produces and mirrors it into the
/// snapshot file. Snapshot write failures are logged and do not stop
/// the loop.
///
/// # Errors
///
/// Returns an error if `view` fails to render.
pub async fn run<V: MessageView>(
    config: &GlobalConfig,
    view: &mut V,
    ct: CancellationToken,
) -> Result<()> {
    let mut snapshot = SnapshotStore::load(config.viewer.snapshot_path.clone());
    info!(
        restored = snapshot.entries().len(),
        snapshot = %snapshot.path().display(),
        "viewer snapshot loaded"
    );
    for entry in snapshot.entries() {
        view.show(entry)?;
    }

    for text in WELCOME_MESSAGES {
        record(&mut snapshot, view, LogEntry::now(SYSTEM_SENDER, text))?;
    }

    let (tx, mut rx) = mpsc::channel(EVENT_CAPACITY);
    let tailer_ct = ct.child_token();
    let tailer = spawn_tailer(
        LogTailer::new(config.log_path.clone()),
        tx,
        config.viewer.poll_interval(),
        config.viewer.retry_interval(),
        tailer_ct.clone(),
    );

    let outcome = loop {
        tokio::select! {
            () = ct.cancelled() => break Ok(()),
            event = rx.recv() => match event {
                Some(ViewerEvent::Entry(entry)) => {
                    if let Err(err) = record(&mut snapshot, view, entry) {
                        break Err(err);
                    }
                }
                Some(ViewerEvent::Status(text)) => {
                    if let Err(err) = view.status(&text) {
                        break Err(err);
                    }
                }
                None => break Ok(()),
            },
        }
    };

    tailer_ct.cancel();
    if let Err(err) = tailer.await {
        warn!(%err, "log tailer task failed");
    }
    info!(entries = snapshot.entries().len(), "viewer stopped");
    outcome
}

fn record<V: MessageView>(
    snapshot: &mut SnapshotStore,
    view: &mut V,
    entry: LogEntry,
) -> Result<()> {
    view.show(&entry)?;
    view.status(&format!("Last message: {}", entry.timestamp))?;
    if let Err(err) = snapshot.push(entry) {
        warn!(%err, "failed to save viewer snapshot");
    }
    Ok(())
}
