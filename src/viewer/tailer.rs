//! Incremental reader for the growing message log.
//!
//! [`LogTailer`] keeps a byte cursor into the log and returns only the
//! complete lines appended since the previous poll. [`spawn_tailer`]
//! drives it on a background task and forwards parsed entries to the
//! render loop over a channel.

use std::fs::{self, File};
use std::io::{self, ErrorKind, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::parse::parse_line;
use super::ViewerEvent;

/// Byte-offset cursor over an append-only file.
#[derive(Debug)]
pub struct LogTailer {
    path: PathBuf,
    offset: u64,
    partial: Vec<u8>,
}

impl LogTailer {
    /// Start tailing `path` from the first byte.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            offset: 0,
            partial: Vec::new(),
        }
    }

    /// File being tailed.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes consumed so far.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Read bytes appended since the last call and return completed lines.
    ///
    /// A missing file yields no lines. A trailing fragment without a newline
    /// is held until a later poll completes it. If the file has shrunk the
    /// cursor restarts from the beginning.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the file exists but cannot be
    /// inspected or read.
    pub fn poll(&mut self) -> io::Result<Vec<String>> {
        let len = match fs::metadata(&self.path) {
            Ok(meta) => meta.len(),
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err),
        };

        if len < self.offset {
            info!(
                path = %self.path.display(),
                previous = self.offset,
                len,
                "log shrank; restarting from the beginning"
            );
            self.offset = 0;
            self.partial.clear();
        }

        if len == self.offset {
            return Ok(Vec::new());
        }

        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(self.offset))?;
        let mut fresh = Vec::new();
        file.take(len - self.offset).read_to_end(&mut fresh)?;
        self.offset += fresh.len() as u64;
        self.partial.extend_from_slice(&fresh);

        let mut lines = Vec::new();
        while let Some(idx) = self.partial.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.partial.drain(..=idx).collect();
            let text = String::from_utf8_lossy(&raw);
            lines.push(text.trim_end_matches(['\n', '\r']).to_owned());
        }

        debug!(count = lines.len(), offset = self.offset, "tailer read new lines");
        Ok(lines)
    }
}

/// Spawn the polling loop for `tailer`.
///
/// Each tick reads new lines and sends every parsed entry as a
/// [`ViewerEvent::Entry`]. After a read error the loop reports it, waits
/// `retry_interval`, and then resumes at `poll_interval`. The task ends
/// when `cancel` fires or the receiver is dropped.
#[must_use]
pub fn spawn_tailer(
    mut tailer: LogTailer,
    events: mpsc::Sender<ViewerEvent>,
    poll_interval: Duration,
    retry_interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(path = %tailer.path().display(), "log tailer started");
        loop {
            let delay = match tailer.poll() {
                Ok(lines) => {
                    for entry in lines.iter().filter_map(|line| parse_line(line)) {
                        if events.send(ViewerEvent::Entry(entry)).await.is_err() {
                            debug!("viewer closed; stopping tailer");
                            return;
                        }
                    }
                    poll_interval
                }
                Err(err) => {
                    warn!(path = %tailer.path().display(), %err, "error monitoring log");
                    let notice = ViewerEvent::Status(format!("Error monitoring log: {err}"));
                    if events.send(notice).await.is_err() {
                        return;
                    }
                    retry_interval
                }
            };

            tokio::select! {
                () = cancel.cancelled() => {
                    info!("log tailer shutting down");
                    return;
                }
                () = tokio::time::sleep(delay) => {}
            }
        }
    })
}
