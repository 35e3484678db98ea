//! Terminal rendering of viewer entries.

use std::io::Write;

use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::SetTitle;
use crossterm::queue;

use crate::models::LogEntry;
use crate::Result;

/// Window title prefix used by [`TerminalView`].
pub const VIEWER_TITLE: &str = "Partner Relay Viewer";

/// Visual treatment of a message line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStyle {
    /// Sent by the local user (`You`).
    Own,
    /// Sent by anyone else, including `System`.
    Partner,
}

impl MessageStyle {
    /// Classify an entry by its sender.
    #[must_use]
    pub fn for_entry(entry: &LogEntry) -> Self {
        if entry.is_own() {
            Self::Own
        } else {
            Self::Partner
        }
    }

    fn color(self) -> Color {
        match self {
            Self::Own => Color::Blue,
            Self::Partner => Color::Green,
        }
    }
}

/// Sink for rendered entries and status updates.
///
/// Only the render loop holds a view, so implementations never need to be
/// shared across threads.
pub trait MessageView {
    /// Render one entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    fn show(&mut self, entry: &LogEntry) -> Result<()>;

    /// Update the status line.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    fn status(&mut self, text: &str) -> Result<()>;
}

/// Colored line-oriented renderer over any writer (usually stdout).
///
/// Timestamps are gray, own messages blue, everything else green. The
/// status line is shown in the terminal title.
#[derive(Debug)]
pub struct TerminalView<W: Write> {
    out: W,
}

impl<W: Write> TerminalView<W> {
    /// Wrap `out`.
    #[must_use]
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Print the banner shown before any message.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    pub fn banner(&mut self) -> Result<()> {
        queue!(
            self.out,
            SetTitle(VIEWER_TITLE),
            SetForegroundColor(Color::White),
            Print(format!("{VIEWER_TITLE}\n\n")),
            ResetColor
        )?;
        self.out.flush()?;
        Ok(())
    }

    /// Recover the underlying writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> MessageView for TerminalView<W> {
    fn show(&mut self, entry: &LogEntry) -> Result<()> {
        let style = MessageStyle::for_entry(entry);
        let sender = match style {
            MessageStyle::Own => "You",
            MessageStyle::Partner => entry.sender.as_str(),
        };

        queue!(
            self.out,
            SetForegroundColor(Color::DarkGrey),
            Print(format!("[{}] ", sanitize(&entry.timestamp))),
            SetForegroundColor(style.color()),
            Print(format!("{}: {}", sanitize(sender), sanitize(&entry.message))),
            ResetColor,
            Print("\n")
        )?;
        self.out.flush()?;
        Ok(())
    }

    fn status(&mut self, text: &str) -> Result<()> {
        queue!(self.out, SetTitle(format!("{VIEWER_TITLE} - {}", sanitize(text))))?;
        self.out.flush()?;
        Ok(())
    }
}

/// Replace control characters other than tab with U+FFFD.
///
/// Entry text comes from the partner, so escape sequences must never
/// reach the terminal.
fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() && c != '\t' { '\u{fffd}' } else { c })
        .collect()
}
