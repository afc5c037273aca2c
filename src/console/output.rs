//! Output sink for inbound messages and diagnostics.
//!
//! Messages render as `HH:MM:SS payload`; diagnostics as
//! `ws: <context>: <error>` on standard error.

// ============================================================================
// Imports
// ============================================================================

use std::env;
use std::fmt;
use std::io::{self, IsTerminal, Write};

use chrono::NaiveTime;
use crossterm::cursor::MoveToColumn;
use crossterm::queue;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};
use tracing::warn;

// ============================================================================
// Constants
// ============================================================================

/// Prefix of every diagnostic line.
pub const DIAGNOSTIC_PREFIX: &str = "ws";

/// Timestamp format for inbound messages.
const TIME_FORMAT: &str = "%H:%M:%S";

// ============================================================================
// OutputSink
// ============================================================================

/// Destination for everything the session shows the user.
pub trait OutputSink: Send + Sync {
    /// Shows one inbound payload received at `at`.
    fn message(&self, at: NaiveTime, payload: &str);

    /// Reports an error under a short context label.
    fn diagnostic(&self, context: &str, error: &dyn fmt::Display);
}

// ============================================================================
// Formatting
// ============================================================================

/// Formats the timestamp part of a message line.
#[inline]
#[must_use]
pub fn format_time(at: NaiveTime) -> String {
    at.format(TIME_FORMAT).to_string()
}

/// Formats a message line without color.
#[must_use]
pub fn format_message(at: NaiveTime, payload: &str) -> String {
    format!("{} {payload}", format_time(at))
}

/// Formats a diagnostic line.
#[must_use]
pub fn format_diagnostic(context: &str, error: &dyn fmt::Display) -> String {
    format!("{DIAGNOSTIC_PREFIX}: {context}: {error}")
}

/// Whether stdout should be colorized.
///
/// Off when `disabled`, when `NO_COLOR` is set, or when stdout is not a
/// terminal.
#[must_use]
pub fn color_enabled(disabled: bool) -> bool {
    !disabled && env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal()
}

// ============================================================================
// TerminalSink
// ============================================================================

/// Writes messages to stdout and diagnostics to stderr.
#[derive(Debug, Clone, Default)]
pub struct TerminalSink {
    /// Colorize timestamp and payload.
    color: bool,
    /// Prompt to redraw after each message, if input is interactive.
    prompt: Option<String>,
}

impl TerminalSink {
    /// Creates a sink.
    #[inline]
    #[must_use]
    pub fn new(color: bool) -> Self {
        Self {
            color,
            prompt: None,
        }
    }

    /// Redraws `prompt` after every message.
    #[inline]
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    fn write_message(&self, at: NaiveTime, payload: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();

        if self.prompt.is_some() {
            queue!(out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
        }

        if self.color {
            writeln!(out, "{} {}", format_time(at).yellow(), payload.blue())?;
        } else {
            writeln!(out, "{}", format_message(at, payload))?;
        }

        if let Some(prompt) = &self.prompt {
            if self.color {
                write!(out, "{}", prompt.as_str().bold())?;
            } else {
                write!(out, "{prompt}")?;
            }
        }

        out.flush()
    }
}

impl OutputSink for TerminalSink {
    fn message(&self, at: NaiveTime, payload: &str) {
        if let Err(e) = self.write_message(at, payload) {
            warn!(error = %e, "Failed to write message");
        }
    }

    fn diagnostic(&self, context: &str, error: &dyn fmt::Display) {
        let line = format_diagnostic(context, error);
        if self.prompt.is_some() {
            // Start below any prompt still on screen
            eprintln!("\n{line}");
        } else {
            eprintln!("{line}");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use regex::Regex;

    #[test]
    fn test_format_message() {
        let at = NaiveTime::from_hms_opt(9, 5, 3).expect("valid time");
        assert_eq!(format_message(at, "hello"), "09:05:03 hello");
    }

    #[test]
    fn test_format_message_pattern() {
        let re = Regex::new(r"^\d\d:\d\d:\d\d hello$").expect("regex");
        let now = chrono::Local::now().time();
        assert!(re.is_match(&format_message(now, "hello")));
    }

    #[test]
    fn test_format_message_keeps_payload() {
        let at = NaiveTime::from_hms_opt(23, 59, 59).expect("valid time");
        assert_eq!(format_message(at, "  a  b "), "23:59:59   a  b ");
    }

    #[test]
    fn test_format_diagnostic() {
        let err = crate::Error::ConnectionClosed;
        assert_eq!(format_diagnostic("read", &err), "ws: read: connection closed");
    }

    #[test]
    fn test_color_disabled_by_flag() {
        assert!(!color_enabled(true));
    }
}
