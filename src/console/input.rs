//! Line sources for the outbound pump.
//!
//! [`LineSource`] is a blocking capability; [`spawn_reader`] moves it onto a
//! dedicated thread so a pending read never holds up the async runtime or
//! process exit.

// ============================================================================
// Imports
// ============================================================================

use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};
use std::thread;

use crossterm::style::Stylize;
use tokio::sync::mpsc;
use tracing::debug;

// ============================================================================
// Constants
// ============================================================================

/// Prompt shown by [`PromptReader`].
pub const DEFAULT_PROMPT: &str = "> ";

// ============================================================================
// LineSource
// ============================================================================

/// Blocking source of user input lines.
pub trait LineSource: Send {
    /// Reads the next line without its terminator.
    ///
    /// Returns `Ok(None)` once input is exhausted.
    fn next_line(&mut self) -> io::Result<Option<String>>;
}

// ============================================================================
// PlainReader
// ============================================================================

/// Reads lines from any buffered reader, no prompt.
pub struct PlainReader<R> {
    reader: R,
    buf: String,
}

impl<R: BufRead + Send> PlainReader<R> {
    /// Wraps a buffered reader.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
        }
    }
}

impl PlainReader<BufReader<Stdin>> {
    /// Reads from standard input.
    #[must_use]
    pub fn stdin() -> Self {
        Self::new(BufReader::new(io::stdin()))
    }
}

impl<R: BufRead + Send> LineSource for PlainReader<R> {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        self.buf.clear();
        if self.reader.read_line(&mut self.buf)? == 0 {
            return Ok(None);
        }

        let line = self
            .buf
            .strip_suffix('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .unwrap_or(self.buf.as_str());
        Ok(Some(line.to_owned()))
    }
}

// ============================================================================
// PromptReader
// ============================================================================

/// Interactive reader that shows a prompt before each line.
pub struct PromptReader {
    inner: PlainReader<BufReader<Stdin>>,
    out: Stdout,
    prompt: String,
    color: bool,
}

impl PromptReader {
    /// Creates a prompt reader on standard input and output.
    #[must_use]
    pub fn new(prompt: impl Into<String>, color: bool) -> Self {
        Self {
            inner: PlainReader::stdin(),
            out: io::stdout(),
            prompt: prompt.into(),
            color,
        }
    }

    /// Prompt text.
    #[inline]
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

impl LineSource for PromptReader {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        {
            let mut out = self.out.lock();
            if self.color {
                write!(out, "{}", self.prompt.as_str().bold())?;
            } else {
                write!(out, "{}", self.prompt)?;
            }
            out.flush()?;
        }

        let line = self.inner.next_line()?;
        if line.is_none() {
            // Leave the terminal on a fresh line after ^D
            writeln!(self.out.lock())?;
        }
        Ok(line)
    }
}

// ============================================================================
// Reader Thread
// ============================================================================

/// Moves `source` onto its own thread and streams its lines.
///
/// The channel closes after end of input or after the first read error,
/// which is delivered as the last item.
///
/// # Errors
///
/// Returns an error if the thread cannot be spawned.
pub fn spawn_reader(
    mut source: Box<dyn LineSource>,
) -> io::Result<mpsc::Receiver<io::Result<String>>> {
    let (tx, rx) = mpsc::channel(1);

    thread::Builder::new()
        .name("ws-input".into())
        .spawn(move || {
            loop {
                let item = match source.next_line() {
                    Ok(Some(line)) => Ok(line),
                    Ok(None) => break,
                    Err(e) => Err(e),
                };
                let failed = item.is_err();
                if tx.blocking_send(item).is_err() || failed {
                    break;
                }
            }
            debug!("Input reader finished");
        })?;

    Ok(rx)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;

    #[test]
    fn test_plain_reader_strips_terminators() {
        let mut reader = PlainReader::new(Cursor::new("hello\r\n  spaced  out \n\nlast"));

        assert_eq!(reader.next_line().unwrap().as_deref(), Some("hello"));
        assert_eq!(reader.next_line().unwrap().as_deref(), Some("  spaced  out "));
        assert_eq!(reader.next_line().unwrap().as_deref(), Some(""));
        assert_eq!(reader.next_line().unwrap().as_deref(), Some("last"));
        assert_eq!(reader.next_line().unwrap(), None);
    }

    #[tokio::test]
    async fn test_spawn_reader_streams_then_closes() {
        let source = PlainReader::new(Cursor::new("a\nb\n"));
        let mut rx = spawn_reader(Box::new(source)).expect("spawn");

        assert_eq!(rx.recv().await.unwrap().unwrap(), "a");
        assert_eq!(rx.recv().await.unwrap().unwrap(), "b");
        assert!(rx.recv().await.is_none());
    }

    struct FailingSource;

    impl LineSource for FailingSource {
        fn next_line(&mut self) -> io::Result<Option<String>> {
            Err(io::Error::new(io::ErrorKind::InvalidData, "not utf-8"))
        }
    }

    #[tokio::test]
    async fn test_spawn_reader_stops_after_error() {
        let mut rx = spawn_reader(Box::new(FailingSource)).expect("spawn");

        assert!(rx.recv().await.unwrap().is_err());
        assert!(rx.recv().await.is_none());
    }
}
