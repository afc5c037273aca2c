//! Interactive session: two pumps and a shutdown coordinator.
//!
//! # Architecture
//!
//! ```text
//!              ┌──────────────┐   payloads   ┌────────────┐
//!  Connection ─► inbound pump ├─────────────►│ OutputSink │
//!       ▲      └──────┬───────┘              └────────────┘
//!       │             │ done
//!       │      ┌──────▼───────┐  interrupt   ┌────────────────┐
//!       │      │ Coordinator  │◄─────────────┤ Ctrl-C / EOF   │
//!       │      └──────▲───────┘              └────────────────┘
//!       │             │ done
//!       │      ┌──────┴───────┐    lines     ┌────────────┐
//!       └──────┤ outbound pump│◄─────────────┤ LineSource │
//!              └──────────────┘              └────────────┘
//! ```
//!
//! Whichever of {inbound failure, outbound failure, interrupt} happens first
//! decides how the session ends. The coordinator is the only place that
//! closes the connection.
//!
//! The blocking line read cannot be cancelled; it lives on its own thread
//! and is reclaimed at process exit. Network-side shutdown is bounded by
//! [`SessionConfig::close_timeout`].

// ============================================================================
// Submodules
// ============================================================================

/// Shutdown state machine.
pub mod coordinator;

/// Connection to output sink.
pub mod inbound;

/// Input lines to connection.
pub mod outbound;

/// Single-fire signals.
pub mod signal;

#[cfg(test)]
pub(crate) mod testing;

// ============================================================================
// Imports
// ============================================================================

use std::io;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::console::{LineSource, OutputSink, spawn_reader};
use crate::error::Result;
use crate::transport::Connection;

// ============================================================================
// Re-exports
// ============================================================================

pub use coordinator::{Coordinator, SessionState, Shutdown};
pub use signal::{Signal, watch_os_interrupts};

// ============================================================================
// Constants
// ============================================================================

/// Default wait for the peer after sending a close frame.
pub const DEFAULT_CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

// ============================================================================
// Types
// ============================================================================

/// Session settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Upper bound on waiting for the peer once a close frame is sent.
    pub close_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            close_timeout: DEFAULT_CLOSE_TIMEOUT,
        }
    }
}

/// Why a pump stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpExit {
    /// Receive failed; Completion fired.
    ReceiveFailed,
    /// Send failed; Completion fired.
    SendFailed,
    /// Input ended; Interrupt raised.
    InputEnded,
    /// Input read failed; Interrupt raised.
    InputFailed,
    /// Stopped because the session was already ending.
    Cancelled,
}

// ============================================================================
// Session
// ============================================================================

/// Per-connection context shared by both pumps and the coordinator.
pub struct Session {
    connection: Arc<dyn Connection>,
    sink: Arc<dyn OutputSink>,
    done: Signal,
    interrupt: Signal,
    config: SessionConfig,
}

impl Session {
    /// Creates a session over an established connection.
    pub fn new(
        connection: Arc<dyn Connection>,
        sink: Arc<dyn OutputSink>,
        config: SessionConfig,
    ) -> Self {
        Self {
            connection,
            sink,
            done: Signal::new("done"),
            interrupt: Signal::new("interrupt"),
            config,
        }
    }

    /// Handle for raising the interrupt from outside, e.g. Ctrl-C.
    #[inline]
    #[must_use]
    pub fn interrupt(&self) -> Signal {
        self.interrupt.clone()
    }

    /// Runs the session reading from `input` until it ends.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if the input thread cannot be
    /// started. The connection is released in that case too.
    pub async fn run(self, input: Box<dyn LineSource>) -> Result<Shutdown> {
        let lines = match spawn_reader(input) {
            Ok(lines) => lines,
            Err(e) => {
                if let Err(release) = self.connection.close().await {
                    warn!(error = %release, "Failed to release connection");
                }
                return Err(e.into());
            }
        };

        Ok(self.run_with_lines(lines).await)
    }

    /// Runs the session with lines already flowing through a channel.
    pub async fn run_with_lines(self, lines: mpsc::Receiver<io::Result<String>>) -> Shutdown {
        let inbound = tokio::spawn(inbound::run(
            Arc::clone(&self.connection),
            Arc::clone(&self.sink),
            self.done.clone(),
        ));
        let outbound = tokio::spawn(outbound::run(
            Arc::clone(&self.connection),
            lines,
            Arc::clone(&self.sink),
            self.done.clone(),
            self.interrupt.clone(),
        ));

        let coordinator = Coordinator::new(
            self.connection,
            self.sink,
            self.done,
            self.interrupt,
            self.config.close_timeout,
        );
        let shutdown = coordinator.run().await;

        inbound.abort();
        outbound.abort();
        debug!("Pumps stopped");

        shutdown
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Instant;

    use futures_util::{SinkExt, StreamExt};
    use regex::Regex;
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;
    use tokio::time::{sleep, timeout};
    use tokio_tungstenite::tungstenite::handshake::server::{Request, Response};

    use crate::client::{Client, Headers};
    use crate::error::Error;
    use crate::session::testing::{MemorySink, ScriptedConnection};
    use crate::transport::Frame;

    fn config(close_timeout: Duration) -> SessionConfig {
        SessionConfig { close_timeout }
    }

    async fn wait_for_messages(sink: &MemorySink, count: usize) {
        timeout(Duration::from_secs(5), async {
            while sink.messages().len() < count {
                sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("messages arrive");
    }

    #[test]
    fn test_default_config() {
        assert_eq!(SessionConfig::default().close_timeout, Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_peer_drop_ends_without_close_frame() {
        let connection = ScriptedConnection::new();
        let sink = MemorySink::new();
        let session = Session::new(connection.clone(), sink.clone(), SessionConfig::default());

        let (_tx, rx) = mpsc::channel(1);
        connection.push_error(Error::ConnectionClosed);

        let shutdown = session.run_with_lines(rx).await;

        assert_eq!(shutdown, Shutdown::PumpFailed);
        assert_eq!(connection.close_frames_sent(), 0);
        assert_eq!(connection.close_calls(), 1);
        assert_eq!(sink.diagnostics(), vec!["ws: read: connection closed"]);
    }

    #[tokio::test]
    async fn test_send_failure_ends_session() {
        let connection = ScriptedConnection::new();
        connection.fail_sends();
        let sink = MemorySink::new();
        let session = Session::new(connection.clone(), sink.clone(), SessionConfig::default());

        let (tx, rx) = mpsc::channel(1);
        tx.send(Ok("hello".to_string())).await.expect("send");

        let shutdown = session.run_with_lines(rx).await;

        assert_eq!(shutdown, Shutdown::PumpFailed);
        assert_eq!(connection.close_calls(), 1);
        assert_eq!(sink.diagnostics(), vec!["ws: write: connection closed"]);
    }

    #[tokio::test]
    async fn test_input_end_runs_close_handshake() {
        let connection = ScriptedConnection::new();
        connection.ack_close();
        let sink = MemorySink::new();
        let session = Session::new(connection.clone(), sink.clone(), config(Duration::from_secs(5)));

        let (tx, rx) = mpsc::channel(4);
        tx.send(Ok("hello".to_string())).await.expect("send");
        tx.send(Ok(String::new())).await.expect("send");
        drop(tx);

        let started = Instant::now();
        let shutdown = session.run_with_lines(rx).await;

        assert_eq!(shutdown, Shutdown::Acknowledged);
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(
            connection.sent(),
            vec![Frame::text("hello"), Frame::normal_close()]
        );
        assert_eq!(connection.close_calls(), 1);
    }

    #[tokio::test]
    async fn test_external_interrupt_with_silent_peer() {
        let connection = ScriptedConnection::new();
        let sink = MemorySink::new();
        let session = Session::new(connection.clone(), sink, config(Duration::from_millis(200)));
        let interrupt = session.interrupt();

        let (_tx, rx) = mpsc::channel(1);
        let task = tokio::spawn(session.run_with_lines(rx));

        let started = Instant::now();
        interrupt.fire();
        let shutdown = timeout(Duration::from_secs(2), task)
            .await
            .expect("bounded shutdown")
            .expect("join");

        assert_eq!(shutdown, Shutdown::TimedOut);
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(connection.close_frames_sent(), 1);
        assert_eq!(connection.close_calls(), 1);
    }

    #[tokio::test]
    async fn test_failed_release_after_handshake() {
        let connection = ScriptedConnection::new();
        connection.ack_close();
        connection.fail_close();
        let sink = MemorySink::new();
        let session = Session::new(connection.clone(), sink.clone(), SessionConfig::default());

        let (tx, rx) = mpsc::channel(1);
        drop(tx);

        let shutdown = session.run_with_lines(rx).await;

        assert_eq!(shutdown, Shutdown::Acknowledged);
        assert_eq!(connection.close_frames_sent(), 1);
        assert_eq!(connection.close_calls(), 1);

        // Only the peer's close is reported; the release error goes to the log
        let diagnostics = sink.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].starts_with("ws: read: "));
    }

    #[tokio::test]
    async fn test_end_to_end_echo() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("addr").port();
        let (token_tx, token_rx) = oneshot::channel();

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.expect("accept");
            let mut token = None;
            let ws = tokio_tungstenite::accept_hdr_async(stream, |req: &Request, resp: Response| {
                token = req
                    .headers()
                    .get("x-token")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_owned);
                Ok(resp)
            })
            .await
            .expect("handshake");
            let _ = token_tx.send(token);

            let (mut write, mut read) = ws.split();
            while let Some(Ok(message)) = read.next().await {
                if message.is_text() {
                    write.send(message).await.expect("echo");
                }
            }
        });

        let client = Client::builder()
            .url(format!("ws://127.0.0.1:{port}/echo"))
            .headers(&Headers::from_raw(["X-Token: abc", "malformed"]))
            .build()
            .expect("valid config");
        let connection = client.connect().await.expect("connect");

        let sink = MemorySink::new();
        let session = Session::new(
            Arc::new(connection),
            sink.clone(),
            client.session_config().clone(),
        );

        let (tx, rx) = mpsc::channel(1);
        let task = tokio::spawn(session.run_with_lines(rx));

        assert_eq!(token_rx.await.expect("token"), Some("abc".to_string()));

        tx.send(Ok("hello".to_string())).await.expect("send");
        wait_for_messages(&sink, 1).await;

        let re = Regex::new(r"^\d\d:\d\d:\d\d hello$").expect("regex");
        assert!(re.is_match(&sink.messages()[0]));

        // End of input triggers the close handshake
        drop(tx);
        let shutdown = timeout(Duration::from_secs(2), task)
            .await
            .expect("bounded shutdown")
            .expect("join");

        assert_eq!(shutdown, Shutdown::Acknowledged);
        server.await.expect("server");
    }
}
