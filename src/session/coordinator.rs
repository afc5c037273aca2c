//! Shutdown coordinator.
//!
//! # State Machine
//!
//! ```text
//!            interrupt                  done / timeout
//! Running ─────────────► Closing ──────────────────────► Closed
//!    │                      │ close frame send failed       ▲
//!    │                      └───────────────────────────────┤
//!    └──────────────────────── done ────────────────────────┘
//! ```
//!
//! Every path ends in `Closed`, where the connection is released once.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::console::OutputSink;
use crate::transport::{Connection, Frame};

use super::signal::Signal;

// ============================================================================
// Types
// ============================================================================

/// Coordinator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Both pumps active.
    Running,
    /// Close frame sent, waiting for the peer.
    Closing,
    /// Terminal.
    Closed,
}

/// Which path the coordinator took to [`SessionState::Closed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shutdown {
    /// A pump failed before any interrupt; no close frame was sent.
    PumpFailed,
    /// Close frame sent and the connection ended within the timeout.
    Acknowledged,
    /// Close frame sent, peer did not respond in time.
    TimedOut,
    /// Sending the close frame failed.
    CloseFailed,
}

// ============================================================================
// Coordinator
// ============================================================================

/// Arbitrates between Completion and Interrupt and runs the close handshake.
pub struct Coordinator {
    connection: Arc<dyn Connection>,
    sink: Arc<dyn OutputSink>,
    done: Signal,
    interrupt: Signal,
    close_timeout: Duration,
    state: Mutex<SessionState>,
}

impl Coordinator {
    /// Creates a coordinator in [`SessionState::Running`].
    pub fn new(
        connection: Arc<dyn Connection>,
        sink: Arc<dyn OutputSink>,
        done: Signal,
        interrupt: Signal,
        close_timeout: Duration,
    ) -> Self {
        Self {
            connection,
            sink,
            done,
            interrupt,
            close_timeout,
            state: Mutex::new(SessionState::Running),
        }
    }

    /// Current state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> SessionState {
        *self.state.lock()
    }

    fn transition(&self, next: SessionState) {
        let mut state = self.state.lock();
        debug!(from = ?*state, to = ?next, "Session state");
        *state = next;
    }

    /// Blocks until the session ends, then releases the connection.
    ///
    /// Once a close frame has been sent this returns within the close
    /// timeout, whatever the peer does.
    pub async fn run(&self) -> Shutdown {
        let shutdown = self.arbitrate().await;

        self.transition(SessionState::Closed);
        if let Err(e) = self.connection.close().await {
            warn!(error = %e, "Failed to release connection");
        }

        info!(?shutdown, "Session closed");
        shutdown
    }

    async fn arbitrate(&self) -> Shutdown {
        tokio::select! {
            () = self.done.wait() => return Shutdown::PumpFailed,
            () = self.interrupt.wait() => {}
        }

        self.transition(SessionState::Closing);

        if let Err(e) = self.connection.send_frame(Frame::normal_close()).await {
            self.sink.diagnostic("write close", &e);
            return Shutdown::CloseFailed;
        }

        match timeout(self.close_timeout, self.done.wait()).await {
            Ok(()) => Shutdown::Acknowledged,
            Err(_) => {
                debug!(timeout = ?self.close_timeout, "Peer did not close in time");
                Shutdown::TimedOut
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
