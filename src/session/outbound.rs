//! Outbound pump: user input to connection.

// ============================================================================
// Imports
// ============================================================================

use std::io;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::console::OutputSink;
use crate::transport::{Connection, Frame};

use super::PumpExit;
use super::signal::Signal;

// ============================================================================
// Pump
// ============================================================================

/// Sends each non-blank input line as one text frame.
///
/// - end of input raises `interrupt`, routing it through the close handshake
/// - a send failure is reported as `write` and fires `done`
/// - once either signal is set, no further frames are sent
///
/// Lines go out unmodified; only lines that are empty after trimming are
/// skipped.
pub async fn run(
    connection: Arc<dyn Connection>,
    mut lines: mpsc::Receiver<io::Result<String>>,
    sink: Arc<dyn OutputSink>,
    done: Signal,
    interrupt: Signal,
) -> PumpExit {
    loop {
        let next = tokio::select! {
            biased;
            () = done.wait() => return PumpExit::Cancelled,
            () = interrupt.wait() => return PumpExit::Cancelled,
            next = lines.recv() => next,
        };

        match next {
            Some(Ok(line)) => {
                if line.trim().is_empty() {
                    continue;
                }

                trace!(len = line.len(), "Sending line");
                if let Err(e) = connection.send_frame(Frame::Text(line)).await {
                    debug!(error = %e, "Send failed");
                    sink.diagnostic("write", &e);
                    done.fire();
                    return PumpExit::SendFailed;
                }
            }
            Some(Err(e)) => {
                sink.diagnostic("input", &e);
                interrupt.fire();
                return PumpExit::InputFailed;
            }
            None => {
                debug!("Input exhausted");
                interrupt.fire();
                return PumpExit::InputEnded;
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
