//! Inbound pump: connection to output sink.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use chrono::Local;
use tracing::{debug, trace};

use crate::console::OutputSink;
use crate::transport::Connection;

use super::PumpExit;
use super::signal::Signal;

// ============================================================================
// Pump
// ============================================================================

/// Forwards every received payload to `sink` until a receive fails.
///
/// The failure is reported as `read` and fires `done`. Display order is
/// arrival order since frames are handled one at a time.
pub async fn run(
    connection: Arc<dyn Connection>,
    sink: Arc<dyn OutputSink>,
    done: Signal,
) -> PumpExit {
    loop {
        match connection.receive_frame().await {
            Ok(frame) => {
                if let Some(payload) = frame.payload_text() {
                    trace!(len = payload.len(), "Frame received");
                    sink.message(Local::now().time(), &payload);
                }
            }
            Err(e) => {
                debug!(error = %e, "Receive failed");
                sink.diagnostic("read", &e);
                done.fire();
                return PumpExit::ReceiveFailed;
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
