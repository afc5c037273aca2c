//! Test doubles for the session: a scripted connection and a memory sink.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveTime;
use parking_lot::Mutex;
use tokio::sync::Mutex as AsyncMutex;
use tokio::sync::mpsc;

use crate::console::output::{OutputSink, format_diagnostic, format_message};
use crate::error::{Error, Result};
use crate::transport::{Connection, Frame};

// ============================================================================
// ScriptedConnection
// ============================================================================

/// In-memory [`Connection`] driven by the test.
///
/// Receives block until the test pushes a frame or error, which models an
/// unresponsive peer by default.
pub(crate) struct ScriptedConnection {
    incoming_tx: mpsc::UnboundedSender<Result<Frame>>,
    incoming_rx: AsyncMutex<mpsc::UnboundedReceiver<Result<Frame>>>,
    sent: Mutex<Vec<Frame>>,
    closes: AtomicUsize,
    fail_sends: AtomicBool,
    ack_close: AtomicBool,
    fail_close: AtomicBool,
}

impl ScriptedConnection {
    pub(crate) fn new() -> Arc<Self> {
        let (incoming_tx, incoming_rx) = mpsc::unbounded_channel();
        Arc::new(Self {
            incoming_tx,
            incoming_rx: AsyncMutex::new(incoming_rx),
            sent: Mutex::new(Vec::new()),
            closes: AtomicUsize::new(0),
            fail_sends: AtomicBool::new(false),
            ack_close: AtomicBool::new(false),
            fail_close: AtomicBool::new(false),
        })
    }

    /// Queues an inbound frame.
    pub(crate) fn push(&self, frame: Frame) {
        let _ = self.incoming_tx.send(Ok(frame));
    }

    /// Queues an inbound receive error.
    pub(crate) fn push_error(&self, error: Error) {
        let _ = self.incoming_tx.send(Err(error));
    }

    /// Makes every later send fail.
    pub(crate) fn fail_sends(&self) {
        self.fail_sends.store(true, Ordering::SeqCst);
    }

    /// Peer answers a close frame by closing its side.
    pub(crate) fn ack_close(&self) {
        self.ack_close.store(true, Ordering::SeqCst);
    }

    /// Makes releasing the connection report an error.
    pub(crate) fn fail_close(&self) {
        self.fail_close.store(true, Ordering::SeqCst);
    }

    pub(crate) fn sent(&self) -> Vec<Frame> {
        self.sent.lock().clone()
    }

    pub(crate) fn close_frames_sent(&self) -> usize {
        self.sent.lock().iter().filter(|f| f.is_close()).count()
    }

    pub(crate) fn close_calls(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connection for ScriptedConnection {
    async fn receive_frame(&self) -> Result<Frame> {
        self.incoming_rx
            .lock()
            .await
            .recv()
            .await
            .unwrap_or(Err(Error::ConnectionClosed))
    }

    async fn send_frame(&self, frame: Frame) -> Result<()> {
        if self.fail_sends.load(Ordering::SeqCst) || self.close_calls() > 0 {
            return Err(Error::ConnectionClosed);
        }

        let close = frame.is_close();
        self.sent.lock().push(frame);

        if close && self.ack_close.load(Ordering::SeqCst) {
            self.push_error(Error::closed_by_peer(1000, ""));
        }
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        if self.fail_close.load(Ordering::SeqCst) {
            return Err(Error::ConnectionClosed);
        }
        Ok(())
    }
}

// ============================================================================
// MemorySink
// ============================================================================

/// [`OutputSink`] that records formatted lines.
#[derive(Default)]
pub(crate) struct MemorySink {
    messages: Mutex<Vec<String>>,
    diagnostics: Mutex<Vec<String>>,
}

impl MemorySink {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    pub(crate) fn diagnostics(&self) -> Vec<String> {
        self.diagnostics.lock().clone()
    }
}

impl OutputSink for MemorySink {
    fn message(&self, at: NaiveTime, payload: &str) {
        self.messages.lock().push(format_message(at, payload));
    }

    fn diagnostic(&self, context: &str, error: &dyn fmt::Display) {
        self.diagnostics.lock().push(format_diagnostic(context, error));
    }
}
