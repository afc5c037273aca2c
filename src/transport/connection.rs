//! Duplex frame connection.
//!
//! [`Connection`] is the seam between the session logic and the wire.
//! [`WsConnection`] implements it over a `tokio-tungstenite` stream.
//!
//! # Concurrency
//!
//! The stream is split into a read half and a write half, each behind its
//! own async mutex. One task may read while others write; writes are
//! serialized, so the outbound pump and the close handshake never interleave
//! partial frames.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::Mutex as AsyncMutex;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, trace};

use crate::error::{Error, Result};

use super::Frame;

// ============================================================================
// Types
// ============================================================================

/// Client-side WebSocket stream as returned by the handshake.
pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

// ============================================================================
// Connection
// ============================================================================

/// An established duplex framed-message channel.
///
/// Implementations must tolerate one concurrent reader alongside writers.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Waits for the next data frame.
    ///
    /// # Errors
    ///
    /// - [`Error::ClosedByPeer`] when the peer sends a close frame
    /// - [`Error::ConnectionClosed`] when the stream ends
    /// - [`Error::WebSocket`] on transport or protocol errors
    async fn receive_frame(&self) -> Result<Frame>;

    /// Sends one frame.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionClosed`] after [`close`](Self::close)
    /// - [`Error::WebSocket`] if the write fails
    async fn send_frame(&self, frame: Frame) -> Result<()>;

    /// Releases the transport. Calling it again is a no-op.
    ///
    /// This never starts a close handshake; send [`Frame::normal_close`]
    /// first for an orderly close.
    async fn close(&self) -> Result<()>;
}

// ============================================================================
// WsConnection
// ============================================================================

/// [`Connection`] over a `tokio-tungstenite` client stream.
pub struct WsConnection {
    /// Read half, `None` once released.
    reader: AsyncMutex<Option<SplitStream<WsStream>>>,
    /// Write half, `None` once released.
    writer: AsyncMutex<Option<SplitSink<WsStream, Message>>>,
    /// Set once `close` has run.
    released: AtomicBool,
}

impl fmt::Debug for WsConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WsConnection")
            .field("released", &self.is_released())
            .finish_non_exhaustive()
    }
}

impl WsConnection {
    /// Wraps a connected stream.
    pub(crate) fn new(stream: WsStream) -> Self {
        let (writer, reader) = stream.split();
        Self {
            reader: AsyncMutex::new(Some(reader)),
            writer: AsyncMutex::new(Some(writer)),
            released: AtomicBool::new(false),
        }
    }

    /// Returns `true` once the connection has been released.
    #[inline]
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }
}

#[async_trait]
impl Connection for WsConnection {
    async fn receive_frame(&self) -> Result<Frame> {
        let mut guard = self.reader.lock().await;
        let reader = guard.as_mut().ok_or(Error::ConnectionClosed)?;

        loop {
            match reader.next().await {
                Some(Ok(message)) => match Frame::from_message(message) {
                    Some(Frame::Close { code, reason }) => {
                        debug!(code, %reason, "Close frame received");
                        return Err(Error::closed_by_peer(code, reason));
                    }
                    Some(frame) => return Ok(frame),
                    None => trace!("Control frame handled by transport"),
                },
                Some(Err(e)) => return Err(e.into()),
                None => return Err(Error::ConnectionClosed),
            }
        }
    }

    async fn send_frame(&self, frame: Frame) -> Result<()> {
        if self.is_released() {
            return Err(Error::ConnectionClosed);
        }

        let close = frame.is_close();
        let mut guard = self.writer.lock().await;
        let writer = guard.as_mut().ok_or(Error::ConnectionClosed)?;
        writer.send(frame.into()).await?;

        if close {
            debug!("Close frame sent");
        }
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        if self.released.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        debug!("Releasing connection");
        let Some(writer) = self.writer.lock().await.take() else {
            return Ok(());
        };

        // A reader still parked in `receive_frame` keeps its half; the socket
        // then closes when that half is dropped with the connection.
        let Ok(mut reader) = self.reader.try_lock() else {
            trace!("Read half busy, dropping write half only");
            return Ok(());
        };
        let Some(reader) = reader.take() else {
            return Ok(());
        };

        match reader.reunite(writer) {
            Ok(mut stream) => {
                // Shut the socket down directly: going through the sink would
                // queue a close frame.
                stream.get_mut().shutdown().await?;
                Ok(())
            }
            Err(_) => Err(Error::ConnectionClosed),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
