//! Frame type exchanged over a [`Connection`](super::Connection).
//!
//! Ping and pong frames never surface here; the transport answers them.

// ============================================================================
// Imports
// ============================================================================

use std::borrow::Cow;

use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;

// ============================================================================
// Constants
// ============================================================================

/// Status code for a normal closure (RFC 6455 Section 7.4.1).
pub const NORMAL_CLOSURE: u16 = 1000;

/// Status code reported when a close frame carries no status.
pub const NO_STATUS: u16 = 1005;

// ============================================================================
// Frame
// ============================================================================

/// One message unit on the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// UTF-8 text payload.
    Text(String),
    /// Raw binary payload.
    Binary(Vec<u8>),
    /// Close control frame.
    Close {
        /// Status code.
        code: u16,
        /// Optional reason, may be empty.
        reason: String,
    },
}

impl Frame {
    /// Creates a text frame.
    #[inline]
    #[must_use]
    pub fn text(payload: impl Into<String>) -> Self {
        Self::Text(payload.into())
    }

    /// Creates the "normal closure" close frame sent on orderly shutdown.
    #[inline]
    #[must_use]
    pub fn normal_close() -> Self {
        Self::Close {
            code: NORMAL_CLOSURE,
            reason: String::new(),
        }
    }

    /// Returns `true` for close frames.
    #[inline]
    #[must_use]
    pub fn is_close(&self) -> bool {
        matches!(self, Self::Close { .. })
    }

    /// Payload rendered as text.
    ///
    /// Binary payloads are decoded lossily. Close frames have no payload.
    #[must_use]
    pub fn payload_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Text(text) => Some(Cow::Borrowed(text)),
            Self::Binary(bytes) => Some(String::from_utf8_lossy(bytes)),
            Self::Close { .. } => None,
        }
    }
}

// ============================================================================
// Message Conversion
// ============================================================================

impl From<Frame> for Message {
    fn from(frame: Frame) -> Self {
        match frame {
            Frame::Text(text) => Message::Text(text.into()),
            Frame::Binary(bytes) => Message::Binary(bytes.into()),
            Frame::Close { code, reason } => Message::Close(Some(CloseFrame {
                code: CloseCode::from(code),
                reason: reason.into(),
            })),
        }
    }
}

impl Frame {
    /// Converts an incoming message, returning `None` for ping/pong.
    pub(crate) fn from_message(message: Message) -> Option<Self> {
        match message {
            Message::Text(text) => Some(Self::Text(text.as_str().to_owned())),
            Message::Binary(bytes) => Some(Self::Binary(bytes.to_vec())),
            Message::Close(Some(close)) => Some(Self::Close {
                code: u16::from(close.code),
                reason: close.reason.as_str().to_owned(),
            }),
            Message::Close(None) => Some(Self::Close {
                code: NO_STATUS,
                reason: String::new(),
            }),
            Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
