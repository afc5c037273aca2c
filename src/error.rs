//! Error types for the WebSocket client.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use wsc::{Client, Result};
//!
//! async fn example() -> Result<()> {
//!     let client = Client::builder().url("ws://localhost:8080/echo").build()?;
//!     let connection = client.connect().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants | Exit code |
//! |----------|----------|-----------|
//! | Argument | [`Error::InvalidArgument`], [`Error::InvalidUrl`], [`Error::InvalidHeader`] | 1 |
//! | Connect | [`Error::Connection`] | 2 |
//! | Transport | [`Error::ConnectionClosed`], [`Error::ClosedByPeer`], [`Error::WebSocket`], [`Error::Io`] | 1 |

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::result::Result as StdResult;

use thiserror::Error;
use tokio_tungstenite::tungstenite::Error as WsError;

// ============================================================================
// Constants
// ============================================================================

/// Exit code for bad usage or arguments.
pub const EXIT_USAGE: i32 = 1;

/// Exit code when the server could not be reached.
pub const EXIT_CONNECT: i32 = 2;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Argument Errors
    // ========================================================================
    /// Invalid command line argument or builder configuration.
    #[error("{message}")]
    InvalidArgument {
        /// Description of the problem.
        message: String,
    },

    /// The URL could not be parsed.
    #[error("could not parse URL: {source}")]
    InvalidUrl {
        /// Underlying parse error.
        #[source]
        source: url::ParseError,
    },

    /// A header passed the builder but is not valid HTTP.
    #[error("invalid header {name:?}: {message}")]
    InvalidHeader {
        /// Header name as given.
        name: String,
        /// Why the header was rejected.
        message: String,
    },

    // ========================================================================
    // Connection Errors
    // ========================================================================
    /// WebSocket handshake or dial failed.
    #[error("could not dial {url}: {message}")]
    Connection {
        /// URL that was dialed.
        url: String,
        /// Description of the failure.
        message: String,
    },

    /// Connection is already closed.
    #[error("connection closed")]
    ConnectionClosed,

    /// Peer sent a close frame.
    #[error("peer closed connection: {code} {reason}")]
    ClosedByPeer {
        /// Close status code.
        code: u16,
        /// Close reason, may be empty.
        reason: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// WebSocket error.
    #[error("{0}")]
    WebSocket(#[from] WsError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates an invalid argument error.
    #[inline]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates an invalid header error.
    #[inline]
    pub fn invalid_header(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a connection error.
    #[inline]
    pub fn connection(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Connection {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates a closed-by-peer error.
    #[inline]
    pub fn closed_by_peer(code: u16, reason: impl Into<String>) -> Self {
        Self::ClosedByPeer {
            code,
            reason: reason.into(),
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(source: url::ParseError) -> Self {
        Self::InvalidUrl { source }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this error was caused by bad user input.
    #[inline]
    #[must_use]
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument { .. } | Self::InvalidUrl { .. } | Self::InvalidHeader { .. }
        )
    }

    /// Returns `true` if this is a connection error.
    #[inline]
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. }
                | Self::ConnectionClosed
                | Self::ClosedByPeer { .. }
                | Self::WebSocket(_)
        )
    }

    /// Process exit code for this error.
    #[inline]
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Connection { .. } => EXIT_CONNECT,
            _ => EXIT_USAGE,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
