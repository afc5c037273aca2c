//! wsc - Interactive WebSocket client.
//!
//! Connects to a WebSocket URL, sends each line typed by the user as a text
//! frame, and prints inbound frames prefixed with their arrival time.
//!
//! # Architecture
//!
//! A [`Session`] runs two pumps concurrently:
//!
//! - **Inbound**: connection → output sink, until a receive fails
//! - **Outbound**: input lines → connection, until input ends or a send fails
//!
//! A coordinator waits for the first of {pump failure, interrupt}, performs
//! the close handshake when the end was requested, and releases the
//! connection exactly once.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use wsc::{Client, PlainReader, Result, Session, TerminalSink};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = Client::builder()
//!         .url("ws://localhost:8080/echo")
//!         .header("X-Token", "abc")
//!         .build()?;
//!
//!     let connection = client.connect().await?;
//!     let session = Session::new(
//!         Arc::new(connection),
//!         Arc::new(TerminalSink::new(false)),
//!         client.session_config().clone(),
//!     );
//!
//!     session.run(Box::new(PlainReader::stdin())).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`cli`] | Command line arguments |
//! | [`client`] | [`Client`], [`ClientBuilder`], [`Headers`] |
//! | [`console`] | Line sources and output sink |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`session`] | Pumps and shutdown coordinator |
//! | [`transport`] | [`Connection`] trait and WebSocket implementation |

// ============================================================================
// Modules
// ============================================================================

/// Command line arguments.
pub mod cli;

/// Client configuration and handshake.
pub mod client;

/// Terminal input and output.
pub mod console;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Interactive session.
pub mod session;

/// WebSocket transport layer.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

pub use client::{Client, ClientBuilder, Headers};
pub use console::{LineSource, OutputSink, PlainReader, PromptReader, TerminalSink};
pub use error::{Error, Result};
pub use session::{Session, SessionConfig, SessionState, Shutdown, Signal};
pub use transport::{Connection, Frame, WsConnection};
