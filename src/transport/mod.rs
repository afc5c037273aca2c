//! WebSocket transport layer.
//!
//! The session logic only sees the [`Connection`] trait; this module supplies
//! the frame type and the `tokio-tungstenite` implementation.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `connection` | [`Connection`] trait and [`WsConnection`] |
//! | `frame` | [`Frame`] and close codes |

// ============================================================================
// Submodules
// ============================================================================

/// Duplex connection trait and WebSocket implementation.
pub mod connection;

/// Frame type.
pub mod frame;

// ============================================================================
// Re-exports
// ============================================================================

pub use connection::{Connection, WsConnection, WsStream};
pub use frame::{Frame, NORMAL_CLOSURE};
