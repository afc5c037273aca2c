//! Client configuration and connection setup.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Client`] | Validated target; performs the handshake |
//! | [`ClientBuilder`] | Fluent configuration builder |
//! | [`Headers`] | Custom handshake headers |

// ============================================================================
// Submodules
// ============================================================================

/// Fluent builder for client configuration.
pub mod builder;

/// Client and handshake.
pub mod core;

/// Header parsing.
pub mod headers;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::ClientBuilder;
pub use core::Client;
pub use headers::Headers;
