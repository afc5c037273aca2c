//! Builder pattern for client configuration.
//!
//! Provides a fluent API for configuring and creating [`Client`] instances.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use wsc::Client;
//!
//! # fn example() -> wsc::Result<()> {
//! let client = Client::builder()
//!     .url("ws://localhost:8080/echo")
//!     .header("X-Token", "abc")
//!     .close_timeout(Duration::from_millis(500))
//!     .build()?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};
use crate::session::SessionConfig;

use super::core::Client;
use super::headers::Headers;

// ============================================================================
// ClientBuilder
// ============================================================================

/// Builder for configuring a [`Client`].
///
/// Use [`Client::builder()`] to create a new builder.
#[derive(Debug, Default, Clone)]
pub struct ClientBuilder {
    /// Server URL, unparsed.
    url: Option<String>,
    /// Handshake headers.
    headers: Headers,
    /// Session settings.
    config: SessionConfig,
}

// ============================================================================
// ClientBuilder Implementation
// ============================================================================

impl ClientBuilder {
    /// Creates a new builder with default settings.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the server URL (`ws://` or `wss://`).
    #[inline]
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Adds one handshake header.
    #[inline]
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.add(name, value);
        self
    }

    /// Adds every header from a parsed map.
    #[must_use]
    pub fn headers(mut self, headers: &Headers) -> Self {
        for (name, value) in headers.iter() {
            self.headers.add(name, value);
        }
        self
    }

    /// Sets how long to wait for the peer after sending a close frame.
    #[inline]
    #[must_use]
    pub fn close_timeout(mut self, timeout: Duration) -> Self {
        self.config.close_timeout = timeout;
        self
    }

    /// Builds the client with validation.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if no URL was set, the scheme is not a
    ///   WebSocket scheme, or the close timeout is zero
    /// - [`Error::InvalidUrl`] if the URL does not parse
    /// - [`Error::InvalidHeader`] if a header is not valid HTTP
    pub fn build(self) -> Result<Client> {
        let url = self.validate_url()?;
        self.validate_headers()?;
        self.validate_config()?;

        Ok(Client::new(url, self.headers, self.config))
    }
}

// ============================================================================
// Validation
// ============================================================================

impl ClientBuilder {
    /// Validates the URL.
    fn validate_url(&self) -> Result<Url> {
        let raw = self
            .url
            .as_deref()
            .ok_or_else(|| Error::invalid_argument("the required argument URL was not provided"))?;

        let url = Url::parse(raw)?;
        match url.scheme() {
            "ws" | "wss" => Ok(url),
            scheme => Err(Error::invalid_argument(format!(
                "unsupported URL scheme {scheme:?}, expected ws or wss"
            ))),
        }
    }

    /// Validates that every header can go on the wire.
    fn validate_headers(&self) -> Result<()> {
        self.headers.to_header_map()?;
        Ok(())
    }

    /// Validates session settings.
    fn validate_config(&self) -> Result<()> {
        if self.config.close_timeout.is_zero() {
            return Err(Error::invalid_argument("close timeout must be non-zero"));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
