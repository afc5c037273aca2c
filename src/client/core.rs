//! Configured client and the WebSocket handshake.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tracing::{debug, info};
use url::Url;

use crate::error::{Error, Result};
use crate::session::SessionConfig;
use crate::transport::WsConnection;

use super::builder::ClientBuilder;
use super::headers::Headers;

// ============================================================================
// Client
// ============================================================================

/// A validated connection target.
///
/// Create with [`Client::builder()`], then call [`Client::connect`].
#[derive(Clone)]
pub struct Client {
    /// Server URL.
    url: Url,
    /// Headers attached to the upgrade request.
    headers: Headers,
    /// Settings handed to the session.
    config: SessionConfig,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("url", &self.url.as_str())
            .field("headers", &self.headers.len())
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a configuration builder.
    #[inline]
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Creates a client from validated parts.
    pub(crate) fn new(url: Url, headers: Headers, config: SessionConfig) -> Self {
        Self {
            url,
            headers,
            config,
        }
    }

    /// Server URL.
    #[inline]
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Handshake headers.
    #[inline]
    #[must_use]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Session settings.
    #[inline]
    #[must_use]
    pub fn session_config(&self) -> &SessionConfig {
        &self.config
    }

    /// Builds the HTTP upgrade request with custom headers attached.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHeader`] if a header cannot be encoded.
    pub fn request(&self) -> Result<Request> {
        let mut request = self.url.as_str().into_client_request()?;

        // `extend` would replace values for a name already present
        let extra = self.headers.to_header_map()?;
        for (name, value) in &extra {
            request.headers_mut().append(name.clone(), value.clone());
        }

        Ok(request)
    }

    /// Dials the server and completes the WebSocket handshake.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] if the dial or upgrade fails.
    pub async fn connect(&self) -> Result<WsConnection> {
        let request = self.request()?;
        debug!(url = %self.url, headers = self.headers.len(), "Dialing");

        let (stream, response) = connect_async(request)
            .await
            .map_err(|e| Error::connection(self.url.as_str(), e.to_string()))?;

        info!(url = %self.url, status = %response.status(), "WebSocket connection established");

        Ok(WsConnection::new(stream))
    }
}

// ============================================================================
// Tests
// ============================================================================
