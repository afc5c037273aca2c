//! Command line arguments for the `ws` binary.

// ============================================================================
// Imports
// ============================================================================

use clap::Parser;

use crate::client::{Client, Headers};
use crate::error::Result;

// ============================================================================
// Args
// ============================================================================

/// `ws [OPTIONS] URL`
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(
    name = "ws",
    about = "Interactive WebSocket client",
    override_usage = "ws [OPTIONS] URL",
    disable_version_flag = true
)]
pub struct Args {
    /// WebSocket URL to connect to (ws:// or wss://).
    #[arg(value_name = "URL")]
    pub url: Option<String>,

    /// Custom HTTP header. You can specify as many as needed by repeating the flag.
    #[arg(short = 'H', long = "header", value_name = "HEADER")]
    pub headers: Vec<String>,

    /// Print the version information and exit.
    #[arg(short = 'v', long = "version")]
    pub version: bool,

    /// Disable colored output.
    #[arg(long)]
    pub no_color: bool,
}

impl Args {
    /// Builds the client from the parsed arguments.
    ///
    /// Malformed `-H` entries are dropped silently.
    ///
    /// # Errors
    ///
    /// Returns an argument error if the URL is missing or invalid, or a
    /// header cannot be sent.
    pub fn client(&self) -> Result<Client> {
        let mut builder = Client::builder().headers(&Headers::from_raw(&self.headers));
        if let Some(url) = &self.url {
            builder = builder.url(url);
        }
        builder.build()
    }
}

// ============================================================================
// Version
// ============================================================================

/// Version line printed by `-v`.
///
/// Includes the revision when built with `WS_REVISION` set.
#[must_use]
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("WS_REVISION") {
        Some(revision) if !revision.is_empty() => format!("ws version {version} ({revision})"),
        _ => format!("ws version {version}"),
    }
}

// ============================================================================
// Tests
// ============================================================================
