//! Terminal input and output.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `input` | [`LineSource`] with plain and prompting readers |
//! | `output` | [`OutputSink`] and message formatting |

// ============================================================================
// Submodules
// ============================================================================

/// Line sources.
pub mod input;

/// Output sink and formatting.
pub mod output;

// ============================================================================
// Re-exports
// ============================================================================

pub use input::{DEFAULT_PROMPT, LineSource, PlainReader, PromptReader, spawn_reader};
pub use output::{OutputSink, TerminalSink, color_enabled, format_diagnostic, format_message};
