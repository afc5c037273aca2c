//! Custom handshake headers from `"Key: Value"` strings.
//!
//! Parsing is deliberately lenient: anything that is not exactly one key and
//! one value separated by a single `:` is dropped without a diagnostic.
//!
//! # Example
//!
//! ```
//! use wsc::Headers;
//!
//! let headers = Headers::from_raw(["X-Token: abc", "broken", "X-Token: def"]);
//! assert_eq!(headers.get("X-Token"), Some(&["abc".to_string(), "def".to_string()][..]));
//! assert_eq!(headers.len(), 1);
//! ```

// ============================================================================
// Imports
// ============================================================================

use tokio_tungstenite::tungstenite::http::{HeaderMap, HeaderName, HeaderValue};

use crate::error::{Error, Result};

// ============================================================================
// Headers
// ============================================================================

/// Ordered header map, name to values.
///
/// Names are kept as given (case-preserving) and compared exactly.
/// Values for a repeated name keep their input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, Vec<String>)>,
}

impl Headers {
    /// Creates an empty header map.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a header map from raw `"Key: Value"` entries.
    ///
    /// Malformed entries are skipped; see [`Headers::parse_entry`].
    #[must_use]
    pub fn from_raw<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut headers = Self::new();
        for entry in raw {
            if let Some((name, value)) = Self::parse_entry(entry.as_ref()) {
                headers.add(name, value);
            }
        }
        headers
    }

    /// Splits one raw entry into a trimmed `(name, value)` pair.
    ///
    /// Returns `None` unless the entry contains exactly one `:` and both
    /// sides are non-empty after trimming.
    #[must_use]
    pub fn parse_entry(raw: &str) -> Option<(&str, &str)> {
        let mut parts = raw.split(':');
        let name = parts.next()?.trim();
        let value = parts.next()?.trim();

        if parts.next().is_some() || name.is_empty() || value.is_empty() {
            return None;
        }
        Some((name, value))
    }

    /// Appends a value under `name`.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();

        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((name, vec![value])),
        }
    }

    /// Returns all values for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
    }

    /// Number of distinct header names.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no headers are set.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(name, value)` pairs, names in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().flat_map(|(name, values)| {
            values
                .iter()
                .map(move |value| (name.as_str(), value.as_str()))
        })
    }

    /// Encodes every pair as HTTP, keeping repeated values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHeader`] for the first name or value that is
    /// not valid on the wire.
    pub fn to_header_map(&self) -> Result<HeaderMap> {
        let mut map = HeaderMap::new();
        for (name, value) in self.iter() {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::invalid_header(name, e.to_string()))?;
            let header_value =
                HeaderValue::from_str(value).map_err(|e| Error::invalid_header(name, e.to_string()))?;
            map.append(header_name, header_value);
        }
        Ok(map)
    }
}

// ============================================================================
// Tests
// ============================================================================
