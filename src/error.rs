//! Error types
//!
//! Typed errors returned by the helper functions. Application-level code
//! (config loading, the CLI) wraps these with `anyhow` context.

use thiserror::Error;

/// Errors produced by parsing and slicing helpers
///
/// Validation never errors: a non-match is a valid `false`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KitError {
    /// Input did not match the expected textual layout
    #[error("malformed input {input:?}: expected {layout}")]
    MalformedInput { input: String, layout: &'static str },

    /// Grapheme range lies outside the string
    #[error("range {start}..{end} out of bounds for length {len}")]
    Range { start: usize, end: usize, len: usize },

    /// Timestamp string is not a finite, representable number of seconds
    #[error("invalid timestamp: {0:?}")]
    InvalidTimestamp(String),

    /// Color string is not six hex digits
    #[error("invalid color: {0:?}")]
    InvalidColor(String),

    /// UTC offset string is not `+HH:MM` / `-HH:MM`
    #[error("invalid UTC offset: {0:?}")]
    InvalidOffset(String),
}

impl KitError {
    pub(crate) fn malformed(input: &str, layout: &'static str) -> Self {
        KitError::MalformedInput {
            input: input.to_owned(),
            layout,
        }
    }
}

/// Result alias for library helpers
pub type KitResult<T> = std::result::Result<T, KitError>;
