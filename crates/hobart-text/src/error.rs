//! Error types for text processing.

use thiserror::Error;

/// Result type for text processing operations.
pub type Result<T> = std::result::Result<T, TextError>;

/// Errors that can occur during text processing.
#[derive(Debug, Error)]
pub enum TextError {
    /// Invalid token pattern
    #[error("Invalid token pattern: {0}")]
    Pattern(String),
}
