//! Error types for output rendering.

use thiserror::Error;

/// Result type for output operations.
pub type Result<T> = std::result::Result<T, OutputError>;

/// Errors that can occur while rendering output.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Chart rendered with no series
    #[error("Chart has no series to render")]
    NoSeries,
}
