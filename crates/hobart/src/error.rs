//! Error type for the facade pipelines.

use thiserror::Error;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, HobartError>;

/// Errors from universe screening and returns loading.
#[derive(Debug, Error)]
pub enum HobartError {
    /// Data layer error
    #[error("Data error: {0}")]
    Data(#[from] hobart_data::DataError),

    /// Model layer error
    #[error("Model error: {0}")]
    Model(#[from] hobart_model::ModelError),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}
