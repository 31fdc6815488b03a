//! Error types for model fitting.

use thiserror::Error;

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors that can occur during panel construction and model fitting.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Matrix or panel axes disagree
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Length required by the other axis
        expected: usize,
        /// Length actually supplied
        actual: usize,
    },

    /// Input contains NaN or infinite values
    #[error("Input contains non-finite values")]
    NonFinite,

    /// Too few observations to estimate a covariance
    #[error("Insufficient data: {rows} rows, need at least 2")]
    InsufficientData {
        /// Number of observation rows supplied
        rows: usize,
    },

    /// Component count outside `1..=n_securities`
    #[error("Invalid component count: requested {requested}, universe has {securities} securities")]
    InvalidComponents {
        /// Number of components requested
        requested: usize,
        /// Number of securities in the panel
        securities: usize,
    },

    /// Security absent from the fitted universe
    #[error("Unknown security: {0}")]
    UnknownSecurity(String),

    /// Operation requires a successful fit
    #[error("Model has not been fitted")]
    NotFitted,

    /// Jacobi iteration exhausted its sweep budget
    #[error("Eigendecomposition did not converge within {sweeps} sweeps")]
    NotConverged {
        /// Sweeps performed before giving up
        sweeps: usize,
    },
}
