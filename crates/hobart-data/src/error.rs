//! Error types for data operations.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur during data operations.
#[derive(Debug, Error)]
pub enum DataError {
    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success HTTP response
    #[error("HTTP {status} for {url}")]
    Http {
        /// Status code returned by the server
        status: u16,
        /// URL that was requested
        url: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// XML parsing error
    #[error("XML parsing error: {0}")]
    XmlParse(String),

    /// Text normalization error
    #[error("Text normalization error: {0}")]
    Text(#[from] hobart_text::TextError),

    /// Data parsing error
    #[error("Data parsing error: {0}")]
    Parse(String),

    /// CIK not found for ticker
    #[error("CIK not found for ticker: {0}")]
    CikNotFound(String),

    /// Invalid symbol
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Mismatched document markers in a filing archive
    #[error("Mismatched document markers: {starts} <DOCUMENT> vs {ends} </DOCUMENT>")]
    DocumentMarkers {
        /// Number of opening markers found
        starts: usize,
        /// Number of closing markers found
        ends: usize,
    },

    /// Sub-document without a type declaration
    #[error("Sub-document has no <TYPE> tag")]
    MissingTypeTag,

    /// Duplicate bar for a symbol
    #[error("Duplicate bar for {symbol} on {date}")]
    DuplicateBar {
        /// Symbol with the duplicate row
        symbol: String,
        /// Date that appears more than once
        date: NaiveDate,
    },

    /// Date not present in the trading calendar
    #[error("Date not in trading calendar: {date}")]
    DateNotFound {
        /// The misaligned date
        date: NaiveDate,
    },

    /// Invalid date range
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date of the range
        start: NaiveDate,
        /// End date of the range
        end: NaiveDate,
    },

    /// Not enough sessions in the calendar for a requested window
    #[error("Window needs {needed} sessions, only {available} available")]
    InsufficientSessions {
        /// Sessions the window requires
        needed: usize,
        /// Sessions the calendar can provide
        available: usize,
    },

    /// Missing data
    #[error("Missing data for {symbol}: {reason}")]
    MissingData {
        /// Symbol that was queried
        symbol: String,
        /// Reason for missing data
        reason: String,
    },
}
