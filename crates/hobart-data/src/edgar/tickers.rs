//! Ticker to CIK resolution.

use crate::error::{DataError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// One row of the ticker table.
#[derive(Debug, Clone, Deserialize)]
struct TickerRow {
    ticker: String,
    cik: String,
}

/// Ticker to CIK lookup table loaded from a CSV file.
///
/// The table must carry `ticker` and `cik` columns; extra columns are
/// ignored. CIKs stay strings so leading zeros survive; [`pad_cik`]
/// normalizes them at URL-build time. Lookups are case-insensitive on
/// ticker.
#[derive(Debug, Clone, Default)]
pub struct TickerTable {
    rows: Vec<(String, String)>,
    by_ticker: HashMap<String, String>,
}

impl TickerTable {
    /// Load the table from a CSV file on disk.
    ///
    /// # Errors
    /// Returns `DataError::Csv` for unreadable files or malformed rows.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let reader = csv::Reader::from_path(path)?;
        Self::from_csv(reader)
    }

    /// Load the table from any CSV source.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_csv(csv::Reader::from_reader(reader))
    }

    fn from_csv<R: Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let mut rows = Vec::new();
        let mut by_ticker = HashMap::new();

        for record in reader.deserialize() {
            let row: TickerRow = record?;
            by_ticker.insert(row.ticker.to_uppercase(), row.cik.clone());
            rows.push((row.ticker, row.cik));
        }

        Ok(Self { rows, by_ticker })
    }

    /// Resolve a ticker to its CIK.
    ///
    /// # Errors
    /// Returns `DataError::InvalidSymbol` for an empty ticker and
    /// `DataError::CikNotFound` for an unknown one.
    pub fn cik_for(&self, ticker: &str) -> Result<&str> {
        if ticker.is_empty() {
            return Err(DataError::InvalidSymbol("Empty ticker".to_string()));
        }
        self.by_ticker
            .get(&ticker.to_uppercase())
            .map(String::as_str)
            .ok_or_else(|| DataError::CikNotFound(ticker.to_string()))
    }

    /// Tickers in file order.
    pub fn tickers(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|(ticker, _)| ticker.as_str())
    }

    /// Number of rows in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Zero-pad a CIK to the 10 digits EDGAR URLs expect.
///
/// # Example
/// ```
/// use hobart_data::edgar::pad_cik;
///
/// assert_eq!(pad_cik("320193"), "0000320193");
/// assert_eq!(pad_cik("0000320193"), "0000320193");
/// ```
#[must_use]
pub fn pad_cik(cik: &str) -> String {
    format!("{cik:0>10}")
}
