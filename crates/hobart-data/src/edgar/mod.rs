//! SEC EDGAR filing acquisition.
//!
//! This module pulls company filings from EDGAR and prepares them for
//! text analysis:
//! - Ticker to CIK resolution from a local table
//! - Rate-limited, memoized index feed queries
//! - Full-text archive download, splitting, and type classification
//! - Normalization of matching sub-documents into token lists
//!
//! # Example
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use hobart_data::edgar::{EdgarClient, FilingQuery, FilingReader, TickerTable};
//! use hobart_text::Normalizer;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let table = TickerTable::from_csv_path("tickers.csv")?;
//!     let reader = FilingReader::new(EdgarClient::new()?, table, Normalizer::new()?);
//!
//!     let cutoff = NaiveDate::from_ymd_opt(2019, 12, 31).unwrap();
//!     let query = FilingQuery::new("10-K", cutoff);
//!     let filings = reader.filings_for("BMY", &query).await?;
//!     println!("Found filings on {} dates", filings.len());
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod documents;
pub mod feed;
pub mod reader;
pub mod tickers;

// Re-export main types
pub use client::{EdgarClient, EdgarConfig};
pub use documents::{document_type, matches_form, split_documents};
pub use feed::{FilingFeed, IndexEntry, IndexQuery, filter_entries, parse_index};
pub use reader::{DatedTokenDocs, FilingQuery, FilingReader};
pub use tickers::{TickerTable, pad_cik};
