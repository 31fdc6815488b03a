//! Filing acquisition and normalization pipeline.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use hobart_text::Normalizer;
use tracing::warn;

use crate::edgar::client::EdgarClient;
use crate::edgar::documents::{document_type, matches_form, split_documents};
use crate::edgar::feed::{FilingFeed, IndexEntry, IndexQuery, filter_entries};
use crate::edgar::tickers::TickerTable;
use crate::error::Result;

/// Normalized sub-documents keyed by filing date.
///
/// Each date maps to one token list per kept sub-document; a filing
/// whose archive contains no matching sub-document maps to an empty
/// vec.
pub type DatedTokenDocs = BTreeMap<NaiveDate, Vec<Vec<String>>>;

/// Which filings to pull: form type plus date window.
#[derive(Debug, Clone)]
pub struct FilingQuery {
    /// Form type, e.g. `10-K`
    pub form: String,
    /// Keep filings dated at or before this date
    pub cutoff: NaiveDate,
    /// Keep filings dated strictly after this date (`None` keeps all)
    pub start_date: Option<NaiveDate>,
}

impl FilingQuery {
    /// Query with an open start.
    pub fn new(form: impl Into<String>, cutoff: NaiveDate) -> Self {
        Self {
            form: form.into(),
            cutoff,
            start_date: None,
        }
    }

    /// Restrict to filings dated strictly after `start_date`.
    #[must_use]
    pub fn since(mut self, start_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self
    }
}

/// Downloads filings and turns them into normalized token documents.
///
/// Composes the rate-limited client, the memoized index feed, the
/// ticker table, and an injected normalization strategy. One reader
/// drives both single-ticker and whole-table pulls.
///
/// # Example
///
/// ```no_run
/// use chrono::NaiveDate;
/// use hobart_data::edgar::{EdgarClient, FilingQuery, FilingReader, TickerTable};
/// use hobart_text::Normalizer;
///
/// # async fn example() -> hobart_data::Result<()> {
/// let table = TickerTable::from_csv_path("tickers.csv")?;
/// let reader = FilingReader::new(EdgarClient::new()?, table, Normalizer::new()?);
///
/// let cutoff = NaiveDate::from_ymd_opt(2019, 12, 31).unwrap();
/// let filings = reader.filings_for("BMY", &FilingQuery::new("10-K", cutoff)).await?;
/// for (date, docs) in &filings {
///     println!("{date}: {} matching documents", docs.len());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FilingReader {
    feed: FilingFeed,
    table: TickerTable,
    normalizer: Normalizer,
}

impl FilingReader {
    /// Reader over a fresh feed with an unbounded memo cache.
    #[must_use]
    pub fn new(client: EdgarClient, table: TickerTable, normalizer: Normalizer) -> Self {
        Self::with_feed(FilingFeed::new(client), table, normalizer)
    }

    /// Reader over an explicitly constructed feed.
    #[must_use]
    pub fn with_feed(feed: FilingFeed, table: TickerTable, normalizer: Normalizer) -> Self {
        Self {
            feed,
            table,
            normalizer,
        }
    }

    /// Pull one ticker's filings and normalize every matching
    /// sub-document.
    ///
    /// Resolves the CIK, fetches and parses the index feed, and keeps
    /// entries inside the query window whose served form matches
    /// case-insensitively. Each kept entry's archive is downloaded,
    /// split, filtered by declared type, and normalized. An entry that
    /// fails mid-parse is dropped for that date with a warning; the
    /// pull continues.
    ///
    /// # Errors
    ///
    /// Returns an error when the ticker cannot be resolved or the index
    /// feed cannot be fetched or parsed.
    pub async fn filings_for(&self, ticker: &str, query: &FilingQuery) -> Result<DatedTokenDocs> {
        let cik = self.table.cik_for(ticker)?;
        let index = IndexQuery::new(cik, query.form.clone(), query.cutoff);
        let entries = self.feed.entries(&index).await?;
        let entries = filter_entries(entries, query.cutoff, query.start_date);

        let mut filings = DatedTokenDocs::new();
        for entry in entries {
            if !matches_form(&entry.form, &query.form) {
                continue;
            }
            match self.extract_documents(&entry, &query.form).await {
                Ok(docs) => {
                    filings.insert(entry.date, docs);
                }
                Err(e) => warn!(ticker, date = %entry.date, error = %e, "Dropping filing"),
            }
        }

        Ok(filings)
    }

    /// Pull filings for every ticker in the table.
    ///
    /// `on_ticker` is invoked before each ticker is processed, for
    /// progress reporting. A ticker whose pull fails is warned and
    /// skipped; its key is absent from the result.
    pub async fn all_filings(
        &self,
        query: &FilingQuery,
        mut on_ticker: impl FnMut(&str),
    ) -> BTreeMap<String, DatedTokenDocs> {
        let tickers: Vec<String> = self.table.tickers().map(str::to_string).collect();
        let mut by_ticker = BTreeMap::new();

        for ticker in tickers {
            on_ticker(&ticker);
            match self.filings_for(&ticker, query).await {
                Ok(filings) => {
                    by_ticker.insert(ticker, filings);
                }
                Err(e) => warn!(ticker, error = %e, "Skipping ticker"),
            }
        }

        by_ticker
    }

    async fn extract_documents(&self, entry: &IndexEntry, form: &str) -> Result<Vec<Vec<String>>> {
        let raw = self.feed.client().get_text(&entry.archive_url()).await?;

        let mut docs = Vec::new();
        for doc in split_documents(&raw)? {
            if matches_form(&document_type(doc)?, form) {
                docs.push(self.normalizer.clean_document(doc));
            }
        }

        Ok(docs)
    }

    /// The ticker table driving whole-table pulls.
    #[must_use]
    pub const fn table(&self) -> &TickerTable {
        &self.table
    }

    /// The injected normalization strategy.
    #[must_use]
    pub const fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// The underlying index feed.
    #[must_use]
    pub const fn feed(&self) -> &FilingFeed {
        &self.feed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataError;

    fn reader(table_csv: &str) -> FilingReader {
        let table = TickerTable::from_reader(table_csv.as_bytes()).unwrap();
        let normalizer = Normalizer::new().unwrap();
        FilingReader::new(EdgarClient::new().unwrap(), table, normalizer)
    }

    fn query() -> FilingQuery {
        FilingQuery::new("10-K", NaiveDate::from_ymd_opt(2019, 12, 31).unwrap())
    }

    #[test]
    fn test_query_defaults_open_start() {
        let q = query();
        assert_eq!(q.form, "10-K");
        assert_eq!(q.start_date, None);

        let since = NaiveDate::from_ymd_opt(2017, 1, 1).unwrap();
        assert_eq!(query().since(since).start_date, Some(since));
    }

    #[tokio::test]
    async fn test_unknown_ticker_is_loud() {
        let reader = reader("ticker,cik\nBMY,14272\n");
        let result = reader.filings_for("ZZZZ", &query()).await;
        assert!(matches!(result, Err(DataError::CikNotFound(_))));
    }

    #[tokio::test]
    async fn test_all_filings_empty_table() {
        let reader = reader("ticker,cik\n");
        let mut seen = Vec::new();
        let filings = reader.all_filings(&query(), |t| seen.push(t.to_string())).await;
        assert!(filings.is_empty());
        assert!(seen.is_empty());
    }
}
