//! Company filing index feed (Atom).

use crate::cache::MemoCache;
use crate::edgar::client::EdgarClient;
use crate::edgar::tickers::pad_cik;
use crate::error::{DataError, Result};
use chrono::NaiveDate;
use quick_xml::Reader;
use quick_xml::events::Event;
use tokio::sync::Mutex;

/// EDGAR company browse endpoint serving the Atom index feed.
const EDGAR_BROWSE_URL: &str = "https://www.sec.gov/cgi-bin/browse-edgar";

/// Default pagination offset.
pub const DEFAULT_PAGE_START: u32 = 0;

/// Default page size.
pub const DEFAULT_PAGE_COUNT: u32 = 60;

/// Fully-parameterized index lookup; also the memoization key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexQuery {
    /// Company CIK (unpadded accepted)
    pub cik: String,
    /// Form type, e.g. `10-K`
    pub form: String,
    /// Only filings dated at or before this date are kept
    pub cutoff: NaiveDate,
    /// Pagination offset
    pub start: u32,
    /// Page size
    pub count: u32,
}

impl IndexQuery {
    /// Query with default pagination.
    pub fn new(cik: impl Into<String>, form: impl Into<String>, cutoff: NaiveDate) -> Self {
        Self {
            cik: cik.into(),
            form: form.into(),
            cutoff,
            start: DEFAULT_PAGE_START,
            count: DEFAULT_PAGE_COUNT,
        }
    }

    /// The feed URL for this query.
    #[must_use]
    pub fn url(&self) -> String {
        format!(
            "{EDGAR_BROWSE_URL}?action=getcompany&CIK={}&type={}&dateb={}&start={}&count={}&owner=exclude&output=atom",
            pad_cik(&self.cik),
            self.form,
            self.cutoff.format("%Y%m%d"),
            self.start,
            self.count,
        )
    }
}

/// One `<entry>` of the index feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Link to the filing index page
    pub href: String,
    /// Form type as served, e.g. `10-K`
    pub form: String,
    /// Filing date
    pub date: NaiveDate,
}

impl IndexEntry {
    /// URL of the full-text archive for this filing.
    ///
    /// # Example
    /// ```
    /// use chrono::NaiveDate;
    /// use hobart_data::edgar::IndexEntry;
    ///
    /// let entry = IndexEntry {
    ///     href: "https://www.sec.gov/Archives/edgar/data/14272/0000014272-19-000055-index.htm".into(),
    ///     form: "10-K".into(),
    ///     date: NaiveDate::from_ymd_opt(2019, 2, 14).unwrap(),
    /// };
    /// assert_eq!(
    ///     entry.archive_url(),
    ///     "https://www.sec.gov/Archives/edgar/data/14272/0000014272-19-000055.txt",
    /// );
    /// ```
    #[must_use]
    pub fn archive_url(&self) -> String {
        self.href
            .replace("-index.htm", ".txt")
            .replace(".txtl", ".txt")
    }
}

/// Parse the Atom index feed into entries, order preserved as served.
///
/// Entries missing any of `filing-href`, `filing-type` or `filing-date`
/// are skipped; a malformed filing date is an error.
///
/// # Errors
/// Returns `DataError::XmlParse` for malformed XML and
/// `DataError::Parse` for an unparseable filing date.
pub fn parse_index(xml: &str) -> Result<Vec<IndexEntry>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut in_entry = false;
    let mut field: Option<&'static str> = None;
    let mut href: Option<String> = None;
    let mut form: Option<String> = None;
    let mut date: Option<String> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"entry" => in_entry = true,
                b"filing-href" if in_entry => field = Some("href"),
                b"filing-type" if in_entry => field = Some("form"),
                b"filing-date" if in_entry => field = Some("date"),
                _ => field = None,
            },
            Ok(Event::Text(t)) => {
                if let Some(name) = field {
                    let text = t
                        .unescape()
                        .map_err(|e| DataError::XmlParse(format!("XML parse error: {e}")))?
                        .into_owned();
                    match name {
                        "href" => href = Some(text),
                        "form" => form = Some(text),
                        _ => date = Some(text),
                    }
                }
            }
            Ok(Event::End(e)) => {
                field = None;
                if e.name().as_ref() == b"entry" {
                    in_entry = false;
                    if let (Some(href), Some(form), Some(date)) =
                        (href.take(), form.take(), date.take())
                    {
                        let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|e| {
                            DataError::Parse(format!("invalid filing date '{date}': {e}"))
                        })?;
                        entries.push(IndexEntry { href, form, date });
                    }
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(DataError::XmlParse(format!("XML parse error: {e}"))),
        }
        buf.clear();
    }

    Ok(entries)
}

/// Keep entries dated at or before `cutoff` and strictly after
/// `start_date` (`None` keeps everything on that side).
#[must_use]
pub fn filter_entries(
    entries: Vec<IndexEntry>,
    cutoff: NaiveDate,
    start_date: Option<NaiveDate>,
) -> Vec<IndexEntry> {
    entries
        .into_iter()
        .filter(|entry| entry.date <= cutoff)
        .filter(|entry| start_date.is_none_or(|start| entry.date > start))
        .collect()
}

/// Index feed access: rate-limited fetches memoized per query.
#[derive(Debug)]
pub struct FilingFeed {
    client: EdgarClient,
    cache: Mutex<MemoCache<IndexQuery, String>>,
}

impl FilingFeed {
    /// Feed with an unbounded memo cache.
    #[must_use]
    pub fn new(client: EdgarClient) -> Self {
        Self::with_cache(client, MemoCache::unbounded())
    }

    /// Feed with an explicitly constructed memo cache.
    #[must_use]
    pub fn with_cache(client: EdgarClient, cache: MemoCache<IndexQuery, String>) -> Self {
        Self {
            client,
            cache: Mutex::new(cache),
        }
    }

    /// Fetch the raw feed body for a query.
    ///
    /// Repeated identical queries within this process hit the network
    /// exactly once while the cache entry stays resident.
    pub async fn fetch(&self, query: &IndexQuery) -> Result<String> {
        if let Some(body) = self.cache.lock().await.get(query) {
            return Ok(body);
        }
        let body = self.client.get_text(&query.url()).await?;
        self.cache.lock().await.insert(query.clone(), body.clone());
        Ok(body)
    }

    /// Fetch and parse a query's entries, cutoff applied.
    pub async fn entries(&self, query: &IndexQuery) -> Result<Vec<IndexEntry>> {
        let body = self.fetch(query).await?;
        Ok(filter_entries(parse_index(&body)?, query.cutoff, None))
    }

    /// The underlying rate-limited client.
    #[must_use]
    pub const fn client(&self) -> &EdgarClient {
        &self.client
    }

    /// Number of memoized queries.
    pub async fn cached_queries(&self) -> usize {
        self.cache.lock().await.len()
    }
}
