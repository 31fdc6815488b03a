//! Price bundle loaded from a directory of per-symbol CSV files.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use polars::prelude::*;
use serde::Deserialize;
use tracing::debug;

use crate::bundle::calendar::TradingCalendar;
use crate::dates::{date_to_days, parse_date};
use crate::error::{DataError, Result};

#[derive(Debug, Deserialize)]
struct BarRow {
    date: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

/// One daily OHLCV bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    /// Session date
    pub date: NaiveDate,
    /// Opening price
    pub open: f64,
    /// High price
    pub high: f64,
    /// Low price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Traded volume
    pub volume: f64,
}

/// Per-symbol daily price history loaded from a CSV directory.
///
/// Each `SYMBOL.csv` file carries `date,open,high,low,close,volume`
/// columns; extra columns such as `dividend` and `split` are ignored.
/// Symbols are upper-cased file stems, bars are sorted ascending by
/// date.
///
/// # Example
///
/// ```no_run
/// use hobart_data::bundle::EquityBundle;
///
/// # fn example() -> hobart_data::Result<()> {
/// let bundle = EquityBundle::load("prices/")?;
/// println!("{} symbols, {} sessions", bundle.len(), bundle.calendar().len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct EquityBundle {
    bars: BTreeMap<String, Vec<Bar>>,
}

impl EquityBundle {
    /// Load every `*.csv` file under `dir`.
    ///
    /// # Errors
    ///
    /// Returns `DataError::Io` for unreadable directories,
    /// `DataError::Csv` for malformed rows, `DataError::Parse` for
    /// unparseable dates, and `DataError::DuplicateBar` when a symbol
    /// repeats a date.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let mut bars = BTreeMap::new();

        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("csv") {
                continue;
            }
            let Some(symbol) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let symbol = symbol.to_uppercase();
            let series = load_symbol(&path, &symbol)?;
            debug!(symbol, bars = series.len(), "Loaded price history");
            bars.insert(symbol, series);
        }

        Ok(Self { bars })
    }

    /// Symbols in ascending order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.bars.keys().map(String::as_str)
    }

    /// A symbol's bars, ascending by date.
    #[must_use]
    pub fn bars(&self, symbol: &str) -> Option<&[Bar]> {
        self.bars.get(symbol).map(Vec::as_slice)
    }

    /// Number of symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Whether the bundle holds no symbols.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Calendar over the sorted union of all bar dates.
    #[must_use]
    pub fn calendar(&self) -> TradingCalendar {
        let dates = self
            .bars
            .values()
            .flatten()
            .map(|bar| bar.date)
            .collect();
        TradingCalendar::from_sessions(dates)
    }

    /// Long `[symbol, date, close, volume]` frame over every bar.
    ///
    /// The date column carries the Date dtype (days since epoch).
    pub fn to_frame(&self) -> Result<DataFrame> {
        let total: usize = self.bars.values().map(Vec::len).sum();
        let mut symbols = Vec::with_capacity(total);
        let mut dates = Vec::with_capacity(total);
        let mut closes = Vec::with_capacity(total);
        let mut volumes = Vec::with_capacity(total);

        for (symbol, series) in &self.bars {
            for bar in series {
                symbols.push(symbol.clone());
                dates.push(date_to_days(bar.date));
                closes.push(bar.close);
                volumes.push(bar.volume);
            }
        }

        let date_col = Column::new("date".into(), dates).cast(&DataType::Date)?;
        let df = DataFrame::new(vec![
            Column::new("symbol".into(), symbols),
            date_col,
            Column::new("close".into(), closes),
            Column::new("volume".into(), volumes),
        ])?;

        Ok(df)
    }

    /// Closing prices for `symbol` aligned to a session window.
    ///
    /// Sessions without a bar for the symbol yield `None`; an unknown
    /// symbol yields all `None`.
    #[must_use]
    pub fn close_window(&self, symbol: &str, window: &[NaiveDate]) -> Vec<Option<f64>> {
        let mut closes = Vec::with_capacity(window.len());
        let Some(series) = self.bars.get(symbol) else {
            closes.resize(window.len(), None);
            return closes;
        };

        let mut i = 0;
        for &target in window {
            while i < series.len() && series[i].date < target {
                i += 1;
            }
            if i < series.len() && series[i].date == target {
                closes.push(Some(series[i].close));
            } else {
                closes.push(None);
            }
        }
        closes
    }
}

fn load_symbol(path: &Path, symbol: &str) -> Result<Vec<Bar>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut series = Vec::new();

    for record in reader.deserialize() {
        let row: BarRow = record?;
        series.push(Bar {
            date: parse_date(&row.date)?,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        });
    }

    series.sort_unstable_by_key(|bar| bar.date);
    for pair in series.windows(2) {
        if pair[0].date == pair[1].date {
            return Err(DataError::DuplicateBar {
                symbol: symbol.to_string(),
                date: pair[0].date,
            });
        }
    }

    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::days_to_date;
    use std::fs;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn write_bundle(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        dir
    }

    const AAA: &str = "date,open,high,low,close,volume\n\
                       2019-01-03,10,11,9,10.5,1000\n\
                       2019-01-02,9,10,8,9.5,900\n";
    const BBB: &str = "date,open,high,low,close,volume\n\
                       2019-01-02,20,21,19,20.5,500\n\
                       2019-01-04,21,22,20,21.5,600\n";

    #[test]
    fn test_load_sorts_bars() {
        let dir = write_bundle(&[("aaa.csv", AAA), ("BBB.csv", BBB)]);
        let bundle = EquityBundle::load(dir.path()).unwrap();

        assert_eq!(bundle.len(), 2);
        assert_eq!(bundle.symbols().collect::<Vec<_>>(), vec!["AAA", "BBB"]);

        let bars = bundle.bars("AAA").unwrap();
        assert_eq!(bars[0].date, date(2019, 1, 2));
        assert_eq!(bars[1].date, date(2019, 1, 3));
        assert_eq!(bars[1].close, 10.5);
    }

    #[test]
    fn test_duplicate_date_is_loud() {
        let csv = "date,open,high,low,close,volume\n\
                   2019-01-02,1,1,1,1,1\n\
                   2019-01-02,2,2,2,2,2\n";
        let dir = write_bundle(&[("AAA.csv", csv)]);
        let err = EquityBundle::load(dir.path()).unwrap_err();
        assert!(matches!(err, DataError::DuplicateBar { .. }));
    }

    #[test]
    fn test_extra_columns_ignored() {
        let csv = "date,open,high,low,close,volume,dividend,split\n\
                   2019-01-02,1,2,0.5,1.5,100,0.0,1.0\n";
        let dir = write_bundle(&[("AAA.csv", csv)]);
        let bundle = EquityBundle::load(dir.path()).unwrap();
        assert_eq!(bundle.bars("AAA").unwrap()[0].close, 1.5);
    }

    #[test]
    fn test_non_csv_files_skipped() {
        let dir = write_bundle(&[("AAA.csv", AAA), ("notes.txt", "ignore me")]);
        let bundle = EquityBundle::load(dir.path()).unwrap();
        assert_eq!(bundle.len(), 1);
    }

    #[test]
    fn test_calendar_is_union() {
        let dir = write_bundle(&[("AAA.csv", AAA), ("BBB.csv", BBB)]);
        let bundle = EquityBundle::load(dir.path()).unwrap();
        assert_eq!(
            bundle.calendar().sessions(),
            &[date(2019, 1, 2), date(2019, 1, 3), date(2019, 1, 4)]
        );
    }

    #[test]
    fn test_to_frame() {
        let dir = write_bundle(&[("AAA.csv", AAA), ("BBB.csv", BBB)]);
        let bundle = EquityBundle::load(dir.path()).unwrap();
        let df = bundle.to_frame().unwrap();

        assert_eq!(df.shape(), (4, 4));
        assert_eq!(df.column("date").unwrap().dtype(), &DataType::Date);

        let days = df.column("date").unwrap().date().unwrap().0.get(0).unwrap();
        assert_eq!(days_to_date(days).unwrap(), date(2019, 1, 2));
    }

    #[test]
    fn test_close_window_alignment() {
        let dir = write_bundle(&[("AAA.csv", AAA), ("BBB.csv", BBB)]);
        let bundle = EquityBundle::load(dir.path()).unwrap();
        let window = [date(2019, 1, 2), date(2019, 1, 3), date(2019, 1, 4)];

        assert_eq!(
            bundle.close_window("AAA", &window),
            vec![Some(9.5), Some(10.5), None]
        );
        assert_eq!(
            bundle.close_window("BBB", &window),
            vec![Some(20.5), None, Some(21.5)]
        );
        assert_eq!(bundle.close_window("ZZZ", &window), vec![None, None, None]);
    }
}
