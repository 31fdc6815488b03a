//! Liquidity screening over a price bundle.

use chrono::NaiveDate;
use hobart_data::bundle::EquityBundle;
use hobart_data::dates::date_to_days;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Default trailing session window for average dollar volume.
pub const DEFAULT_WINDOW: usize = 120;

/// Default universe size.
pub const DEFAULT_TOP_N: usize = 500;

/// Screen symbols by trailing average dollar volume.
///
/// Resolved as of an end date: over the trailing `window` sessions,
/// the per-symbol mean of `close * volume` is ranked descending and
/// the top `top_n` symbols are kept. Ties break by symbol ascending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DollarVolumeScreen {
    /// Trailing sessions over which dollar volume is averaged
    pub window: usize,

    /// Number of symbols to keep
    pub top_n: usize,
}

impl Default for DollarVolumeScreen {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            top_n: DEFAULT_TOP_N,
        }
    }
}

/// Symbols selected by a screen, in ranking order.
#[derive(Debug, Clone)]
pub struct ScreenedUniverse {
    symbols: Vec<String>,
    as_of: NaiveDate,
}

impl ScreenedUniverse {
    /// Screened symbols in descending dollar-volume order.
    pub fn ranked_symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Date the screen was resolved at.
    pub const fn as_of(&self) -> NaiveDate {
        self.as_of
    }
}

impl DollarVolumeScreen {
    /// Screen with an explicit window and universe size.
    pub const fn new(window: usize, top_n: usize) -> Self {
        Self { window, top_n }
    }

    /// Resolve the screen against a bundle as of `end`.
    ///
    /// Symbols missing bars inside the window are still ranked; the
    /// absent sessions simply drop out of their average.
    ///
    /// # Errors
    ///
    /// Returns an error when `end` is not a session of the bundle's
    /// calendar or the calendar holds fewer than `window` sessions.
    pub fn resolve(&self, bundle: &EquityBundle, end: NaiveDate) -> Result<ScreenedUniverse> {
        let calendar = bundle.calendar();
        let window = calendar.window_ending(end, self.window)?;
        let (first, last) = match (window.first(), window.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => {
                return Ok(ScreenedUniverse {
                    symbols: Vec::new(),
                    as_of: end,
                });
            }
        };

        let ranked = bundle
            .to_frame()?
            .lazy()
            .filter(
                col("date")
                    .gt_eq(lit(date_to_days(first)).cast(DataType::Date))
                    .and(col("date").lt_eq(lit(date_to_days(last)).cast(DataType::Date))),
            )
            .with_column((col("close") * col("volume")).alias("dollar_volume"))
            .group_by([col("symbol")])
            .agg([col("dollar_volume").mean()])
            .sort_by_exprs(
                [col("dollar_volume"), col("symbol")],
                SortMultipleOptions::default().with_order_descending_multi([true, false]),
            )
            .limit(self.top_n as IdxSize)
            .collect()?;

        let symbols: Vec<String> = ranked
            .column("symbol")?
            .str()?
            .into_iter()
            .flatten()
            .map(String::from)
            .collect();

        debug!(as_of = %end, kept = symbols.len(), "Resolved dollar volume screen");

        Ok(ScreenedUniverse {
            symbols,
            as_of: end,
        })
    }
}
