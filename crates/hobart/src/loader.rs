//! Calendar-aligned simple returns for a screened universe.

use crate::error::Result;
use crate::universe::DollarVolumeScreen;
use chrono::NaiveDate;
use hobart_data::EquityBundle;
use hobart_model::ReturnsPanel;
use ndarray::Array2;
use polars::prelude::*;
use tracing::debug;

/// Builds a returns panel over the sessions from `start` to `end`.
///
/// The universe is the screen resolved as of `end`. Close prices are
/// aligned to the trading calendar, simple returns are computed per
/// column with a lazy shift, the first row is dropped, and cells left
/// null or NaN (missing bars) become 0.0. Rows are dates ascending,
/// columns follow the screen's ranking order.
///
/// # Errors
///
/// Returns `DataError::DateNotFound` (wrapped) when either endpoint is
/// not a session, and whatever the screen resolution raises.
pub fn load_returns(
    bundle: &EquityBundle,
    screen: &DollarVolumeScreen,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<ReturnsPanel> {
    let universe = screen.resolve(bundle, end)?;
    let securities = universe.ranked_symbols().to_vec();

    let calendar = bundle.calendar();
    let window = calendar.window(start, end)?;

    let mut columns = Vec::with_capacity(securities.len());
    for symbol in &securities {
        let closes = bundle.close_window(symbol, window);
        columns.push(Column::new(symbol.as_str().into(), closes));
    }
    let frame = DataFrame::new(columns)?;

    let exprs: Vec<Expr> = securities
        .iter()
        .map(|symbol| {
            (col(symbol.as_str()) / col(symbol.as_str()).shift(lit(1)) - lit(1.0))
                .fill_null(lit(0.0))
                .fill_nan(lit(0.0))
                .alias(symbol.as_str())
        })
        .collect();
    let returns = frame
        .lazy()
        .with_columns(exprs)
        .slice(1, IdxSize::MAX)
        .collect()?;

    let dates = window[1..].to_vec();
    let mut values = Array2::zeros((dates.len(), securities.len()));
    for (j, symbol) in securities.iter().enumerate() {
        let series = returns.column(symbol.as_str())?.f64()?;
        for (i, value) in series.into_iter().enumerate() {
            values[[i, j]] = value.unwrap_or(0.0);
        }
    }

    debug!(
        rows = dates.len(),
        securities = securities.len(),
        "Loaded returns panel"
    );

    Ok(ReturnsPanel::new(dates, securities, values)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HobartError;
    use approx::assert_relative_eq;
    use hobart_data::DataError;
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

    // AAA doubles then halves; BBB is flat and out-ranks it on volume.
    const AAA: &str = "date,open,high,low,close,volume\n\
                       2019-01-02,10,10,10,10,100\n\
                       2019-01-03,20,20,20,20,100\n\
                       2019-01-04,10,10,10,10,100\n";
    const BBB: &str = "date,open,high,low,close,volume\n\
                       2019-01-02,50,50,50,50,200\n\
                       2019-01-03,50,50,50,50,200\n\
                       2019-01-04,50,50,50,50,200\n";

    #[test]
    fn test_panel_shape_and_order() {
        let dir = write_bundle(&[("AAA.csv", AAA), ("BBB.csv", BBB)]);
        let bundle = EquityBundle::load(dir.path()).unwrap();
        let screen = DollarVolumeScreen::new(3, 10);

        let panel = load_returns(&bundle, &screen, date(2019, 1, 2), date(2019, 1, 4)).unwrap();

        assert_eq!(panel.n_dates(), 2);
        assert_eq!(panel.n_securities(), 2);
        assert_eq!(panel.securities(), ["BBB", "AAA"]);
        assert_eq!(panel.dates(), [date(2019, 1, 3), date(2019, 1, 4)]);
    }

    #[test]
    fn test_simple_returns() {
        let dir = write_bundle(&[("AAA.csv", AAA), ("BBB.csv", BBB)]);
        let bundle = EquityBundle::load(dir.path()).unwrap();
        let screen = DollarVolumeScreen::new(3, 10);

        let panel = load_returns(&bundle, &screen, date(2019, 1, 2), date(2019, 1, 4)).unwrap();

        // AAA is the second column: 10 -> 20 -> 10.
        assert_relative_eq!(panel.values()[[0, 1]], 1.0, epsilon = 1e-12);
        assert_relative_eq!(panel.values()[[1, 1]], -0.5, epsilon = 1e-12);
        assert_relative_eq!(panel.values()[[0, 0]], 0.0, epsilon = 1e-12);
        assert_relative_eq!(panel.values()[[1, 0]], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_missing_bars_become_zero() {
        // GGG has no bar on Jan 3, so both the gap return and the
        // return immediately after it are zeroed.
        let ggg = "date,open,high,low,close,volume\n\
                   2019-01-02,10,10,10,10,100\n\
                   2019-01-04,12,12,12,12,100\n";
        let dir = write_bundle(&[("BBB.csv", BBB), ("GGG.csv", ggg)]);
        let bundle = EquityBundle::load(dir.path()).unwrap();
        let screen = DollarVolumeScreen::new(3, 10);

        let panel = load_returns(&bundle, &screen, date(2019, 1, 2), date(2019, 1, 4)).unwrap();

        assert_eq!(panel.securities(), ["BBB", "GGG"]);
        assert_eq!(panel.values()[[0, 1]], 0.0);
        assert_eq!(panel.values()[[1, 1]], 0.0);
    }

    #[test]
    fn test_single_session_window_is_empty() {
        let dir = write_bundle(&[("AAA.csv", AAA), ("BBB.csv", BBB)]);
        let bundle = EquityBundle::load(dir.path()).unwrap();
        let screen = DollarVolumeScreen::new(3, 10);

        let panel = load_returns(&bundle, &screen, date(2019, 1, 4), date(2019, 1, 4)).unwrap();

        assert_eq!(panel.n_dates(), 0);
        assert_eq!(panel.n_securities(), 2);
    }

    #[test]
    fn test_misaligned_start_is_loud() {
        let dir = write_bundle(&[("AAA.csv", AAA), ("BBB.csv", BBB)]);
        let bundle = EquityBundle::load(dir.path()).unwrap();
        let screen = DollarVolumeScreen::new(3, 10);

        let result = load_returns(&bundle, &screen, date(2019, 1, 1), date(2019, 1, 4));
        assert!(matches!(
            result,
            Err(HobartError::Data(DataError::DateNotFound { .. }))
        ));
    }
}
