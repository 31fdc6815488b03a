//! Scaled ASCII time-series charts.
//!
//! Presentation only: series are scaled monotonically onto a character
//! grid, which is enough to read direction and relative magnitude in a
//! terminal.

use chrono::NaiveDate;

use crate::error::{OutputError, Result};

/// Glyphs assigned to series in insertion order, cycling when
/// exhausted.
const SERIES_GLYPHS: &[char] = &['*', 'o', '+', 'x', '#', '@'];

#[derive(Debug, Clone)]
struct ChartSeries {
    label: String,
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

/// Multi-series ASCII line chart.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use hobart_output::SeriesChart;
///
/// let mut chart = SeriesChart::new("Cumulative factor returns");
/// chart.add_series(
///     "1",
///     vec![
///         NaiveDate::from_ymd_opt(2019, 1, 2).unwrap(),
///         NaiveDate::from_ymd_opt(2019, 1, 3).unwrap(),
///     ],
///     vec![0.01, 0.025],
/// );
/// let rendered = chart.render(40, 8)?;
/// assert!(rendered.contains("Cumulative factor returns"));
/// # Ok::<(), hobart_output::OutputError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SeriesChart {
    title: String,
    series: Vec<ChartSeries>,
}

impl SeriesChart {
    /// Create an empty chart.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            series: Vec::new(),
        }
    }

    /// Append a series. Dates and values are taken positionally; the
    /// shorter of the two decides how many points are plotted.
    pub fn add_series(&mut self, label: impl Into<String>, dates: Vec<NaiveDate>, values: Vec<f64>) {
        self.series.push(ChartSeries {
            label: label.into(),
            dates,
            values,
        });
    }

    /// Render onto a plot area of `width` columns by `height` rows,
    /// with y-axis labels, an x-range line and a per-series legend.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError::NoSeries`] when no series has been
    /// added.
    pub fn render(&self, width: usize, height: usize) -> Result<String> {
        if self.series.is_empty() {
            return Err(OutputError::NoSeries);
        }
        let width = width.max(1);
        let height = height.max(2);

        let (min, max) = self.value_range();
        let span = max - min;

        let mut grid = vec![vec![' '; width]; height];
        for (index, series) in self.series.iter().enumerate() {
            let glyph = SERIES_GLYPHS[index % SERIES_GLYPHS.len()];
            let count = series.dates.len().min(series.values.len());
            for point in 0..count {
                let value = series.values[point];
                if !value.is_finite() {
                    continue;
                }
                let col = if count > 1 {
                    point * (width - 1) / (count - 1)
                } else {
                    0
                };
                let scaled = (value - min) / span * (height - 1) as f64;
                let row = height - 1 - scaled.round() as usize;
                grid[row][col] = glyph;
            }
        }

        let mut output = String::new();
        output.push_str(&self.title);
        output.push('\n');
        for (row_index, row) in grid.iter().enumerate() {
            let level = max - span * row_index as f64 / (height - 1) as f64;
            let line: String = row.iter().collect();
            output.push_str(&format!("{:>10.4} |{}\n", level, line.trim_end()));
        }
        output.push_str(&format!("{:>10} +{}\n", "", "-".repeat(width)));
        if let Some((start, end)) = self.date_range() {
            output.push_str(&format!("{:>10}  {} .. {}\n", "", start, end));
        }
        for (index, series) in self.series.iter().enumerate() {
            let glyph = SERIES_GLYPHS[index % SERIES_GLYPHS.len()];
            output.push_str(&format!("{:>10}  {} {}\n", "", glyph, series.label));
        }
        Ok(output)
    }

    /// Global finite value range, padded when degenerate so scaling
    /// never divides by zero.
    fn value_range(&self) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for series in &self.series {
            for &value in &series.values {
                if value.is_finite() {
                    min = min.min(value);
                    max = max.max(value);
                }
            }
        }
        if min > max {
            return (0.0, 1.0);
        }
        if min == max {
            return (min - 0.5, max + 0.5);
        }
        (min, max)
    }

    fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let start = self.series.iter().filter_map(|s| s.dates.iter().min()).min()?;
        let end = self.series.iter().filter_map(|s| s.dates.iter().max()).max()?;
        Some((*start, *end))
    }
}

/// Running sum of a return series, for cumulative performance charts.
pub fn cumulative(values: &[f64]) -> Vec<f64> {
    let mut total = 0.0;
    values
        .iter()
        .map(|value| {
            total += value;
            total
        })
        .collect()
}
