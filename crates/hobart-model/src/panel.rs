//! Dense returns panel consumed by the model.

use chrono::NaiveDate;
use ndarray::Array2;

use crate::error::{ModelError, Result};

/// A dates-by-securities matrix of simple returns.
///
/// Rows follow `dates` in ascending order and columns follow
/// `securities`. Construction validates the matrix shape against both
/// axes, so downstream code can index without checking.
#[derive(Debug, Clone)]
pub struct ReturnsPanel {
    dates: Vec<NaiveDate>,
    securities: Vec<String>,
    values: Array2<f64>,
}

impl ReturnsPanel {
    /// Build a panel from axis labels and the returns matrix.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DimensionMismatch`] when `values` does
    /// not have `dates.len()` rows and `securities.len()` columns.
    pub fn new(
        dates: Vec<NaiveDate>,
        securities: Vec<String>,
        values: Array2<f64>,
    ) -> Result<Self> {
        if values.nrows() != dates.len() {
            return Err(ModelError::DimensionMismatch {
                expected: dates.len(),
                actual: values.nrows(),
            });
        }
        if values.ncols() != securities.len() {
            return Err(ModelError::DimensionMismatch {
                expected: securities.len(),
                actual: values.ncols(),
            });
        }
        Ok(Self {
            dates,
            securities,
            values,
        })
    }

    /// Observation dates, ascending.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Security identifiers in column order.
    pub fn securities(&self) -> &[String] {
        &self.securities
    }

    /// The returns matrix, dates by securities.
    pub const fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Number of observation rows.
    pub fn n_dates(&self) -> usize {
        self.dates.len()
    }

    /// Number of securities.
    pub fn n_securities(&self) -> usize {
        self.securities.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dates(count: usize) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2019, 1, 2).unwrap();
        (0..count)
            .map(|i| start + chrono::Duration::days(i as i64))
            .collect()
    }

    #[test]
    fn test_valid_panel() {
        let panel = ReturnsPanel::new(
            dates(3),
            vec!["AAA".to_string(), "BBB".to_string()],
            Array2::zeros((3, 2)),
        )
        .unwrap();
        assert_eq!(panel.n_dates(), 3);
        assert_eq!(panel.n_securities(), 2);
        assert_eq!(panel.securities()[1], "BBB");
    }

    #[test]
    fn test_row_mismatch_is_loud() {
        let result = ReturnsPanel::new(
            dates(4),
            vec!["AAA".to_string(), "BBB".to_string()],
            Array2::zeros((3, 2)),
        );
        assert!(matches!(
            result,
            Err(ModelError::DimensionMismatch {
                expected: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_column_mismatch_is_loud() {
        let result = ReturnsPanel::new(
            dates(3),
            vec!["AAA".to_string()],
            Array2::zeros((3, 2)),
        );
        assert!(matches!(
            result,
            Err(ModelError::DimensionMismatch {
                expected: 1,
                actual: 2
            })
        ));
    }
}
