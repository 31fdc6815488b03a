//! Date parsing and polars `Date` physical conversions.

use crate::error::{DataError, Result};
use chrono::{Datelike, NaiveDate};

/// Days from 0001-01-01 (CE) to the Unix epoch. Polars stores `Date`
/// values as days since 1970-01-01.
pub const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Convert a date to its polars `Date` physical representation.
#[must_use]
pub fn date_to_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - EPOCH_DAYS_FROM_CE
}

/// Convert a polars `Date` physical value back to a date.
#[must_use]
pub fn days_to_date(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days + EPOCH_DAYS_FROM_CE)
}

/// Parse an ISO `YYYY-MM-DD` date string.
///
/// # Errors
/// Returns `DataError::Parse` if the string is not a valid date.
///
/// # Example
/// ```
/// use hobart_data::dates::parse_date;
///
/// let date = parse_date("2019-12-31").unwrap();
/// assert_eq!(date.to_string(), "2019-12-31");
/// assert!(parse_date("12/31/2019").is_err());
/// ```
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| DataError::Parse(format!("invalid date '{s}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_round_trip() {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(date_to_days(epoch), 0);
        assert_eq!(days_to_date(0), Some(epoch));
    }

    #[test]
    fn test_round_trip_modern_date() {
        let date = NaiveDate::from_ymd_opt(2016, 1, 5).unwrap();
        let days = date_to_days(date);
        assert_eq!(days_to_date(days), Some(date));
    }

    #[test]
    fn test_parse_date_rejects_other_formats() {
        assert!(parse_date("2019-12-31").is_ok());
        assert!(parse_date("20191231").is_err());
        assert!(parse_date("not-a-date").is_err());
    }
}
