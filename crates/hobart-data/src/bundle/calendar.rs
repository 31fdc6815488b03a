//! Trading calendar derived from observed sessions.

use chrono::NaiveDate;

use crate::error::{DataError, Result};

/// Ordered set of trading sessions.
///
/// The calendar is exact: requests for dates it does not contain fail
/// with [`DataError::DateNotFound`] rather than snapping to a nearby
/// session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradingCalendar {
    sessions: Vec<NaiveDate>,
}

impl TradingCalendar {
    /// Calendar over `dates`, sorted and deduplicated.
    #[must_use]
    pub fn from_sessions(mut dates: Vec<NaiveDate>) -> Self {
        dates.sort_unstable();
        dates.dedup();
        Self { sessions: dates }
    }

    /// All sessions in ascending order.
    #[must_use]
    pub fn sessions(&self) -> &[NaiveDate] {
        &self.sessions
    }

    /// Number of sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether the calendar has no sessions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// First session, if any.
    #[must_use]
    pub fn first(&self) -> Option<NaiveDate> {
        self.sessions.first().copied()
    }

    /// Last session, if any.
    #[must_use]
    pub fn last(&self) -> Option<NaiveDate> {
        self.sessions.last().copied()
    }

    /// Position of `date` among the sessions.
    ///
    /// # Errors
    ///
    /// Returns `DataError::DateNotFound` when `date` is not a session.
    pub fn session_index(&self, date: NaiveDate) -> Result<usize> {
        self.sessions
            .binary_search(&date)
            .map_err(|_| DataError::DateNotFound { date })
    }

    /// The inclusive session slice from `start` to `end`.
    ///
    /// # Errors
    ///
    /// Returns `DataError::InvalidDateRange` when `start` is after
    /// `end` and `DataError::DateNotFound` when either endpoint is not
    /// a session.
    pub fn window(&self, start: NaiveDate, end: NaiveDate) -> Result<&[NaiveDate]> {
        if start > end {
            return Err(DataError::InvalidDateRange { start, end });
        }
        let start_idx = self.session_index(start)?;
        let end_idx = self.session_index(end)?;
        Ok(&self.sessions[start_idx..=end_idx])
    }

    /// Number of sessions from `start` to `end` inclusive.
    pub fn session_count(&self, start: NaiveDate, end: NaiveDate) -> Result<usize> {
        Ok(self.window(start, end)?.len())
    }

    /// The `count` sessions ending at `end` inclusive.
    ///
    /// # Errors
    ///
    /// Returns `DataError::DateNotFound` when `end` is not a session
    /// and `DataError::InsufficientSessions` when fewer than `count`
    /// sessions precede it.
    pub fn window_ending(&self, end: NaiveDate, count: usize) -> Result<&[NaiveDate]> {
        let end_idx = self.session_index(end)?;
        let available = end_idx + 1;
        if count > available {
            return Err(DataError::InsufficientSessions {
                needed: count,
                available,
            });
        }
        Ok(&self.sessions[available - count..=end_idx])
    }
}
