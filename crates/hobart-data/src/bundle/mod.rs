//! Local price data: CSV bundles and the trading calendar.

pub mod calendar;
pub mod csvdir;

pub use calendar::TradingCalendar;
pub use csvdir::{Bar, EquityBundle};
