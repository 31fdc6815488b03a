//! Universe selection for the Hobart pipelines.
//!
//! A universe is the set of symbols a model run covers. Screens
//! resolve one dynamically from a price bundle; the sector map carries
//! a static classification alongside it.

pub mod screen;
pub mod sector;

pub use screen::{DollarVolumeScreen, ScreenedUniverse};
pub use sector::{MISSING_SECTOR, Sector, SectorMap};

/// Trait for symbol universes.
pub trait Universe {
    /// All symbols in the universe.
    fn symbols(&self) -> Vec<String>;

    /// Whether a symbol is in the universe.
    fn contains(&self, symbol: &str) -> bool {
        self.symbols().iter().any(|s| s == symbol)
    }

    /// Number of constituents.
    fn size(&self) -> usize {
        self.symbols().len()
    }
}

impl Universe for ScreenedUniverse {
    fn symbols(&self) -> Vec<String> {
        self.ranked_symbols().to_vec()
    }
}
