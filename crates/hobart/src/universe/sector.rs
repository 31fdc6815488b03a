//! GICS sector classification keyed by symbol.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// Sector code reported for symbols absent from a [`SectorMap`].
pub const MISSING_SECTOR: i32 = -1;

/// GICS Level 1 sectors (11 sectors).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sector {
    /// Information Technology
    InformationTechnology,

    /// Health Care
    HealthCare,

    /// Financials
    Financials,

    /// Consumer Discretionary
    ConsumerDiscretionary,

    /// Communication Services
    CommunicationServices,

    /// Industrials
    Industrials,

    /// Consumer Staples
    ConsumerStaples,

    /// Energy
    Energy,

    /// Utilities
    Utilities,

    /// Real Estate
    RealEstate,

    /// Materials
    Materials,
}

impl Sector {
    /// Returns all sectors.
    pub fn all() -> Vec<Self> {
        vec![
            Self::InformationTechnology,
            Self::HealthCare,
            Self::Financials,
            Self::ConsumerDiscretionary,
            Self::CommunicationServices,
            Self::Industrials,
            Self::ConsumerStaples,
            Self::Energy,
            Self::Utilities,
            Self::RealEstate,
            Self::Materials,
        ]
    }

    /// Returns the sector code (2-digit).
    pub const fn code(&self) -> i32 {
        match self {
            Self::Energy => 10,
            Self::Materials => 15,
            Self::Industrials => 20,
            Self::ConsumerDiscretionary => 25,
            Self::ConsumerStaples => 30,
            Self::HealthCare => 35,
            Self::Financials => 40,
            Self::InformationTechnology => 45,
            Self::CommunicationServices => 50,
            Self::Utilities => 55,
            Self::RealEstate => 60,
        }
    }

    /// Returns the full sector name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::InformationTechnology => "Information Technology",
            Self::HealthCare => "Health Care",
            Self::Financials => "Financials",
            Self::ConsumerDiscretionary => "Consumer Discretionary",
            Self::CommunicationServices => "Communication Services",
            Self::Industrials => "Industrials",
            Self::ConsumerStaples => "Consumer Staples",
            Self::Energy => "Energy",
            Self::Utilities => "Utilities",
            Self::RealEstate => "Real Estate",
            Self::Materials => "Materials",
        }
    }

    /// Parse a sector from its code.
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            10 => Some(Self::Energy),
            15 => Some(Self::Materials),
            20 => Some(Self::Industrials),
            25 => Some(Self::ConsumerDiscretionary),
            30 => Some(Self::ConsumerStaples),
            35 => Some(Self::HealthCare),
            40 => Some(Self::Financials),
            45 => Some(Self::InformationTechnology),
            50 => Some(Self::CommunicationServices),
            55 => Some(Self::Utilities),
            60 => Some(Self::RealEstate),
            _ => None,
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Per-symbol sector classification loaded from a `symbol,sector_code`
/// CSV file.
#[derive(Debug, Clone, Default)]
pub struct SectorMap {
    codes: HashMap<String, i32>,
}

#[derive(Debug, Deserialize)]
struct SectorRow {
    symbol: String,
    sector_code: i32,
}

impl SectorMap {
    /// Reads a sector classification file. Symbols are matched
    /// case-insensitively; later rows win on duplicates.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut codes = HashMap::new();
        for row in reader.deserialize() {
            let row: SectorRow = row?;
            codes.insert(row.symbol.to_uppercase(), row.sector_code);
        }
        Ok(Self { codes })
    }

    /// Returns the sector code for a symbol, or [`MISSING_SECTOR`].
    pub fn code_for(&self, symbol: &str) -> i32 {
        self.codes
            .get(&symbol.to_uppercase())
            .copied()
            .unwrap_or(MISSING_SECTOR)
    }

    /// Returns the sector for a symbol if its code names one.
    pub fn sector_for(&self, symbol: &str) -> Option<Sector> {
        Sector::from_code(self.code_for(symbol))
    }

    /// Number of classified symbols.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Whether the map holds any symbols.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HobartError;
    use std::path::PathBuf;
    use tempfile::{TempDir, tempdir};

    const SECTORS: &str = "symbol,sector_code\nAAA,45\nbbb,10\nCCC,35\n";

    fn write_sectors(contents: &str) -> (TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sectors.csv");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn test_all_sectors() {
        assert_eq!(Sector::all().len(), 11);
    }

    #[test]
    fn test_sector_codes() {
        assert_eq!(Sector::Energy.code(), 10);
        assert_eq!(Sector::InformationTechnology.code(), 45);
        assert_eq!(Sector::RealEstate.code(), 60);
    }

    #[test]
    fn test_from_code() {
        assert_eq!(Sector::from_code(45), Some(Sector::InformationTechnology));
        assert_eq!(Sector::from_code(MISSING_SECTOR), None);
        assert_eq!(Sector::from_code(99), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Sector::HealthCare), "Health Care");
        assert_eq!(format!("{}", Sector::Energy), "Energy");
    }

    #[test]
    fn test_map_from_csv() {
        let (_dir, path) = write_sectors(SECTORS);
        let map = SectorMap::from_csv_path(&path).unwrap();

        assert_eq!(map.len(), 3);
        assert!(!map.is_empty());
        assert_eq!(map.code_for("AAA"), 45);
        assert_eq!(map.sector_for("CCC"), Some(Sector::HealthCare));
    }

    #[test]
    fn test_map_is_case_insensitive() {
        let (_dir, path) = write_sectors(SECTORS);
        let map = SectorMap::from_csv_path(&path).unwrap();

        assert_eq!(map.code_for("bbb"), 10);
        assert_eq!(map.code_for("BBB"), 10);
        assert_eq!(map.code_for("Bbb"), 10);
    }

    #[test]
    fn test_missing_symbol() {
        let (_dir, path) = write_sectors(SECTORS);
        let map = SectorMap::from_csv_path(&path).unwrap();

        assert_eq!(map.code_for("ZZZ"), MISSING_SECTOR);
        assert_eq!(map.sector_for("ZZZ"), None);
    }

    #[test]
    fn test_malformed_row_is_loud() {
        let (_dir, path) = write_sectors("symbol,sector_code\nAAA,not_a_code\n");
        let result = SectorMap::from_csv_path(&path);
        assert!(matches!(result, Err(HobartError::Csv(_))));
    }
}
