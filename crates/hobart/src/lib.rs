#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod loader;
pub mod universe;

// Re-export main types from sub-crates
pub use hobart_data as data;
pub use hobart_model as model;
pub use hobart_output as output;
pub use hobart_text as text;

pub use error::{HobartError, Result};
pub use loader::load_returns;

// Re-export common universe types
pub use universe::{
    Universe,
    screen::{DollarVolumeScreen, ScreenedUniverse},
    sector::{MISSING_SECTOR, Sector, SectorMap},
};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
