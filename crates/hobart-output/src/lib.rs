#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod chart;
pub mod error;
pub mod preview;
pub mod table;

pub use chart::{SeriesChart, cumulative};
pub use error::{OutputError, Result};
pub use preview::{FIELD_BUDGET, FilingPreview, clip_field, frame_preview, preview_fields};
pub use table::to_ascii_table;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
