#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod eigen;
pub mod error;
pub mod panel;
pub mod pca;

pub use eigen::{EigenDecomposition, symmetric_eigen};
pub use error::{ModelError, Result};
pub use panel::ReturnsPanel;
pub use pca::{FactorArtifacts, ModelConfig, RiskModel};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
