#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod lemma;
pub mod normalize;
pub mod similarity;
pub mod stopwords;
pub mod strip;
pub mod token;

pub use error::{Result, TextError};
pub use lemma::VerbLemmatizer;
pub use normalize::Normalizer;
pub use similarity::{cosine_similarity, jaccard_similarity};
pub use stopwords::ENGLISH;
pub use strip::clean_text;
pub use token::WordTokenizer;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
