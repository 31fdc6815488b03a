//! Full-text archive splitting and sub-document classification.
//!
//! An EDGAR full-text archive interleaves every exhibit of a filing
//! between `<DOCUMENT>` and `</DOCUMENT>` markers; each sub-document
//! declares its form type in a `<TYPE>` line.

use crate::error::{DataError, Result};
use regex::Regex;

const DOC_START: &str = "<DOCUMENT>";
const DOC_END: &str = "</DOCUMENT>";
const TYPE_TAG: &str = "<TYPE>";

/// Split an archive into its sub-documents, markers excluded.
///
/// The archive must carry as many `<DOCUMENT>` markers as
/// `</DOCUMENT>` markers, pairing in order.
///
/// # Errors
/// Returns `DataError::DocumentMarkers` when the marker counts differ
/// and `DataError::Parse` when a pair is out of order.
///
/// # Example
/// ```
/// use hobart_data::edgar::split_documents;
///
/// let raw = "<DOCUMENT>first</DOCUMENT>\n<DOCUMENT>second</DOCUMENT>";
/// let docs = split_documents(raw).unwrap();
/// assert_eq!(docs, vec!["first", "second"]);
/// ```
pub fn split_documents(raw: &str) -> Result<Vec<&str>> {
    let starts: Vec<usize> = raw
        .match_indices(DOC_START)
        .map(|(i, _)| i + DOC_START.len())
        .collect();
    let ends: Vec<usize> = raw.match_indices(DOC_END).map(|(i, _)| i).collect();

    if starts.len() != ends.len() {
        return Err(DataError::DocumentMarkers {
            starts: starts.len(),
            ends: ends.len(),
        });
    }

    starts
        .iter()
        .zip(&ends)
        .map(|(&start, &end)| {
            if start > end {
                return Err(DataError::Parse(
                    "document markers out of order".to_string(),
                ));
            }
            Ok(&raw[start..end])
        })
        .collect()
}

/// Extract a sub-document's declared form type, lowercased.
///
/// The type is whatever follows the first `<TYPE>` tag up to the end
/// of that line.
///
/// # Errors
/// Returns `DataError::MissingTypeTag` when no `<TYPE>` line exists.
///
/// # Example
/// ```
/// use hobart_data::edgar::document_type;
///
/// assert_eq!(document_type("<TYPE>10-K\nbody").unwrap(), "10-k");
/// ```
pub fn document_type(doc: &str) -> Result<String> {
    let pattern = Regex::new(r"<TYPE>[^\n]+")
        .map_err(|e| DataError::Parse(format!("type pattern: {e}")))?;
    let found = pattern.find(doc).ok_or(DataError::MissingTypeTag)?;
    Ok(found.as_str()[TYPE_TAG.len()..].to_lowercase())
}

/// Whether a declared type matches a requested form, case-insensitively.
#[must_use]
pub fn matches_form(doc_type: &str, form: &str) -> bool {
    doc_type.eq_ignore_ascii_case(form)
}
