//! Compact previews for terminal display.
//!
//! Field values are clipped to a fixed character budget so one record
//! stays on one screen regardless of how large the underlying document
//! or frame is.

use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::table::to_ascii_table;

/// Character budget for a single preview field.
pub const FIELD_BUDGET: usize = 50;

/// Clip a field value to the preview budget.
///
/// Newlines are escaped to literal `\n` sequences before measuring,
/// and values beyond [`FIELD_BUDGET`] characters are cut to 47 plus
/// `...`.
pub fn clip_field(value: &str) -> String {
    let escaped = value.replace('\n', "\\n");
    if escaped.chars().count() > FIELD_BUDGET {
        let cut: String = escaped.chars().take(FIELD_BUDGET - 3).collect();
        format!("{}...", cut)
    } else {
        escaped
    }
}

/// Render labeled fields one per line, values clipped to the budget.
///
/// Labels are padded to a common width so the values line up.
pub fn preview_fields(rows: &[(String, String)]) -> String {
    let width = rows
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);
    let mut output = String::new();
    for (label, value) in rows {
        output.push_str(&format!(
            "  {:<width$}  {}\n",
            label,
            clip_field(value),
            width = width
        ));
    }
    output
}

/// Preview of the filings kept for one date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilingPreview {
    /// Filing date
    pub date: NaiveDate,

    /// Number of documents kept for the date
    pub document_count: usize,

    /// Leading tokens of the first document
    pub leading_tokens: Vec<String>,
}

impl FilingPreview {
    /// Build a preview from one date's normalized documents.
    ///
    /// `token_count` bounds how many leading tokens of the first
    /// document are carried into the preview.
    pub fn from_documents(date: NaiveDate, documents: &[Vec<String>], token_count: usize) -> Self {
        let leading_tokens = documents
            .first()
            .map(|tokens| tokens.iter().take(token_count).cloned().collect())
            .unwrap_or_default();
        Self {
            date,
            document_count: documents.len(),
            leading_tokens,
        }
    }

    /// Render as labeled preview fields.
    pub fn render(&self) -> String {
        preview_fields(&[
            ("Date".to_string(), self.date.to_string()),
            ("Documents".to_string(), self.document_count.to_string()),
            ("Tokens".to_string(), self.leading_tokens.join(" ")),
        ])
    }

    /// Serialize the preview to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Render a DataFrame preview: full shape plus the leading rows as an
/// ASCII table.
///
/// # Errors
///
/// Returns an error if a cell cannot be read from the frame.
pub fn frame_preview(frame: &DataFrame, rows: usize) -> Result<String> {
    let head = frame.head(Some(rows));
    let headers: Vec<String> = head
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    let mut table_rows = Vec::with_capacity(head.height());
    for idx in 0..head.height() {
        let mut row = Vec::with_capacity(head.width());
        for column in head.get_columns() {
            row.push(cell_text(&column.get(idx)?));
        }
        table_rows.push(row);
    }

    Ok(format!(
        "shape: ({}, {})\n{}",
        frame.height(),
        frame.width(),
        to_ascii_table(&headers, &table_rows)
    ))
}

fn cell_text(value: &AnyValue<'_>) -> String {
    match value {
        AnyValue::String(s) => (*s).to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Float64(v) => format!("{:.6}", v),
        AnyValue::Float32(v) => format!("{:.6}", v),
        AnyValue::Null => String::new(),
        other => other.to_string(),
    }
}
