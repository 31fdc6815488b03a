//! HTML markup removal for EDGAR filing documents.

use scraper::Html;

/// Lowercase `raw` and strip its markup, returning plain text.
///
/// The whole input is lowercased before parsing so that tag names,
/// attributes, and body text are treated uniformly. Parsing uses a
/// recovering HTML parser, so malformed filings still produce text;
/// in the worst case stray markup survives as literal text and is
/// discarded later by tokenization.
///
/// # Example
///
/// ```
/// use hobart_text::clean_text;
///
/// let text = clean_text("<html><body><p>Net Revenue</p></body></html>");
/// assert_eq!(text.trim(), "net revenue");
/// ```
#[must_use]
pub fn clean_text(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let document = Html::parse_document(&lowered);
    document.root_element().text().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_tags_and_lowercases() {
        let raw = "<html><body><h1>Annual Report</h1>\n<p>Total Revenue grew.</p></body></html>";
        let text = clean_text(raw);
        assert!(text.contains("annual report"));
        assert!(text.contains("total revenue grew."));
        assert!(!text.contains('<'));
    }

    #[test]
    fn test_plain_text_passes_through_lowercased() {
        assert_eq!(clean_text("Just Plain TEXT").trim(), "just plain text");
    }

    #[test]
    fn test_entities_decoded() {
        let text = clean_text("<p>Risk &amp; Reward</p>");
        assert!(text.contains("risk & reward"));
    }

    #[test]
    fn test_malformed_markup_recovers() {
        let text = clean_text("<div><p>unclosed paragraph");
        assert!(text.contains("unclosed paragraph"));
    }

    #[test]
    fn test_empty_input() {
        assert!(clean_text("").trim().is_empty());
    }
}
