//! Word tokenization for filing text.

use regex::Regex;

use crate::error::{Result, TextError};

/// Pattern matching runs of word characters.
const WORD_PATTERN: &str = r"\w+";

/// Splits text into word tokens.
///
/// A token is a maximal run of word characters (letters, digits, and
/// underscores). Punctuation and whitespace never appear in the output,
/// so `"risk-free rate"` tokenizes as `["risk", "free", "rate"]`.
///
/// # Example
///
/// ```
/// use hobart_text::WordTokenizer;
///
/// let tokenizer = WordTokenizer::new().unwrap();
/// let tokens = tokenizer.tokenize("net revenue, before tax");
/// assert_eq!(tokens, vec!["net", "revenue", "before", "tax"]);
/// ```
#[derive(Debug, Clone)]
pub struct WordTokenizer {
    pattern: Regex,
}

impl WordTokenizer {
    /// Create a tokenizer with the default word pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the token pattern fails to compile.
    pub fn new() -> Result<Self> {
        let pattern = Regex::new(WORD_PATTERN).map_err(|e| TextError::Pattern(e.to_string()))?;
        Ok(Self { pattern })
    }

    /// Extract all word tokens from `text` in order of appearance.
    #[must_use]
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.pattern
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenizer() -> WordTokenizer {
        WordTokenizer::new().unwrap()
    }

    #[test]
    fn test_splits_on_punctuation_and_whitespace() {
        let tokens = tokenizer().tokenize("Total revenue: $1,234 (unaudited).");
        assert_eq!(tokens, vec!["Total", "revenue", "1", "234", "unaudited"]);
    }

    #[test]
    fn test_hyphenated_words_split() {
        let tokens = tokenizer().tokenize("risk-free rate");
        assert_eq!(tokens, vec!["risk", "free", "rate"]);
    }

    #[test]
    fn test_empty_text_yields_no_tokens() {
        assert!(tokenizer().tokenize("").is_empty());
        assert!(tokenizer().tokenize("  \t\n ... !!").is_empty());
    }

    #[test]
    fn test_underscores_kept_inside_tokens() {
        let tokens = tokenizer().tokenize("item_1a risk_factors");
        assert_eq!(tokens, vec!["item_1a", "risk_factors"]);
    }
}
