//! Document normalization pipeline.

use std::collections::HashSet;

use crate::error::Result;
use crate::lemma::VerbLemmatizer;
use crate::stopwords::ENGLISH;
use crate::strip::clean_text;
use crate::token::WordTokenizer;

/// Normalization strategy turning raw filing markup into lemmatized,
/// stopword-filtered tokens.
///
/// The stopword list is lemmatized once at construction with the same
/// lemmatizer applied to document tokens, so a stopword and its inflected
/// forms collapse to the same lemma and are filtered symmetrically.
///
/// # Example
///
/// ```
/// use hobart_text::Normalizer;
///
/// let normalizer = Normalizer::new().unwrap();
/// let words = normalizer.clean_document("<p>The Company increased its revenues.</p>");
/// assert_eq!(words, vec!["company", "increase", "revenue"]);
/// ```
#[derive(Debug, Clone)]
pub struct Normalizer {
    tokenizer: WordTokenizer,
    lemmatizer: VerbLemmatizer,
    stop_lemmas: HashSet<String>,
}

impl Normalizer {
    /// Normalizer with the default lemmatizer and the built-in English
    /// stopword list.
    ///
    /// # Errors
    ///
    /// Returns an error if the token pattern fails to compile.
    pub fn new() -> Result<Self> {
        Self::with_parts(VerbLemmatizer::new(), ENGLISH)
    }

    /// Normalizer from an explicit lemmatizer and stopword list.
    ///
    /// # Errors
    ///
    /// Returns an error if the token pattern fails to compile.
    pub fn with_parts(lemmatizer: VerbLemmatizer, stopwords: &[&str]) -> Result<Self> {
        let tokenizer = WordTokenizer::new()?;
        let stop_lemmas = stopwords.iter().map(|w| lemmatizer.lemmatize(w)).collect();
        Ok(Self {
            tokenizer,
            lemmatizer,
            stop_lemmas,
        })
    }

    /// Run the full pipeline on one raw document.
    ///
    /// Strips markup, tokenizes, lemmatizes each token, and drops tokens
    /// whose lemma matches a stopword lemma. Output order follows the
    /// source text.
    #[must_use]
    pub fn clean_document(&self, raw: &str) -> Vec<String> {
        let text = clean_text(raw);
        self.tokenizer
            .tokenize(&text)
            .into_iter()
            .map(|token| self.lemmatizer.lemmatize(&token))
            .filter(|lemma| !self.stop_lemmas.contains(lemma))
            .collect()
    }

    /// The lemmatizer shared between document tokens and stopwords.
    #[must_use]
    pub fn lemmatizer(&self) -> &VerbLemmatizer {
        &self.lemmatizer
    }
}
