//! English stopword filtering.

use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::sync::Arc;

/// The NLTK English stopword list, lowercased.
static ENGLISH: Lazy<Arc<HashSet<String>>> = Lazy::new(|| {
    Arc::new(
        stop_words::get(stop_words::LANGUAGE::English)
            .iter()
            .map(|w| w.to_lowercase())
            .collect(),
    )
});

/// Drops tokens that belong to a fixed stopword set.
///
/// Matching is case-insensitive: the token is lowercased before lookup, the
/// set itself is stored lowercase. The set is shared, so cloning the filter
/// is cheap.
#[derive(Debug, Clone)]
pub struct StopwordFilter {
    words: Arc<HashSet<String>>,
}

impl StopwordFilter {
    /// Filter backed by the NLTK English list.
    pub fn english() -> Self {
        Self {
            words: Arc::clone(&ENGLISH),
        }
    }

    /// Filter backed by a custom list.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: Arc::new(words.into_iter().map(|w| w.as_ref().to_lowercase()).collect()),
        }
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.words.contains(&token.to_lowercase())
    }

    /// Remove stopwords, keeping the relative order of the rest.
    pub fn filter(&self, tokens: Vec<String>) -> Vec<String> {
        tokens.into_iter().filter(|t| !self.is_stopword(t)).collect()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for StopwordFilter {
    fn default() -> Self {
        Self::english()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn owned(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_english_set_matches_nltk_list() {
        let filter = StopwordFilter::english();
        let nltk: HashSet<String> = stop_words::get(stop_words::LANGUAGE::English)
            .iter()
            .map(|w| w.to_lowercase())
            .collect();

        assert!(!filter.is_empty());
        assert_eq!(filter.len(), nltk.len());
        assert!(nltk.iter().all(|w| filter.is_stopword(w)));
        for word in ["i", "the", "ourselves", "because", "don", "now"] {
            assert!(filter.is_stopword(word), "{word} should be a stopword");
        }
    }

    #[test]
    fn test_case_insensitive_removal_keeps_order() {
        let filter = StopwordFilter::english();
        let out = filter.filter(owned(&["The", "quick", "fox", "IS", "not", "here", "today"]));
        assert_eq!(out, owned(&["quick", "fox", "today"]));
    }

    #[test]
    fn test_content_words_survive() {
        let filter = StopwordFilter::english();
        let tokens = owned(&["hello", "world", "visit", "http", "example", "com"]);
        assert_eq!(filter.filter(tokens.clone()), tokens);
    }

    #[test]
    fn test_contraction_pieces_removed() {
        let filter = StopwordFilter::english();
        let out = filter.filter(owned(&["do", "n't", "Don", "doing", "stop"]));
        assert_eq!(out, owned(&["n't", "stop"]));
    }

    #[test]
    fn test_no_stopword_survives() {
        let filter = StopwordFilter::english();
        let tokens: Vec<String> = stop_words::get(stop_words::LANGUAGE::English)
            .iter()
            .map(|w| w.to_uppercase())
            .chain(["keep".to_string()])
            .collect();
        let out = filter.filter(tokens);
        assert_eq!(out, owned(&["keep"]));
    }

    #[test]
    fn test_custom_words() {
        let filter = StopwordFilter::from_words(["Foo", "bar"]);
        assert!(filter.is_stopword("FOO"));
        assert!(!filter.is_stopword("the"));
    }
}
