//! Preliminary cleaning: keep word-character runs only.

use crate::types::TextInput;
use once_cell::sync::Lazy;
use regex::Regex;

/// Unicode-aware word runs (letters, digits, marks, connector punctuation).
static WORD_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("Invalid regex: word run"));

/// First cleaning pass applied to every raw text cell.
///
/// Extracts every `\w+` run, joins the runs with single spaces and lowercases
/// the result. Missing cells are replaced by the sentinel before extraction,
/// so the cleaner never fails.
#[derive(Debug, Clone)]
pub struct PreliminaryCleaner {
    sentinel: String,
}

impl PreliminaryCleaner {
    pub fn new(sentinel: impl Into<String>) -> Self {
        Self {
            sentinel: sentinel.into(),
        }
    }

    /// Clean one input cell.
    pub fn clean(&self, input: &TextInput) -> String {
        match input {
            TextInput::Text(text) => extract_words(text),
            TextInput::Missing => extract_words(&self.sentinel),
        }
    }

    /// Clean a whole column, keeping row order.
    pub fn clean_all(&self, inputs: &[TextInput]) -> Vec<String> {
        inputs.iter().map(|input| self.clean(input)).collect()
    }
}

impl Default for PreliminaryCleaner {
    fn default() -> Self {
        Self::new("no_text")
    }
}

/// Join all word runs of `text` with single spaces, lowercased.
pub fn extract_words(text: &str) -> String {
    WORD_RUN
        .find_iter(text)
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_url_and_punctuation() {
        let cleaner = PreliminaryCleaner::default();
        let out = cleaner.clean(&"Hello, World! Visit http://example.com".into());
        assert_eq!(out, "hello world visit http example com");
    }

    #[test]
    fn test_missing_matches_sentinel() {
        let cleaner = PreliminaryCleaner::default();
        assert_eq!(cleaner.clean(&TextInput::Missing), "no_text");
        assert_eq!(
            cleaner.clean(&TextInput::Missing),
            cleaner.clean(&"no_text".into())
        );
    }

    #[test]
    fn test_custom_sentinel_goes_through_extraction() {
        let cleaner = PreliminaryCleaner::new("N/A Text");
        assert_eq!(cleaner.clean(&TextInput::Missing), "n a text");
    }

    #[test]
    fn test_unicode_words_kept() {
        let cleaner = PreliminaryCleaner::default();
        assert_eq!(cleaner.clean(&"Ça VA? Très_bien!!".into()), "ça va très_bien");
    }

    #[test]
    fn test_output_only_lowercase_words_and_single_spaces() {
        let cleaner = PreliminaryCleaner::default();
        let samples = [
            "  FREE entry in 2 a wkly comp!!! Txt FA to 87121 ",
            "U dun say so early hor... U c already then say...",
            "\t\r\n",
            "Nah I don't think he goes to usf, he lives around here though",
        ];

        for sample in samples {
            let out = cleaner.clean(&sample.into());
            assert!(!out.starts_with(' ') && !out.ends_with(' '), "{out:?}");
            assert!(!out.contains("  "), "{out:?}");
            assert!(
                out.chars()
                    .all(|c| c == ' ' || ((c.is_alphanumeric() || c == '_') && !c.is_uppercase())),
                "{out:?}"
            );
        }
    }

    #[test]
    fn test_clean_all_keeps_order() {
        let cleaner = PreliminaryCleaner::default();
        let inputs = vec!["B b".into(), TextInput::Missing, "a".into()];
        assert_eq!(cleaner.clean_all(&inputs), vec!["b b", "no_text", "a"]);
    }
}
