//! Second cleaning pass: line-break artifacts and punctuation.
//!
//! Every step removes chars or swaps one char for another, so the output is
//! never longer than the input, with one exception: Unicode lowercasing maps
//! a handful of chars to two (`'İ'` becomes `"i\u{307}"`). Those inputs grow by
//! one char per occurrence.

use std::collections::HashSet;

/// Replaces a fixed punctuation set with spaces.
///
/// Steps, in order:
/// 1. drop every carriage return
/// 2. drop every literal backslash-n pair (an escaped newline that survived export)
/// 3. lowercase
/// 4. replace each punctuation char, and any backslash, with one space
///
/// Whitespace is not collapsed, the tokenizer takes care of that.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    punctuation: HashSet<char>,
}

impl TextNormalizer {
    pub fn new(punctuation: impl IntoIterator<Item = char>) -> Self {
        let mut punctuation: HashSet<char> = punctuation.into_iter().collect();
        punctuation.insert('\\');
        Self { punctuation }
    }

    pub fn normalize(&self, text: &str) -> String {
        // Order matters: removing '\r' can join a backslash and an 'n'.
        let stripped = text.replace('\r', "").replace("\\n", "");
        stripped
            .to_lowercase()
            .chars()
            .map(|c| if self.punctuation.contains(&c) { ' ' } else { c })
            .collect()
    }

    pub fn is_punctuation(&self, c: char) -> bool {
        self.punctuation.contains(&c)
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_PUNCTUATION)
    }
}
