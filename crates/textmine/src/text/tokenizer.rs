//! Penn Treebank style word tokenizer.
//!
//! The text is rewritten by a fixed sequence of regex substitutions that pad
//! punctuation, quotes and contraction suffixes with spaces, and the result is
//! split on whitespace. The rule set follows the conventions of the Treebank
//! tokenizer shipped with NLTK:
//!
//! - double quotes become ` `` ` (opening) and `''` (closing)
//! - `, : ; @ # $ % & ? ! *`, brackets, `--` and ellipses become separate tokens
//! - a sentence-final period is split off, inner periods (`5.00`, `e.g`) are kept
//! - clitics are split: `don't` -> `do n't`, `it's` -> `it 's`, `we'll` -> `we 'll`
//! - fused forms are split: `cannot` -> `can not`, `gonna` -> `gon na`
//!
//! The `regex` crate has no lookaround, so rules that need it are rewritten
//! with an explicit trailing group, or dropped (the apostrophe-opening-quote
//! rule).

use once_cell::sync::Lazy;
use regex::Regex;

type Rule = (Regex, &'static str);

fn rule(pattern: &str, replacement: &'static str) -> Rule {
    let regex = Regex::new(pattern)
        .unwrap_or_else(|e| panic!("Invalid regex: tokenizer rule {pattern}: {e}"));
    (regex, replacement)
}

static STARTING_QUOTES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        rule(r#"^""#, "``"),
        rule(r"(``)", " ${1} "),
        // A doubled apostrophe is always a closing quote.
        rule(r#"([ (\[{<])(")"#, "${1} `` "),
    ]
});

static PUNCTUATION: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        rule(r#"([^\.])(\.)([\]\)}>"']*)\s*$"#, "${1} ${2}${3} "),
        rule(r"([:,])([^\d])", " ${1} ${2}"),
        rule(r"([:,])$", " ${1} "),
        rule(r"\.{2,}", " ${0} "),
        rule(r"[;@#$%&]", " ${0} "),
        rule(r"[?!]", " ${0} "),
        rule(r"([^'])' ", "${1} ' "),
        rule(r"[*]", " ${0} "),
    ]
});

static BRACKETS: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        rule(r"[\]\[\(\)\{\}<>]", " ${0} "),
        rule(r"--", " -- "),
    ]
});

static ENDING_QUOTES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        rule(r"([»”’])", " ${1} "),
        rule(r"''", " '' "),
        rule(r#"""#, " '' "),
        rule(r"([^' ])('[sS]|'[mM]|'[dD]|') ", "${1} ${2} "),
        rule(r"([^' ])('ll|'LL|'re|'RE|'ve|'VE|n't|N'T) ", "${1} ${2} "),
    ]
});

static CONTRACTIONS: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        rule(r"(?i)\b(can)(not)\b", " ${1} ${2} "),
        rule(r"(?i)\b(d)('ye)\b", " ${1} ${2} "),
        rule(r"(?i)\b(gim)(me)\b", " ${1} ${2} "),
        rule(r"(?i)\b(gon)(na)\b", " ${1} ${2} "),
        rule(r"(?i)\b(got)(ta)\b", " ${1} ${2} "),
        rule(r"(?i)\b(lem)(me)\b", " ${1} ${2} "),
        rule(r"(?i)\b(more)('n)\b", " ${1} ${2} "),
        rule(r"(?i)\b(wan)(na)(\s)", " ${1} ${2}${3}"),
        rule(r"(?i) ('t)(is)\b", " ${1} ${2} "),
        rule(r"(?i) ('t)(was)\b", " ${1} ${2} "),
    ]
});

fn apply(rules: &[Rule], text: String) -> String {
    rules.iter().fold(text, |acc, (regex, replacement)| {
        regex.replace_all(&acc, *replacement).into_owned()
    })
}

/// Word tokenizer following Penn Treebank conventions.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreebankTokenizer;

impl TreebankTokenizer {
    pub fn new() -> Self {
        Self
    }

    /// Split `text` into tokens, in order of appearance.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let text = apply(&STARTING_QUOTES, text.to_string());
        let text = apply(&PUNCTUATION, text);
        let text = apply(&BRACKETS, text);
        // Ending-quote and contraction rules anchor on surrounding spaces.
        let text = apply(&ENDING_QUOTES, format!(" {text} "));
        let text = apply(&CONTRACTIONS, text);

        text.split_whitespace().map(str::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokens(text: &str) -> Vec<String> {
        TreebankTokenizer::new().tokenize(text)
    }

    #[test]
    fn test_plain_words() {
        assert_eq!(
            tokens("hello world visit http example com"),
            vec!["hello", "world", "visit", "http", "example", "com"]
        );
    }

    #[test]
    fn test_extra_whitespace_collapsed() {
        assert_eq!(tokens("  wait    what  "), vec!["wait", "what"]);
        assert!(tokens("   ").is_empty());
    }

    #[test]
    fn test_contractions() {
        assert_eq!(tokens("don't stop!"), vec!["do", "n't", "stop", "!"]);
        assert_eq!(tokens("it's what I'm saying"), vec!["it", "'s", "what", "I", "'m", "saying"]);
        assert_eq!(tokens("we'll see"), vec!["we", "'ll", "see"]);
        assert_eq!(tokens("i cannot"), vec!["i", "can", "not"]);
        assert_eq!(tokens("gonna wanna go"), vec!["gon", "na", "wan", "na", "go"]);
    }

    #[test]
    fn test_quotes() {
        assert_eq!(
            tokens(r#""hello" he said"#),
            vec!["``", "hello", "''", "he", "said"]
        );
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            tokens("Pay $5.00 at 3:30, ok; thanks & bye."),
            vec!["Pay", "$", "5.00", "at", "3:30", ",", "ok", ";", "thanks", "&", "bye", "."]
        );
        assert_eq!(tokens("wait... (really)"), vec!["wait", "...", "(", "really", ")"]);
    }

    #[test]
    fn test_tokenizing_joined_tokens_is_stable() {
        let first = tokens("he said \"don't\" -- it's ok!");
        let second = tokens(&first.join(" "));
        assert_eq!(first, second);
    }
}
