//! Per-document transform: normalize, tokenize, drop stopwords, stem.

use crate::config::{PipelineConfig, StemEncoding};
use crate::error::Result;
use crate::text::normalizer::TextNormalizer;
use crate::text::stemmer::{TokenStemmer, decode};
use crate::text::stopwords::StopwordFilter;
use crate::text::tokenizer::TreebankTokenizer;
use tracing::debug;

/// Composes the normalizer, tokenizer, stopword filter and (optionally) the
/// stemmer into a single string-to-string transform.
///
/// All collaborators are built once here and reused for every document.
#[derive(Debug, Clone)]
pub struct DocumentProcessor {
    normalizer: TextNormalizer,
    tokenizer: TreebankTokenizer,
    stopwords: StopwordFilter,
    stemmer: Option<TokenStemmer>,
}

impl DocumentProcessor {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            normalizer: TextNormalizer::new(config.punctuation_set.iter().copied()),
            tokenizer: TreebankTokenizer::new(),
            stopwords: StopwordFilter::english(),
            stemmer: config
                .enable_stemming
                .then(|| TokenStemmer::new(config.stem_algorithm, config.stem_encoding)),
        }
    }

    /// Replace the stopword set (the English list is used by default).
    pub fn with_stopwords(mut self, stopwords: StopwordFilter) -> Self {
        self.stopwords = stopwords;
        self
    }

    pub fn stems(&self) -> bool {
        self.stemmer.is_some()
    }

    /// Tokens of `text` after normalization and stopword removal, before stemming.
    pub fn content_tokens(&self, text: &str) -> Vec<String> {
        let normalized = self.normalizer.normalize(text);
        let tokens = self.tokenizer.tokenize(&normalized);
        self.stopwords.filter(tokens)
    }

    /// Run the whole transform on one document and join the tokens with single spaces.
    pub fn process(&self, text: &str) -> Result<String> {
        let tokens = self.content_tokens(text);

        match &self.stemmer {
            Some(stemmer) => {
                let stems = stemmer.stem_all(&tokens)?;
                Ok(join_encoded(&stems, stemmer.encoding()))
            }
            None => Ok(tokens.join(" ")),
        }
    }

    /// Process every document, keeping order. The first failure aborts the batch.
    pub fn process_corpus(&self, documents: &[String]) -> Result<Vec<String>> {
        let processed = documents
            .iter()
            .map(|doc| self.process(doc))
            .collect::<Result<Vec<_>>>()?;
        debug!(
            "Processed {} documents (stemming: {})",
            processed.len(),
            self.stems()
        );
        Ok(processed)
    }
}

/// Join encoded stems with a single space byte and decode the result.
fn join_encoded(stems: &[Vec<u8>], encoding: StemEncoding) -> String {
    let joined = stems.join(&b' ');
    decode(&joined, encoding)
}
