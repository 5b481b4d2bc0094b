//! Suffix-stripping stemmers with byte-encoded output.

use crate::config::{StemAlgorithm, StemEncoding};
use crate::error::{Result, TextMiningError};
use rust_stemmers::{Algorithm, Stemmer};
use std::fmt;
use std::sync::Arc;

#[derive(Clone)]
enum Backend {
    Porter,
    Snowball(Arc<Stemmer>),
}

/// Stems tokens and encodes each stem.
///
/// Porter is the default. Snowball English is available for callers that
/// want its gentler treatment of `-ly`, `-s` and `-ous` endings. The
/// Snowball stemmer is created once and shared, so cloning is cheap.
#[derive(Clone)]
pub struct TokenStemmer {
    backend: Backend,
    algorithm: StemAlgorithm,
    encoding: StemEncoding,
}

impl fmt::Debug for TokenStemmer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenStemmer")
            .field("algorithm", &self.algorithm)
            .field("encoding", &self.encoding)
            .finish()
    }
}

impl TokenStemmer {
    pub fn new(algorithm: StemAlgorithm, encoding: StemEncoding) -> Self {
        let backend = match algorithm {
            StemAlgorithm::Porter => Backend::Porter,
            StemAlgorithm::Snowball => {
                Backend::Snowball(Arc::new(Stemmer::create(Algorithm::English)))
            }
        };
        Self {
            backend,
            algorithm,
            encoding,
        }
    }

    pub fn algorithm(&self) -> StemAlgorithm {
        self.algorithm
    }

    pub fn encoding(&self) -> StemEncoding {
        self.encoding
    }

    /// Stem a single token without encoding it.
    pub fn stem(&self, token: &str) -> String {
        let token = token.to_lowercase();
        match &self.backend {
            // Porter rules are defined over ASCII letters only.
            Backend::Porter if token.is_ascii() => porter_stemmer::stem(&token),
            Backend::Porter => token,
            Backend::Snowball(stemmer) => stemmer.stem(&token).into_owned(),
        }
    }

    /// Stem and encode every token. Output has the same length and order as the input.
    pub fn stem_all(&self, tokens: &[String]) -> Result<Vec<Vec<u8>>> {
        tokens
            .iter()
            .map(|token| encode(&self.stem(token), self.encoding))
            .collect()
    }
}

impl Default for TokenStemmer {
    fn default() -> Self {
        Self::new(StemAlgorithm::default(), StemEncoding::default())
    }
}

/// Encode `text` into bytes.
pub fn encode(text: &str, encoding: StemEncoding) -> Result<Vec<u8>> {
    let unencodable = || TextMiningError::EncodingFailed {
        encoding: encoding.name().to_string(),
        token: text.to_string(),
    };

    match encoding {
        StemEncoding::Utf8 => Ok(text.as_bytes().to_vec()),
        StemEncoding::Ascii => {
            if text.is_ascii() {
                Ok(text.as_bytes().to_vec())
            } else {
                Err(unencodable())
            }
        }
        StemEncoding::Latin1 => text
            .chars()
            .map(|c| u8::try_from(u32::from(c)).map_err(|_| unencodable()))
            .collect(),
    }
}

/// Decode bytes produced by [`encode`] with the same encoding.
pub fn decode(bytes: &[u8], encoding: StemEncoding) -> String {
    match encoding {
        StemEncoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
        StemEncoding::Ascii | StemEncoding::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}
