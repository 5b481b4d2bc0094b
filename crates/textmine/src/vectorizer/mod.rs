//! Vectorizer module.
//!
//! Turns processed documents into a sparse term-document matrix.

mod tfidf;

pub use tfidf::{TfidfOptions, TfidfVectorizer, analyze};
