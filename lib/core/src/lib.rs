//! # docmatch Core
//!
//! Core library for docmatch: pick the single most relevant document of a
//! fixed, labeled corpus for a free-text query.
//!
//! This crate provides:
//!
//! - [`CorpusLoader`] - label manifest plus split directories into a [`Corpus`]
//! - [`normalize()`] / [`remove_stopwords`] - lossy ASCII text normalization
//! - [`LexicalIndex`] - TF-IDF vector space with cosine scoring
//! - [`EmbeddingIndex`] - averaged word2vec document vectors
//! - [`Context`] / [`QueryService`] - build once, answer many queries
//!
//! ## Example
//!
//! ```rust
//! use docmatch_core::{Context, Corpus, Document, EngineConfig, ScoringMode, StopwordSet};
//! use std::collections::BTreeSet;
//!
//! let stopwords = StopwordSet::new();
//! let corpus = Corpus::new(vec![
//!     Document::new("training/1", "cat dog", BTreeSet::new(), &stopwords),
//!     Document::new("training/2", "car truck", BTreeSet::new(), &stopwords),
//! ])
//! .unwrap();
//!
//! let context = Context::build(corpus, stopwords, &EngineConfig::default()).unwrap();
//! let answer = context.answer(Some("dog"), ScoringMode::Tfidf).unwrap();
//! assert_eq!(answer.doc_id, "training/1");
//! ```

pub mod config;
pub mod corpus;
pub mod embedding;
pub mod error;
pub mod index;
pub mod lexical;
pub mod normalize;
pub mod service;
pub mod vector;
pub mod word2vec;

/// Dense kernels with an AVX2/FMA path on x86_64 and a scalar fallback
pub mod simd;

pub use config::{
    Architecture, CorpusConfig, EmbeddingConfig, EngineConfig, LexicalConfig, StopwordPolicy,
};
pub use corpus::{Corpus, CorpusLoader, Document, LabelIndex};
pub use embedding::EmbeddingIndex;
pub use error::{Error, Result};
pub use index::{BestMatch, SimilarityIndex};
pub use lexical::LexicalIndex;
pub use normalize::{clean, normalize, remove_stopwords, StopwordSet};
pub use service::{Answer, Context, QueryService, ScoringMode};
pub use vector::{SparseVector, Vector};
pub use word2vec::Word2Vec;
