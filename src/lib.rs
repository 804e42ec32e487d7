//! # docmatch
//!
//! Answers a free-text query against a fixed, labeled document corpus by
//! returning the single most relevant document, scored either by TF-IDF or by
//! averaged word2vec vectors.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! docmatch --corpus-dir ./corpus --http-port 5000
//! curl -X POST localhost:5000/process/tfidf/ -H 'content-type: application/json' \
//!      -d '{"query": "cocoa prices"}'
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use docmatch::prelude::*;
//!
//! let config = EngineConfig::default();
//! let context = Context::initialize(&config).unwrap();
//! let answer = context.answer(Some("cocoa prices"), ScoringMode::W2v).unwrap();
//! println!("{} {:.3}", answer.doc_id, answer.score);
//! ```
//!
//! ## Crate Structure
//!
//! - `docmatch-core` - corpus loading, normalization, TF-IDF and word2vec indexes
//! - `docmatch-api` - actix-web REST API

pub use docmatch_core::{
    Answer, Context, Corpus, CorpusLoader, Document, EmbeddingIndex, EngineConfig,
    Error, LabelIndex, LexicalIndex, QueryService, Result, ScoringMode, SimilarityIndex,
    StopwordSet,
};

pub use docmatch_api::RestApi;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Answer, Context, Corpus, CorpusLoader, Document, EmbeddingIndex, EngineConfig,
        Error, LabelIndex, LexicalIndex, QueryService, Result, ScoringMode,
        SimilarityIndex, StopwordSet,
        RestApi,
    };
}
