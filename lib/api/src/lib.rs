//! # docmatch API
//!
//! HTTP surface for the docmatch query service.
//!
//! - `POST /process/tfidf/` - score with the TF-IDF index
//! - `POST /process/w2v/` - score with the averaged word2vec index
//! - `GET /health` - corpus and vocabulary sizes
//!
//! Both process routes take `{"query": "..."}` and answer with
//! `{"similitudes": [...], "documento_relevante": "...", "doc_id": "..."}`,
//! or `400 {"error": "..."}` when the query is missing or empty.

pub mod rest;

pub use rest::{ProcessResponse, RestApi};
