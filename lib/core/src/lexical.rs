//! TF-IDF vector space
//!
//! Weighting follows the usual smoothed form:
//!
//! ```text
//! tf(t, d)  = raw count of t in d
//! idf(t)    = ln((1 + n) / (1 + df(t))) + 1
//! w(t, d)   = tf(t, d) * idf(t), rows scaled to unit length
//! ```
//!
//! Columns are assigned in sorted term order, so fitting the same texts twice
//! produces the same model.

use crate::config::LexicalConfig;
use crate::index::SimilarityIndex;
use crate::normalize::{normalize, StopwordSet};
use crate::vector::SparseVector;
use crate::{Error, Result};
use ahash::AHashMap;
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Fitted TF-IDF model plus one unit-length row per document
#[derive(Debug, Clone)]
pub struct LexicalIndex {
    vocabulary: AHashMap<String, u32>,
    idf: Vec<f32>,
    documents: Vec<SparseVector>,
    min_token_len: usize,
    query_stopwords: StopwordSet,
}

impl LexicalIndex {
    /// Fit over `texts`, one per document in corpus order. Texts are
    /// normalized before analysis, so raw or cleaned text both work.
    pub fn fit<S: AsRef<str> + Sync>(texts: &[S], config: &LexicalConfig) -> Result<Self> {
        if texts.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        let min_token_len = config.min_token_len.max(1);

        let analyzed: Vec<Vec<String>> = texts
            .par_iter()
            .map(|t| analyze(t.as_ref(), min_token_len))
            .collect();

        // term -> document frequency, sorted by term
        let mut doc_freq: BTreeMap<&str, u32> = BTreeMap::new();
        for tokens in &analyzed {
            let mut seen: Vec<&str> = tokens.iter().map(String::as_str).collect();
            seen.sort_unstable();
            seen.dedup();
            for term in seen {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        if doc_freq.is_empty() {
            return Err(Error::EmptyVocabulary(
                "no document contains an indexable term".to_string(),
            ));
        }

        let n = texts.len() as f32;
        let mut vocabulary = AHashMap::with_capacity(doc_freq.len());
        let mut idf = Vec::with_capacity(doc_freq.len());
        for (column, (term, df)) in doc_freq.iter().enumerate() {
            vocabulary.insert((*term).to_string(), column as u32);
            idf.push(((1.0 + n) / (1.0 + *df as f32)).ln() + 1.0);
        }

        let mut index = Self {
            vocabulary,
            idf,
            documents: Vec::new(),
            min_token_len,
            query_stopwords: StopwordSet::new(),
        };
        index.documents = analyzed.iter().map(|tokens| index.weigh(tokens)).collect();

        tracing::info!(
            "TF-IDF fitted: {} documents, {} terms",
            index.documents.len(),
            index.vocabulary.len()
        );
        Ok(index)
    }

    /// Drop these words from queries before projecting them
    #[must_use]
    pub fn with_query_stopwords(mut self, stopwords: StopwordSet) -> Self {
        self.query_stopwords = stopwords;
        self
    }

    /// Project text into the fitted space. Out-of-vocabulary terms are
    /// ignored, so text with no known term maps to the zero vector.
    pub fn transform(&self, text: &str) -> SparseVector {
        let tokens: Vec<String> = analyze(text, self.min_token_len)
            .into_iter()
            .filter(|t| !self.query_stopwords.contains(t))
            .collect();
        self.weigh(&tokens)
    }

    /// Document row at corpus position `index`
    pub fn document_vector(&self, index: usize) -> Option<&SparseVector> {
        self.documents.get(index)
    }

    pub fn column(&self, term: &str) -> Option<u32> {
        self.vocabulary.get(term).copied()
    }

    pub fn idf(&self, term: &str) -> Option<f32> {
        self.column(term).map(|c| self.idf[c as usize])
    }

    fn weigh(&self, tokens: &[String]) -> SparseVector {
        let mut counts: AHashMap<u32, f32> = AHashMap::new();
        for token in tokens {
            if let Some(&column) = self.vocabulary.get(token) {
                *counts.entry(column).or_insert(0.0) += 1.0;
            }
        }

        let pairs = counts
            .into_iter()
            .map(|(column, tf)| (column, tf * self.idf[column as usize]))
            .collect();
        let mut vector = SparseVector::from_pairs(pairs);
        vector.normalize();
        vector
    }
}

impl SimilarityIndex for LexicalIndex {
    fn name(&self) -> &'static str {
        "tfidf"
    }

    fn len(&self) -> usize {
        self.documents.len()
    }

    fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    fn score(&self, query: &str) -> Vec<f32> {
        let query = self.transform(query);
        if query.is_empty() {
            tracing::debug!("TF-IDF query has no vocabulary terms");
            return vec![0.0; self.documents.len()];
        }
        self.documents
            .par_iter()
            .map(|doc| doc.cosine_similarity(&query))
            .collect()
    }
}

fn analyze(text: &str, min_token_len: usize) -> Vec<String> {
    normalize(text)
        .into_iter()
        .filter(|t| t.len() >= min_token_len)
        .collect()
}
