use crate::config::EmbeddingConfig;
use crate::index::SimilarityIndex;
use crate::normalize::{normalize, remove_stopwords, StopwordSet};
use crate::vector::Vector;
use crate::word2vec::Word2Vec;
use crate::{Error, Result};
use rayon::prelude::*;

/// Averaged word2vec document space.
///
/// Document vectors are the mean of their in-vocabulary token vectors,
/// computed once at construction and indexed by corpus position.
#[derive(Debug, Clone)]
pub struct EmbeddingIndex {
    model: Word2Vec,
    documents: Vec<Vector>,
    query_stopwords: StopwordSet,
}

impl EmbeddingIndex {
    /// Train word vectors over the token sequences and cache one average
    /// vector per sequence
    pub fn build<T: AsRef<[String]> + Sync>(sequences: &[T], config: &EmbeddingConfig) -> Result<Self> {
        if sequences.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        let model = Word2Vec::train(sequences, config)?;
        Ok(Self::from_model(model, sequences))
    }

    /// Wrap an already trained model
    pub fn from_model<T: AsRef<[String]> + Sync>(model: Word2Vec, sequences: &[T]) -> Self {
        let documents: Vec<Vector> = sequences
            .par_iter()
            .map(|tokens| average(&model, tokens.as_ref()))
            .collect();

        let empty = documents.iter().filter(|v| v.is_zero()).count();
        if empty > 0 {
            tracing::warn!("{} documents have no in-vocabulary tokens", empty);
        }

        Self {
            model,
            documents,
            query_stopwords: StopwordSet::new(),
        }
    }

    /// Drop these words from queries before averaging
    #[must_use]
    pub fn with_query_stopwords(mut self, stopwords: StopwordSet) -> Self {
        self.query_stopwords = stopwords;
        self
    }

    pub fn model(&self) -> &Word2Vec {
        &self.model
    }

    /// Cached average at corpus position `index`
    pub fn document_vector(&self, index: usize) -> Option<&Vector> {
        self.documents.get(index)
    }

    /// Average vector of a normalized query
    pub fn embed_query(&self, query: &str) -> Vector {
        let tokens = remove_stopwords(&normalize(query), &self.query_stopwords);
        average(&self.model, &tokens)
    }
}

impl SimilarityIndex for EmbeddingIndex {
    fn name(&self) -> &'static str {
        "w2v"
    }

    fn len(&self) -> usize {
        self.documents.len()
    }

    fn vocabulary_size(&self) -> usize {
        self.model.len()
    }

    fn score(&self, query: &str) -> Vec<f32> {
        let query = self.embed_query(query);
        if query.is_zero() {
            tracing::debug!("w2v query has no in-vocabulary tokens");
            return vec![0.0; self.documents.len()];
        }
        self.documents
            .par_iter()
            .map(|doc| doc.cosine_similarity(&query))
            .collect()
    }
}

// Mean of the known token vectors, zero vector when none is known
fn average(model: &Word2Vec, tokens: &[String]) -> Vector {
    Vector::mean(model.dim(), tokens.iter().filter_map(|t| model.get(t)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequences(texts: &[&str]) -> Vec<Vec<String>> {
        texts.iter().map(|t| normalize(t)).collect()
    }

    fn build(texts: &[&str]) -> EmbeddingIndex {
        EmbeddingIndex::build(&sequences(texts), &EmbeddingConfig::default()).unwrap()
    }

    #[test]
    fn test_single_word_document_equals_word_vector() {
        let index = build(&["cocoa", "cocoa cocoa cocoa", "grain wheat"]);
        let word = index.model().get("cocoa").unwrap().clone();
        assert_eq!(index.document_vector(0).unwrap(), &word);
        assert_eq!(index.document_vector(1).unwrap(), &word);
    }

    #[test]
    fn test_out_of_vocabulary_tokens_skipped() {
        let index = build(&["cat dog", "car truck"]);
        let with_noise = index.embed_query("dog zebra giraffe");
        let plain = index.embed_query("dog");
        assert_eq!(with_noise, plain);
        assert_eq!(&plain, index.model().get("dog").unwrap());
    }

    #[test]
    fn test_unknown_query_scores_zero() {
        let index = build(&["cat dog", "car truck"]);
        let best = index.best("zebra").unwrap();
        assert_eq!(best.index, 0);
        assert!(best.similarities.iter().all(|s| *s == 0.0));
        assert!(best.similarities.iter().all(|s| !s.is_nan()));
    }

    #[test]
    fn test_scores_in_range() {
        let index = build(&[
            "showers continued throughout the week in the bahia cocoa zone",
            "the us agriculture department reported grain stocks",
            "",
        ]);
        assert!(index.document_vector(2).unwrap().is_zero());
        for query in ["cocoa", "grain stocks week", "unknown", "the the"] {
            let sims = index.score(query);
            assert_eq!(sims.len(), 3);
            assert!(sims.iter().all(|s| (-1.0..=1.0).contains(s)), "{:?}", sims);
            // the empty document never matches
            assert_eq!(sims[2], 0.0);
        }
    }

    #[test]
    fn test_best_prefers_document_containing_query_word() {
        // word vectors start near-orthogonal in 100 dimensions, so a document
        // containing the query word keeps a clearly higher cosine
        let index = build(&["cat dog", "car truck"]);
        assert_eq!(index.best("dog").unwrap().index, 0);
        assert_eq!(index.best("truck").unwrap().index, 1);
    }

    #[test]
    fn test_query_stopwords_applied() {
        let index = build(&["the cat", "dog"])
            .with_query_stopwords(StopwordSet::from_lines("the\n"));
        assert!(index.embed_query("the").is_zero());
    }

    #[test]
    fn test_no_sequences_rejected() {
        let none: Vec<Vec<String>> = Vec::new();
        assert!(matches!(
            EmbeddingIndex::build(&none, &EmbeddingConfig::default()),
            Err(Error::EmptyCorpus)
        ));
    }
}
