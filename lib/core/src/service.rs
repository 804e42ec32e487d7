//! Query service
//!
//! [`Context::initialize`] performs the whole build phase: load the corpus,
//! fit TF-IDF, train word2vec. The resulting context is immutable and can be
//! shared across threads; [`Context::answer`] is a pure function of the
//! context and the query.

use crate::config::{EngineConfig, StopwordPolicy};
use crate::corpus::{Corpus, CorpusLoader, LabelIndex};
use crate::embedding::EmbeddingIndex;
use crate::index::SimilarityIndex;
use crate::lexical::LexicalIndex;
use crate::normalize::{clean, StopwordSet};
use crate::{Error, Result};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

/// Which index scores the query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringMode {
    Tfidf,
    W2v,
}

impl ScoringMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringMode::Tfidf => "tfidf",
            ScoringMode::W2v => "w2v",
        }
    }
}

impl FromStr for ScoringMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "tfidf" => Ok(ScoringMode::Tfidf),
            "w2v" => Ok(ScoringMode::W2v),
            other => Err(Error::UnknownMode(other.to_string())),
        }
    }
}

impl fmt::Display for ScoringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The selected document and the scores that chose it
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub doc_id: String,
    pub document_text: String,
    pub labels: BTreeSet<String>,
    pub score: f32,
    pub similarities: Vec<f32>,
}

/// Frozen corpus and both indexes
pub struct Context {
    corpus: Corpus,
    lexical: LexicalIndex,
    embedding: EmbeddingIndex,
}

impl Context {
    /// Load the corpus described by `config` and build both indexes.
    /// Any failure here means there is nothing to serve.
    pub fn initialize(config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        let started = Instant::now();

        let stopwords = StopwordSet::from_file(&config.corpus.stopwords_path());
        let labels = LabelIndex::from_file(&config.corpus.manifest_path());

        let mut loader = CorpusLoader::new(labels, &stopwords);
        for (split, dir) in config.corpus.split_dirs() {
            loader = loader.split(split, dir);
        }
        let corpus = loader.load()?;
        tracing::info!("Corpus loaded: {} documents in {:?}", corpus.len(), started.elapsed());

        let context = Self::build(corpus, stopwords, config)?;
        tracing::info!("Context ready in {:?}", started.elapsed());
        Ok(context)
    }

    /// Build both indexes over an already loaded corpus.
    ///
    /// `stopwords` must be the set the corpus tokens were filtered with; the
    /// stopword policy decides whether it also applies to the TF-IDF fit and
    /// to word2vec queries.
    pub fn build(corpus: Corpus, stopwords: StopwordSet, config: &EngineConfig) -> Result<Self> {
        if corpus.is_empty() {
            return Err(Error::EmptyCorpus);
        }

        let (lexical, embedding) = match config.stopword_policy {
            StopwordPolicy::Asymmetric => {
                let texts: Vec<String> = corpus.iter().map(|d| clean(d.raw_text())).collect();
                let lexical = LexicalIndex::fit(&texts, &config.lexical)?;
                let embedding = EmbeddingIndex::build(&token_sequences(&corpus), &config.embedding)?;
                (lexical, embedding)
            }
            StopwordPolicy::Unified => {
                let texts: Vec<String> = corpus.iter().map(|d| d.tokens().join(" ")).collect();
                let lexical = LexicalIndex::fit(&texts, &config.lexical)?
                    .with_query_stopwords(stopwords.clone());
                let embedding = EmbeddingIndex::build(&token_sequences(&corpus), &config.embedding)?
                    .with_query_stopwords(stopwords);
                (lexical, embedding)
            }
        };

        Ok(Self {
            corpus,
            lexical,
            embedding,
        })
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn lexical(&self) -> &LexicalIndex {
        &self.lexical
    }

    pub fn embedding(&self) -> &EmbeddingIndex {
        &self.embedding
    }

    /// The index behind `mode`
    pub fn index(&self, mode: ScoringMode) -> &dyn SimilarityIndex {
        match mode {
            ScoringMode::Tfidf => &self.lexical,
            ScoringMode::W2v => &self.embedding,
        }
    }

    /// Answer `query` with the index selected by `mode`
    pub fn answer(&self, query: Option<&str>, mode: ScoringMode) -> Result<Answer> {
        QueryService::new(&self.corpus, self.index(mode)).answer(query)
    }
}

/// Picks the best document of a corpus through any [`SimilarityIndex`]
pub struct QueryService<'a> {
    corpus: &'a Corpus,
    index: &'a dyn SimilarityIndex,
}

impl<'a> QueryService<'a> {
    pub fn new(corpus: &'a Corpus, index: &'a dyn SimilarityIndex) -> Self {
        Self { corpus, index }
    }

    /// Fails with [`Error::InvalidQuery`] for a missing or blank query
    pub fn answer(&self, query: Option<&str>) -> Result<Answer> {
        let query = match query {
            Some(q) if !q.trim().is_empty() => q,
            Some(_) => return Err(Error::InvalidQuery("query must not be empty".into())),
            None => return Err(Error::InvalidQuery("query is required".into())),
        };

        let best = self.index.best(query)?;
        let document = self.corpus.get(best.index).ok_or(Error::EmptyCorpus)?;
        tracing::debug!(
            "{} query {:?} -> {} (score {:.4})",
            self.index.name(),
            query,
            document.id(),
            best.score
        );

        Ok(Answer {
            doc_id: document.id().to_string(),
            document_text: document.raw_text().to_string(),
            labels: document.labels().clone(),
            score: best.score,
            similarities: best.similarities,
        })
    }
}

fn token_sequences(corpus: &Corpus) -> Vec<&[String]> {
    corpus.iter().map(|d| d.tokens()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Document;

    fn corpus(docs: &[(&str, &str)], stopwords: &StopwordSet) -> Corpus {
        Corpus::new(
            docs.iter()
                .map(|(id, text)| Document::new(*id, *text, BTreeSet::new(), stopwords))
                .collect(),
        )
        .unwrap()
    }

    fn context(docs: &[(&str, &str)]) -> Context {
        let stopwords = StopwordSet::new();
        Context::build(corpus(docs, &stopwords), stopwords, &EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("tfidf".parse::<ScoringMode>().unwrap(), ScoringMode::Tfidf);
        assert_eq!("w2v".parse::<ScoringMode>().unwrap(), ScoringMode::W2v);
        assert!(matches!("bm25".parse::<ScoringMode>(), Err(Error::UnknownMode(_))));
        assert_eq!(ScoringMode::W2v.to_string(), "w2v");
    }

    #[test]
    fn test_answer_lexical() {
        let ctx = context(&[("training/1", "cat dog"), ("training/2", "car truck")]);
        let answer = ctx.answer(Some("dog"), ScoringMode::Tfidf).unwrap();
        assert_eq!(answer.doc_id, "training/1");
        assert_eq!(answer.document_text, "cat dog");
        assert_eq!(answer.similarities.len(), 2);
        assert!(answer.score > 0.0);
    }

    #[test]
    fn test_empty_and_missing_query() {
        let ctx = context(&[("training/1", "cat dog")]);
        for mode in [ScoringMode::Tfidf, ScoringMode::W2v] {
            assert!(matches!(ctx.answer(Some(""), mode), Err(Error::InvalidQuery(_))));
            assert!(matches!(ctx.answer(Some("  \t"), mode), Err(Error::InvalidQuery(_))));
            assert!(matches!(ctx.answer(None, mode), Err(Error::InvalidQuery(_))));
        }
    }

    #[test]
    fn test_dispatch_is_by_capability() {
        let ctx = context(&[("training/1", "cat dog"), ("training/2", "car truck")]);
        assert_eq!(ctx.index(ScoringMode::Tfidf).name(), "tfidf");
        assert_eq!(ctx.index(ScoringMode::W2v).name(), "w2v");

        let service = QueryService::new(ctx.corpus(), ctx.lexical());
        assert_eq!(service.answer(Some("truck")).unwrap().doc_id, "training/2");
    }

    #[test]
    fn test_asymmetric_policy_keeps_stopwords_in_tfidf() {
        let stopwords = StopwordSet::from_lines("the\n");
        let docs = corpus(&[("training/1", "the cat"), ("training/2", "dog")], &stopwords);
        let ctx = Context::build(docs, stopwords, &EngineConfig::default()).unwrap();

        assert!(ctx.lexical().column("the").is_some());
        assert!(!ctx.embedding().model().contains("the"));
        assert_eq!(ctx.answer(Some("the"), ScoringMode::Tfidf).unwrap().doc_id, "training/1");
    }

    #[test]
    fn test_unified_policy_drops_stopwords_everywhere() {
        let stopwords = StopwordSet::from_lines("the\n");
        let docs = corpus(&[("training/1", "the cat"), ("training/2", "dog")], &stopwords);
        let config = EngineConfig {
            stopword_policy: StopwordPolicy::Unified,
            ..EngineConfig::default()
        };
        let ctx = Context::build(docs, stopwords, &config).unwrap();

        assert!(ctx.lexical().column("the").is_none());
        let answer = ctx.answer(Some("the"), ScoringMode::Tfidf).unwrap();
        assert!(answer.similarities.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn test_context_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Context>();
    }
}
