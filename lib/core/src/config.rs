use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Full engine configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub corpus: CorpusConfig,
    pub lexical: LexicalConfig,
    pub embedding: EmbeddingConfig,
    pub stopword_policy: StopwordPolicy,
}

impl EngineConfig {
    /// Load a JSON config file; missing keys keep their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|e| Error::Serialization(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.corpus.splits.is_empty() {
            return Err(Error::InvalidConfig("at least one split is required".into()));
        }
        if self.lexical.min_token_len == 0 {
            return Err(Error::InvalidConfig("min_token_len must be positive".into()));
        }
        self.embedding.validate()
    }
}

/// Where the corpus lives on disk
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    pub root: PathBuf,
    /// Label manifest, relative to `root` unless absolute
    pub manifest: PathBuf,
    /// Stopword list, relative to `root` unless absolute
    pub stopwords: PathBuf,
    /// Split directory names under `root`, in corpus order
    pub splits: Vec<String>,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./corpus"),
            manifest: PathBuf::from("cats.txt"),
            stopwords: PathBuf::from("stopwords"),
            splits: vec!["training".to_string(), "test".to_string()],
        }
    }
}

impl CorpusConfig {
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(&self.manifest)
    }

    pub fn stopwords_path(&self) -> PathBuf {
        self.root.join(&self.stopwords)
    }

    pub fn split_dirs(&self) -> impl Iterator<Item = (&str, PathBuf)> + '_ {
        self.splits
            .iter()
            .map(move |split| (split.as_str(), self.root.join(split)))
    }
}

/// TF-IDF analyzer settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LexicalConfig {
    /// Shorter tokens are not indexed
    pub min_token_len: usize,
}

impl Default for LexicalConfig {
    fn default() -> Self {
        Self { min_token_len: 2 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Architecture {
    /// Predict a word from the mean of its context
    #[default]
    Cbow,
    /// Predict each context word from the center word
    SkipGram,
}

/// Word2vec training parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub dim: usize,
    pub window: usize,
    pub min_count: usize,
    pub negative: usize,
    pub epochs: usize,
    pub alpha: f32,
    pub min_alpha: f32,
    /// Downsampling threshold for frequent words, 0 disables it
    pub sample: f64,
    pub seed: u64,
    pub architecture: Architecture,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            dim: 100,
            window: 5,
            min_count: 1,
            negative: 5,
            epochs: 5,
            alpha: 0.025,
            min_alpha: 0.0001,
            sample: 1e-3,
            seed: 1,
            architecture: Architecture::Cbow,
        }
    }
}

impl EmbeddingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.dim == 0 {
            return Err(Error::InvalidConfig("embedding dim must be positive".into()));
        }
        if self.window == 0 {
            return Err(Error::InvalidConfig("window must be positive".into()));
        }
        if self.min_count == 0 {
            return Err(Error::InvalidConfig("min_count must be at least 1".into()));
        }
        if self.epochs == 0 {
            return Err(Error::InvalidConfig("epochs must be positive".into()));
        }
        if self.alpha.is_nan() || self.alpha <= 0.0 || self.min_alpha < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "invalid learning rate schedule {} -> {}",
                self.alpha, self.min_alpha
            )));
        }
        if self.sample < 0.0 {
            return Err(Error::InvalidConfig("sample must not be negative".into()));
        }
        Ok(())
    }
}

/// Where stopword filtering applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopwordPolicy {
    /// TF-IDF fits on cleaned text with stopwords kept, word2vec trains on
    /// stopword-filtered tokens, and word2vec queries are not filtered
    #[default]
    Asymmetric,
    /// Stopwords are removed everywhere, corpus and queries alike
    Unified,
}
