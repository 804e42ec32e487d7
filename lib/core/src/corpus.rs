//! Corpus loading
//!
//! A corpus is a label manifest plus one directory per split. Every file in a
//! split directory becomes one [`Document`] with id `"{split}/{filename}"`.
//! Per-file failures are logged and skipped; only an empty result is fatal,
//! and that is decided by the caller.

use crate::normalize::{normalize, remove_stopwords, StopwordSet};
use crate::{Error, Result};
use ahash::AHashMap;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// A single labeled document
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    id: String,
    raw_text: String,
    tokens: Vec<String>,
    labels: BTreeSet<String>,
}

impl Document {
    /// Build a document, normalizing `raw_text` and dropping stopwords from
    /// the stored tokens.
    pub fn new(
        id: impl Into<String>,
        raw_text: impl Into<String>,
        labels: BTreeSet<String>,
        stopwords: &StopwordSet,
    ) -> Self {
        let raw_text = raw_text.into();
        let tokens = remove_stopwords(&normalize(&raw_text), stopwords);
        Self {
            id: id.into(),
            raw_text,
            tokens,
            labels,
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Normalized, stopword-filtered tokens
    #[inline]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    #[inline]
    pub fn labels(&self) -> &BTreeSet<String> {
        &self.labels
    }
}

/// Ordered, immutable document collection. Position is the shared row index
/// of every vector model built over it.
#[derive(Debug, Clone)]
pub struct Corpus {
    documents: Vec<Document>,
}

impl Corpus {
    /// Wrap an ordered list of documents. An empty list is rejected since no
    /// vector space can be fitted over it.
    pub fn new(documents: Vec<Document>) -> Result<Self> {
        if documents.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        Ok(Self { documents })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Document> {
        self.documents.get(index)
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.documents.iter().position(|d| d.id == id)
    }
}

/// Document id to label set, as read from the manifest
#[derive(Debug, Clone, Default)]
pub struct LabelIndex {
    labels: AHashMap<String, BTreeSet<String>>,
}

impl LabelIndex {
    /// Parse manifest text. Each line is `<doc_id> <label> [<label> ...]`;
    /// lines with fewer than two fields are ignored and repeated ids merge.
    pub fn parse(text: &str) -> Self {
        let mut labels: AHashMap<String, BTreeSet<String>> = AHashMap::new();
        for line in text.lines() {
            let mut fields = line.split_whitespace();
            let (Some(id), Some(first)) = (fields.next(), fields.next()) else {
                continue;
            };
            let entry = labels.entry(id.to_string()).or_default();
            entry.insert(first.to_string());
            entry.extend(fields.map(str::to_string));
        }
        Self { labels }
    }

    /// Read and parse a manifest file. A missing file is logged and treated
    /// as an empty manifest.
    pub fn from_file(path: &Path) -> Self {
        match std::fs::read(path) {
            Ok(bytes) => {
                let index = Self::parse(&decode_latin1(&bytes));
                tracing::info!("Loaded labels for {} documents from {:?}", index.len(), path);
                index
            }
            Err(e) => {
                tracing::warn!("Could not read label manifest {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Labels for `id`, empty when the manifest has no entry
    pub fn labels_for(&self, id: &str) -> BTreeSet<String> {
        self.labels.get(id).cloned().unwrap_or_default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Reads split directories into a [`Corpus`]
pub struct CorpusLoader<'a> {
    labels: LabelIndex,
    stopwords: &'a StopwordSet,
    splits: Vec<(String, PathBuf)>,
}

impl<'a> CorpusLoader<'a> {
    pub fn new(labels: LabelIndex, stopwords: &'a StopwordSet) -> Self {
        Self {
            labels,
            stopwords,
            splits: Vec::new(),
        }
    }

    /// Add a split; splits are loaded in the order they are added
    pub fn split(mut self, name: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        self.splits.push((name.into(), dir.into()));
        self
    }

    /// Load every split. Fails only when no document at all was read.
    pub fn load(&self) -> Result<Corpus> {
        let mut documents = Vec::new();
        for (split, dir) in &self.splits {
            let before = documents.len();
            self.load_split(split, dir, &mut documents);
            let loaded = documents.len() - before;
            if loaded == 0 {
                tracing::warn!("Split '{}' at {:?} contributed no documents", split, dir);
            } else {
                tracing::info!("Loaded {} documents from split '{}'", loaded, split);
            }
        }
        Corpus::new(documents)
    }

    fn load_split(&self, split: &str, dir: &Path, out: &mut Vec<Document>) {
        let files = list_files(dir);
        self.read_documents(split, files, out);
    }

    fn read_documents(&self, split: &str, files: Vec<(String, PathBuf)>, out: &mut Vec<Document>) {
        for (name, path) in files {
            let bytes = match std::fs::read(&path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!("Skipping unreadable document {:?}: {}", path, e);
                    continue;
                }
            };
            let id = format!("{}/{}", split, name);
            let labels = self.labels.labels_for(&id);
            out.push(Document::new(id, decode_latin1(&bytes), labels, self.stopwords));
        }
    }
}

// Regular files of a split directory in natural order
fn list_files(dir: &Path) -> Vec<(String, PathBuf)> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Could not read split directory {:?}: {}", dir, e);
            return Vec::new();
        }
    };

    let mut files: Vec<(String, PathBuf)> = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Could not read entry in {:?}: {}", dir, e);
                continue;
            }
        };
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => files.push((name, path)),
            Err(name) => tracing::warn!("Skipping non UTF-8 file name {:?}", name),
        }
    }
    files.sort_by(|a, b| natural_cmp(&a.0, &b.0));
    files
}

/// Decode ISO-8859-1: every byte is the code point of the same value
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

// Numeric names first in numeric order, then the rest lexicographically
fn natural_cmp(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
