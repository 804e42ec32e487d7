//! Text normalization
//!
//! The policy is deliberately lossy: lowercase, keep only `a-z` and
//! whitespace, collapse whitespace, split. Digits, punctuation and accented
//! letters disappear. Stopword removal is a separate step so that callers can
//! choose where it applies.

use ahash::AHashSet;
use std::path::Path;

/// Lowercase, strip everything except ASCII letters and whitespace, and split
/// into tokens. Already-normalized input is returned unchanged.
pub fn normalize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let stripped: String = lowered
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_whitespace())
        .collect();

    stripped.split_whitespace().map(str::to_string).collect()
}

/// The cleaned form of `text`: its tokens joined by single spaces
pub fn clean(text: &str) -> String {
    normalize(text).join(" ")
}

/// Keep the tokens whose lowercase form is not a stopword, in order
pub fn remove_stopwords(tokens: &[String], stopwords: &StopwordSet) -> Vec<String> {
    tokens
        .iter()
        .filter(|t| !stopwords.contains(t))
        .cloned()
        .collect()
}

/// Set of words dropped by [`remove_stopwords`]. Entries are stored lowercase.
#[derive(Debug, Clone, Default)]
pub struct StopwordSet {
    words: AHashSet<String>,
}

impl StopwordSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read one word per line. A missing or unreadable file is logged and
    /// yields an empty set.
    pub fn from_file(path: &Path) -> Self {
        match std::fs::read(path) {
            Ok(bytes) => {
                let set = Self::from_lines(&crate::corpus::decode_latin1(&bytes));
                tracing::info!("Loaded {} stopwords from {:?}", set.len(), path);
                set
            }
            Err(e) => {
                tracing::warn!("Could not read stopword file {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn from_lines(text: &str) -> Self {
        text.lines().collect()
    }

    /// Case-insensitive membership test
    pub fn contains(&self, word: &str) -> bool {
        if word.chars().any(char::is_uppercase) {
            self.words.contains(&word.to_lowercase())
        } else {
            self.words.contains(word)
        }
    }

    pub fn insert(&mut self, word: &str) {
        let word = word.trim();
        if !word.is_empty() {
            self.words.insert(word.to_lowercase());
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for StopwordSet {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        let mut set = Self::new();
        for word in iter {
            set.insert(word);
        }
        set
    }
}
