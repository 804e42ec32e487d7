//! Word2vec trainer
//!
//! CBOW or skip-gram with negative sampling, frequent-word downsampling and a
//! linearly decaying learning rate. Training runs on one thread from a seeded
//! generator, so a given corpus and config always produce the same vectors.

use crate::config::{Architecture, EmbeddingConfig};
use crate::simd::{axpy, dot_product_simd};
use crate::vector::Vector;
use crate::{Error, Result};
use ahash::AHashMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const MAX_EXP: f32 = 6.0;
const NS_EXPONENT: f64 = 0.75;

/// Trained word vectors
#[derive(Debug, Clone)]
pub struct Word2Vec {
    vocab: AHashMap<String, usize>,
    words: Vec<String>,
    counts: Vec<u64>,
    vectors: Vec<Vector>,
    dim: usize,
}

impl Word2Vec {
    /// Train over token sequences. Fails when no word reaches `min_count`.
    pub fn train<T: AsRef<[String]>>(sentences: &[T], config: &EmbeddingConfig) -> Result<Self> {
        config.validate()?;
        let (words, counts) = build_vocab(sentences, config.min_count);
        if words.is_empty() {
            return Err(Error::EmptyVocabulary(
                "no token reaches the embedding min_count".to_string(),
            ));
        }
        let vocab: AHashMap<String, usize> = words
            .iter()
            .enumerate()
            .map(|(i, w)| (w.clone(), i))
            .collect();

        let started = std::time::Instant::now();
        let mut trainer = Trainer::new(&counts, config);
        trainer.run(sentences, &vocab);

        let dim = config.dim;
        let vectors = trainer
            .syn0
            .chunks_exact(dim)
            .map(Vector::from_slice)
            .collect();

        tracing::info!(
            "word2vec trained: {} words, dim {}, {} epochs in {:?}",
            words.len(),
            dim,
            config.epochs,
            started.elapsed()
        );

        Ok(Self {
            vocab,
            words,
            counts,
            vectors,
            dim,
        })
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.vocab.contains_key(word)
    }

    pub fn get(&self, word: &str) -> Option<&Vector> {
        self.vocab.get(word).map(|&i| &self.vectors[i])
    }

    /// Corpus frequency of `word`
    pub fn count(&self, word: &str) -> Option<u64> {
        self.vocab.get(word).map(|&i| self.counts[i])
    }

    /// Vocabulary in index order (most frequent first)
    pub fn words(&self) -> &[String] {
        &self.words
    }
}

// Words with count >= min_count, most frequent first, ties in order of first
// appearance
fn build_vocab<T: AsRef<[String]>>(sentences: &[T], min_count: usize) -> (Vec<String>, Vec<u64>) {
    let mut position: AHashMap<&str, usize> = AHashMap::new();
    let mut entries: Vec<(&str, u64)> = Vec::new();
    for sentence in sentences {
        for token in sentence.as_ref() {
            match position.get(token.as_str()) {
                Some(&i) => entries[i].1 += 1,
                None => {
                    position.insert(token.as_str(), entries.len());
                    entries.push((token.as_str(), 1));
                }
            }
        }
    }

    entries.retain(|(_, c)| *c >= min_count as u64);
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries
        .into_iter()
        .map(|(w, c)| (w.to_string(), c))
        .unzip()
}

/// Draws negative samples from the unigram distribution raised to 0.75
struct NegativeSampler {
    cumulative: Vec<f64>,
}

impl NegativeSampler {
    fn new(counts: &[u64]) -> Self {
        let mut total = 0.0;
        let cumulative = counts
            .iter()
            .map(|&c| {
                total += (c as f64).powf(NS_EXPONENT);
                total
            })
            .collect();
        Self { cumulative }
    }

    fn sample(&self, rng: &mut StdRng) -> usize {
        let total = self.cumulative.last().copied().unwrap_or(0.0);
        let r = rng.random::<f64>() * total;
        self.cumulative
            .partition_point(|&c| c <= r)
            .min(self.cumulative.len() - 1)
    }
}

struct Trainer<'a> {
    config: &'a EmbeddingConfig,
    rng: StdRng,
    syn0: Vec<f32>,
    syn1neg: Vec<f32>,
    keep_probability: Vec<f64>,
    sampler: NegativeSampler,
    total_words: u64,
}

impl<'a> Trainer<'a> {
    fn new(counts: &[u64], config: &'a EmbeddingConfig) -> Self {
        let dim = config.dim;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let syn0 = (0..counts.len() * dim)
            .map(|_| (rng.random::<f32>() - 0.5) / dim as f32)
            .collect();
        let total_words: u64 = counts.iter().sum();

        let keep_probability = if config.sample > 0.0 {
            let threshold = config.sample * total_words as f64;
            counts
                .iter()
                .map(|&c| {
                    let c = c as f64;
                    ((c / threshold).sqrt() + 1.0) * (threshold / c)
                })
                .collect()
        } else {
            vec![1.0; counts.len()]
        };

        Self {
            config,
            rng,
            syn0,
            syn1neg: vec![0.0; counts.len() * dim],
            keep_probability,
            sampler: NegativeSampler::new(counts),
            total_words,
        }
    }

    fn run<T: AsRef<[String]>>(&mut self, sentences: &[T], vocab: &AHashMap<String, usize>) {
        let planned = (self.config.epochs as u64 * self.total_words).max(1) as f32;
        let mut processed = 0u64;

        for epoch in 0..self.config.epochs {
            for sentence in sentences {
                let progress = processed as f32 / planned;
                let alpha = (self.config.alpha - (self.config.alpha - self.config.min_alpha) * progress)
                    .max(self.config.min_alpha);

                let mut ids = Vec::with_capacity(sentence.as_ref().len());
                for token in sentence.as_ref() {
                    let Some(&id) = vocab.get(token) else {
                        continue;
                    };
                    processed += 1;
                    let keep = self.keep_probability[id];
                    if keep >= 1.0 || keep > self.rng.random::<f64>() {
                        ids.push(id);
                    }
                }

                for pos in 0..ids.len() {
                    match self.config.architecture {
                        Architecture::Cbow => self.train_cbow(&ids, pos, alpha),
                        Architecture::SkipGram => self.train_skip_gram(&ids, pos, alpha),
                    }
                }
            }
            tracing::debug!("word2vec epoch {} done", epoch + 1);
        }
    }

    // Context positions around `pos` for a randomly shrunk window
    fn context(&mut self, len: usize, pos: usize) -> std::ops::Range<usize> {
        let window = self.config.window;
        let shrink = self.rng.random_range(0..window);
        let reach = window - shrink;
        pos.saturating_sub(reach)..(pos + reach + 1).min(len)
    }

    fn train_cbow(&mut self, ids: &[usize], pos: usize, alpha: f32) {
        let dim = self.config.dim;
        let span = self.context(ids.len(), pos);
        let context: Vec<usize> = span.filter(|&i| i != pos).map(|i| ids[i]).collect();
        if context.is_empty() {
            return;
        }

        let mut hidden = vec![0.0f32; dim];
        for &c in &context {
            axpy(1.0, &self.syn0[c * dim..(c + 1) * dim], &mut hidden);
        }
        let inv = 1.0 / context.len() as f32;
        hidden.iter_mut().for_each(|x| *x *= inv);

        let mut error = vec![0.0f32; dim];
        self.negative_step(ids[pos], &hidden, &mut error, alpha);

        for &c in &context {
            axpy(inv, &error, &mut self.syn0[c * dim..(c + 1) * dim]);
        }
    }

    fn train_skip_gram(&mut self, ids: &[usize], pos: usize, alpha: f32) {
        let dim = self.config.dim;
        let span = self.context(ids.len(), pos);
        for i in span.filter(|&i| i != pos) {
            let c = ids[i];
            let input = self.syn0[c * dim..(c + 1) * dim].to_vec();
            let mut error = vec![0.0f32; dim];
            self.negative_step(ids[pos], &input, &mut error, alpha);
            axpy(1.0, &error, &mut self.syn0[c * dim..(c + 1) * dim]);
        }
    }

    // One positive and `negative` sampled updates of the output layer.
    // Accumulates the input-side gradient into `error`.
    fn negative_step(&mut self, target: usize, input: &[f32], error: &mut [f32], alpha: f32) {
        let dim = self.config.dim;
        for d in 0..=self.config.negative {
            let (word, label) = if d == 0 {
                (target, 1.0f32)
            } else {
                let sampled = self.sampler.sample(&mut self.rng);
                if sampled == target {
                    continue;
                }
                (sampled, 0.0f32)
            };

            let row = &mut self.syn1neg[word * dim..(word + 1) * dim];
            let f = dot_product_simd(input, row);
            let g = (label - sigmoid(f)) * alpha;
            axpy(g, row, error);
            axpy(g, input, row);
        }
    }
}

#[inline]
fn sigmoid(x: f32) -> f32 {
    if x >= MAX_EXP {
        1.0
    } else if x <= -MAX_EXP {
        0.0
    } else {
        1.0 / (1.0 + (-x).exp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentences(texts: &[&str]) -> Vec<Vec<String>> {
        texts
            .iter()
            .map(|t| t.split_whitespace().map(str::to_string).collect())
            .collect()
    }

    fn small_config() -> EmbeddingConfig {
        EmbeddingConfig {
            dim: 16,
            epochs: 3,
            ..EmbeddingConfig::default()
        }
    }

    #[test]
    fn test_vocab_ordering() {
        let (words, counts) = build_vocab(&sentences(&["b a c a", "c a d"]), 1);
        assert_eq!(words, vec!["a", "c", "b", "d"]);
        assert_eq!(counts, vec![3, 2, 1, 1]);
    }

    #[test]
    fn test_min_count_one_keeps_singletons() {
        let model = Word2Vec::train(&sentences(&["cat dog", "car truck"]), &small_config()).unwrap();
        assert_eq!(model.len(), 4);
        assert!(model.contains("truck"));
        assert_eq!(model.count("cat"), Some(1));
        assert_eq!(model.get("cat").unwrap().dim(), 16);
        assert!(model.get("zebra").is_none());
    }

    #[test]
    fn test_min_count_filters() {
        let config = EmbeddingConfig {
            min_count: 2,
            ..small_config()
        };
        let model = Word2Vec::train(&sentences(&["cat dog cat", "car cat"]), &config).unwrap();
        assert_eq!(model.words(), &["cat".to_string()]);
    }

    #[test]
    fn test_seeded_training_is_reproducible() {
        let data = sentences(&[
            "cocoa prices rose in the bahia zone",
            "grain exports fell as wheat stocks rose",
            "cocoa and grain futures",
        ]);
        let a = Word2Vec::train(&data, &small_config()).unwrap();
        let b = Word2Vec::train(&data, &small_config()).unwrap();
        for word in a.words() {
            assert_eq!(a.get(word), b.get(word));
        }

        let other = Word2Vec::train(&data, &EmbeddingConfig { seed: 7, ..small_config() }).unwrap();
        assert_ne!(a.get("cocoa"), other.get("cocoa"));
    }

    #[test]
    fn test_skip_gram_trains() {
        let config = EmbeddingConfig {
            architecture: Architecture::SkipGram,
            ..small_config()
        };
        let model = Word2Vec::train(&sentences(&["alpha beta gamma", "beta gamma delta"]), &config).unwrap();
        assert_eq!(model.len(), 4);
        for word in model.words() {
            let v = model.get(word).unwrap();
            assert!(v.as_slice().iter().all(|x| x.is_finite()));
        }
    }

    #[test]
    fn test_empty_corpus_rejected() {
        let empty: Vec<Vec<String>> = vec![vec![], vec![]];
        assert!(matches!(
            Word2Vec::train(&empty, &small_config()),
            Err(Error::EmptyVocabulary(_))
        ));
    }

    #[test]
    fn test_sigmoid_bounds() {
        assert_eq!(sigmoid(10.0), 1.0);
        assert_eq!(sigmoid(-10.0), 0.0);
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-6);
    }
}
