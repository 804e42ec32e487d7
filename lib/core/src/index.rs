use crate::{Error, Result};

/// Result of [`SimilarityIndex::best`]
#[derive(Debug, Clone, PartialEq)]
pub struct BestMatch {
    /// Corpus position of the highest scoring document
    pub index: usize,
    pub score: f32,
    /// One similarity per document, in corpus order
    pub similarities: Vec<f32>,
}

/// A frozen vector space that scores every corpus document against a query
pub trait SimilarityIndex: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Number of documents scored per query
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Vocabulary size of the fitted model
    fn vocabulary_size(&self) -> usize;

    /// Cosine similarity of `query` against every document, in corpus order.
    /// Every value lies in `[-1, 1]`.
    fn score(&self, query: &str) -> Vec<f32>;

    /// Highest scoring document. Ties go to the earliest document, so an
    /// all-zero result selects index 0.
    fn best(&self, query: &str) -> Result<BestMatch> {
        let similarities = self.score(query);
        let index = argmax(&similarities).ok_or(Error::EmptyCorpus)?;
        Ok(BestMatch {
            index,
            score: similarities[index],
            similarities,
        })
    }
}

/// Position of the largest value, first occurrence on ties. NaN never wins.
pub fn argmax(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            None => best = Some((i, v)),
            Some((_, current)) if v > current || (current.is_nan() && !v.is_nan()) => {
                best = Some((i, v))
            }
            _ => {}
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<f32>);

    impl SimilarityIndex for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn len(&self) -> usize {
            self.0.len()
        }

        fn vocabulary_size(&self) -> usize {
            0
        }

        fn score(&self, _query: &str) -> Vec<f32> {
            self.0.clone()
        }
    }

    #[test]
    fn test_argmax_first_occurrence() {
        assert_eq!(argmax(&[0.1, 0.9, 0.9, 0.2]), Some(1));
        assert_eq!(argmax(&[0.0, 0.0, 0.0]), Some(0));
        assert_eq!(argmax(&[-0.5, -0.2]), Some(1));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_argmax_ignores_nan() {
        assert_eq!(argmax(&[f32::NAN, 0.1, 0.0]), Some(1));
        assert_eq!(argmax(&[0.3, f32::NAN, 0.2]), Some(0));
    }

    #[test]
    fn test_best_default_impl() {
        let index = Fixed(vec![0.2, 0.7, 0.1]);
        let best = index.best("anything").unwrap();
        assert_eq!(best.index, 1);
        assert_eq!(best.score, 0.7);
        assert_eq!(best.similarities, vec![0.2, 0.7, 0.1]);
    }

    #[test]
    fn test_best_on_empty_index() {
        let index = Fixed(vec![]);
        assert!(index.is_empty());
        assert!(matches!(index.best("q"), Err(Error::EmptyCorpus)));
    }
}
