// Surface-form similarity: normalized Levenshtein over the written words.

use super::levenshtein;
use super::traits::SimilarityMetric;

#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalMetric;

impl SimilarityMetric for LexicalMetric {
    fn name(&self) -> &'static str {
        "lexical"
    }

    fn similarity(&self, a: &str, b: &str) -> f64 {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        levenshtein::normalized_similarity(&a, &b)
    }
}
