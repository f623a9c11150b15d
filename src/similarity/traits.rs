// Similarity metric trait: the swap-ready abstraction.
//
// Every stage downstream of the word table takes a `&dyn SimilarityMetric`,
// so the lexical and phonetic runs share one pipeline.

/// Compare two word-forms and return a score in [0, 1].
pub trait SimilarityMetric {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Score two present word-forms.
    fn similarity(&self, a: &str, b: &str) -> f64;

    /// Score two possibly-missing word-forms. A missing form on either side
    /// scores 0.0.
    fn similarity_of(&self, a: Option<&str>, b: Option<&str>) -> f64 {
        match (a, b) {
            (Some(a), Some(b)) => self.similarity(a, b),
            _ => 0.0,
        }
    }
}
