// Word outliers: single word pairs that are unusually similar or
// dissimilar for their topic and language pair.

use serde::{Deserialize, Serialize};

use super::zscore;
use crate::error::Result;
use crate::table::models::{pair_key, OutlierType, WordSimilarityRecord};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordOutlier {
    pub topic: String,
    pub source_word: String,
    pub language1: String,
    pub language2: String,
    pub word1: String,
    pub word2: String,
    pub word_similarity: f64,
    pub mean: f64,
    pub std: f64,
    pub z_score: f64,
    pub outlier_type: OutlierType,
}

/// Flag word pairs whose similarity is extreme within their
/// (topic, language pair) group.
pub fn word_outliers(series: &[WordSimilarityRecord], threshold: f64) -> Result<Vec<WordOutlier>> {
    let flagged = zscore::detect(
        series,
        |r| r.similarity,
        |r| (r.topic.clone(), pair_key(&r.language1, &r.language2)),
        threshold,
    )?;

    Ok(flagged
        .into_iter()
        .map(|o| {
            let record = &series[o.index];
            WordOutlier {
                topic: record.topic.clone(),
                source_word: record.source_word.clone(),
                language1: record.language1.clone(),
                language2: record.language2.clone(),
                word1: record.word1.clone(),
                word2: record.word2.clone(),
                word_similarity: record.similarity,
                mean: o.group_mean,
                std: o.group_std,
                z_score: o.z_score,
                outlier_type: o.classification,
            }
        })
        .collect())
}
