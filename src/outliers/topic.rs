// Topic outliers: topics where a language pair is unusually close or far
// compared to how that pair behaves globally.
//
// The scored value is `topic_similarity - global_similarity`. Grouping by
// language pair compares a topic's deviation with the spread of deviations
// for the same pair across all topics.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::zscore;
use crate::error::Result;
use crate::table::models::{OutlierType, SimilarityRecord};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicOutlier {
    pub topic: String,
    pub language1: String,
    pub language2: String,
    pub topic_similarity: f64,
    pub global_similarity: f64,
    pub difference: f64,
    pub mean: f64,
    pub std: f64,
    pub z_score: f64,
    pub outlier_type: OutlierType,
}

/// Flag (topic, pair) records whose deviation from the global mean is
/// extreme for that pair.
///
/// A pair without a global record is compared against 0.0.
pub fn topic_outliers(
    topic_records: &[SimilarityRecord],
    global_records: &[SimilarityRecord],
    threshold: f64,
) -> Result<Vec<TopicOutlier>> {
    let global: HashMap<(String, String), f64> = global_records
        .iter()
        .map(|r| (r.pair_key(), r.similarity))
        .collect();

    let global_of = |r: &SimilarityRecord| global.get(&r.pair_key()).copied().unwrap_or(0.0);

    let flagged = zscore::detect(
        topic_records,
        |r| r.similarity - global_of(r),
        |r| r.pair_key(),
        threshold,
    )?;

    Ok(flagged
        .into_iter()
        .map(|o| {
            let record = &topic_records[o.index];
            TopicOutlier {
                topic: record.scope.label().to_string(),
                language1: record.language1.clone(),
                language2: record.language2.clone(),
                topic_similarity: record.similarity,
                global_similarity: global_of(record),
                difference: o.value,
                mean: o.group_mean,
                std: o.group_std,
                z_score: o.z_score,
                outlier_type: o.classification,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::models::Scope;

    fn rec(scope: Scope, l1: &str, l2: &str, sim: f64) -> SimilarityRecord {
        SimilarityRecord {
            scope,
            language1: l1.to_string(),
            language2: l2.to_string(),
            similarity: sim,
        }
    }

    #[test]
    fn test_anomalous_topic_is_positive() {
        let global = vec![rec(Scope::Global, "en", "de", 0.3)];
        let mut topics: Vec<SimilarityRecord> = [0.29, 0.30, 0.31, 0.30, 0.30]
            .iter()
            .enumerate()
            .map(|(i, &s)| rec(Scope::Topic(format!("t{i}")), "en", "de", s))
            .collect();
        topics.push(rec(Scope::Topic("kinship".to_string()), "en", "de", 0.9));

        let out = topic_outliers(&topics, &global, 2.0).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].topic, "kinship");
        assert_eq!(out[0].outlier_type, OutlierType::Positive);
        assert!((out[0].difference - 0.6).abs() < 1e-12);
        assert!((out[0].global_similarity - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_pair_order_does_not_matter_for_global_lookup() {
        let global = vec![rec(Scope::Global, "de", "en", 0.5)];
        let topics = vec![rec(Scope::Topic("a".to_string()), "en", "de", 0.5)];
        let out = topic_outliers(&topics, &global, 0.0).unwrap();
        // Single member group: z is 0, never above even a zero threshold
        assert!(out.is_empty());
    }
}
