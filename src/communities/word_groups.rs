// Word outlier groups: categorical grouping, no graph clustering.
//
// Outlier word pairs are bucketed by (direction, language pair) so that a
// reader can see which concepts a pair of languages unusually agrees or
// disagrees on.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::outliers::word::WordOutlier;
use crate::table::models::{pair_key, OutlierType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordOutlierGroup {
    pub outlier_type: OutlierType,
    /// Unordered pair rendered as `"l1-l2"` with codes in sorted order
    pub lang_pair: String,
    /// Source words in first-seen order, without duplicates
    pub source_words: Vec<String>,
}

/// Format an unordered language pair as a stable label.
pub fn lang_pair_label(a: &str, b: &str) -> String {
    let (first, second) = pair_key(a, b);
    format!("{first}-{second}")
}

/// Group word outliers by (classification, language pair).
///
/// Groups are sorted by classification (Positive first), then pair label.
pub fn word_outlier_groups(outliers: &[WordOutlier]) -> Vec<WordOutlierGroup> {
    let mut groups: BTreeMap<(OutlierType, String), Vec<String>> = BTreeMap::new();

    for outlier in outliers {
        let key = (
            outlier.outlier_type,
            lang_pair_label(&outlier.language1, &outlier.language2),
        );
        let words = groups.entry(key).or_default();
        if !words.contains(&outlier.source_word) {
            words.push(outlier.source_word.clone());
        }
    }

    groups
        .into_iter()
        .map(|((outlier_type, lang_pair), source_words)| WordOutlierGroup {
            outlier_type,
            lang_pair,
            source_words,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outlier(source: &str, l1: &str, l2: &str, kind: OutlierType) -> WordOutlier {
        WordOutlier {
            topic: "t".to_string(),
            source_word: source.to_string(),
            language1: l1.to_string(),
            language2: l2.to_string(),
            word1: String::new(),
            word2: String::new(),
            word_similarity: 0.0,
            mean: 0.0,
            std: 0.0,
            z_score: 0.0,
            outlier_type: kind,
        }
    }

    #[test]
    fn test_groups_by_type_and_unordered_pair() {
        let outliers = vec![
            outlier("cat", "en", "de", OutlierType::Negative),
            outlier("dog", "de", "en", OutlierType::Negative),
            outlier("cat", "en", "de", OutlierType::Negative),
            outlier("milk", "en", "de", OutlierType::Positive),
        ];
        let groups = word_outlier_groups(&outliers);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].outlier_type, OutlierType::Positive);
        assert_eq!(groups[0].source_words, vec!["milk"]);
        assert_eq!(groups[1].lang_pair, "de-en");
        assert_eq!(groups[1].source_words, vec!["cat", "dog"]);
    }
}
