// Language proximity: per-word similarity series and pair means.
//
// The word series is the base quantity: one similarity per row per language
// pair. Global and per-topic proximity are arithmetic means over that series,
// so the pipeline builds the series once and aggregates it twice.
//
// Missing forms score 0.0 and still count towards the mean. Sums follow
// row order, which keeps the means bit-identical across runs.

use std::collections::BTreeMap;

use crate::similarity::traits::SimilarityMetric;
use crate::table::models::{Scope, SimilarityRecord, WordSimilarityRecord, WordTable};

/// Score every row's word-forms for every language pair.
///
/// Rows come out in table order; within a row, pairs follow column order.
pub fn word_similarities(
    table: &WordTable,
    metric: &dyn SimilarityMetric,
) -> Vec<WordSimilarityRecord> {
    let languages = table.languages();
    let pairs = table.language_pairs();
    let mut series = Vec::with_capacity(table.rows().len() * pairs.len());

    for row in table.rows() {
        for &(i, j) in &pairs {
            let form1 = row.form(i);
            let form2 = row.form(j);
            series.push(WordSimilarityRecord {
                topic: row.topic.clone(),
                source_word: row.source_word.clone(),
                language1: languages[i].clone(),
                language2: languages[j].clone(),
                word1: form1.unwrap_or_default().to_string(),
                word2: form2.unwrap_or_default().to_string(),
                similarity: metric.similarity_of(form1, form2),
            });
        }
    }

    series
}

/// Mean similarity per language pair across every row.
pub fn global_proximity(table: &WordTable, metric: &dyn SimilarityMetric) -> Vec<SimilarityRecord> {
    aggregate_global(&word_similarities(table, metric), table.languages())
}

/// Mean similarity per (topic, language pair).
pub fn topic_proximity(table: &WordTable, metric: &dyn SimilarityMetric) -> Vec<SimilarityRecord> {
    aggregate_topics(&word_similarities(table, metric), table.languages())
}

/// Running sum for one mean.
#[derive(Debug, Default, Clone, Copy)]
struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

/// Collapse a word series into one global record per language pair.
///
/// Pairs are emitted in column order of `languages`. Pairs with no rows
/// are omitted.
pub fn aggregate_global(
    series: &[WordSimilarityRecord],
    languages: &[String],
) -> Vec<SimilarityRecord> {
    let mut by_pair: BTreeMap<(usize, usize), MeanAccumulator> = BTreeMap::new();
    let index = language_index(languages);

    for record in series {
        if let Some(key) = pair_index(&index, &record.language1, &record.language2) {
            by_pair.entry(key).or_default().add(record.similarity);
        }
    }

    by_pair
        .into_iter()
        .map(|((i, j), acc)| SimilarityRecord {
            scope: Scope::Global,
            language1: languages[i].clone(),
            language2: languages[j].clone(),
            similarity: acc.mean(),
        })
        .collect()
}

/// Collapse a word series into one record per (topic, language pair).
///
/// Topics are emitted in sorted order, pairs in column order within a topic.
pub fn aggregate_topics(
    series: &[WordSimilarityRecord],
    languages: &[String],
) -> Vec<SimilarityRecord> {
    let mut by_topic: BTreeMap<&str, BTreeMap<(usize, usize), MeanAccumulator>> = BTreeMap::new();
    let index = language_index(languages);

    for record in series {
        if let Some(key) = pair_index(&index, &record.language1, &record.language2) {
            by_topic
                .entry(record.topic.as_str())
                .or_default()
                .entry(key)
                .or_default()
                .add(record.similarity);
        }
    }

    let mut records = Vec::new();
    for (topic, pairs) in by_topic {
        for ((i, j), acc) in pairs {
            records.push(SimilarityRecord {
                scope: Scope::Topic(topic.to_string()),
                language1: languages[i].clone(),
                language2: languages[j].clone(),
                similarity: acc.mean(),
            });
        }
    }
    records
}

fn language_index(languages: &[String]) -> BTreeMap<&str, usize> {
    languages
        .iter()
        .enumerate()
        .map(|(i, l)| (l.as_str(), i))
        .collect()
}

/// Column indices of a pair, smaller index first.
fn pair_index(index: &BTreeMap<&str, usize>, a: &str, b: &str) -> Option<(usize, usize)> {
    let i = *index.get(a)?;
    let j = *index.get(b)?;
    Some((i.min(j), i.max(j)))
}
