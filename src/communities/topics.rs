// Topic communities: topics that rank language pairs almost identically.
//
// Each topic becomes a vector of its similarity for every language pair
// (pairs it lacks are 0.0). Topics whose vectors have cosine similarity above
// a high threshold are linked, and the resulting graph is partitioned.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::graph::SimilarityGraph;
use super::traits::Partitioner;
use crate::error::{ProximityError, Result};
use crate::table::models::{CommunityAssignment, Scope, SimilarityRecord};

/// Default cosine similarity a topic pair must exceed to share an edge.
pub const DEFAULT_TOPIC_THRESHOLD: f64 = 0.995;

/// Cosine similarity between two vectors of equal length.
///
/// Returns 0.0 for empty or mismatched vectors and for zero vectors.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let mag_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    let denom = mag_a * mag_b;
    if denom < f64::EPSILON {
        0.0
    } else {
        (dot / denom).clamp(0.0, 1.0)
    }
}

/// Build one vector per topic over the sorted union of language pairs.
pub fn topic_vectors(topic_records: &[SimilarityRecord]) -> BTreeMap<String, Vec<f64>> {
    let pairs: BTreeSet<(String, String)> = topic_records.iter().map(|r| r.pair_key()).collect();
    let pair_index: BTreeMap<&(String, String), usize> =
        pairs.iter().enumerate().map(|(i, p)| (p, i)).collect();

    let mut vectors: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for record in topic_records {
        let Scope::Topic(topic) = &record.scope else {
            continue;
        };
        let key = record.pair_key();
        let Some(&i) = pair_index.get(&key) else {
            continue;
        };
        vectors
            .entry(topic.clone())
            .or_insert_with(|| vec![0.0; pairs.len()])[i] = record.similarity;
    }
    vectors
}

/// Partition topics by the similarity of their language-pair profiles.
///
/// Emits one assignment per topic, in sorted topic order, with scope Global.
pub fn topic_communities(
    topic_records: &[SimilarityRecord],
    threshold: f64,
    partitioner: &dyn Partitioner,
) -> Result<Vec<CommunityAssignment>> {
    if !threshold.is_finite() {
        return Err(ProximityError::InvalidParameter(format!(
            "topic cosine threshold must be a number, got {threshold}"
        )));
    }

    let vectors = topic_vectors(topic_records);
    let topics: Vec<&String> = vectors.keys().collect();
    let mut graph = SimilarityGraph::new(topics.iter().map(|t| t.to_string()));

    for (i, a) in topics.iter().enumerate() {
        for b in topics.iter().skip(i + 1) {
            let cos = cosine_similarity(&vectors[*a], &vectors[*b]);
            if cos > threshold {
                graph.add_edge(a, b, cos);
            }
        }
    }

    let ids = partitioner.partition(&graph)?;
    debug!(
        topics = topics.len(),
        edges = graph.edge_count(),
        "Topic communities detected"
    );

    Ok(ids
        .into_iter()
        .enumerate()
        .map(|(node, id)| CommunityAssignment {
            scope: Scope::Global,
            node: graph.label(node).to_string(),
            community_id: id,
        })
        .collect())
}
