// Language communities: one partition of the language graph per scope.

use std::collections::BTreeMap;

use tracing::debug;

use super::graph::SimilarityGraph;
use super::traits::Partitioner;
use crate::error::Result;
use crate::table::models::{CommunityAssignment, Scope, SimilarityRecord};

/// Partition languages by similarity, separately for every scope present in
/// `records` (Global first, then topics in sorted order).
///
/// Every language in `languages` is a node of every scope's graph, so each
/// scope yields exactly one assignment per language. Languages with no
/// positive-weight edge end up as singletons.
pub fn language_communities(
    records: &[SimilarityRecord],
    languages: &[String],
    partitioner: &dyn Partitioner,
) -> Result<Vec<CommunityAssignment>> {
    let mut by_scope: BTreeMap<&Scope, Vec<&SimilarityRecord>> = BTreeMap::new();
    for record in records {
        by_scope.entry(&record.scope).or_default().push(record);
    }

    let mut assignments = Vec::with_capacity(by_scope.len() * languages.len());
    for (scope, scope_records) in by_scope {
        let mut graph = SimilarityGraph::new(languages.iter().cloned());
        for r in scope_records {
            graph.add_edge(&r.language1, &r.language2, r.similarity);
        }

        let ids = partitioner.partition(&graph)?;
        debug!(
            scope = %scope,
            edges = graph.edge_count(),
            communities = ids.iter().max().map_or(0, |m| m + 1),
            "Language communities detected"
        );

        for (node, id) in ids.into_iter().enumerate() {
            assignments.push(CommunityAssignment {
                scope: scope.clone(),
                node: graph.label(node).to_string(),
                community_id: id,
            });
        }
    }

    Ok(assignments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::communities::louvain::LouvainPartitioner;

    fn rec(scope: Scope, l1: &str, l2: &str, sim: f64) -> SimilarityRecord {
        SimilarityRecord {
            scope,
            language1: l1.to_string(),
            language2: l2.to_string(),
            similarity: sim,
        }
    }

    #[test]
    fn test_one_assignment_per_scope_and_language() {
        let langs: Vec<String> = ["en", "de", "nl", "it"].iter().map(|s| s.to_string()).collect();
        let records = vec![
            rec(Scope::Global, "de", "nl", 0.6),
            rec(Scope::Global, "en", "it", 0.1),
            rec(Scope::Topic("food".to_string()), "de", "nl", 0.7),
        ];
        let out = language_communities(&records, &langs, &LouvainPartitioner::default()).unwrap();
        assert_eq!(out.len(), 8);
        assert_eq!(out[0].scope, Scope::Global);
        assert_eq!(out[4].scope, Scope::Topic("food".to_string()));

        let food: Vec<&CommunityAssignment> = out[4..].iter().collect();
        let id = |lang: &str| food.iter().find(|a| a.node == lang).unwrap().community_id;
        assert_eq!(id("de"), id("nl"));
        assert_ne!(id("en"), id("it"), "No edge in this scope: singletons");
    }
}
