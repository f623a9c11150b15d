// Weighted undirected similarity graph over languages or topics.
//
// Built per scope, handed to a Partitioner, then dropped. Every node is
// added up front so that nodes without edges still receive a community.

use std::collections::HashMap;

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

pub struct SimilarityGraph {
    graph: UnGraph<String, f64>,
    index: HashMap<String, NodeIndex>,
}

impl SimilarityGraph {
    /// Create a graph with the given node labels and no edges.
    /// Duplicate labels are added once.
    pub fn new<I, S>(nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut graph = UnGraph::new_undirected();
        let mut index = HashMap::new();
        for label in nodes {
            let label: String = label.into();
            if index.contains_key(&label) {
                continue;
            }
            let idx = graph.add_node(label.clone());
            index.insert(label, idx);
        }
        Self { graph, index }
    }

    /// Add a weighted edge between two known nodes.
    ///
    /// Returns false (and adds nothing) for unknown nodes, self-loops, and
    /// weights that are not positive.
    pub fn add_edge(&mut self, a: &str, b: &str, weight: f64) -> bool {
        if !weight.is_finite() || weight <= 0.0 {
            return false;
        }
        let (Some(&ia), Some(&ib)) = (self.index.get(a), self.index.get(b)) else {
            return false;
        };
        if ia == ib {
            return false;
        }
        self.graph.add_edge(ia, ib, weight);
        true
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Node label at a given node index.
    pub fn label(&self, node: usize) -> &str {
        &self.graph[NodeIndex::new(node)]
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.graph.node_weights().map(|s| s.as_str())
    }

    /// All edges as `(source, target, weight)` node indices.
    pub fn weighted_edges(&self) -> Vec<(usize, usize, f64)> {
        self.graph
            .edge_references()
            .map(|e| (e.source().index(), e.target().index(), *e.weight()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_non_positive_and_self_edges() {
        let mut g = SimilarityGraph::new(["en", "de", "nl"]);
        assert!(g.add_edge("en", "de", 0.4));
        assert!(!g.add_edge("en", "nl", 0.0));
        assert!(!g.add_edge("nl", "nl", 1.0));
        assert!(!g.add_edge("en", "xx", 0.5));
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn test_labels_keep_insertion_order() {
        let g = SimilarityGraph::new(["en", "de", "en", "fr"]);
        let labels: Vec<&str> = g.labels().collect();
        assert_eq!(labels, vec!["en", "de", "fr"]);
        assert_eq!(g.label(2), "fr");
    }
}
