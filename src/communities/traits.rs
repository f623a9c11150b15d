// Partitioner trait: swap-ready community detection.
//
// The pipeline only needs a node -> community mapping. Louvain is the
// default; any modularity method that satisfies the contract below can
// replace it without touching the callers.

use super::graph::SimilarityGraph;
use crate::error::Result;

pub trait Partitioner {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Assign every node a community id, indexed by node index.
    ///
    /// Implementations must give each node exactly one id, prefer placing
    /// heavily weighted neighbours together, and handle graphs with zero
    /// or one edge.
    fn partition(&self, graph: &SimilarityGraph) -> Result<Vec<u32>>;
}
