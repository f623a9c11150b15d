// ============================================================================
// LOUVAIN (Modularity-based Community Detection)
// ============================================================================
//
// Modularity scores a partition: dense weight inside communities, sparse
// weight between them.
//
//   Q = (1/2m) * Σ [A_ij - γ * (k_i * k_j)/(2m)] * δ(c_i, c_j)
//
// Where:
//   m   = total edge weight
//   A_ij = edge weight between i and j
//   k_i = weighted degree of node i
//   γ   = resolution (higher = more, smaller communities)
//
// Algorithm:
// 1. Each node starts in its own community
// 2. Move each node to the neighbouring community with the best gain
// 3. Aggregate each community into a super-node (internal weight becomes
//    a self-loop) and repeat from 1 on the smaller graph
// 4. Stop when a level makes no move
//
// Visit order is node-index order, or a ChaCha8 shuffle when seeded. Both
// are reproducible; community ids are renumbered by first node appearance.
// ============================================================================

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use super::graph::SimilarityGraph;
use super::traits::Partitioner;
use crate::error::{ProximityError, Result};

/// Gains must beat the current placement by more than this to move a node.
const GAIN_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone)]
pub struct LouvainPartitioner {
    pub resolution: f64,
    /// Maximum local-moving sweeps per level
    pub max_iterations: usize,
    /// Shuffle the visit order with this seed
    pub seed: Option<u64>,
}

impl Default for LouvainPartitioner {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            max_iterations: 100,
            seed: None,
        }
    }
}

impl LouvainPartitioner {
    pub fn new(resolution: f64, seed: Option<u64>) -> Self {
        Self {
            resolution,
            seed,
            ..Self::default()
        }
    }
}

impl Partitioner for LouvainPartitioner {
    fn name(&self) -> &'static str {
        "louvain"
    }

    fn partition(&self, graph: &SimilarityGraph) -> Result<Vec<u32>> {
        if !self.resolution.is_finite() || self.resolution <= 0.0 {
            return Err(ProximityError::InvalidParameter(format!(
                "resolution must be positive, got {}",
                self.resolution
            )));
        }

        let n = graph.node_count();
        if n == 0 {
            return Ok(vec![]);
        }

        let mut rng = self.seed.map(ChaCha8Rng::seed_from_u64);
        let mut membership: Vec<usize> = (0..n).collect();
        let mut level = Level::from_edges(n, &graph.weighted_edges());
        let mut depth = 0;

        loop {
            let (communities, moved) =
                local_moving(&level, self.resolution, self.max_iterations, rng.as_mut());
            if !moved {
                break;
            }

            let (renumbered, count) = renumber(&communities);
            if count == level.n {
                break;
            }
            for m in membership.iter_mut() {
                *m = renumbered[*m];
            }
            level = level.aggregate(&renumbered, count);
            depth += 1;
        }

        let (assignments, count) = renumber(&membership);
        debug!(
            nodes = n,
            edges = graph.edge_count(),
            communities = count,
            levels = depth,
            "Louvain partition complete"
        );

        Ok(assignments.into_iter().map(|c| c as u32).collect())
    }
}

/// One level of the Louvain hierarchy.
struct Level {
    n: usize,
    /// Undirected edges between distinct nodes, each listed once
    edges: Vec<(usize, usize, f64)>,
    /// Weight of internal edges folded into each node
    self_loops: Vec<f64>,
}

impl Level {
    fn from_edges(n: usize, edges: &[(usize, usize, f64)]) -> Self {
        let edges = edges
            .iter()
            .filter(|&&(u, v, w)| u != v && u < n && v < n && w > 0.0)
            .copied()
            .collect();
        Self {
            n,
            edges,
            self_loops: vec![0.0; n],
        }
    }

    fn adjacency(&self) -> Vec<Vec<(usize, f64)>> {
        let mut adj = vec![Vec::new(); self.n];
        for &(u, v, w) in &self.edges {
            adj[u].push((v, w));
            adj[v].push((u, w));
        }
        adj
    }

    fn degrees(&self, adj: &[Vec<(usize, f64)>]) -> Vec<f64> {
        adj.iter()
            .zip(&self.self_loops)
            .map(|(edges, self_loop)| edges.iter().map(|(_, w)| w).sum::<f64>() + 2.0 * self_loop)
            .collect()
    }

    /// Collapse each community into one node.
    fn aggregate(&self, community: &[usize], count: usize) -> Level {
        let mut self_loops = vec![0.0; count];
        for (node, &w) in self.self_loops.iter().enumerate() {
            self_loops[community[node]] += w;
        }

        let mut between: BTreeMap<(usize, usize), f64> = BTreeMap::new();
        for &(u, v, w) in &self.edges {
            let (cu, cv) = (community[u], community[v]);
            if cu == cv {
                self_loops[cu] += w;
            } else {
                *between.entry((cu.min(cv), cu.max(cv))).or_insert(0.0) += w;
            }
        }

        Level {
            n: count,
            edges: between.into_iter().map(|((a, b), w)| (a, b, w)).collect(),
            self_loops,
        }
    }
}

/// Phase 1: move nodes between neighbouring communities until no move
/// improves modularity. Returns the assignment and whether anything moved.
fn local_moving(
    level: &Level,
    resolution: f64,
    max_iterations: usize,
    mut rng: Option<&mut ChaCha8Rng>,
) -> (Vec<usize>, bool) {
    let mut community: Vec<usize> = (0..level.n).collect();
    let adj = level.adjacency();
    let degrees = level.degrees(&adj);
    let total: f64 = degrees.iter().sum();

    if total <= 0.0 {
        return (community, false);
    }

    // Sum of degrees per community
    let mut tot = degrees.clone();
    let mut order: Vec<usize> = (0..level.n).collect();
    let mut moved_any = false;

    for _ in 0..max_iterations {
        if let Some(rng) = rng.as_deref_mut() {
            order.shuffle(rng);
        }

        let mut moved = false;
        for &node in &order {
            let current = community[node];
            let k_i = degrees[node];

            // Edge weight from node into each neighbouring community
            let mut links: BTreeMap<usize, f64> = BTreeMap::new();
            for &(neighbor, w) in &adj[node] {
                *links.entry(community[neighbor]).or_insert(0.0) += w;
            }

            // Take the node out before comparing placements
            tot[current] -= k_i;

            let gain = |c: usize, k_i_in: f64| k_i_in - resolution * tot[c] * k_i / total;

            let mut best = current;
            let mut best_gain = gain(current, links.get(&current).copied().unwrap_or(0.0));
            for (&c, &k_i_in) in &links {
                let g = gain(c, k_i_in);
                if g > best_gain + GAIN_TOLERANCE {
                    best = c;
                    best_gain = g;
                }
            }

            tot[best] += k_i;
            if best != current {
                community[node] = best;
                moved = true;
                moved_any = true;
            }
        }

        if !moved {
            break;
        }
    }

    (community, moved_any)
}

/// Renumber labels to 0, 1, 2, ... in order of first appearance.
fn renumber(labels: &[usize]) -> (Vec<usize>, usize) {
    let mut map: BTreeMap<usize, usize> = BTreeMap::new();
    let renumbered = labels
        .iter()
        .map(|&label| {
            let next = map.len();
            *map.entry(label).or_insert(next)
        })
        .collect();
    (renumbered, map.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(n: usize, edges: &[(usize, usize, f64)]) -> SimilarityGraph {
        let labels: Vec<String> = (0..n).map(|i| format!("n{i}")).collect();
        let mut g = SimilarityGraph::new(labels.clone());
        for &(u, v, w) in edges {
            g.add_edge(&labels[u], &labels[v], w);
        }
        g
    }

    fn two_triangles() -> SimilarityGraph {
        graph(
            6,
            &[
                (0, 1, 1.0),
                (1, 2, 1.0),
                (2, 0, 1.0),
                (3, 4, 1.0),
                (4, 5, 1.0),
                (5, 3, 1.0),
                (2, 3, 0.1),
            ],
        )
    }

    #[test]
    fn test_empty_graph() {
        let result = LouvainPartitioner::default().partition(&graph(0, &[])).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_no_edges_gives_singletons() {
        let result = LouvainPartitioner::default().partition(&graph(3, &[])).unwrap();
        assert_eq!(result, vec![0, 1, 2]);
    }

    #[test]
    fn test_single_edge_merges_pair() {
        let result = LouvainPartitioner::default()
            .partition(&graph(3, &[(0, 1, 0.7)]))
            .unwrap();
        assert_eq!(result[0], result[1]);
        assert_ne!(result[0], result[2]);
    }

    #[test]
    fn test_two_triangles_split() {
        let result = LouvainPartitioner::default().partition(&two_triangles()).unwrap();
        assert_eq!(result[0], result[1]);
        assert_eq!(result[1], result[2]);
        assert_eq!(result[3], result[4]);
        assert_eq!(result[4], result[5]);
        assert_ne!(result[0], result[3], "Weakly bridged triangles should split");
    }

    #[test]
    fn test_weight_aware() {
        // Complete graph on 4 nodes; only the weights distinguish {0,1} and {2,3}
        let result = LouvainPartitioner::default()
            .partition(&graph(
                4,
                &[
                    (0, 1, 0.9),
                    (2, 3, 0.9),
                    (0, 2, 0.1),
                    (0, 3, 0.1),
                    (1, 2, 0.1),
                    (1, 3, 0.1),
                ],
            ))
            .unwrap();
        assert_eq!(result[0], result[1]);
        assert_eq!(result[2], result[3]);
        assert_ne!(result[0], result[2]);
    }

    #[test]
    fn test_ids_are_contiguous() {
        let result = LouvainPartitioner::default().partition(&two_triangles()).unwrap();
        let max = *result.iter().max().unwrap();
        for id in 0..=max {
            assert!(result.contains(&id), "Community id {id} is missing");
        }
        assert_eq!(result[0], 0);
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let partitioner = LouvainPartitioner::new(1.0, Some(42));
        let a = partitioner.partition(&two_triangles()).unwrap();
        let b = partitioner.partition(&two_triangles()).unwrap();
        assert_eq!(a, b);
        assert_ne!(a[0], a[3]);
    }

    #[test]
    fn test_rejects_non_positive_resolution() {
        let err = LouvainPartitioner::new(0.0, None)
            .partition(&graph(2, &[(0, 1, 1.0)]))
            .unwrap_err();
        assert!(matches!(err, ProximityError::InvalidParameter(_)));
    }
}
