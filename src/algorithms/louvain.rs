//! Louvain community detection algorithm
//!
//! Greedy local modularity optimization (the first phase of Blondel et al.,
//! 2008). Every vertex starts in its own community; passes move single
//! vertices into the neighboring community with the largest modularity gain
//! until a pass makes no move.
//!
//! # References
//! - Blondel et al. (2008): "Fast unfolding of communities in large networks"
//! - Girvan & Newman (2002): "Community structure in social and biological networks"

use crate::error::{GraphError, Result};
use crate::storage::GraphStore;
use crate::NodeId;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::debug;

/// Louvain parameters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LouvainConfig {
    /// Hard upper bound on local-move passes
    pub max_iterations: usize,
    /// Weight of the null-model term in the move gain
    pub resolution: f64,
}

impl Default for LouvainConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            resolution: 1.0,
        }
    }
}

impl LouvainConfig {
    /// Check parameter ranges
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for zero passes or a non-positive resolution
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(GraphError::invalid("max_iterations must be positive"));
        }
        if !(self.resolution > 0.0 && self.resolution.is_finite()) {
            return Err(GraphError::invalid(format!(
                "resolution {} must be positive",
                self.resolution
            )));
        }
        Ok(())
    }
}

/// Community detection result
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LouvainResult {
    /// Assigned vertices, ascending
    pub vertices: Vec<NodeId>,
    /// Community id per vertex id, not compacted (ids never added keep their own id)
    pub communities: Vec<u32>,
    /// Newman modularity of the final partition
    pub modularity: f64,
    /// Passes performed
    pub iterations: usize,
    /// Whether the last pass made no move
    pub converged: bool,
}

impl LouvainResult {
    /// Community of `node`, `None` if it is not in the graph
    #[must_use]
    pub fn community_of(&self, node: NodeId) -> Option<u32> {
        self.vertices
            .binary_search(&node)
            .ok()
            .map(|_| self.communities[node.index()])
    }

    /// Vertices grouped by community id
    #[must_use]
    pub fn members(&self) -> BTreeMap<u32, Vec<NodeId>> {
        let mut groups: BTreeMap<u32, Vec<NodeId>> = BTreeMap::new();
        for &node in &self.vertices {
            groups
                .entry(self.communities[node.index()])
                .or_default()
                .push(node);
        }
        groups
    }

    /// Number of distinct communities
    #[must_use]
    pub fn num_communities(&self) -> usize {
        self.vertices
            .iter()
            .map(|node| self.communities[node.index()])
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Distinct community pairs joined by at least one edge of `graph`
    ///
    /// Pairs are `(low, high)` and sorted; edges inside a community are
    /// not reported.
    #[must_use]
    pub fn community_edges(&self, graph: &GraphStore) -> Vec<(u32, u32)> {
        let mut pairs = BTreeSet::new();
        for (src, dst, _) in graph.edges() {
            let (Some(a), Some(b)) = (self.community_of(src), self.community_of(dst)) else {
                continue;
            };
            if a != b {
                pairs.insert((a.min(b), a.max(b)));
            }
        }
        pairs.into_iter().collect()
    }
}

impl fmt::Display for LouvainResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Louvain: {} communities over {} vertices, modularity {:.4}",
            self.num_communities(),
            self.vertices.len(),
            self.modularity
        )?;
        writeln!(
            f,
            "  {} passes, converged: {}",
            self.iterations, self.converged
        )?;
        for (community, members) in self.members() {
            writeln!(f, "  community {community}: {} vertices", members.len())?;
        }
        Ok(())
    }
}

/// Detect communities by greedy local modularity moves
///
/// `k_i` is the weighted out-degree of vertex `i` and `m` is half the total
/// adjacency weight. Moving `i` into neighboring community `C` gains
///
/// ```text
/// ΔQ = k_i,in(C) - resolution * k_i * Σtot(C) / m
/// ```
///
/// Vertices are scanned in ascending id order and neighboring communities in
/// adjacency order. The best strictly positive gain wins (first found on
/// ties), and the move happens only if it also beats the gain of staying,
/// i.e. rejoining the current community with `i` taken out of it.
///
/// # Errors
///
/// - `InvalidArgument` on out-of-range parameters
/// - `GraphEmpty` if the graph has no vertices
/// - `NoEdges` if the total edge weight is zero
///
/// # Example
///
/// ```
/// use trueno_graph_analytics::{louvain, GraphStore, LouvainConfig, NodeId};
///
/// let mut graph = GraphStore::new(false);
/// for (a, b) in [(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5)] {
///     graph.add_edge(NodeId(a), NodeId(b), 1.0).unwrap();
/// }
///
/// let result = louvain(&graph, &LouvainConfig::default()).unwrap();
/// assert_eq!(result.num_communities(), 2);
/// assert!((result.modularity - 0.5).abs() < 1e-9);
/// ```
pub fn louvain(graph: &GraphStore, config: &LouvainConfig) -> Result<LouvainResult> {
    config.validate()?;
    graph.require_non_empty()?;

    let vertices = graph.vertices();
    let size = graph.num_vertices();

    let mut degrees = vec![0.0; size];
    for &node in &vertices {
        degrees[node.index()] = graph.weighted_degree(node);
    }
    let total_weight = degrees.iter().sum::<f64>() / 2.0;
    if total_weight <= 0.0 {
        return Err(GraphError::NoEdges);
    }

    // Singletons: community ids are vertex ids
    let mut communities: Vec<u32> = (0..size)
        .map(|id| u32::try_from(id).unwrap_or(u32::MAX))
        .collect();
    let mut community_totals = degrees.clone();

    // Scratch: weight from the scanned vertex into each community
    let mut links = vec![0.0; size];
    let mut linked = vec![false; size];
    let mut candidates: Vec<u32> = Vec::new();

    let mut modularity = newman_modularity(graph, &vertices, &communities, &degrees);
    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iterations {
        iterations += 1;
        let mut moves = 0_usize;

        for &node in &vertices {
            let current = communities[node.index()];
            let degree = degrees[node.index()];

            candidates.clear();
            for &(neighbor, weight) in graph.neighbors(node) {
                if neighbor == node {
                    continue;
                }
                let community = communities[neighbor.index()];
                let slot = community as usize;
                if !linked[slot] {
                    linked[slot] = true;
                    candidates.push(community);
                }
                links[slot] += weight;
            }

            let gain = |community: u32, total: f64| {
                links[community as usize] - config.resolution * degree * total / total_weight
            };
            let stay = gain(current, community_totals[current as usize] - degree);

            let mut best = current;
            let mut best_gain = 0.0;
            for &community in &candidates {
                if community == current {
                    continue;
                }
                let delta = gain(community, community_totals[community as usize]);
                if delta > best_gain {
                    best_gain = delta;
                    best = community;
                }
            }

            for &community in &candidates {
                links[community as usize] = 0.0;
                linked[community as usize] = false;
            }

            if best != current && best_gain > stay {
                community_totals[current as usize] -= degree;
                community_totals[best as usize] += degree;
                communities[node.index()] = best;
                moves += 1;
            }
        }

        if moves == 0 {
            converged = true;
            break;
        }
        modularity = newman_modularity(graph, &vertices, &communities, &degrees);
        debug!(pass = iterations, moves, modularity, "Louvain pass");
    }

    if converged {
        debug!(iterations, modularity, "Louvain converged");
    } else {
        debug!(iterations, "Louvain reached iteration limit");
    }

    Ok(LouvainResult {
        vertices,
        communities,
        modularity,
        iterations,
        converged,
    })
}

/// `Q = Σ_c [ in_c / 2m − (tot_c / 2m)² ]` over adjacency weights
fn newman_modularity(
    graph: &GraphStore,
    vertices: &[NodeId],
    communities: &[u32],
    degrees: &[f64],
) -> f64 {
    let two_m: f64 = degrees.iter().sum();
    let mut internal: BTreeMap<u32, f64> = BTreeMap::new();
    let mut totals: BTreeMap<u32, f64> = BTreeMap::new();

    for &node in vertices {
        let community = communities[node.index()];
        *totals.entry(community).or_default() += degrees[node.index()];
        for &(neighbor, weight) in graph.neighbors(node) {
            if communities[neighbor.index()] == community {
                *internal.entry(community).or_default() += weight;
            }
        }
    }

    totals
        .iter()
        .map(|(community, total)| {
            internal.get(community).copied().unwrap_or(0.0) / two_m - (total / two_m).powi(2)
        })
        .sum()
}

/// Conductance of a vertex set
///
/// Weight of arcs leaving `community` divided by
/// `min(volume(community), volume(rest))`, where volume sums weighted
/// out-degrees. Returns 0.0 when that minimum is zero.
///
/// # Errors
///
/// Returns `InvalidArgument` if `community` is empty or holds a vertex not
/// in the graph
///
/// # Example
///
/// ```
/// use trueno_graph_analytics::{conductance, GraphStore, NodeId};
///
/// let mut graph = GraphStore::new(false);
/// for (a, b) in [(0, 1), (1, 2), (2, 3)] {
///     graph.add_edge(NodeId(a), NodeId(b), 1.0).unwrap();
/// }
///
/// let phi = conductance(&graph, &[NodeId(0), NodeId(1)]).unwrap();
/// assert!((phi - 1.0 / 3.0).abs() < 1e-12);
/// ```
pub fn conductance(graph: &GraphStore, community: &[NodeId]) -> Result<f64> {
    if community.is_empty() {
        return Err(GraphError::invalid("community must not be empty"));
    }

    let mut inside = vec![false; graph.num_vertices()];
    for &node in community {
        graph.require_vertex(node, "community")?;
        inside[node.index()] = true;
    }

    let mut cut = 0.0;
    let mut volume_in = 0.0;
    let mut volume_out = 0.0;
    for node in graph.vertex_iter() {
        let degree = graph.weighted_degree(node);
        if inside[node.index()] {
            volume_in += degree;
            cut += graph
                .neighbors(node)
                .iter()
                .filter(|(other, _)| !inside[other.index()])
                .map(|(_, weight)| weight)
                .sum::<f64>();
        } else {
            volume_out += degree;
        }
    }

    let denominator = f64::min(volume_in, volume_out);
    if denominator <= 0.0 {
        return Ok(0.0);
    }
    Ok(cut / denominator)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn undirected(edges: &[(u32, u32)]) -> GraphStore {
        let edges: Vec<_> = edges
            .iter()
            .map(|&(s, t)| (NodeId(s), NodeId(t), 1.0))
            .collect();
        GraphStore::from_edge_list(&edges, false).unwrap()
    }

    fn two_triangles_bridged() -> GraphStore {
        undirected(&[(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5), (2, 3)])
    }

    #[test]
    fn test_louvain_two_triangles() {
        let graph = two_triangles_bridged();
        let result = louvain(&graph, &LouvainConfig::default()).unwrap();

        assert!(result.converged);
        assert_eq!(result.num_communities(), 2);
        assert_eq!(result.community_of(NodeId(0)), result.community_of(NodeId(2)));
        assert_eq!(result.community_of(NodeId(3)), result.community_of(NodeId(5)));
        assert_ne!(result.community_of(NodeId(0)), result.community_of(NodeId(3)));
        assert!((result.modularity - 5.0 / 14.0).abs() < 1e-9);
    }

    #[test]
    fn test_louvain_two_cliques() {
        let mut edges = Vec::new();
        for offset in [0, 5] {
            for a in 0..5 {
                for b in a + 1..5 {
                    edges.push((a + offset, b + offset));
                }
            }
        }
        let graph = undirected(&edges);
        let result = louvain(&graph, &LouvainConfig::default()).unwrap();

        assert!(result.converged);
        assert_eq!(result.iterations, 2);
        let members: Vec<Vec<NodeId>> = result.members().into_values().collect();
        assert_eq!(
            members,
            vec![
                (0..5).map(NodeId).collect::<Vec<_>>(),
                (5..10).map(NodeId).collect::<Vec<_>>(),
            ]
        );
        assert!((result.modularity - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_louvain_disconnected_components() {
        let mut graph = GraphStore::new(true);
        graph.add_edge(NodeId(0), NodeId(1), 1.0).unwrap();
        graph.add_edge(NodeId(2), NodeId(3), 1.0).unwrap();

        let result = louvain(&graph, &LouvainConfig::default()).unwrap();

        assert!(result.converged);
        assert_eq!(result.communities, vec![1, 1, 3, 3]);
        assert_eq!(result.num_communities(), 2);
        assert!(result.community_edges(&graph).is_empty());
    }

    #[test]
    fn test_louvain_all_nodes_assigned() {
        let graph = two_triangles_bridged();
        let result = louvain(&graph, &LouvainConfig::default()).unwrap();

        let assigned: usize = result.members().values().map(Vec::len).sum();
        assert_eq!(assigned, graph.vertex_count());
        for node in graph.vertex_iter() {
            assert!(result.community_of(node).is_some());
        }
        assert_eq!(result.community_of(NodeId(42)), None);
    }

    #[test]
    fn test_community_edges_reports_bridge() {
        let graph = two_triangles_bridged();
        let result = louvain(&graph, &LouvainConfig::default()).unwrap();

        let a = result.community_of(NodeId(2)).unwrap();
        let b = result.community_of(NodeId(3)).unwrap();
        assert_eq!(result.community_edges(&graph), vec![(a.min(b), a.max(b))]);
    }

    #[test]
    fn test_louvain_iteration_limit() {
        // Directed 3-cycle keeps trading vertices between communities
        let mut graph = GraphStore::new(true);
        for (a, b) in [(0, 1), (1, 2), (2, 0)] {
            graph.add_edge(NodeId(a), NodeId(b), 1.0).unwrap();
        }
        let config = LouvainConfig {
            max_iterations: 10,
            ..LouvainConfig::default()
        };
        let result = louvain(&graph, &config).unwrap();

        assert_eq!(result.iterations, 10);
        assert!(!result.converged);
    }

    #[test]
    fn test_louvain_sparse_ids_keep_own_community() {
        let graph = undirected(&[(0, 1), (1, 2), (0, 2), (5, 6), (6, 7), (5, 7)]);
        let result = louvain(&graph, &LouvainConfig::default()).unwrap();

        assert_eq!(result.communities[3], 3);
        assert_eq!(result.communities[4], 4);
        assert_eq!(result.community_of(NodeId(3)), None);
        assert_eq!(result.num_communities(), 2);
    }

    #[test]
    fn test_louvain_errors() {
        assert_eq!(
            louvain(&GraphStore::new(false), &LouvainConfig::default()),
            Err(GraphError::GraphEmpty)
        );

        let mut isolated = GraphStore::new(false);
        isolated.add_vertex(NodeId(0));
        isolated.add_vertex(NodeId(1));
        assert_eq!(
            louvain(&isolated, &LouvainConfig::default()),
            Err(GraphError::NoEdges)
        );

        let mut zero = GraphStore::new(false);
        zero.add_edge(NodeId(0), NodeId(1), 0.0).unwrap();
        assert_eq!(
            louvain(&zero, &LouvainConfig::default()),
            Err(GraphError::NoEdges)
        );

        let graph = two_triangles_bridged();
        for config in [
            LouvainConfig {
                max_iterations: 0,
                ..LouvainConfig::default()
            },
            LouvainConfig {
                resolution: 0.0,
                ..LouvainConfig::default()
            },
        ] {
            assert!(matches!(
                louvain(&graph, &config),
                Err(GraphError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_conductance_bridge_cut() {
        let graph = two_triangles_bridged();
        let phi = conductance(&graph, &[NodeId(0), NodeId(1), NodeId(2)]).unwrap();
        assert!((phi - 1.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_conductance_whole_graph_is_zero() {
        let graph = two_triangles_bridged();
        let everything = graph.vertices();
        assert_eq!(conductance(&graph, &everything).unwrap(), 0.0);
    }

    #[test]
    fn test_conductance_errors() {
        let graph = two_triangles_bridged();
        assert!(matches!(
            conductance(&graph, &[]),
            Err(GraphError::InvalidArgument(_))
        ));
        assert!(matches!(
            conductance(&graph, &[NodeId(0), NodeId(99)]),
            Err(GraphError::InvalidArgument(_))
        ));
    }
}
