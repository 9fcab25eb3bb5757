//! Shortest path algorithms: Dijkstra's algorithm
//!
//! Provides shortest path computation for weighted graphs:
//! - `dijkstra`: Single-source shortest paths with non-negative weights
//! - `ShortestPaths::path_to`: Path reconstruction from the predecessor array
//! - `dijkstra_path`: Shortest path between two specific nodes
//!
//! # Example
//!
//! ```
//! use trueno_graph_analytics::{dijkstra, GraphStore, NodeId};
//!
//! // Build a weighted graph
//! let edges = vec![
//!     (NodeId(0), NodeId(1), 1.0),
//!     (NodeId(1), NodeId(2), 2.0),
//!     (NodeId(0), NodeId(2), 5.0),
//! ];
//! let graph = GraphStore::from_edge_list(&edges, true).unwrap();
//!
//! // Find shortest paths from node 0
//! let paths = dijkstra(&graph, NodeId(0)).unwrap();
//! assert_eq!(paths.distances, vec![0.0, 1.0, 3.0]); // 0→1→2 = 3.0, not 0→2 = 5.0
//! assert_eq!(paths.path_to(NodeId(2)).unwrap(), vec![NodeId(0), NodeId(1), NodeId(2)]);
//! ```

use crate::error::{GraphError, Result};
use crate::storage::GraphStore;
use crate::NodeId;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;

/// State for Dijkstra's priority queue
#[derive(Clone, Copy)]
struct State {
    cost: f64,
    node: NodeId,
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for State {}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (BinaryHeap is max-heap by default);
        // equal costs pop the smaller id first
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Single-source shortest path result
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShortestPaths {
    /// Source vertex
    pub source: NodeId,
    /// Distance per vertex id (`f64::INFINITY` = unreached)
    pub distances: Vec<f64>,
    /// Predecessor on a shortest path (`None` for the source and unreached)
    pub predecessors: Vec<Option<NodeId>>,
}

impl ShortestPaths {
    /// Distance to `node`, `INFINITY` if unreached or unknown
    #[must_use]
    pub fn distance(&self, node: NodeId) -> f64 {
        self.distances
            .get(node.index())
            .copied()
            .unwrap_or(f64::INFINITY)
    }

    /// Whether `node` was reached from the source
    #[must_use]
    pub fn is_reachable(&self, node: NodeId) -> bool {
        self.distance(node).is_finite()
    }

    /// Reconstruct the path from the source to `end`
    ///
    /// Returns an empty path if `end` was not reached.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `end` is outside the distance array
    pub fn path_to(&self, end: NodeId) -> Result<Vec<NodeId>> {
        if end.index() >= self.distances.len() {
            return Err(GraphError::invalid(format!(
                "end vertex {end} out of range (0..{})",
                self.distances.len()
            )));
        }
        if !self.is_reachable(end) {
            return Ok(Vec::new());
        }

        let mut path = vec![end];
        let mut current = end;
        while let Some(pred) = self.predecessors[current.index()] {
            path.push(pred);
            current = pred;
        }
        path.reverse();
        Ok(path)
    }
}

impl fmt::Display for ShortestPaths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reached: Vec<f64> = self
            .distances
            .iter()
            .copied()
            .filter(|d| d.is_finite())
            .collect();
        let farthest = reached.iter().copied().fold(0.0, f64::max);
        write!(
            f,
            "Dijkstra from {}: {} vertices reached, farthest at distance {farthest:.4}",
            self.source,
            reached.len()
        )
    }
}

/// Compute single-source shortest paths using Dijkstra's algorithm
///
/// Stale heap entries (popped cost above the best known distance) are
/// skipped without relaxation.
///
/// # Arguments
///
/// * `graph` - Graph with edge weights as distances
/// * `source` - The starting node
///
/// # Errors
///
/// - `InvalidArgument` if `source` is not in the graph
/// - `NegativeWeight` on the first negative arc met during relaxation
///
/// # Complexity
///
/// O((V + E) log V) using a binary heap
pub fn dijkstra(graph: &GraphStore, source: NodeId) -> Result<ShortestPaths> {
    graph.require_vertex(source, "start")?;

    let n = graph.num_vertices();
    let mut distances = vec![f64::INFINITY; n];
    let mut predecessors = vec![None; n];
    let mut heap = BinaryHeap::new();

    distances[source.index()] = 0.0;
    heap.push(State {
        cost: 0.0,
        node: source,
    });

    while let Some(State { cost, node }) = heap.pop() {
        // Skip if we've found a better path
        if cost > distances[node.index()] {
            continue;
        }

        for &(neighbor, weight) in graph.neighbors(node) {
            if weight < 0.0 {
                return Err(GraphError::NegativeWeight {
                    from: node,
                    to: neighbor,
                    weight,
                });
            }

            let next_cost = cost + weight;
            if next_cost < distances[neighbor.index()] {
                distances[neighbor.index()] = next_cost;
                predecessors[neighbor.index()] = Some(node);
                heap.push(State {
                    cost: next_cost,
                    node: neighbor,
                });
            }
        }
    }

    Ok(ShortestPaths {
        source,
        distances,
        predecessors,
    })
}

/// Find the shortest path between two nodes
///
/// # Returns
///
/// * `Some((distance, path))` if a path exists
/// * `None` if target is unreachable from source
///
/// # Errors
///
/// Same as [`dijkstra`], plus `InvalidArgument` if `target` is out of range
///
/// # Example
///
/// ```
/// use trueno_graph_analytics::{dijkstra_path, GraphStore, NodeId};
///
/// let edges = vec![
///     (NodeId(0), NodeId(1), 1.0),
///     (NodeId(1), NodeId(2), 2.0),
/// ];
/// let graph = GraphStore::from_edge_list(&edges, true).unwrap();
///
/// let (dist, path) = dijkstra_path(&graph, NodeId(0), NodeId(2)).unwrap().unwrap();
/// assert_eq!(dist, 3.0);
/// assert_eq!(path, vec![NodeId(0), NodeId(1), NodeId(2)]);
/// ```
pub fn dijkstra_path(
    graph: &GraphStore,
    source: NodeId,
    target: NodeId,
) -> Result<Option<(f64, Vec<NodeId>)>> {
    let paths = dijkstra(graph, source)?;
    let path = paths.path_to(target)?;
    if path.is_empty() {
        return Ok(None);
    }
    Ok(Some((paths.distance(target), path)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weighted(edges: &[(u32, u32, f64)]) -> GraphStore {
        let edges: Vec<_> = edges
            .iter()
            .map(|&(s, t, w)| (NodeId(s), NodeId(t), w))
            .collect();
        GraphStore::from_edge_list(&edges, true).unwrap()
    }

    #[test]
    fn test_single_edge() {
        let graph = weighted(&[(0, 1, 5.0)]);
        let paths = dijkstra(&graph, NodeId(0)).unwrap();
        assert_eq!(paths.distances, vec![0.0, 5.0]);
        assert_eq!(paths.predecessors, vec![None, Some(NodeId(0))]);
    }

    #[test]
    fn test_shorter_path_via_intermediate() {
        // 0→1(2), 1→2(3), 2→0(1), 0→2(10): 0→1→2 beats the direct edge
        let graph = weighted(&[(0, 1, 2.0), (1, 2, 3.0), (2, 0, 1.0), (0, 2, 10.0)]);
        let paths = dijkstra(&graph, NodeId(0)).unwrap();

        assert_eq!(paths.distances, vec![0.0, 2.0, 5.0]);
        assert_eq!(
            paths.path_to(NodeId(2)).unwrap(),
            vec![NodeId(0), NodeId(1), NodeId(2)]
        );
    }

    #[test]
    fn test_unreachable_node() {
        let graph = weighted(&[(0, 1, 1.0), (2, 3, 1.0)]);
        let paths = dijkstra(&graph, NodeId(0)).unwrap();

        assert_eq!(paths.distance(NodeId(1)), 1.0);
        assert!(paths.distance(NodeId(2)).is_infinite());
        assert!(!paths.is_reachable(NodeId(3)));
        assert!(paths.path_to(NodeId(3)).unwrap().is_empty());
    }

    #[test]
    fn test_path_to_source() {
        let graph = weighted(&[(0, 1, 1.0)]);
        let paths = dijkstra(&graph, NodeId(0)).unwrap();
        assert_eq!(paths.path_to(NodeId(0)).unwrap(), vec![NodeId(0)]);
    }

    #[test]
    fn test_path_to_out_of_range() {
        let graph = weighted(&[(0, 1, 1.0)]);
        let paths = dijkstra(&graph, NodeId(0)).unwrap();
        assert!(matches!(
            paths.path_to(NodeId(2)),
            Err(GraphError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_source_not_in_graph() {
        let graph = weighted(&[(0, 1, 1.0)]);
        assert!(matches!(
            dijkstra(&graph, NodeId(100)),
            Err(GraphError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_zero_weight_edge() {
        let graph = weighted(&[(0, 1, 0.0), (1, 2, 0.0)]);
        let paths = dijkstra(&graph, NodeId(0)).unwrap();
        assert_eq!(paths.distance(NodeId(2)), 0.0);
    }

    #[test]
    fn test_negative_weight_detected() {
        let mut graph = weighted(&[(0, 1, 1.0), (1, 2, 1.0)]);
        graph.force_weight(NodeId(1), NodeId(2), -2.0);

        let err = dijkstra(&graph, NodeId(0)).unwrap_err();
        assert_eq!(
            err,
            GraphError::NegativeWeight {
                from: NodeId(1),
                to: NodeId(2),
                weight: -2.0,
            }
        );
    }

    #[test]
    fn test_diamond_shortest_path() {
        let graph = weighted(&[(0, 1, 1.0), (0, 2, 2.0), (1, 3, 1.0), (2, 3, 5.0)]);

        let (dist, path) = dijkstra_path(&graph, NodeId(0), NodeId(3))
            .unwrap()
            .unwrap();
        assert_eq!(dist, 2.0);
        assert_eq!(path, vec![NodeId(0), NodeId(1), NodeId(3)]);
    }

    #[test]
    fn test_dijkstra_path_unreachable() {
        let graph = weighted(&[(0, 1, 1.0), (2, 3, 1.0)]);
        assert!(dijkstra_path(&graph, NodeId(0), NodeId(3))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_undirected_graph() {
        let mut graph = GraphStore::new(false);
        graph.add_edge(NodeId(2), NodeId(1), 4.0).unwrap();
        graph.add_edge(NodeId(1), NodeId(0), 1.0).unwrap();

        let paths = dijkstra(&graph, NodeId(2)).unwrap();
        assert_eq!(paths.distances, vec![5.0, 4.0, 0.0]);
    }
}
