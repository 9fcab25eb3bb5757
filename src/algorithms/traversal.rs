//! Graph traversal algorithms (BFS, DFS, connected components)
//!
//! Based on Ligra (Shun & Blelloch, `PPoPP` 2013) frontier-based traversal patterns.
//! Neighbors are always visited in adjacency insertion order, so every
//! traversal here is deterministic for a fixed construction sequence.

use crate::error::Result;
use crate::storage::GraphStore;
use crate::NodeId;
use std::collections::VecDeque;
use std::fmt;

/// Breadth-first search result
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BfsResult {
    /// Vertices in the order they were dequeued
    pub order: Vec<NodeId>,
    /// Hop count from the start (`None` = unreached), indexed by vertex id
    pub distances: Vec<Option<u32>>,
}

impl BfsResult {
    /// Hop count to `node`, `None` if unreached or unknown
    #[must_use]
    pub fn distance(&self, node: NodeId) -> Option<u32> {
        self.distances.get(node.index()).copied().flatten()
    }
}

impl fmt::Display for BfsResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reached = self.distances.iter().flatten().count();
        let depth = self.distances.iter().flatten().max().copied().unwrap_or(0);
        write!(f, "BFS: {reached} vertices reached, depth {depth}")
    }
}

/// Depth-first search result
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DfsResult {
    /// Vertices in discovery order
    pub order: Vec<NodeId>,
    /// Discovery timestamp per vertex id (`None` = unvisited)
    pub discovery: Vec<Option<usize>>,
    /// Finish timestamp per vertex id (`None` = unvisited)
    pub finish: Vec<Option<usize>>,
}

impl DfsResult {
    /// Discovery timestamp of `node`
    #[must_use]
    pub fn discovery_time(&self, node: NodeId) -> Option<usize> {
        self.discovery.get(node.index()).copied().flatten()
    }

    /// Finish timestamp of `node`
    #[must_use]
    pub fn finish_time(&self, node: NodeId) -> Option<usize> {
        self.finish.get(node.index()).copied().flatten()
    }
}

impl fmt::Display for DfsResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DFS: {} vertices visited", self.order.len())
    }
}

/// Breadth-First Search from source node
///
/// # Arguments
///
/// * `graph` - Graph to traverse (outgoing arcs)
/// * `source` - Starting node for BFS
///
/// # Returns
///
/// Traversal order and per-vertex hop distances
///
/// # Errors
///
/// Returns `InvalidArgument` if `source` is not in the graph
///
/// # Example
///
/// ```
/// use trueno_graph_analytics::{bfs, GraphStore, NodeId};
///
/// let mut graph = GraphStore::new(true);
/// graph.add_edge(NodeId(0), NodeId(1), 1.0).unwrap();
/// graph.add_edge(NodeId(1), NodeId(2), 1.0).unwrap();
///
/// let result = bfs(&graph, NodeId(0)).unwrap();
/// assert_eq!(result.order, vec![NodeId(0), NodeId(1), NodeId(2)]);
/// assert_eq!(result.distance(NodeId(2)), Some(2));
/// ```
pub fn bfs(graph: &GraphStore, source: NodeId) -> Result<BfsResult> {
    graph.require_vertex(source, "start")?;

    let mut distances = vec![None; graph.num_vertices()];
    let mut order = Vec::new();
    let mut queue = VecDeque::new();

    distances[source.index()] = Some(0);
    queue.push_back(source);

    while let Some(current) = queue.pop_front() {
        order.push(current);
        let next_distance = distances[current.index()].map_or(0, |d: u32| d + 1);

        for &(neighbor, _) in graph.neighbors(current) {
            if distances[neighbor.index()].is_none() {
                distances[neighbor.index()] = Some(next_distance);
                queue.push_back(neighbor);
            }
        }
    }

    Ok(BfsResult { order, distances })
}

/// Stack frame phase for the explicit-stack DFS
#[derive(Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Vertex is about to be discovered
    Enter,
    /// All descendants are done
    Exit,
}

/// Shared DFS state; one walker can run several walks (component discovery)
struct DfsWalker<'g> {
    graph: &'g GraphStore,
    visited: Vec<bool>,
    discovery: Vec<Option<usize>>,
    finish: Vec<Option<usize>>,
    order: Vec<NodeId>,
    clock: usize,
}

impl<'g> DfsWalker<'g> {
    fn new(graph: &'g GraphStore) -> Self {
        let n = graph.num_vertices();
        Self {
            graph,
            visited: vec![false; n],
            discovery: vec![None; n],
            finish: vec![None; n],
            order: Vec::new(),
            clock: 0,
        }
    }

    fn discover(&mut self, node: NodeId) {
        self.visited[node.index()] = true;
        self.order.push(node);
        self.discovery[node.index()] = Some(self.clock);
        self.clock += 1;
    }

    fn close(&mut self, node: NodeId) {
        self.finish[node.index()] = Some(self.clock);
        self.clock += 1;
    }

    /// Explicit stack of (vertex, phase) frames
    ///
    /// Unvisited neighbors are pushed in reverse adjacency order so they pop
    /// in forward order; this replays the recursive visit exactly.
    fn walk(&mut self, start: NodeId) {
        let mut stack = vec![(start, Phase::Enter)];

        while let Some((node, phase)) = stack.pop() {
            match phase {
                Phase::Enter => {
                    if self.visited[node.index()] {
                        continue;
                    }
                    self.discover(node);
                    stack.push((node, Phase::Exit));

                    for &(neighbor, _) in self.graph.neighbors(node).iter().rev() {
                        if !self.visited[neighbor.index()] {
                            stack.push((neighbor, Phase::Enter));
                        }
                    }
                }
                Phase::Exit => self.close(node),
            }
        }
    }

    fn walk_recursive(&mut self, node: NodeId) {
        self.discover(node);
        for &(neighbor, _) in self.graph.neighbors(node) {
            if !self.visited[neighbor.index()] {
                self.walk_recursive(neighbor);
            }
        }
        self.close(node);
    }

    fn into_result(self) -> DfsResult {
        DfsResult {
            order: self.order,
            discovery: self.discovery,
            finish: self.finish,
        }
    }
}

/// Depth-First Search from source node (explicit stack)
///
/// Timestamps come from a single clock shared by discovery and finish
/// events, starting at 0.
///
/// # Errors
///
/// Returns `InvalidArgument` if `source` is not in the graph
///
/// # Example
///
/// ```
/// use trueno_graph_analytics::{dfs, GraphStore, NodeId};
///
/// let mut graph = GraphStore::new(true);
/// graph.add_edge(NodeId(0), NodeId(1), 1.0).unwrap();
/// graph.add_edge(NodeId(0), NodeId(2), 1.0).unwrap();
///
/// let result = dfs(&graph, NodeId(0)).unwrap();
/// assert_eq!(result.order, vec![NodeId(0), NodeId(1), NodeId(2)]);
/// assert_eq!(result.finish_time(NodeId(0)), Some(5));
/// ```
pub fn dfs(graph: &GraphStore, source: NodeId) -> Result<DfsResult> {
    graph.require_vertex(source, "start")?;

    let mut walker = DfsWalker::new(graph);
    walker.walk(source);
    Ok(walker.into_result())
}

/// Depth-First Search from source node (direct recursion)
///
/// Produces the same order and timestamps as [`dfs`]. Recursion depth
/// equals the longest DFS tree path, so prefer [`dfs`] on deep graphs.
///
/// # Errors
///
/// Returns `InvalidArgument` if `source` is not in the graph
pub fn dfs_recursive(graph: &GraphStore, source: NodeId) -> Result<DfsResult> {
    graph.require_vertex(source, "start")?;

    let mut walker = DfsWalker::new(graph);
    walker.walk_recursive(source);
    Ok(walker.into_result())
}

/// Partition vertices into components by repeated DFS
///
/// Vertices are scanned in ascending id order and every unvisited one
/// starts a new DFS over outgoing arcs. Components come back in discovery
/// order, members in DFS order. On undirected graphs these are the
/// connected components; on directed graphs only out-arcs are followed.
///
/// # Example
///
/// ```
/// use trueno_graph_analytics::{connected_components, GraphStore, NodeId};
///
/// let mut graph = GraphStore::new(false);
/// graph.add_edge(NodeId(0), NodeId(1), 1.0).unwrap();
/// graph.add_edge(NodeId(2), NodeId(3), 1.0).unwrap();
///
/// let components = connected_components(&graph);
/// assert_eq!(components, vec![vec![NodeId(0), NodeId(1)], vec![NodeId(2), NodeId(3)]]);
/// ```
#[must_use]
pub fn connected_components(graph: &GraphStore) -> Vec<Vec<NodeId>> {
    let mut walker = DfsWalker::new(graph);
    let mut components = Vec::new();

    for node in graph.vertex_iter() {
        if walker.visited[node.index()] {
            continue;
        }
        let first = walker.order.len();
        walker.walk(node);
        components.push(walker.order[first..].to_vec());
    }

    components
}
