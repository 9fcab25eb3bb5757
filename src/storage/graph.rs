//! Weighted adjacency graph store
//!
//! Every analysis engine reads this structure and none mutates it.
//!
//! # Layout
//!
//! ```text
//! Directed graph: 0 → 1 (2.0), 0 → 2 (1.0), 2 → 1 (4.0)
//!
//! outgoing: [ [(1, 2.0), (2, 1.0)], [], [(1, 4.0)] ]   // insertion order
//! incoming: [ [], [(0, 2.0), (2, 4.0)], [(0, 1.0)] ]   // reverse view
//! present:  [ true, true, true ]
//! ```
//!
//! Vertex ids need not be contiguous: `num_vertices` is `max id + 1` and is
//! used for sizing per-vertex result arrays, while `present` tracks which
//! ids were actually added.

use crate::error::{GraphError, Result};
use std::collections::HashMap;
use std::fmt;

/// Node identifier (zero-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub u32);

impl NodeId {
    /// Position of this node in per-vertex arrays
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for NodeId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Weighted graph with insertion-ordered adjacency
///
/// Optimized for:
/// - deterministic neighbor order (traversals replay identically)
/// - O(1) edge lookup and weight upsert
/// - O(1) access to incoming edges via the reverse adjacency
///
/// # Example
///
/// ```
/// use trueno_graph_analytics::{GraphStore, NodeId};
///
/// let mut graph = GraphStore::new(true);
/// graph.add_edge(NodeId(0), NodeId(1), 1.0).unwrap();
/// graph.add_edge(NodeId(0), NodeId(2), 1.0).unwrap();
///
/// assert_eq!(graph.neighbors(NodeId(0)).len(), 2);
/// assert_eq!(graph.num_vertices(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct GraphStore {
    /// Outgoing arcs per vertex, in insertion order, no duplicate neighbor
    outgoing: Vec<Vec<(NodeId, f64)>>,

    /// Incoming arcs per vertex (reverse of `outgoing`)
    incoming: Vec<Vec<(NodeId, f64)>>,

    /// (from, to) → (slot in `outgoing[from]`, slot in `incoming[to]`)
    arc_slots: HashMap<(u32, u32), (usize, usize)>,

    /// Which ids below `num_vertices` were added
    present: Vec<bool>,

    /// Number of present vertices
    vertex_count: usize,

    /// Logical edge count (undirected edges counted once)
    num_edges: usize,

    directed: bool,
}

impl GraphStore {
    /// Create new empty graph
    #[must_use]
    pub fn new(directed: bool) -> Self {
        Self {
            outgoing: Vec::new(),
            incoming: Vec::new(),
            arc_slots: HashMap::new(),
            present: Vec::new(),
            vertex_count: 0,
            num_edges: 0,
            directed,
        }
    }

    /// Create graph from edge list
    ///
    /// # Arguments
    ///
    /// * `edges` - List of (source, target, weight) tuples
    /// * `directed` - Whether edges are one-way
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if any weight is negative or not finite
    pub fn from_edge_list(edges: &[(NodeId, NodeId, f64)], directed: bool) -> Result<Self> {
        let mut graph = Self::new(directed);
        for &(src, dst, weight) in edges {
            graph.add_edge(src, dst, weight)?;
        }
        Ok(graph)
    }

    /// Create graph from a square adjacency matrix
    ///
    /// Every entry greater than zero becomes an edge `row → column`; all
    /// `0..n` vertices are added even when isolated.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the matrix is not square or holds a
    /// negative or non-finite entry
    pub fn from_adjacency_matrix(matrix: &[Vec<f64>], directed: bool) -> Result<Self> {
        let n = matrix.len();
        let mut graph = Self::new(directed);

        for (row_idx, row) in matrix.iter().enumerate() {
            if row.len() != n {
                return Err(GraphError::invalid(format!(
                    "adjacency matrix row {row_idx} has {} columns, expected {n}",
                    row.len()
                )));
            }
            graph.add_vertex(node_at(row_idx)?);
        }

        for (row_idx, row) in matrix.iter().enumerate() {
            for (col_idx, &weight) in row.iter().enumerate() {
                if !weight.is_finite() || weight < 0.0 {
                    return Err(GraphError::invalid(format!(
                        "adjacency matrix entry ({row_idx}, {col_idx}) = {weight} is not a valid weight"
                    )));
                }
                if weight > 0.0 {
                    graph.add_edge(node_at(row_idx)?, node_at(col_idx)?, weight)?;
                }
            }
        }

        Ok(graph)
    }

    /// Create graph from adjacency lists (`lists[i]` holds the arcs of vertex `i`)
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` on an invalid weight
    pub fn from_adjacency_list(lists: &[Vec<(NodeId, f64)>], directed: bool) -> Result<Self> {
        let mut graph = Self::new(directed);
        for (src_idx, arcs) in lists.iter().enumerate() {
            let src = node_at(src_idx)?;
            graph.add_vertex(src);
            for &(dst, weight) in arcs {
                graph.add_edge(src, dst, weight)?;
            }
        }
        Ok(graph)
    }

    /// Add an isolated vertex (no-op if it already exists)
    pub fn add_vertex(&mut self, node: NodeId) {
        let idx = node.index();
        if idx >= self.present.len() {
            self.expand_to(idx + 1);
        }
        if !self.present[idx] {
            self.present[idx] = true;
            self.vertex_count += 1;
        }
    }

    /// Add edge to graph, or update its weight if it already exists
    ///
    /// Both endpoints are added implicitly. In an undirected graph the edge
    /// is materialized in both directions with the same weight.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the weight is negative or not finite
    pub fn add_edge(&mut self, src: NodeId, dst: NodeId, weight: f64) -> Result<()> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(GraphError::invalid(format!(
                "edge {src} -> {dst} has invalid weight {weight}"
            )));
        }

        self.add_vertex(src);
        self.add_vertex(dst);

        let inserted = self.upsert_arc(src, dst, weight);
        if !self.directed && src != dst {
            self.upsert_arc(dst, src, weight);
        }
        if inserted {
            self.num_edges += 1;
        }

        Ok(())
    }

    /// Insert arc or overwrite its weight; returns true if the arc is new
    fn upsert_arc(&mut self, src: NodeId, dst: NodeId, weight: f64) -> bool {
        if let Some(&(out_slot, in_slot)) = self.arc_slots.get(&(src.0, dst.0)) {
            self.outgoing[src.index()][out_slot].1 = weight;
            self.incoming[dst.index()][in_slot].1 = weight;
            return false;
        }

        let out_slot = self.outgoing[src.index()].len();
        let in_slot = self.incoming[dst.index()].len();
        self.outgoing[src.index()].push((dst, weight));
        self.incoming[dst.index()].push((src, weight));
        self.arc_slots.insert((src.0, dst.0), (out_slot, in_slot));
        true
    }

    /// Outgoing (neighbor, weight) pairs in insertion order
    ///
    /// Empty for vertices without arcs and for unknown ids.
    #[must_use]
    pub fn neighbors(&self, node: NodeId) -> &[(NodeId, f64)] {
        self.outgoing.get(node.index()).map_or(&[], Vec::as_slice)
    }

    /// Incoming (neighbor, weight) pairs
    ///
    /// For undirected graphs this holds the same neighbors as [`Self::neighbors`].
    #[must_use]
    pub fn incoming(&self, node: NodeId) -> &[(NodeId, f64)] {
        self.incoming.get(node.index()).map_or(&[], Vec::as_slice)
    }

    /// Check whether a vertex was added
    #[must_use]
    pub fn has_vertex(&self, node: NodeId) -> bool {
        self.present.get(node.index()).copied().unwrap_or(false)
    }

    /// Check whether the arc `src → dst` exists
    #[must_use]
    pub fn has_edge(&self, src: NodeId, dst: NodeId) -> bool {
        self.arc_slots.contains_key(&(src.0, dst.0))
    }

    /// Weight of the arc `src → dst`
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the edge does not exist
    pub fn edge_weight(&self, src: NodeId, dst: NodeId) -> Result<f64> {
        self.arc_slots
            .get(&(src.0, dst.0))
            .map(|&(out_slot, _)| self.outgoing[src.index()][out_slot].1)
            .ok_or_else(|| GraphError::invalid(format!("edge {src} -> {dst} does not exist")))
    }

    /// Present vertices in ascending id order
    #[must_use]
    pub fn vertices(&self) -> Vec<NodeId> {
        self.vertex_iter().collect()
    }

    /// Iterate present vertices in ascending id order
    pub fn vertex_iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.present
            .iter()
            .enumerate()
            .filter(|(_, &present)| present)
            .filter_map(|(idx, _)| u32::try_from(idx).ok().map(NodeId))
    }

    /// Iterate edges as (source, target, weight); undirected edges appear once
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, f64)> + '_ {
        self.vertex_iter().flat_map(move |src| {
            self.neighbors(src)
                .iter()
                .filter(move |(dst, _)| self.directed || src <= *dst)
                .map(move |&(dst, weight)| (src, dst, weight))
        })
    }

    /// Array size for per-vertex results (`max id + 1`)
    #[must_use]
    pub fn num_vertices(&self) -> usize {
        self.present.len()
    }

    /// Number of vertices actually added
    #[must_use]
    pub const fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Number of edges (undirected edges counted once)
    #[must_use]
    pub const fn num_edges(&self) -> usize {
        self.num_edges
    }

    /// Whether edges are one-way
    #[must_use]
    pub const fn is_directed(&self) -> bool {
        self.directed
    }

    /// True if no vertex was added
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.vertex_count == 0
    }

    /// Number of outgoing arcs
    #[must_use]
    pub fn out_degree(&self, node: NodeId) -> usize {
        self.neighbors(node).len()
    }

    /// Number of incoming arcs
    #[must_use]
    pub fn in_degree(&self, node: NodeId) -> usize {
        self.incoming(node).len()
    }

    /// Sum of outgoing arc weights
    #[must_use]
    pub fn weighted_degree(&self, node: NodeId) -> f64 {
        self.neighbors(node).iter().map(|(_, w)| w).sum()
    }

    /// Fail with `InvalidArgument` unless `node` was added
    pub(crate) fn require_vertex(&self, node: NodeId, role: &str) -> Result<()> {
        if self.has_vertex(node) {
            Ok(())
        } else {
            Err(GraphError::invalid(format!("{role} vertex {node} not in graph")))
        }
    }

    /// Fail with `GraphEmpty` if no vertex was added
    pub(crate) fn require_non_empty(&self) -> Result<()> {
        if self.is_empty() {
            Err(GraphError::GraphEmpty)
        } else {
            Ok(())
        }
    }

    /// Expand graph to accommodate new ids
    fn expand_to(&mut self, new_size: usize) {
        self.outgoing.resize_with(new_size, Vec::new);
        self.incoming.resize_with(new_size, Vec::new);
        self.present.resize(new_size, false);
    }

    /// Overwrite a stored weight without validation (exercises engine guards)
    #[cfg(test)]
    pub(crate) fn force_weight(&mut self, src: NodeId, dst: NodeId, weight: f64) {
        if let Some(&(out_slot, in_slot)) = self.arc_slots.get(&(src.0, dst.0)) {
            self.outgoing[src.index()][out_slot].1 = weight;
            self.incoming[dst.index()][in_slot].1 = weight;
        }
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new(true)
    }
}

impl fmt::Display for GraphStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} graph: {} vertices, {} edges",
            if self.directed { "directed" } else { "undirected" },
            self.vertex_count,
            self.num_edges
        )
    }
}

fn node_at(idx: usize) -> Result<NodeId> {
    u32::try_from(idx)
        .map(NodeId)
        .map_err(|_| GraphError::invalid(format!("vertex index {idx} exceeds u32 range")))
}
