//! Directed k-core decomposition
//!
//! A vertex's core number is the largest `k` such that it belongs to a
//! maximal subgraph in which every vertex has at least `k` in-arcs and at
//! least `k` out-arcs inside the subgraph. On undirected graphs (symmetric
//! adjacency) this is the classical core number.
//!
//! Computed as a fixpoint: core numbers start at `min(in, out)` and only
//! ever decrease. A vertex keeps level `c` while at least `c` in-neighbors
//! and `c` out-neighbors still hold core numbers of at least `c`; otherwise
//! it drops to the highest level its neighbors still support.
//!
//! # References
//! - Batagelj & Zaversnik (2003): "An O(m) Algorithm for Cores Decomposition of Networks"
//! - Giatsidis et al. (2011): "D-cores: Measuring Collaboration of Directed Graphs"
//! - Lü et al. (2016): "The H-index of a network node and its relation to degree and coreness"

use crate::error::{GraphError, Result};
use crate::storage::GraphStore;
use crate::NodeId;
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// Core decomposition result
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoreDecomposition {
    /// Decomposed vertices, ascending
    pub vertices: Vec<NodeId>,
    /// Core number per vertex id (0 for ids never added)
    pub core_numbers: Vec<usize>,
    /// Largest core number
    pub max_core: usize,
    /// `histogram[k]` = number of vertices with core number `k`
    pub histogram: Vec<usize>,
}

impl CoreDecomposition {
    /// Core number of `node`
    #[must_use]
    pub fn core_number(&self, node: NodeId) -> Option<usize> {
        self.core_numbers.get(node.index()).copied()
    }

    /// Vertices with core number ≥ `min_k`, grouped by ascending core number
    ///
    /// Core numbers with no vertices are omitted.
    #[must_use]
    pub fn k_core_subgraphs(&self, min_k: usize) -> Vec<(usize, Vec<NodeId>)> {
        let mut groups: Vec<Vec<NodeId>> = vec![Vec::new(); self.max_core + 1];
        for &node in &self.vertices {
            let core = self.core_numbers[node.index()];
            if core >= min_k {
                groups[core].push(node);
            }
        }

        groups
            .into_iter()
            .enumerate()
            .filter(|(_, members)| !members.is_empty())
            .collect()
    }

    /// Vertices whose core number equals the maximum
    #[must_use]
    pub fn largest_k_core(&self) -> Vec<NodeId> {
        self.vertices
            .iter()
            .copied()
            .filter(|node| self.core_numbers[node.index()] == self.max_core)
            .collect()
    }
}

impl fmt::Display for CoreDecomposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "K-core: {} vertices, max core {}",
            self.vertices.len(),
            self.max_core
        )?;
        for (core, count) in self.histogram.iter().enumerate() {
            if *count > 0 {
                writeln!(f, "  core {core}: {count} vertices")?;
            }
        }
        Ok(())
    }
}

/// Compute directed core numbers for every vertex
///
/// # Errors
///
/// Returns `GraphEmpty` if the graph has no vertices
///
/// # Example
///
/// ```
/// use trueno_graph_analytics::{core_decomposition, GraphStore, NodeId};
///
/// let mut graph = GraphStore::new(true);
/// graph.add_edge(NodeId(0), NodeId(1), 1.0).unwrap();
/// graph.add_edge(NodeId(1), NodeId(2), 1.0).unwrap();
/// graph.add_edge(NodeId(2), NodeId(0), 1.0).unwrap();
///
/// let cores = core_decomposition(&graph).unwrap();
/// assert_eq!(cores.max_core, 1);
/// ```
pub fn core_decomposition(graph: &GraphStore) -> Result<CoreDecomposition> {
    graph.require_non_empty()?;

    let vertices = graph.vertices();
    let mut cores = vec![0_usize; graph.num_vertices()];
    for &node in &vertices {
        cores[node.index()] = graph.in_degree(node).min(graph.out_degree(node));
    }

    let mut scans = 0_usize;
    let mut counts = Vec::new();
    loop {
        scans += 1;
        let mut changed = false;

        for &node in &vertices {
            let current = cores[node.index()];
            if current == 0 {
                continue;
            }

            let supported_in = supported_level(graph.incoming(node), &cores, current, &mut counts);
            let supported_out =
                supported_level(graph.neighbors(node), &cores, current, &mut counts);
            let supported = supported_in.min(supported_out);

            if supported < current {
                cores[node.index()] = supported;
                changed = true;
            }
        }

        if !changed {
            break;
        }
    }

    let max_core = vertices
        .iter()
        .map(|node| cores[node.index()])
        .max()
        .unwrap_or(0);
    let mut histogram = vec![0; max_core + 1];
    for node in &vertices {
        histogram[cores[node.index()]] += 1;
    }

    debug!(scans, max_core, "core decomposition reached fixpoint");

    Ok(CoreDecomposition {
        vertices,
        core_numbers: cores,
        max_core,
        histogram,
    })
}

/// Highest level `c ≤ cap` with at least `c` arcs to vertices of core ≥ `c`
///
/// `counts` is scratch space reused across calls.
fn supported_level(
    arcs: &[(NodeId, f64)],
    cores: &[usize],
    cap: usize,
    counts: &mut Vec<usize>,
) -> usize {
    counts.clear();
    counts.resize(cap + 1, 0);
    for (neighbor, _) in arcs {
        counts[cores[neighbor.index()].min(cap)] += 1;
    }

    let mut at_least = 0;
    for level in (1..=cap).rev() {
        at_least += counts[level];
        if at_least >= level {
            return level;
        }
    }
    0
}

/// Check whether `vertices` form a k-core
///
/// Every candidate needs at least `k` in-arcs and `k` out-arcs whose other
/// endpoint is also a candidate. An empty candidate set is trivially a
/// k-core.
///
/// # Errors
///
/// Returns `InvalidArgument` if a candidate is not in the graph
pub fn is_k_core(graph: &GraphStore, vertices: &[NodeId], k: usize) -> Result<bool> {
    for &node in vertices {
        if !graph.has_vertex(node) {
            return Err(GraphError::invalid(format!(
                "candidate vertex {node} not in graph"
            )));
        }
    }

    let members: HashSet<NodeId> = vertices.iter().copied().collect();
    let inside = |arcs: &[(NodeId, f64)]| {
        arcs.iter()
            .filter(|(other, _)| members.contains(other))
            .count()
    };

    Ok(members
        .iter()
        .all(|&node| inside(graph.incoming(node)) >= k && inside(graph.neighbors(node)) >= k))
}
