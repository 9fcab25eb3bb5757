//! Synthetic graph constructors
//!
//! Every generator adds vertices `0..n` up front, so isolated vertices are
//! present even when no edge touches them.

use crate::error::{GraphError, Result};
use crate::storage::{GraphStore, NodeId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn with_vertices(n: u32, directed: bool) -> GraphStore {
    let mut graph = GraphStore::new(directed);
    for id in 0..n {
        graph.add_vertex(NodeId(id));
    }
    graph
}

/// Every ordered pair of distinct vertices joined
///
/// # Errors
///
/// Returns `InvalidArgument` for a negative or non-finite weight
pub fn complete(n: u32, weight: f64, directed: bool) -> Result<GraphStore> {
    let mut graph = with_vertices(n, directed);
    for src in 0..n {
        for dst in 0..n {
            if src != dst {
                graph.add_edge(NodeId(src), NodeId(dst), weight)?;
            }
        }
    }
    Ok(graph)
}

/// `0 → 1 → … → n-1 → 0`
///
/// # Errors
///
/// Returns `InvalidArgument` for a negative or non-finite weight
pub fn cycle(n: u32, weight: f64, directed: bool) -> Result<GraphStore> {
    let mut graph = with_vertices(n, directed);
    for src in 0..n {
        graph.add_edge(NodeId(src), NodeId((src + 1) % n), weight)?;
    }
    Ok(graph)
}

/// Hub 0 pointing at leaves `1..n`
///
/// # Errors
///
/// Returns `InvalidArgument` for a negative or non-finite weight
pub fn star(n: u32, weight: f64, directed: bool) -> Result<GraphStore> {
    let mut graph = with_vertices(n, directed);
    for leaf in 1..n {
        graph.add_edge(NodeId(0), NodeId(leaf), weight)?;
    }
    Ok(graph)
}

/// `0 → 1 → … → n-1`
///
/// # Errors
///
/// Returns `InvalidArgument` for a negative or non-finite weight
pub fn path(n: u32, weight: f64, directed: bool) -> Result<GraphStore> {
    let mut graph = with_vertices(n, directed);
    for src in 1..n {
        graph.add_edge(NodeId(src - 1), NodeId(src), weight)?;
    }
    Ok(graph)
}

/// `rows × cols` lattice, vertex `r * cols + c`, arcs pointing right and down
///
/// # Errors
///
/// Returns `InvalidArgument` for a negative or non-finite weight, or when
/// `rows * cols` overflows the id space
pub fn grid(rows: u32, cols: u32, weight: f64, directed: bool) -> Result<GraphStore> {
    let n = rows
        .checked_mul(cols)
        .ok_or_else(|| GraphError::invalid(format!("{rows}x{cols} grid exceeds id space")))?;

    let mut graph = with_vertices(n, directed);
    for row in 0..rows {
        for col in 0..cols {
            let current = row * cols + col;
            if col + 1 < cols {
                graph.add_edge(NodeId(current), NodeId(current + 1), weight)?;
            }
            if row + 1 < rows {
                graph.add_edge(NodeId(current), NodeId(current + cols), weight)?;
            }
        }
    }
    Ok(graph)
}

/// Erdős–Rényi graph: each pair joined independently with `probability`
///
/// Directed graphs sample every ordered pair, undirected graphs every
/// unordered pair once. The same `seed` always yields the same graph.
///
/// # Errors
///
/// Returns `InvalidArgument` for a probability outside `[0, 1]` or a
/// negative or non-finite weight
///
/// # Example
///
/// ```
/// use trueno_graph_analytics::generators;
///
/// let a = generators::random(50, 0.1, 1.0, true, 7).unwrap();
/// let b = generators::random(50, 0.1, 1.0, true, 7).unwrap();
/// assert_eq!(a.num_edges(), b.num_edges());
/// assert_eq!(a.vertex_count(), 50);
/// ```
pub fn random(
    n: u32,
    probability: f64,
    weight: f64,
    directed: bool,
    seed: u64,
) -> Result<GraphStore> {
    if !(0.0..=1.0).contains(&probability) {
        return Err(GraphError::invalid(format!(
            "edge probability {probability} must be in [0, 1]"
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut graph = with_vertices(n, directed);
    for src in 0..n {
        let first = if directed { 0 } else { src + 1 };
        for dst in first..n {
            if src != dst && rng.random::<f64>() < probability {
                graph.add_edge(NodeId(src), NodeId(dst), weight)?;
            }
        }
    }
    Ok(graph)
}
