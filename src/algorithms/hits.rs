//! HITS hub and authority scores
//!
//! Based on Kleinberg (1999) "Authoritative Sources in a Hyperlinked Environment".
//! Good hubs point to good authorities; good authorities are pointed to by
//! good hubs. Both vectors are unweighted and L2-normalized every iteration.

use super::top_k;
use crate::error::{GraphError, Result};
use crate::storage::GraphStore;
use crate::NodeId;
use std::fmt;
use tracing::debug;

/// Norms at or below this are treated as zero
const ZERO_NORM: f64 = 1e-300;

/// HITS parameters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitsConfig {
    /// Hard upper bound on iterations
    pub max_iterations: usize,
    /// L1 convergence threshold, applied to both vectors
    pub tolerance: f64,
}

impl Default for HitsConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-10,
        }
    }
}

impl HitsConfig {
    /// Check parameter ranges
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for zero iterations or a non-positive tolerance
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(GraphError::invalid("max_iterations must be positive"));
        }
        if !(self.tolerance > 0.0) {
            return Err(GraphError::invalid(format!(
                "tolerance {} must be positive",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// HITS scores
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitsResult {
    /// Scored vertices, ascending
    pub vertices: Vec<NodeId>,
    /// Hub score per vertex id (unit L2 norm)
    pub hubs: Vec<f64>,
    /// Authority score per vertex id (unit L2 norm)
    pub authorities: Vec<f64>,
    /// Iterations performed
    pub iterations: usize,
    /// Whether both vectors settled below tolerance
    pub converged: bool,
}

impl HitsResult {
    /// The `k` best hubs, ties by ascending id
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `k` is zero
    pub fn top_hubs(&self, k: usize) -> Result<Vec<(NodeId, f64)>> {
        top_k(&self.vertices, &self.hubs, k)
    }

    /// The `k` best authorities, ties by ascending id
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `k` is zero
    pub fn top_authorities(&self, k: usize) -> Result<Vec<(NodeId, f64)>> {
        top_k(&self.vertices, &self.authorities, k)
    }

    /// Largest hub score
    #[must_use]
    pub fn max_hub(&self) -> f64 {
        self.hubs.iter().copied().fold(0.0, f64::max)
    }

    /// Largest authority score
    #[must_use]
    pub fn max_authority(&self) -> f64 {
        self.authorities.iter().copied().fold(0.0, f64::max)
    }
}

impl fmt::Display for HitsResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "HITS: {} vertices, {} iterations, converged: {}",
            self.vertices.len(),
            self.iterations,
            self.converged
        )?;
        writeln!(
            f,
            "  max hub {:.4}, max authority {:.4}",
            self.max_hub(),
            self.max_authority()
        )
    }
}

/// Compute HITS hub and authority scores
///
/// Starts from all-ones vectors. Each iteration sets
/// `authority[v] = Σ hub[u]` over arcs `u → v`, then
/// `hub[v] = Σ authority[w]` over arcs `v → w` using the fresh authorities,
/// and normalizes both by their Euclidean norm. A zero-norm vector is
/// replaced by the uniform vector `1/n`.
///
/// # Errors
///
/// - `InvalidArgument` on out-of-range parameters
/// - `DirectedGraphRequired` on an undirected graph
/// - `GraphEmpty` if the graph has no vertices
///
/// # Example
///
/// ```
/// use trueno_graph_analytics::{hits, GraphStore, HitsConfig, NodeId};
///
/// let mut graph = GraphStore::new(true);
/// for leaf in 1..5 {
///     graph.add_edge(NodeId(0), NodeId(leaf), 1.0).unwrap();
/// }
///
/// let result = hits(&graph, &HitsConfig::default()).unwrap();
/// assert!((result.max_hub() - 1.0).abs() < 1e-9);
/// assert!((result.max_authority() - 0.5).abs() < 1e-9);
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn hits(graph: &GraphStore, config: &HitsConfig) -> Result<HitsResult> {
    config.validate()?;
    if !graph.is_directed() {
        return Err(GraphError::DirectedGraphRequired);
    }
    graph.require_non_empty()?;

    let vertices = graph.vertices();
    let size = graph.num_vertices();

    let mut hubs = vec![0.0; size];
    let mut authorities = vec![0.0; size];
    for node in &vertices {
        hubs[node.index()] = 1.0;
        authorities[node.index()] = 1.0;
    }
    let mut new_hubs = vec![0.0; size];
    let mut new_authorities = vec![0.0; size];

    let mut iterations = 0;
    let mut converged = false;

    for iteration in 0..config.max_iterations {
        iterations = iteration + 1;

        for &node in &vertices {
            new_authorities[node.index()] = graph
                .incoming(node)
                .iter()
                .map(|(src, _)| hubs[src.index()])
                .sum();
        }
        normalize(&mut new_authorities, &vertices);

        for &node in &vertices {
            new_hubs[node.index()] = graph
                .neighbors(node)
                .iter()
                .map(|(dst, _)| new_authorities[dst.index()])
                .sum();
        }
        normalize(&mut new_hubs, &vertices);

        let hub_diff = l1_distance(&new_hubs, &hubs, &vertices);
        let authority_diff = l1_distance(&new_authorities, &authorities, &vertices);

        std::mem::swap(&mut hubs, &mut new_hubs);
        std::mem::swap(&mut authorities, &mut new_authorities);

        if hub_diff < config.tolerance && authority_diff < config.tolerance {
            debug!(iterations, hub_diff, authority_diff, "HITS converged");
            converged = true;
            break;
        }
    }

    if !converged {
        debug!(iterations, "HITS reached iteration limit");
    }

    Ok(HitsResult {
        vertices,
        hubs,
        authorities,
        iterations,
        converged,
    })
}

/// Scale to unit L2 norm; zero vectors become uniform `1/n`
#[allow(clippy::cast_precision_loss)]
fn normalize(values: &mut [f64], vertices: &[NodeId]) {
    let norm = vertices
        .iter()
        .map(|node| values[node.index()].powi(2))
        .sum::<f64>()
        .sqrt();

    if norm <= ZERO_NORM {
        let uniform = 1.0 / vertices.len() as f64;
        for node in vertices {
            values[node.index()] = uniform;
        }
        return;
    }

    for node in vertices {
        values[node.index()] /= norm;
    }
}

fn l1_distance(a: &[f64], b: &[f64], vertices: &[NodeId]) -> f64 {
    vertices
        .iter()
        .map(|node| (a[node.index()] - b[node.index()]).abs())
        .sum()
}
