//! `PageRank` algorithm via power iteration
//!
//! Based on Page et al. (1999) "The `PageRank` Citation Ranking: Bringing Order to the Web"

use super::top_k;
use crate::error::{GraphError, Result};
use crate::storage::GraphStore;
use crate::NodeId;
use std::fmt;
use tracing::debug;

/// `PageRank` parameters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageRankConfig {
    /// Probability of following an outgoing edge, in (0, 1)
    pub damping_factor: f64,
    /// Hard upper bound on power iterations
    pub max_iterations: usize,
    /// L1 convergence threshold
    pub tolerance: f64,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping_factor: 0.85,
            max_iterations: 100,
            tolerance: 1e-10,
        }
    }
}

impl PageRankConfig {
    /// Check parameter ranges
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a damping factor outside (0, 1), zero
    /// iterations or a non-positive tolerance
    pub fn validate(&self) -> Result<()> {
        if !(self.damping_factor > 0.0 && self.damping_factor < 1.0) {
            return Err(GraphError::invalid(format!(
                "damping factor {} must be in (0, 1)",
                self.damping_factor
            )));
        }
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

/// `PageRank` scores
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageRankResult {
    /// Ranked vertices, ascending
    pub vertices: Vec<NodeId>,
    /// Score per vertex id (0.0 for ids never added); sums to 1
    pub scores: Vec<f64>,
    /// Power iterations performed
    pub iterations: usize,
    /// Whether the L1 change dropped below tolerance
    pub converged: bool,
}

impl PageRankResult {
    /// Score of `node` (0.0 if unknown)
    #[must_use]
    pub fn score(&self, node: NodeId) -> f64 {
        self.scores.get(node.index()).copied().unwrap_or(0.0)
    }

    /// The `k` highest-ranked vertices, ties by ascending id
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `k` is zero
    pub fn top_k(&self, k: usize) -> Result<Vec<(NodeId, f64)>> {
        top_k(&self.vertices, &self.scores, k)
    }
}

impl fmt::Display for PageRankResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "PageRank: {} vertices, {} iterations, converged: {}",
            self.vertices.len(),
            self.iterations,
            self.converged
        )?;
        if let Ok(top) = self.top_k(5) {
            for (node, score) in top {
                writeln!(f, "  {node}: {score:.6}")?;
            }
        }
        Ok(())
    }
}

/// Compute `PageRank` scores for all vertices
///
/// # Algorithm
///
/// ```text
/// PR(v) = (1-d)/N + d * Σ PR(u) / outdegree(u)   over arcs u → v
///                 + d * Σ PR(u) / N              over dangling u
/// ```
///
/// Iteration stops once the L1 distance between successive vectors drops
/// below `tolerance`, or after `max_iterations`. A final normalization pass
/// removes floating-point drift.
///
/// # Errors
///
/// - `InvalidArgument` on out-of-range parameters
/// - `GraphEmpty` if the graph has no vertices
///
/// # Example
///
/// ```
/// use trueno_graph_analytics::{pagerank, GraphStore, NodeId, PageRankConfig};
///
/// let mut graph = GraphStore::new(true);
/// graph.add_edge(NodeId(0), NodeId(1), 1.0).unwrap();
/// graph.add_edge(NodeId(1), NodeId(2), 1.0).unwrap();
/// graph.add_edge(NodeId(2), NodeId(0), 1.0).unwrap(); // Cycle
///
/// let result = pagerank(&graph, &PageRankConfig::default()).unwrap();
/// assert!(result.converged);
/// assert!((result.scores.iter().sum::<f64>() - 1.0).abs() < 1e-9);
/// ```
#[allow(clippy::cast_precision_loss)] // Graphs >2^52 nodes unlikely
pub fn pagerank(graph: &GraphStore, config: &PageRankConfig) -> Result<PageRankResult> {
    config.validate()?;
    graph.require_non_empty()?;

    let vertices = graph.vertices();
    let n = vertices.len() as f64;
    let damping = config.damping_factor;
    let teleport = (1.0 - damping) / n;

    // Initialize: uniform distribution over present vertices
    let mut ranks = vec![0.0; graph.num_vertices()];
    let mut new_ranks = vec![0.0; graph.num_vertices()];
    for node in &vertices {
        ranks[node.index()] = 1.0 / n;
    }

    let dangling: Vec<NodeId> = vertices
        .iter()
        .copied()
        .filter(|&node| graph.out_degree(node) == 0)
        .collect();

    let mut iterations = 0;
    let mut converged = false;

    for iteration in 0..config.max_iterations {
        iterations = iteration + 1;

        // Dangling mass is pooled once and spread uniformly
        let dangling_mass: f64 = dangling.iter().map(|node| ranks[node.index()]).sum();
        let base = teleport + damping * dangling_mass / n;
        for node in &vertices {
            new_ranks[node.index()] = base;
        }

        for &node in &vertices {
            let out_degree = graph.out_degree(node);
            if out_degree == 0 {
                continue;
            }
            let share = damping * ranks[node.index()] / out_degree as f64;
            for &(target, _) in graph.neighbors(node) {
                new_ranks[target.index()] += share;
            }
        }

        // Check convergence (L1 norm)
        let diff: f64 = vertices
            .iter()
            .map(|node| (new_ranks[node.index()] - ranks[node.index()]).abs())
            .sum();

        // Swap buffers
        std::mem::swap(&mut ranks, &mut new_ranks);

        if diff < config.tolerance {
            debug!(iterations, diff, "PageRank converged");
            converged = true;
            break;
        }
    }

    if !converged {
        debug!(iterations, "PageRank reached iteration limit");
    }

    let total: f64 = ranks.iter().sum();
    if total > 0.0 {
        for rank in &mut ranks {
            *rank /= total;
        }
    }

    Ok(PageRankResult {
        vertices,
        scores: ranks,
        iterations,
        converged,
    })
}
