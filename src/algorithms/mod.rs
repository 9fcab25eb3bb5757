//! Graph algorithms (traversal, shortest paths, ranking, cores, communities)
//!
//! Every algorithm is a free function over a borrowed [`GraphStore`] that
//! validates its inputs, runs to completion and returns an owned result.
//!
//! [`GraphStore`]: crate::GraphStore

pub mod hits;
pub mod kcore;
pub mod louvain;
pub mod pagerank;
pub mod shortest_path;
pub mod traversal;

pub use hits::{hits, HitsConfig, HitsResult};
pub use kcore::{core_decomposition, is_k_core, CoreDecomposition};
pub use louvain::{conductance, louvain, LouvainConfig, LouvainResult};
pub use pagerank::{pagerank, PageRankConfig, PageRankResult};
pub use shortest_path::{dijkstra, dijkstra_path, ShortestPaths};
pub use traversal::{bfs, connected_components, dfs, dfs_recursive, BfsResult, DfsResult};

use crate::error::{GraphError, Result};
use crate::NodeId;

/// The `k` highest scores among `vertices`, descending, ties by ascending id
pub(crate) fn top_k(vertices: &[NodeId], scores: &[f64], k: usize) -> Result<Vec<(NodeId, f64)>> {
    if k == 0 {
        return Err(GraphError::invalid("k must be positive"));
    }

    let mut ranked: Vec<(NodeId, f64)> = vertices
        .iter()
        .map(|&node| (node, scores[node.index()]))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(k);
    Ok(ranked)
}
