//! trueno-graph-analytics: in-memory weighted graph analytics
//!
//! # Overview
//!
//! A weighted graph store plus the classic analysis kernels that run on it:
//! traversal, shortest paths, `PageRank`/HITS ranking, directed k-core
//! decomposition and Louvain community detection. Graphs are loaded
//! wholesale into memory; every algorithm borrows the store and returns an
//! owned result value.
//!
//! # Quick Start
//!
//! ```no_run
//! use trueno_graph_analytics::{
//!     bfs, dijkstra, pagerank, EdgeListOptions, GraphStore, NodeId, PageRankConfig,
//! };
//!
//! # async fn example() -> anyhow::Result<()> {
//! // Build graph from edges
//! let mut graph = GraphStore::new(true);
//! graph.add_edge(NodeId(0), NodeId(1), 1.0)?;
//! graph.add_edge(NodeId(1), NodeId(2), 2.5)?;
//!
//! let levels = bfs(&graph, NodeId(0))?;
//! assert_eq!(levels.distance(NodeId(2)), Some(2));
//!
//! let paths = dijkstra(&graph, NodeId(0))?;
//! assert_eq!(paths.distance(NodeId(2)), 3.5);
//!
//! // Load from disk, rank, write scores back
//! let load = GraphStore::read_edge_list_file("web.txt", &EdgeListOptions::default()).await?;
//! let ranks = pagerank(&load.graph, &PageRankConfig::default())?;
//! load.graph.write_scores_file("ranks.txt", &ranks.scores, 6).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Storage**: insertion-ordered adjacency with a reverse view and O(1) arc upsert
//! - **Persistence**: plain-text edge lists in, `vertexId score` tables out
//! - **Algorithms**: pure functions with `Default`-able config structs
//! - **Errors**: [`GraphError`] for analysis, `anyhow` with path context for file I/O
//! - **Logging**: `tracing` events; installing a subscriber is left to the caller

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod algorithms;
pub mod error;
pub mod generators;
pub mod storage;

// Re-export core types
pub use algorithms::{
    bfs, conductance, connected_components, core_decomposition, dfs, dfs_recursive, dijkstra,
    dijkstra_path, hits, is_k_core, louvain, pagerank, BfsResult, CoreDecomposition, DfsResult,
    HitsConfig, HitsResult, LouvainConfig, LouvainResult, PageRankConfig, PageRankResult,
    ShortestPaths,
};
pub use storage::{
    read_edge_list, write_scores, EdgeListLoad, EdgeListOptions, EdgeListReport, GraphStore,
    HeaderMode, NodeId, SkippedLine, DEFAULT_MAX_VERTICES,
};

// Error type
pub use error::{GraphError, Result};
