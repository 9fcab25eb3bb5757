//! Graph storage layer
//!
//! Provides the weighted adjacency store and plain-text edge-list I/O.

pub mod edge_list;
pub mod graph;

pub use edge_list::{
    read_edge_list, write_scores, EdgeListLoad, EdgeListOptions, EdgeListReport, HeaderMode,
    SkippedLine, DEFAULT_MAX_VERTICES,
};
pub use graph::{GraphStore, NodeId};
