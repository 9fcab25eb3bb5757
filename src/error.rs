//! Error type shared by the graph store and every analysis engine

use crate::NodeId;
use thiserror::Error;

/// Errors reported at the call boundary of the store and the engines
///
/// Validation runs before any iteration starts, so an error never leaves
/// partially computed state behind.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// Argument outside the accepted domain (absent vertex, bad bound, ...)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Negative edge weight met during shortest-path relaxation
    #[error("negative edge weight {weight} on edge {from} -> {to}")]
    NegativeWeight {
        /// Edge source
        from: NodeId,
        /// Edge target
        to: NodeId,
        /// Offending weight
        weight: f64,
    },

    /// Graph has no vertices
    #[error("graph has no vertices")]
    GraphEmpty,

    /// Graph has zero total edge weight
    #[error("graph has no edge weight")]
    NoEdges,

    /// Algorithm is only defined on directed graphs
    #[error("algorithm requires a directed graph")]
    DirectedGraphRequired,
}

impl GraphError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

/// Result alias used throughout the crate
pub type Result<T, E = GraphError> = std::result::Result<T, E>;
