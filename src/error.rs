//! Error types for the graph core

use thiserror::Error;
use crate::graph::NodeIdx;

/// Errors raised by graph queries and path reconstruction
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// No stop with this id exists in the graph
    #[error("stop not found: {0}")]
    NodeNotFound(String),

    /// A node index that does not belong to the graph
    #[error("node index {0} is out of range")]
    UnknownNode(NodeIdx),

    /// Walking predecessors from `target` did not end at the source
    #[error("malformed predecessor chain while reconstructing path to node {target}")]
    MalformedPredecessorChain {
        /// Node the reconstruction started from
        target: NodeIdx,
    },
}

/// Result alias for the graph core
pub type GraphResult<T> = std::result::Result<T, GraphError>;
