//! # Error Types: Structured Error Hierarchy
//!
//! Every failure of a build or annotate call is one of four kinds. All of
//! them are fatal to the call that raised them: no partial graph is ever
//! returned, and callers retry the whole operation after fixing the input.
//!
//! Each variant carries enough context (collection name, row index, the
//! offending key) to locate the bad record without re-running the load.

use thiserror::Error;

use crate::identity::{EdgeKind, NodeKey};

/// Top-level error type for graph construction and integrity checks.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A row's identity or a required field could not be parsed.
    #[error("malformed record in {collection}[{row}]: {detail}")]
    MalformedRecord {
        /// Batch the row came from.
        collection: String,
        /// Zero-based position of the row within its batch.
        row: usize,
        /// What was wrong with it.
        detail: String,
    },

    /// A batch name matches neither `node_<Kind>` nor `edge_<RELATION>`.
    #[error("unrecognized collection {name:?}: expected node_<Kind> or edge_[<scope>_]<RELATION>")]
    UnrecognizedCollection {
        /// The batch name as given.
        name: String,
    },

    /// An edge endpoint does not resolve to a node in the graph.
    #[error("{kind} edge references missing node {missing}")]
    DanglingEdge {
        /// Relationship kind of the offending edge.
        kind: EdgeKind,
        /// The endpoint that could not be resolved.
        missing: NodeKey,
    },

    /// The same `(kind, id)` was inserted twice with different payloads.
    #[error("duplicate node {key} with conflicting payload")]
    DuplicateNode {
        /// Key of the node inserted twice.
        key: NodeKey,
    },
}

impl GraphError {
    /// Shorthand for a [`GraphError::MalformedRecord`].
    pub fn malformed(collection: impl Into<String>, row: usize, detail: impl Into<String>) -> Self {
        Self::MalformedRecord {
            collection: collection.into(),
            row,
            detail: detail.into(),
        }
    }
}

/// Result type alias for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;
