//! # Engine Errors
//!
//! The engine itself has one failure of its own: a deadline that passed
//! before annotation could start. Everything else is a [`GraphError`]
//! surfaced by the integrity precondition or, for [`GraphPublisher`]
//! refreshes, by the builder.
//!
//! [`GraphPublisher`]: crate::publish::GraphPublisher

use lexgraph_core::GraphError;
use thiserror::Error;

/// Errors from annotation and publication.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Building the graph or checking its integrity failed.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// The budget was spent before annotation started.
    #[error("deadline of {budget_ms}ms passed before annotation started")]
    DeadlineExceeded {
        /// The configured budget in milliseconds.
        budget_ms: u64,
    },
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
