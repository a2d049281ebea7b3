//! # lexgraph-core: Foundational Types for the Legal Graph
//!
//! This crate defines the data model shared by every other lexgraph crate:
//! the node and relationship kinds, the composite `(kind, id)` node key,
//! the opaque per-row payload, and the [`LegalGraph`] directed multigraph
//! that the builder produces and the effectiveness engine annotates.
//!
//! ## Key Design Principles
//!
//! 1. **Composite identity.** A node is identified by [`NodeKey`], the pair
//!    of its [`NodeKind`] and integer id. There is no global counter; two
//!    nodes of different kinds may share an id.
//!
//! 2. **Typed core, opaque payload.** Fields the algorithms depend on
//!    (`effective`, `amendment_number`) are typed struct fields. Everything
//!    else a record carries lives in a [`Payload`] bag and passes through
//!    untouched.
//!
//! 3. **Referential integrity by construction.** Edges can only be added
//!    between nodes that already exist; a missing endpoint is a
//!    [`GraphError::DanglingEdge`], never silently dropped.
//!
//! 4. **Read access through [`Traversal`].** Analytical consumers depend on
//!    the trait, not on the storage backend.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `lexgraph-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod export;
pub mod graph;
pub mod identity;
pub mod record;

// Re-export primary types for ergonomic imports.
pub use error::{GraphError, GraphResult};
pub use export::GraphExport;
pub use graph::{Edge, EdgeId, GraphSummary, LegalGraph, Node, Traversal};
pub use identity::{EdgeKind, NodeKey, NodeKind};
pub use record::{Payload, Record, RecordBatches};
