//! # lexgraph-build: Graph Builder
//!
//! Turns a snapshot of flat record batches into a [`LegalGraph`]:
//!
//! - **Collection** (`collection.rs`): classifies batch names
//!   (`node_<Kind>`, `edge_[<scope>_]<RELATION>`).
//!
//! - **Row** (`row.rs`): identity and field parsing with row-level error
//!   context.
//!
//! - **Succession** (`succession.rs`): collects `(from, to, amendment)`
//!   triples from article `previous_article`/`next_article` links and any
//!   explicit `NEXT_ARTICLE` batch, deduplicated and sorted.
//!
//! - **Builder** (`builder.rs`): the `build` entry point.
//!
//! - **Dataset** (`dataset.rs`): shapes raw regulation documents into the
//!   batch mapping `build` consumes.
//!
//! The builder is pure: no I/O, and on any error no graph is returned.
//!
//! [`LegalGraph`]: lexgraph_core::LegalGraph

pub mod builder;
pub mod collection;
pub mod dataset;
mod row;
pub mod succession;

pub use builder::{build, BuildOptions, GraphBuilder};
pub use collection::{classify, Collection};
pub use dataset::{missing_collections, shape, RawRegulation, EXPECTED_COLLECTIONS};
pub use succession::{Succession, SuccessionSet};
