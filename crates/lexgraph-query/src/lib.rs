//! # lexgraph-query: Graph Analytics
//!
//! Algorithmic queries over an annotated graph. Every function is generic
//! over [`Traversal`], so the same code serves a [`LegalGraph`] or any
//! other store exposing that interface.
//!
//! [`Traversal`]: lexgraph_core::Traversal
//! [`LegalGraph`]: lexgraph_core::LegalGraph

pub mod article;
pub mod centrality;
pub mod path;

pub use article::{current_version, related_articles};
pub use centrality::degree_centrality;
pub use path::shortest_path;
