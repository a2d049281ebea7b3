//! # lexgraph-engine: Effectiveness Engine
//!
//! Computes the `effective` flag on every regulation, article and
//! `NextArticle` edge of a built [`LegalGraph`]:
//!
//! - **Effectiveness** (`effectiveness.rs`): the ordered rule pipeline.
//!   Mutates the graph in place; never adds or removes nodes or edges.
//!
//! - **Deadline** (`deadline.rs`): a budget checked once, before the
//!   pipeline starts. A run that has started always finishes.
//!
//! - **Publish** (`publish.rs`): builds and annotates a new graph off to
//!   the side, then swaps it in for readers in one step.
//!
//! [`LegalGraph`]: lexgraph_core::LegalGraph

pub mod deadline;
pub mod effectiveness;
pub mod error;
pub mod publish;

pub use deadline::{annotate_within, Deadline};
pub use effectiveness::{
    annotate, AnnotateOptions, AnnotationReport, ArticlePolicy, EffectivenessEngine, Rule,
    RuleOutcome,
};
pub use error::{EngineError, EngineResult};
pub use publish::{GraphPublisher, Published};
