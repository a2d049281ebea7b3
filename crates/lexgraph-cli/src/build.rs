//! # Build
//!
//! `lexgraph build <dir> [--export <file>]` loads a batch directory,
//! builds the graph, annotates it within the configured deadline, and
//! prints per-kind counts, per-rule outcomes and the annotation
//! fingerprint. With `--export`, the document-store collections are
//! written to a JSON envelope:
//!
//! ```json
//! {
//!   "built_at": "2026-01-01T00:00:00Z",
//!   "fingerprint": "…",
//!   "summary": { "nodes": {…}, "edges": {…} },
//!   "collections": { "vertices": {…}, "edges": {…} }
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use clap::Args;
use serde::Serialize;

use lexgraph_build::GraphBuilder;
use lexgraph_core::{GraphExport, GraphSummary};
use lexgraph_engine::{EffectivenessEngine, GraphPublisher, Published};

use crate::config::LexgraphConfig;
use crate::io::{load_batches, write_json};

/// Arguments for `lexgraph build`.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Batch directory.
    pub dir: PathBuf,

    /// Write the annotated graph's collections to this file.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

/// Export file contents.
#[derive(Debug, Serialize)]
pub struct ExportEnvelope {
    /// When the graph was built, RFC 3339 UTC.
    pub built_at: String,
    /// Annotation fingerprint.
    pub fingerprint: String,
    /// Per-kind counts.
    pub summary: GraphSummary,
    /// Document-store collections.
    pub collections: GraphExport,
}

impl ExportEnvelope {
    /// Envelope for a published graph.
    pub fn new(published: &Published, built_at: DateTime<Utc>) -> Self {
        Self {
            built_at: built_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            fingerprint: published.fingerprint.clone(),
            summary: published.graph.summary(),
            collections: published.graph.export(),
        }
    }
}

/// Load, build and annotate the batches in `dir` under `config`.
pub fn annotated_graph(dir: &Path, config: &LexgraphConfig) -> Result<Arc<Published>> {
    let deadline = config.deadline();
    let batches = load_batches(dir)?;
    let publisher = GraphPublisher::new(
        GraphBuilder::new(config.build.clone()),
        EffectivenessEngine::new(config.annotate),
    );
    publisher
        .refresh(&batches, deadline.as_ref())
        .with_context(|| format!("failed to build graph from {}", dir.display()))
}

/// Execute `lexgraph build`.
pub fn run_build(args: &BuildArgs, config: &LexgraphConfig) -> Result<u8> {
    let published = annotated_graph(&args.dir, config)?;
    let summary = published.graph.summary();

    println!("nodes: {}", summary.total_nodes());
    for (kind, count) in &summary.nodes {
        println!("  {:<24} {count:>8}", kind.as_str());
    }
    println!("edges: {}", summary.total_edges());
    for (kind, count) in &summary.edges {
        println!("  {:<24} {count:>8}", kind.as_str());
    }
    println!("rules:");
    for (rule, outcome) in &published.report.rules {
        println!(
            "  {:<24} {:>8} written {:>8} changed",
            rule.as_str(),
            outcome.written,
            outcome.changed
        );
    }
    println!("fingerprint: {}", published.fingerprint);

    if let Some(path) = &args.export {
        let envelope = ExportEnvelope::new(&published, Utc::now());
        write_json(path, &envelope)?;
        println!(
            "exported {} documents to {}",
            envelope.collections.document_count(),
            path.display()
        );
    }
    Ok(0)
}
