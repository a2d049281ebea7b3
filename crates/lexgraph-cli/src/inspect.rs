//! # Inspect
//!
//! `lexgraph inspect <dir> --article <id>` builds and annotates the graph,
//! then prints one article's effectiveness, its outgoing successions, its
//! current version and the articles it is linked to by reference.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;

use lexgraph_core::{EdgeKind, NodeKey, Traversal};
use lexgraph_query::{current_version, related_articles};

use crate::build::annotated_graph;
use crate::config::LexgraphConfig;

/// Arguments for `lexgraph inspect`.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Batch directory.
    pub dir: PathBuf,

    /// Article id.
    #[arg(long)]
    pub article: i64,
}

/// Execute `lexgraph inspect`.
pub fn run_inspect(args: &InspectArgs, config: &LexgraphConfig) -> Result<u8> {
    let published = annotated_graph(&args.dir, config)?;
    let graph = &published.graph;
    let key = NodeKey::article(args.article);
    let Some(node) = graph.node(&key) else {
        bail!("article {} not found in {}", args.article, args.dir.display());
    };

    println!("{key}  effective: {}", flag(node.effective()));
    let successions = graph.outgoing(&key, EdgeKind::NextArticle);
    if successions.is_empty() {
        println!("  no successors");
    }
    for (_, edge) in successions {
        let amendment = edge
            .amendment_number()
            .map_or_else(|| "-".to_string(), |n| n.to_string());
        println!(
            "  -> {}  amendment {amendment}  effective: {}",
            edge.to(),
            flag(edge.effective())
        );
    }
    if let Some(current) = current_version(graph, &key) {
        println!("current version: {current}");
    }
    let related = related_articles(graph, &key);
    if !related.is_empty() {
        let list: Vec<String> = related.iter().map(NodeKey::to_string).collect();
        println!("related: {}", list.join(", "));
    }
    Ok(0)
}

fn flag(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "yes",
        Some(false) => "no",
        None => "unknown",
    }
}
