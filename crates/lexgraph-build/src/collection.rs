//! Batch-name classification.
//!
//! Vertex batches are named `node_<Kind>`. Edge batches are named
//! `edge_<RELATION>`, optionally with a scope token before the relation
//! (`edge_reg_AMENDED_BY`, `edge_art_AMENDED_BY`); only the trailing
//! relation decides the edge kind.

use lexgraph_core::{EdgeKind, GraphError, GraphResult, NodeKind};

/// What a batch contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    /// Vertex rows of one kind.
    Nodes(NodeKind),
    /// Edge rows of one relationship kind.
    Edges(EdgeKind),
}

/// Classify a batch by its name.
pub fn classify(name: &str) -> GraphResult<Collection> {
    let unrecognized = || GraphError::UnrecognizedCollection {
        name: name.to_string(),
    };

    if let Some(kind) = name.strip_prefix("node_") {
        return NodeKind::parse(kind)
            .map(Collection::Nodes)
            .ok_or_else(unrecognized);
    }

    let rest = name.strip_prefix("edge_").ok_or_else(unrecognized)?;
    let rest = rest.to_ascii_uppercase();
    EdgeKind::ALL
        .into_iter()
        .find(|kind| {
            let relation = kind.relation();
            rest == relation
                || rest
                    .strip_suffix(relation)
                    .and_then(|scope| scope.strip_suffix('_'))
                    .is_some_and(|scope| !scope.is_empty())
        })
        .map(Collection::Edges)
        .ok_or_else(unrecognized)
}
