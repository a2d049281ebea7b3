//! # Graph Builder
//!
//! `build(batches) -> LegalGraph`. Runs in three passes:
//!
//! 1. **Nodes.** Every `node_<Kind>` row becomes a node keyed
//!    `(kind, id)`. All other fields form the payload, except on articles,
//!    where `previous_article`, `next_article` and `amendment_number` are
//!    consumed as succession links. Nodes are inserted in key order.
//! 2. **Edges.** Every `edge_*` row is resolved to `(from, to)` keys and
//!    checked against the relationship's endpoint contract. Rows of an
//!    explicit `NEXT_ARTICLE` batch are not inserted directly; they join
//!    the succession set.
//! 3. **Successions.** One `NextArticle` edge per distinct
//!    `(from, to, amendment_number)` triple, ascending.
//!
//! Any error aborts the build; no partial graph escapes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use lexgraph_core::{
    EdgeKind, GraphError, GraphResult, LegalGraph, NodeKey, NodeKind, Payload, Record,
    RecordBatches, Traversal,
};

use crate::collection::{classify, Collection};
use crate::row::RowCtx;
use crate::succession::SuccessionSet;

/// Article fields consumed as succession links rather than stored.
const LINK_FIELDS: [&str; 3] = ["previous_article", "next_article", "amendment_number"];

/// Edge fields consumed as endpoints rather than stored.
const ENDPOINT_FIELDS: [&str; 4] = ["from_type", "from", "to_type", "to"];

/// Builder configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// Skip batches with unrecognized names instead of failing.
    pub permissive_collections: bool,
}

/// Build a graph with default options.
pub fn build(batches: &RecordBatches) -> GraphResult<LegalGraph> {
    GraphBuilder::default().build(batches)
}

/// Configurable graph builder.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    options: BuildOptions,
}

/// A node row waiting for insertion, with its origin for error reporting.
struct PendingNode<'a> {
    payload: Payload,
    collection: &'a str,
    row: usize,
}

impl GraphBuilder {
    /// Create a builder.
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    /// The builder's options.
    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Build a graph from a full snapshot of batches.
    pub fn build(&self, batches: &RecordBatches) -> GraphResult<LegalGraph> {
        let mut node_batches = Vec::new();
        let mut edge_batches = Vec::new();
        for (name, rows) in batches {
            match classify(name) {
                Ok(Collection::Nodes(kind)) => node_batches.push((name.as_str(), kind, rows)),
                Ok(Collection::Edges(kind)) => edge_batches.push((name.as_str(), kind, rows)),
                Err(_) if self.options.permissive_collections => {
                    warn!(collection = %name, rows = rows.len(), "skipping unrecognized collection");
                }
                Err(err) => return Err(err),
            }
        }

        let mut successions = SuccessionSet::new();
        let mut graph = LegalGraph::new();

        // Pass 1: nodes.
        let mut pending: BTreeMap<NodeKey, PendingNode<'_>> = BTreeMap::new();
        for (name, kind, rows) in node_batches {
            debug!(collection = name, rows = rows.len(), "reading vertex batch");
            for (row, record) in rows.iter().enumerate() {
                let ctx = RowCtx::new(name, row);
                let (key, payload) = node_row(ctx, kind, record, &mut successions)?;
                match pending.get(&key) {
                    Some(existing) if existing.payload != payload => {
                        debug!(
                            %key,
                            first_collection = existing.collection,
                            first_row = existing.row,
                            collection = name,
                            row,
                            "conflicting duplicate node"
                        );
                        return Err(GraphError::DuplicateNode { key });
                    }
                    Some(_) => {}
                    None => {
                        pending.insert(
                            key,
                            PendingNode {
                                payload,
                                collection: name,
                                row,
                            },
                        );
                    }
                }
            }
        }
        for (key, node) in pending {
            graph.add_node(key, node.payload)?;
        }

        // Pass 2: edges.
        for (name, kind, rows) in edge_batches {
            debug!(collection = name, %kind, rows = rows.len(), "reading edge batch");
            for (row, record) in rows.iter().enumerate() {
                let ctx = RowCtx::new(name, row);
                edge_row(ctx, kind, record, &mut graph, &mut successions)?;
            }
        }

        // Pass 3: successions.
        let succession_count = successions.len();
        for s in successions {
            graph.add_edge(
                EdgeKind::NextArticle,
                NodeKey::article(s.from),
                NodeKey::article(s.to),
                Some(s.amendment_number),
                Payload::new(),
            )?;
        }

        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            next_article = succession_count,
            "graph built"
        );
        Ok(graph)
    }
}

/// Parse one vertex row into its key and payload, recording article links.
fn node_row(
    ctx: RowCtx<'_>,
    kind: NodeKind,
    record: &Record,
    successions: &mut SuccessionSet,
) -> GraphResult<(NodeKey, Payload)> {
    let id = ctx.int(record, "id")?;
    let key = NodeKey::new(kind, id);

    if kind == NodeKind::Article {
        let previous = ctx.opt_int(record, "previous_article")?;
        let next = ctx.opt_int(record, "next_article")?;
        if previous.is_some() || next.is_some() {
            let amendment = ctx.opt_int(record, "amendment_number")?.ok_or_else(|| {
                ctx.malformed("amendment_number is required when previous_article or next_article is set")
            })?;
            if let Some(previous) = previous {
                successions.from_previous(id, previous, amendment);
            }
            if let Some(next) = next {
                successions.from_next(id, next, amendment);
            }
        }
    }

    let payload = record
        .iter()
        .filter(|(field, _)| field.as_str() != "id")
        .filter(|(field, _)| kind != NodeKind::Article || !LINK_FIELDS.contains(&field.as_str()))
        .map(|(field, value)| (field.clone(), value.clone()))
        .collect();
    Ok((key, payload))
}

/// Resolve one edge row and insert it (or defer it, for successions).
fn edge_row(
    ctx: RowCtx<'_>,
    kind: EdgeKind,
    record: &Record,
    graph: &mut LegalGraph,
    successions: &mut SuccessionSet,
) -> GraphResult<()> {
    let from = NodeKey::new(ctx.kind(record, "from_type")?, ctx.int(record, "from")?);
    let to = NodeKey::new(ctx.kind(record, "to_type")?, ctx.int(record, "to")?);
    if !kind.permits(from.kind(), to.kind()) {
        return Err(ctx.malformed(format!(
            "{kind} edge cannot connect {} to {}",
            from.kind(),
            to.kind()
        )));
    }

    let carries_amendment = matches!(kind, EdgeKind::AmendedBy | EdgeKind::NextArticle);
    let amendment_number = if carries_amendment {
        ctx.opt_int(record, "amendment_number")?
    } else {
        None
    };

    if kind == EdgeKind::NextArticle {
        let amendment = amendment_number
            .ok_or_else(|| ctx.malformed("next_article edge requires amendment_number"))?;
        successions.from_next(from.id(), to.id(), amendment);
        return Ok(());
    }

    let attributes = record
        .iter()
        .filter(|(field, _)| !ENDPOINT_FIELDS.contains(&field.as_str()))
        .filter(|(field, _)| !carries_amendment || field.as_str() != "amendment_number")
        .map(|(field, value)| (field.clone(), value.clone()))
        .collect();
    graph.add_edge(kind, from, to, amendment_number, attributes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn rows(values: Vec<Value>) -> Vec<Record> {
        values
            .into_iter()
            .map(|v| match v {
                Value::Object(map) => map,
                _ => unreachable!(),
            })
            .collect()
    }

    fn batches(entries: Vec<(&str, Vec<Value>)>) -> RecordBatches {
        entries
            .into_iter()
            .map(|(name, values)| (name.to_string(), rows(values)))
            .collect()
    }

    #[test]
    fn builds_nodes_with_payload_and_containment_edges() {
        let input = batches(vec![
            ("node_Regulation", vec![json!({"id": 1, "title": "UU 1/2020"})]),
            ("node_Article", vec![json!({"id": "10", "number": "1", "text": "..."})]),
            (
                "edge_HAS_ARTICLE",
                vec![json!({"from_type": "Regulation", "from": 1, "to_type": "Article", "to": 10})],
            ),
        ]);
        let g = build(&input).unwrap();
        let reg = g.node(&NodeKey::regulation(1)).unwrap();
        assert_eq!(reg.payload().get_str("title"), Some("UU 1/2020"));
        assert!(reg.payload().get("id").is_none());
        assert_eq!(g.outgoing(&NodeKey::regulation(1), EdgeKind::HasArticle).len(), 1);
    }

    #[test]
    fn article_links_are_consumed_not_stored() {
        let input = batches(vec![(
            "node_Article",
            vec![
                json!({"id": 1, "text": "old", "next_article": 2, "previous_article": null, "amendment_number": 4}),
                json!({"id": 2, "text": "new", "previous_article": "1", "next_article": "", "amendment_number": 4}),
            ],
        )]);
        let g = build(&input).unwrap();
        let node = g.node(&NodeKey::article(1)).unwrap();
        for field in LINK_FIELDS {
            assert!(node.payload().get(field).is_none(), "{field}");
        }
        let edges = g.outgoing(&NodeKey::article(1), EdgeKind::NextArticle);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].1.amendment_number(), Some(4));
    }

    #[test]
    fn link_without_amendment_number_is_malformed() {
        let input = batches(vec![(
            "node_Article",
            vec![json!({"id": 1}), json!({"id": 2, "previous_article": 1})],
        )]);
        match build(&input).unwrap_err() {
            GraphError::MalformedRecord { collection, row, .. } => {
                assert_eq!(collection, "node_Article");
                assert_eq!(row, 1);
            }
            other => panic!("expected MalformedRecord, got {other}"),
        }
    }

    #[test]
    fn non_integer_id_is_malformed() {
        let input = batches(vec![("node_Regulation", vec![json!({"id": "abc"})])]);
        assert!(matches!(
            build(&input).unwrap_err(),
            GraphError::MalformedRecord { .. }
        ));
    }

    #[test]
    fn conflicting_duplicate_rows_fail() {
        let input = batches(vec![(
            "node_Definition",
            vec![json!({"id": 5, "name": "a"}), json!({"id": 5, "name": "b"})],
        )]);
        assert_eq!(
            build(&input).unwrap_err(),
            GraphError::DuplicateNode {
                key: NodeKey::new(NodeKind::Definition, 5)
            }
        );
    }

    #[test]
    fn identical_duplicate_rows_collapse() {
        let input = batches(vec![(
            "node_Definition",
            vec![json!({"id": 5, "name": "a"}), json!({"id": 5, "name": "a"})],
        )]);
        assert_eq!(build(&input).unwrap().node_count(), 1);
    }

    #[test]
    fn dangling_edge_names_kind_and_key() {
        let input = batches(vec![
            ("node_Regulation", vec![json!({"id": 1})]),
            (
                "edge_HAS_DEFINITION",
                vec![json!({"from_type": "Regulation", "from": 1, "to_type": "Definition", "to": 8})],
            ),
        ]);
        assert_eq!(
            build(&input).unwrap_err(),
            GraphError::DanglingEdge {
                kind: EdgeKind::HasDefinition,
                missing: NodeKey::new(NodeKind::Definition, 8)
            }
        );
    }

    #[test]
    fn endpoint_contract_violations_are_malformed() {
        let input = batches(vec![
            ("node_Article", vec![json!({"id": 1}), json!({"id": 2})]),
            (
                "edge_HAS_ARTICLE",
                vec![json!({"from_type": "Article", "from": 1, "to_type": "Article", "to": 2})],
            ),
        ]);
        assert!(matches!(
            build(&input).unwrap_err(),
            GraphError::MalformedRecord { .. }
        ));
    }

    #[test]
    fn unknown_collection_fails_unless_permissive() {
        let input = batches(vec![
            ("node_Regulation", vec![json!({"id": 1})]),
            ("node_Chapter", vec![json!({"id": 1})]),
        ]);
        assert!(matches!(
            build(&input).unwrap_err(),
            GraphError::UnrecognizedCollection { .. }
        ));
        let permissive = GraphBuilder::new(BuildOptions {
            permissive_collections: true,
        });
        assert_eq!(permissive.build(&input).unwrap().node_count(), 1);
    }

    #[test]
    fn amended_by_keeps_number_typed_and_other_fields_as_attributes() {
        let input = batches(vec![
            ("node_Regulation", vec![json!({"id": 1}), json!({"id": 2})]),
            (
                "edge_reg_AMENDED_BY",
                vec![json!({"from_type": "Regulation", "from": 1, "to_type": "Regulation", "to": 2, "amendment_number": 1, "note": "x"})],
            ),
        ]);
        let g = build(&input).unwrap();
        let (_, edge) = g.edges_of_kind(EdgeKind::AmendedBy).next().unwrap();
        assert_eq!(edge.amendment_number(), Some(1));
        assert_eq!(edge.attributes().get_str("note"), Some("x"));
        assert!(edge.attributes().get("amendment_number").is_none());
    }

    #[test]
    fn explicit_next_article_batch_joins_the_dedup_set() {
        let input = batches(vec![
            (
                "node_Article",
                vec![
                    json!({"id": 1, "next_article": 2, "amendment_number": 3}),
                    json!({"id": 2}),
                ],
            ),
            (
                "edge_NEXT_ARTICLE",
                vec![json!({"from_type": "Article", "from": 1, "to_type": "Article", "to": 2, "amendment_number": 3})],
            ),
        ]);
        let g = build(&input).unwrap();
        assert_eq!(g.edges_of_kind(EdgeKind::NextArticle).count(), 1);
    }
}
