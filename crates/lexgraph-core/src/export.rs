//! # Document-Store Export
//!
//! Renders a [`LegalGraph`] as typed collections of JSON documents, the
//! shape a document/graph store ingests: one collection per node kind
//! (`regulation`, `article`, ...) and one per relationship
//! (`amended_by`, `next_article`, ...). Node documents carry `_key` and
//! `_id`; edge documents carry `_from` and `_to`. Regulation- and
//! article-level `AmendedBy` edges share the `amended_by` collection.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::graph::{Edge, LegalGraph, Node};

/// Collections of documents keyed by collection name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphExport {
    /// Vertex collections.
    pub vertices: BTreeMap<String, Vec<Value>>,
    /// Edge collections.
    pub edges: BTreeMap<String, Vec<Value>>,
}

impl GraphExport {
    /// Total documents across all collections.
    pub fn document_count(&self) -> usize {
        self.vertices.values().chain(self.edges.values()).map(Vec::len).sum()
    }
}

impl LegalGraph {
    /// Export every node and edge as a document.
    pub fn export(&self) -> GraphExport {
        let mut export = GraphExport::default();
        for node in self.nodes() {
            export
                .vertices
                .entry(node.kind().as_str().to_string())
                .or_default()
                .push(node_document(node));
        }
        for (_, edge) in self.edges() {
            export
                .edges
                .entry(edge.kind().as_str().to_string())
                .or_default()
                .push(edge_document(edge));
        }
        export
    }
}

fn node_document(node: &Node) -> Value {
    let mut doc = Map::new();
    doc.insert("_key".into(), json!(node.key().id().to_string()));
    doc.insert("_id".into(), json!(node.key().to_string()));
    for (field, value) in node.payload().iter() {
        doc.insert(field.clone(), value.clone());
    }
    if let Some(effective) = node.effective() {
        doc.insert("effective".into(), json!(effective));
    }
    Value::Object(doc)
}

fn edge_document(edge: &Edge) -> Value {
    let mut doc = Map::new();
    doc.insert("_from".into(), json!(edge.from().to_string()));
    doc.insert("_to".into(), json!(edge.to().to_string()));
    for (field, value) in edge.attributes().iter() {
        doc.insert(field.clone(), value.clone());
    }
    if let Some(number) = edge.amendment_number() {
        doc.insert("amendment_number".into(), json!(number));
    }
    if let Some(effective) = edge.effective() {
        doc.insert("effective".into(), json!(effective));
    }
    Value::Object(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{EdgeKind, NodeKey};
    use crate::record::Payload;

    #[test]
    fn export_shapes_documents_per_collection() {
        let mut g = LegalGraph::new();
        let mut title = Payload::new();
        title.insert("title", json!("UU 11/2020"));
        g.add_node(NodeKey::regulation(1), title).unwrap();
        g.add_node(NodeKey::regulation(2), Payload::new()).unwrap();
        g.add_edge(
            EdgeKind::AmendedBy,
            NodeKey::regulation(1),
            NodeKey::regulation(2),
            Some(1),
            Payload::new(),
        )
        .unwrap();
        g.set_node_effective(&NodeKey::regulation(1), false);

        let export = g.export();
        assert_eq!(export.document_count(), 3);
        let regs = &export.vertices["regulation"];
        assert_eq!(
            regs[0],
            json!({"_key": "1", "_id": "regulation/1", "title": "UU 11/2020", "effective": false})
        );
        assert_eq!(
            export.edges["amended_by"][0],
            json!({"_from": "regulation/1", "_to": "regulation/2", "amendment_number": 1})
        );
    }
}
