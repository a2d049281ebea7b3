//! Degree centrality.

use std::collections::BTreeMap;

use lexgraph_core::{EdgeKind, NodeKey, NodeKind, Traversal};

/// Normalised degree centrality of every node of `kind`.
///
/// A node's in-degree plus out-degree over all edge kinds, divided by
/// `node_count - 1`. A self-loop counts twice. Graphs with at most one
/// node score every node 0.
pub fn degree_centrality<T: Traversal + ?Sized>(
    graph: &T,
    kind: NodeKind,
) -> BTreeMap<NodeKey, f64> {
    let others = graph.node_count().saturating_sub(1);
    graph
        .nodes_of_kind(kind)
        .map(|node| {
            let key = node.key();
            let degree: usize = EdgeKind::ALL
                .iter()
                .map(|k| graph.outgoing(&key, *k).len() + graph.incoming(&key, *k).len())
                .sum();
            let score = if others == 0 {
                0.0
            } else {
                degree as f64 / others as f64
            };
            (key, score)
        })
        .collect()
}
