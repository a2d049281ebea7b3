//! Unweighted shortest path by breadth-first search.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use lexgraph_core::{EdgeKind, NodeKey, Traversal};

/// Shortest directed path from `from` to `to` using only edges of `kinds`.
///
/// Returns the node sequence including both ends, `Some(vec![from])` when
/// they are equal, and `None` if either node is missing or `to` is
/// unreachable. Among equally short paths the one through the smallest
/// keys is chosen.
pub fn shortest_path<T: Traversal + ?Sized>(
    graph: &T,
    from: &NodeKey,
    to: &NodeKey,
    kinds: &[EdgeKind],
) -> Option<Vec<NodeKey>> {
    graph.node(from)?;
    graph.node(to)?;
    if from == to {
        return Some(vec![*from]);
    }

    let mut parent: BTreeMap<NodeKey, NodeKey> = BTreeMap::new();
    let mut queue = VecDeque::from([*from]);
    let mut seen = BTreeSet::from([*from]);

    while let Some(current) = queue.pop_front() {
        for next in successors(graph, &current, kinds) {
            if !seen.insert(next) {
                continue;
            }
            parent.insert(next, current);
            if next == *to {
                return Some(unwind(&parent, *from, next));
            }
            queue.push_back(next);
        }
    }
    None
}

fn successors<T: Traversal + ?Sized>(
    graph: &T,
    key: &NodeKey,
    kinds: &[EdgeKind],
) -> BTreeSet<NodeKey> {
    kinds
        .iter()
        .flat_map(|kind| graph.outgoing(key, *kind))
        .map(|(_, edge)| edge.to())
        .collect()
}

fn unwind(parent: &BTreeMap<NodeKey, NodeKey>, from: NodeKey, to: NodeKey) -> Vec<NodeKey> {
    let mut path = vec![to];
    let mut cursor = to;
    while cursor != from {
        match parent.get(&cursor) {
            Some(prev) => {
                path.push(*prev);
                cursor = *prev;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexgraph_core::{LegalGraph, Payload};

    fn chain() -> LegalGraph {
        let mut g = LegalGraph::new();
        for id in 1..=4 {
            g.add_node(NodeKey::article(id), Payload::new()).unwrap();
        }
        g.add_node(NodeKey::regulation(1), Payload::new()).unwrap();
        for (from, to) in [(1, 2), (2, 3), (3, 4)] {
            g.add_edge(
                EdgeKind::ReferTo,
                NodeKey::article(from),
                NodeKey::article(to),
                None,
                Payload::new(),
            )
            .unwrap();
        }
        g.add_edge(
            EdgeKind::HasArticle,
            NodeKey::regulation(1),
            NodeKey::article(1),
            None,
            Payload::new(),
        )
        .unwrap();
        g
    }

    #[test]
    fn follows_selected_kinds() {
        let g = chain();
        let path = shortest_path(
            &g,
            &NodeKey::regulation(1),
            &NodeKey::article(3),
            &[EdgeKind::HasArticle, EdgeKind::ReferTo],
        )
        .unwrap();
        assert_eq!(
            path,
            vec![
                NodeKey::regulation(1),
                NodeKey::article(1),
                NodeKey::article(2),
                NodeKey::article(3)
            ]
        );
    }

    #[test]
    fn ignores_unselected_kinds() {
        let g = chain();
        let path = shortest_path(
            &g,
            &NodeKey::regulation(1),
            &NodeKey::article(3),
            &[EdgeKind::ReferTo],
        );
        assert_eq!(path, None);
    }

    #[test]
    fn respects_direction() {
        let g = chain();
        assert_eq!(
            shortest_path(&g, &NodeKey::article(4), &NodeKey::article(1), &[EdgeKind::ReferTo]),
            None
        );
    }

    #[test]
    fn trivial_and_missing() {
        let g = chain();
        let a = NodeKey::article(2);
        assert_eq!(shortest_path(&g, &a, &a, &[]), Some(vec![a]));
        assert_eq!(shortest_path(&g, &a, &NodeKey::article(99), &[EdgeKind::ReferTo]), None);
    }
}
