//! # Article Queries
//!
//! Lookups a reader of an annotated graph asks about one article: which
//! version is in force now, and which articles it cites or is cited by.

use std::collections::BTreeSet;

use lexgraph_core::{EdgeKind, NodeKey, Traversal};

/// The latest effective version of `article`.
///
/// Starting at `article`, repeatedly follows the effective outgoing
/// `NextArticle` edge with the highest amendment number (ties go to the
/// smallest target key) until there is none. A cycle stops the walk at the
/// last article not yet visited. Returns `None` only if `article` is
/// missing; an article that was never superseded is its own current
/// version.
pub fn current_version<T: Traversal + ?Sized>(graph: &T, article: &NodeKey) -> Option<NodeKey> {
    graph.node(article)?;
    let mut visited = BTreeSet::from([*article]);
    let mut current = *article;
    while let Some(next) = next_effective(graph, &current) {
        if !visited.insert(next) {
            break;
        }
        current = next;
    }
    Some(current)
}

fn next_effective<T: Traversal + ?Sized>(graph: &T, key: &NodeKey) -> Option<NodeKey> {
    graph
        .outgoing(key, EdgeKind::NextArticle)
        .into_iter()
        .filter(|(_, e)| e.effective() == Some(true))
        .max_by(|(_, a), (_, b)| {
            a.amendment_number()
                .cmp(&b.amendment_number())
                .then_with(|| b.to().cmp(&a.to()))
        })
        .map(|(_, e)| e.to())
}

/// Articles linked to `article` by `ReferTo` in either direction,
/// ascending, without `article` itself.
pub fn related_articles<T: Traversal + ?Sized>(graph: &T, article: &NodeKey) -> Vec<NodeKey> {
    let cited = graph
        .outgoing(article, EdgeKind::ReferTo)
        .into_iter()
        .map(|(_, e)| e.to());
    let citing = graph
        .incoming(article, EdgeKind::ReferTo)
        .into_iter()
        .map(|(_, e)| e.from());
    cited
        .chain(citing)
        .filter(|key| key != article)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
