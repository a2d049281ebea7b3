//! # Legal Graph: Typed Directed Multigraph
//!
//! [`LegalGraph`] stores nodes and edges in a `petgraph` stable graph and
//! keeps a `BTreeMap<NodeKey, NodeIndex>` alongside it, so lookups by key
//! are cheap and iteration in key order is free.
//!
//! ## Invariants
//!
//! - Every [`NodeKey`] appears at most once.
//! - Every edge's endpoints resolve to nodes in the graph. `add_edge`
//!   refuses anything else, and [`LegalGraph::check_integrity`] re-verifies
//!   the key index against the storage for callers that received a graph
//!   from elsewhere.
//! - Structure is fixed once built. After construction only the
//!   `effective` flags change.
//!
//! ## Read Interface
//!
//! Consumers that only read (query layers, analytics) should program
//! against [`Traversal`] rather than the concrete type.

use std::collections::BTreeMap;

use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::{GraphError, GraphResult};
use crate::identity::{EdgeKind, NodeKey, NodeKind};
use crate::record::Payload;

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// A graph vertex: identity, computed effectiveness, opaque payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    key: NodeKey,
    effective: Option<bool>,
    payload: Payload,
}

impl Node {
    /// The node's composite key.
    pub fn key(&self) -> NodeKey {
        self.key
    }

    /// The node's kind.
    pub fn kind(&self) -> NodeKind {
        self.key.kind()
    }

    /// Computed effectiveness; `None` until the engine has run (and always
    /// `None` for kinds that do not track it).
    pub fn effective(&self) -> Option<bool> {
        self.effective
    }

    /// Pass-through attributes from the input row.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }
}

// ---------------------------------------------------------------------------
// Edge
// ---------------------------------------------------------------------------

/// Stable handle to an edge. Valid for the lifetime of the graph it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct EdgeId(u32);

impl EdgeId {
    /// Numeric value of the handle.
    pub fn index(&self) -> u32 {
        self.0
    }

    fn from_petgraph(index: EdgeIndex) -> Self {
        Self(index.index() as u32)
    }

    fn to_petgraph(self) -> EdgeIndex {
        EdgeIndex::new(self.0 as usize)
    }
}

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A typed, attributed relationship between two nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    kind: EdgeKind,
    from: NodeKey,
    to: NodeKey,
    amendment_number: Option<i64>,
    effective: Option<bool>,
    attributes: Payload,
}

impl Edge {
    /// Relationship kind.
    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    /// Source node.
    pub fn from(&self) -> NodeKey {
        self.from
    }

    /// Target node.
    pub fn to(&self) -> NodeKey {
        self.to
    }

    /// Sequence number of the amendment that introduced this edge, for
    /// `NextArticle` and amendment edges.
    pub fn amendment_number(&self) -> Option<i64> {
        self.amendment_number
    }

    /// Computed effectiveness; only `NextArticle` edges ever get one.
    pub fn effective(&self) -> Option<bool> {
        self.effective
    }

    /// Pass-through attributes from the input row.
    pub fn attributes(&self) -> &Payload {
        &self.attributes
    }
}

// ---------------------------------------------------------------------------
// Traversal
// ---------------------------------------------------------------------------

/// Read-only traversal over a legal graph.
///
/// Iteration orders are deterministic: nodes ascend by key, edges ascend
/// by [`EdgeId`] (insertion order).
pub trait Traversal {
    /// Look up a node by key.
    fn node(&self, key: &NodeKey) -> Option<&Node>;

    /// Look up an edge by handle.
    fn edge(&self, id: EdgeId) -> Option<&Edge>;

    /// Total number of nodes.
    fn node_count(&self) -> usize;

    /// Nodes of one kind, ascending by id.
    fn nodes_of_kind(&self, kind: NodeKind) -> Box<dyn Iterator<Item = &Node> + '_>;

    /// Edges of one kind.
    fn edges_of_kind(&self, kind: EdgeKind) -> Box<dyn Iterator<Item = (EdgeId, &Edge)> + '_>;

    /// Edges of one kind leaving `key`. Empty if the node does not exist.
    fn outgoing(&self, key: &NodeKey, kind: EdgeKind) -> Vec<(EdgeId, &Edge)>;

    /// Edges of one kind arriving at `key`. Empty if the node does not exist.
    fn incoming(&self, key: &NodeKey, kind: EdgeKind) -> Vec<(EdgeId, &Edge)>;
}

// ---------------------------------------------------------------------------
// GraphSummary
// ---------------------------------------------------------------------------

/// Node and edge counts per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphSummary {
    /// Nodes per kind.
    pub nodes: BTreeMap<NodeKind, usize>,
    /// Edges per kind.
    pub edges: BTreeMap<EdgeKind, usize>,
}

impl GraphSummary {
    /// Total nodes across kinds.
    pub fn total_nodes(&self) -> usize {
        self.nodes.values().sum()
    }

    /// Total edges across kinds.
    pub fn total_edges(&self) -> usize {
        self.edges.values().sum()
    }
}

// ---------------------------------------------------------------------------
// LegalGraph
// ---------------------------------------------------------------------------

/// The regulation graph: typed nodes, typed attributed edges, parallel
/// edges allowed.
#[derive(Debug, Clone, Default)]
pub struct LegalGraph {
    inner: StableDiGraph<Node, Edge>,
    index: BTreeMap<NodeKey, NodeIndex>,
}

impl LegalGraph {
    /// An empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node.
    ///
    /// Re-inserting a key with an identical payload is a no-op; with a
    /// different payload it is [`GraphError::DuplicateNode`].
    pub fn add_node(&mut self, key: NodeKey, payload: Payload) -> GraphResult<()> {
        if let Some(existing) = self.node(&key) {
            return if existing.payload == payload {
                Ok(())
            } else {
                Err(GraphError::DuplicateNode { key })
            };
        }
        let idx = self.inner.add_node(Node {
            key,
            effective: None,
            payload,
        });
        self.index.insert(key, idx);
        Ok(())
    }

    /// Insert an edge between two existing nodes.
    pub fn add_edge(
        &mut self,
        kind: EdgeKind,
        from: NodeKey,
        to: NodeKey,
        amendment_number: Option<i64>,
        attributes: Payload,
    ) -> GraphResult<EdgeId> {
        let source = self.resolve(kind, &from)?;
        let target = self.resolve(kind, &to)?;
        let idx = self.inner.add_edge(
            source,
            target,
            Edge {
                kind,
                from,
                to,
                amendment_number,
                effective: None,
                attributes,
            },
        );
        Ok(EdgeId::from_petgraph(idx))
    }

    fn resolve(&self, kind: EdgeKind, key: &NodeKey) -> GraphResult<NodeIndex> {
        self.index
            .get(key)
            .copied()
            .ok_or(GraphError::DanglingEdge { kind, missing: *key })
    }

    /// Whether a node with this key exists.
    pub fn contains(&self, key: &NodeKey) -> bool {
        self.index.contains_key(key)
    }

    /// Total number of edges.
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// All nodes, ascending by key.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.index.values().filter_map(|idx| self.inner.node_weight(*idx))
    }

    /// All edges, ascending by handle.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> + '_ {
        self.inner
            .edge_indices()
            .filter_map(|idx| Some((EdgeId::from_petgraph(idx), self.inner.edge_weight(idx)?)))
    }

    /// Set a node's `effective` flag.
    ///
    /// Returns `Some(true)` if the stored value changed, `Some(false)` if it
    /// already held `value`, and `None` if the node does not exist.
    pub fn set_node_effective(&mut self, key: &NodeKey, value: bool) -> Option<bool> {
        let idx = *self.index.get(key)?;
        let node = self.inner.node_weight_mut(idx)?;
        let changed = node.effective != Some(value);
        node.effective = Some(value);
        Some(changed)
    }

    /// Set an edge's `effective` flag. Same return convention as
    /// [`LegalGraph::set_node_effective`].
    pub fn set_edge_effective(&mut self, id: EdgeId, value: bool) -> Option<bool> {
        let edge = self.inner.edge_weight_mut(id.to_petgraph())?;
        let changed = edge.effective != Some(value);
        edge.effective = Some(value);
        Some(changed)
    }

    /// Verify that the key index and the edge endpoints agree with storage.
    ///
    /// Fails with [`GraphError::DanglingEdge`] on the first edge whose
    /// recorded endpoint does not resolve to the node it is attached to.
    pub fn check_integrity(&self) -> GraphResult<()> {
        for idx in self.inner.edge_indices() {
            let (Some(edge), Some((source, target))) =
                (self.inner.edge_weight(idx), self.inner.edge_endpoints(idx))
            else {
                continue;
            };
            for (key, attached) in [(edge.from, source), (edge.to, target)] {
                let resolves = self.index.get(&key) == Some(&attached)
                    && self.inner.node_weight(attached).map(Node::key) == Some(key);
                if !resolves {
                    return Err(GraphError::DanglingEdge {
                        kind: edge.kind,
                        missing: key,
                    });
                }
            }
        }
        Ok(())
    }

    /// Node and edge counts per kind.
    pub fn summary(&self) -> GraphSummary {
        let mut summary = GraphSummary::default();
        for node in self.nodes() {
            *summary.nodes.entry(node.kind()).or_default() += 1;
        }
        for (_, edge) in self.edges() {
            *summary.edges.entry(edge.kind).or_default() += 1;
        }
        summary
    }

    /// SHA-256 over every computed `effective` flag, in deterministic order.
    ///
    /// Two graphs built from the same input have equal fingerprints exactly
    /// when their annotations agree, which makes this the cheap way to check
    /// idempotence or compare runs.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for node in self.nodes().filter(|n| n.kind().tracks_effectiveness()) {
            hasher.update(format!("{}={}\n", node.key, flag(node.effective)));
        }
        for (id, edge) in self.edges().filter(|(_, e)| e.kind.tracks_effectiveness()) {
            hasher.update(format!(
                "{id} {}:{}->{}@{}={}\n",
                edge.kind,
                edge.from,
                edge.to,
                edge.amendment_number.map_or_else(|| "-".to_string(), |n| n.to_string()),
                flag(edge.effective),
            ));
        }
        hasher
            .finalize()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect()
    }

    fn directed(&self, key: &NodeKey, kind: EdgeKind, dir: Direction) -> Vec<(EdgeId, &Edge)> {
        let Some(idx) = self.index.get(key) else {
            return Vec::new();
        };
        let mut edges: Vec<_> = self
            .inner
            .edges_directed(*idx, dir)
            .filter(|e| e.weight().kind == kind)
            .map(|e| (EdgeId::from_petgraph(e.id()), e.weight()))
            .collect();
        edges.sort_by_key(|(id, _)| *id);
        edges
    }
}

fn flag(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "true",
        Some(false) => "false",
        None => "unset",
    }
}

impl Traversal for LegalGraph {
    fn node(&self, key: &NodeKey) -> Option<&Node> {
        self.index.get(key).and_then(|idx| self.inner.node_weight(*idx))
    }

    fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.inner.edge_weight(id.to_petgraph())
    }

    fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    fn nodes_of_kind(&self, kind: NodeKind) -> Box<dyn Iterator<Item = &Node> + '_> {
        let range = NodeKey::new(kind, i64::MIN)..=NodeKey::new(kind, i64::MAX);
        Box::new(
            self.index
                .range(range)
                .filter_map(|(_, idx)| self.inner.node_weight(*idx)),
        )
    }

    fn edges_of_kind(&self, kind: EdgeKind) -> Box<dyn Iterator<Item = (EdgeId, &Edge)> + '_> {
        Box::new(self.edges().filter(move |(_, e)| e.kind == kind))
    }

    fn outgoing(&self, key: &NodeKey, kind: EdgeKind) -> Vec<(EdgeId, &Edge)> {
        self.directed(key, kind, Direction::Outgoing)
    }

    fn incoming(&self, key: &NodeKey, kind: EdgeKind) -> Vec<(EdgeId, &Edge)> {
        self.directed(key, kind, Direction::Incoming)
    }
}
