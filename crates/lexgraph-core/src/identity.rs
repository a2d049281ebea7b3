//! # Node and Relationship Identity
//!
//! [`NodeKind`] and [`EdgeKind`] are closed enums: adding a kind forces every
//! `match` in the workspace to handle it. [`NodeKey`] is the composite
//! `(kind, id)` identity, rendered as `"<kind>/<id>"` (e.g. `article/12`),
//! the same shape a document store uses for its `_id` field.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// NodeKind
// ---------------------------------------------------------------------------

/// The entity kinds that can appear as graph vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// A legal instrument (law, government regulation, ministerial decree).
    Regulation,
    /// A numbered clause within a regulation.
    Article,
    /// A "considering" preamble section.
    Consideration,
    /// An "observing" preamble section.
    Observation,
    /// A defined term.
    Definition,
}

impl NodeKind {
    /// Every node kind, in key order.
    pub const ALL: [NodeKind; 5] = [
        Self::Regulation,
        Self::Article,
        Self::Consideration,
        Self::Observation,
        Self::Definition,
    ];

    /// Lowercase collection name (`"article"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regulation => "regulation",
            Self::Article => "article",
            Self::Consideration => "consideration",
            Self::Observation => "observation",
            Self::Definition => "definition",
        }
    }

    /// Capitalised label as used in batch names (`"Article"`).
    pub fn label(&self) -> &'static str {
        match self {
            Self::Regulation => "Regulation",
            Self::Article => "Article",
            Self::Consideration => "Consideration",
            Self::Observation => "Observation",
            Self::Definition => "Definition",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(name.trim()))
    }

    /// Whether nodes of this kind carry a computed `effective` flag.
    pub fn tracks_effectiveness(&self) -> bool {
        matches!(self, Self::Regulation | Self::Article)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EdgeKind
// ---------------------------------------------------------------------------

/// The relationship kinds that can appear as graph edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// The source was amended by the target (regulation↔regulation or article↔article).
    AmendedBy,
    /// Regulation → Consideration.
    HasConsideration,
    /// Regulation → Observation.
    HasObservation,
    /// Regulation → Definition.
    HasDefinition,
    /// Regulation → Article.
    HasArticle,
    /// Article version succession, tagged with an amendment number.
    NextArticle,
    /// Article cross-reference.
    ReferTo,
}

impl EdgeKind {
    /// Every edge kind.
    pub const ALL: [EdgeKind; 7] = [
        Self::AmendedBy,
        Self::HasConsideration,
        Self::HasObservation,
        Self::HasDefinition,
        Self::HasArticle,
        Self::NextArticle,
        Self::ReferTo,
    ];

    /// Lowercase collection name (`"next_article"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AmendedBy => "amended_by",
            Self::HasConsideration => "has_consideration",
            Self::HasObservation => "has_observation",
            Self::HasDefinition => "has_definition",
            Self::HasArticle => "has_article",
            Self::NextArticle => "next_article",
            Self::ReferTo => "refer_to",
        }
    }

    /// Uppercase relation token as it appears at the end of batch names.
    pub fn relation(&self) -> &'static str {
        match self {
            Self::AmendedBy => "AMENDED_BY",
            Self::HasConsideration => "HAS_CONSIDERATION",
            Self::HasObservation => "HAS_OBSERVATION",
            Self::HasDefinition => "HAS_DEFINITION",
            Self::HasArticle => "HAS_ARTICLE",
            Self::NextArticle => "NEXT_ARTICLE",
            Self::ReferTo => "REFER_TO",
        }
    }

    /// Whether an edge of this kind may connect `from` to `to`.
    pub fn permits(&self, from: NodeKind, to: NodeKind) -> bool {
        use NodeKind::*;
        match self {
            Self::AmendedBy => matches!((from, to), (Regulation, Regulation) | (Article, Article)),
            Self::HasConsideration => from == Regulation && to == Consideration,
            Self::HasObservation => from == Regulation && to == Observation,
            Self::HasDefinition => from == Regulation && to == Definition,
            Self::HasArticle => from == Regulation && to == Article,
            Self::NextArticle | Self::ReferTo => from == Article && to == Article,
        }
    }

    /// Whether edges of this kind carry a computed `effective` flag.
    pub fn tracks_effectiveness(&self) -> bool {
        matches!(self, Self::NextArticle)
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// NodeKey
// ---------------------------------------------------------------------------

/// Composite node identity: kind plus integer id.
///
/// Ordering is by kind first, then id, so a `BTreeMap<NodeKey, _>` groups
/// nodes of one kind into a contiguous range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeKey {
    kind: NodeKind,
    id: i64,
}

impl NodeKey {
    /// Create a key from its parts.
    pub const fn new(kind: NodeKind, id: i64) -> Self {
        Self { kind, id }
    }

    /// Shorthand for an article key.
    pub const fn article(id: i64) -> Self {
        Self::new(NodeKind::Article, id)
    }

    /// Shorthand for a regulation key.
    pub const fn regulation(id: i64) -> Self {
        Self::new(NodeKind::Regulation, id)
    }

    /// The node's kind.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The node's id within its kind.
    pub fn id(&self) -> i64 {
        self.id
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.id)
    }
}

/// Failure to parse a `"<kind>/<id>"` string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid node key {input:?}: expected <kind>/<integer id>")]
pub struct KeyParseError {
    /// The string that failed to parse.
    pub input: String,
}

impl FromStr for NodeKey {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || KeyParseError {
            input: s.to_string(),
        };
        let (kind, id) = s.split_once('/').ok_or_else(err)?;
        let kind = NodeKind::parse(kind).ok_or_else(err)?;
        let id = id.trim().parse::<i64>().map_err(|_| err())?;
        Ok(Self::new(kind, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_kind_parse_is_case_insensitive() {
        assert_eq!(NodeKind::parse("Article"), Some(NodeKind::Article));
        assert_eq!(NodeKind::parse("REGULATION"), Some(NodeKind::Regulation));
        assert_eq!(NodeKind::parse("chapter"), None);
    }

    #[test]
    fn only_regulation_and_article_track_effectiveness() {
        let tracked: Vec<_> = NodeKind::ALL
            .into_iter()
            .filter(NodeKind::tracks_effectiveness)
            .collect();
        assert_eq!(tracked, vec![NodeKind::Regulation, NodeKind::Article]);
    }

    #[test]
    fn amended_by_permits_same_kind_pairs_only() {
        use NodeKind::*;
        assert!(EdgeKind::AmendedBy.permits(Regulation, Regulation));
        assert!(EdgeKind::AmendedBy.permits(Article, Article));
        assert!(!EdgeKind::AmendedBy.permits(Regulation, Article));
    }

    #[test]
    fn containment_edges_start_at_regulation() {
        use NodeKind::*;
        assert!(EdgeKind::HasArticle.permits(Regulation, Article));
        assert!(!EdgeKind::HasArticle.permits(Article, Article));
        assert!(EdgeKind::HasDefinition.permits(Regulation, Definition));
        assert!(!EdgeKind::HasDefinition.permits(Regulation, Observation));
    }

    #[test]
    fn node_key_display_and_parse_agree() {
        let key = NodeKey::article(12);
        assert_eq!(key.to_string(), "article/12");
        assert_eq!("article/12".parse::<NodeKey>().unwrap(), key);
        assert_eq!("Regulation/3".parse::<NodeKey>().unwrap(), NodeKey::regulation(3));
    }

    #[test]
    fn node_key_parse_rejects_garbage() {
        assert!("article".parse::<NodeKey>().is_err());
        assert!("article/x".parse::<NodeKey>().is_err());
        assert!("chapter/1".parse::<NodeKey>().is_err());
    }

    #[test]
    fn node_keys_order_by_kind_then_id() {
        let mut keys = vec![
            NodeKey::article(1),
            NodeKey::regulation(9),
            NodeKey::regulation(2),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                NodeKey::regulation(2),
                NodeKey::regulation(9),
                NodeKey::article(1)
            ]
        );
    }
}
