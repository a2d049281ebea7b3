//! # Effectiveness Rules
//!
//! [`annotate`] runs a fixed, ordered pipeline over a built graph. Each rule
//! reads what the earlier rules wrote, so the order is part of the
//! contract:
//!
//! 1. Every regulation is effective.
//! 2. A regulation that is the source of a regulation-level `AmendedBy`
//!    edge is not, whatever its amenders' state or amendment numbers.
//! 3. Article node flags, per [`ArticlePolicy`].
//! 4. Every `NextArticle` edge is effective.
//! 5. A `NextArticle` edge into an ineffective article is not.
//! 6. A `NextArticle` edge out of an ineffective article is not.
//! 7. Among the `NextArticle` edges leaving one article, those with an
//!    amendment number below the group maximum are not. The maximum keeps
//!    whatever rules 4 to 6 left it, and ties at the maximum all keep
//!    their value.
//!
//! Rules 5 to 7 are one pass. Nothing is re-propagated after rule 7, even
//! if it disabled an edge that an earlier rule looked at.
//!
//! Every run starts from the same baselines (rules 1, 3 and 4), so
//! annotating an already annotated graph changes nothing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use lexgraph_core::{Edge, EdgeId, EdgeKind, LegalGraph, NodeKey, NodeKind, Traversal};

use crate::error::EngineResult;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// How article nodes get their own `effective` flag before edges are
/// propagated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticlePolicy {
    /// Every article is effective unless it is the source of an
    /// article-level `AmendedBy` edge.
    #[default]
    AmendedBy,
    /// An article with no flag counts as effective; a flag set by the
    /// caller before annotation is kept.
    Implicit,
}

/// Engine configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotateOptions {
    /// Article node-level rule.
    pub article_policy: ArticlePolicy,
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// The pipeline's rules, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    RegulationBaseline,
    RegulationAmended,
    ArticlePolicy,
    SuccessionBaseline,
    InboundPropagation,
    OutboundPropagation,
    AmendmentTieBreak,
}

impl Rule {
    /// All rules, in execution order.
    pub const ALL: [Rule; 7] = [
        Rule::RegulationBaseline,
        Rule::RegulationAmended,
        Rule::ArticlePolicy,
        Rule::SuccessionBaseline,
        Rule::InboundPropagation,
        Rule::OutboundPropagation,
        Rule::AmendmentTieBreak,
    ];

    /// Snake-case name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RegulationBaseline => "regulation_baseline",
            Self::RegulationAmended => "regulation_amended",
            Self::ArticlePolicy => "article_policy",
            Self::SuccessionBaseline => "succession_baseline",
            Self::InboundPropagation => "inbound_propagation",
            Self::OutboundPropagation => "outbound_propagation",
            Self::AmendmentTieBreak => "amendment_tie_break",
        }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What one rule did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RuleOutcome {
    /// Flags the rule wrote.
    pub written: usize,
    /// Of those, flags whose stored value actually changed.
    pub changed: usize,
}

impl RuleOutcome {
    fn record(&mut self, changed: Option<bool>) {
        if let Some(changed) = changed {
            self.written += 1;
            if changed {
                self.changed += 1;
            }
        }
    }
}

/// Per-rule counts from one [`annotate`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnnotationReport {
    /// Outcome of every rule, keyed in execution order.
    pub rules: BTreeMap<Rule, RuleOutcome>,
}

impl AnnotationReport {
    /// Outcome of one rule.
    pub fn outcome(&self, rule: Rule) -> RuleOutcome {
        self.rules.get(&rule).copied().unwrap_or_default()
    }

    /// Flags changed across all rules.
    pub fn total_changed(&self) -> usize {
        self.rules.values().map(|o| o.changed).sum()
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Annotate with default options.
pub fn annotate(graph: &mut LegalGraph) -> EngineResult<AnnotationReport> {
    EffectivenessEngine::default().run(graph)
}

/// Configurable effectiveness engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct EffectivenessEngine {
    options: AnnotateOptions,
}

impl EffectivenessEngine {
    /// Create an engine.
    pub fn new(options: AnnotateOptions) -> Self {
        Self { options }
    }

    /// The engine's options.
    pub fn options(&self) -> &AnnotateOptions {
        &self.options
    }

    /// Run the whole pipeline on `graph`.
    ///
    /// Fails with [`lexgraph_core::GraphError::DanglingEdge`] before any
    /// flag is written if the graph's edges do not resolve.
    pub fn run(&self, graph: &mut LegalGraph) -> EngineResult<AnnotationReport> {
        graph.check_integrity()?;

        let mut report = AnnotationReport::default();
        for rule in Rule::ALL {
            let outcome = self.apply(rule, graph);
            debug!(
                rule = rule.as_str(),
                written = outcome.written,
                changed = outcome.changed,
                "rule applied"
            );
            report.rules.insert(rule, outcome);
        }

        info!(
            policy = ?self.options.article_policy,
            changed = report.total_changed(),
            fingerprint = %graph.fingerprint(),
            "graph annotated"
        );
        Ok(report)
    }

    fn apply(&self, rule: Rule, graph: &mut LegalGraph) -> RuleOutcome {
        match rule {
            Rule::RegulationBaseline => {
                let all = keys_of_kind(graph, NodeKind::Regulation);
                set_nodes(graph, all, true)
            }
            Rule::RegulationAmended => {
                let amended = amended_sources(graph, NodeKind::Regulation);
                set_nodes(graph, amended, false)
            }
            Rule::ArticlePolicy => match self.options.article_policy {
                ArticlePolicy::AmendedBy => {
                    let all = keys_of_kind(graph, NodeKind::Article);
                    let mut outcome = set_nodes(graph, all, true);
                    let amended = amended_sources(graph, NodeKind::Article);
                    let disabled = set_nodes(graph, amended, false);
                    outcome.written += disabled.written;
                    outcome.changed += disabled.changed;
                    outcome
                }
                ArticlePolicy::Implicit => {
                    let unset: Vec<NodeKey> = graph
                        .nodes_of_kind(NodeKind::Article)
                        .filter(|n| n.effective().is_none())
                        .map(|n| n.key())
                        .collect();
                    set_nodes(graph, unset, true)
                }
            },
            Rule::SuccessionBaseline => {
                let all = succession_edges(graph, |_, _| true);
                set_edges(graph, all, true)
            }
            Rule::InboundPropagation => {
                let inbound = succession_edges(graph, |g, e| is_ineffective(g, &e.to()));
                set_edges(graph, inbound, false)
            }
            Rule::OutboundPropagation => {
                let outbound = succession_edges(graph, |g, e| is_ineffective(g, &e.from()));
                set_edges(graph, outbound, false)
            }
            Rule::AmendmentTieBreak => {
                let superseded = superseded_successions(graph);
                set_edges(graph, superseded, false)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Rule helpers
// ---------------------------------------------------------------------------

fn keys_of_kind(graph: &LegalGraph, kind: NodeKind) -> Vec<NodeKey> {
    graph.nodes_of_kind(kind).map(|n| n.key()).collect()
}

/// Sources of `AmendedBy` edges whose endpoints are both of `kind`.
fn amended_sources(graph: &LegalGraph, kind: NodeKind) -> Vec<NodeKey> {
    let mut sources: Vec<NodeKey> = graph
        .edges_of_kind(EdgeKind::AmendedBy)
        .filter(|(_, e)| e.from().kind() == kind && e.to().kind() == kind)
        .map(|(_, e)| e.from())
        .collect();
    sources.sort();
    sources.dedup();
    sources
}

fn is_ineffective(graph: &LegalGraph, key: &NodeKey) -> bool {
    graph.node(key).and_then(|n| n.effective()) == Some(false)
}

fn succession_edges(
    graph: &LegalGraph,
    pred: impl Fn(&LegalGraph, &Edge) -> bool,
) -> Vec<EdgeId> {
    graph
        .edges_of_kind(EdgeKind::NextArticle)
        .filter(|(_, e)| pred(graph, e))
        .map(|(id, _)| id)
        .collect()
}

/// `NextArticle` edges whose amendment number is below the maximum among
/// the edges leaving the same article. Edges without a number take no part.
fn superseded_successions(graph: &LegalGraph) -> Vec<EdgeId> {
    let mut groups: BTreeMap<NodeKey, Vec<(EdgeId, i64)>> = BTreeMap::new();
    for (id, edge) in graph.edges_of_kind(EdgeKind::NextArticle) {
        if let Some(n) = edge.amendment_number() {
            groups.entry(edge.from()).or_default().push((id, n));
        }
    }
    groups
        .into_values()
        .flat_map(|group| {
            let max = group.iter().map(|(_, n)| *n).max().unwrap_or(i64::MIN);
            group
                .into_iter()
                .filter(move |(_, n)| *n < max)
                .map(|(id, _)| id)
        })
        .collect()
}

fn set_nodes(graph: &mut LegalGraph, keys: Vec<NodeKey>, value: bool) -> RuleOutcome {
    let mut outcome = RuleOutcome::default();
    for key in keys {
        outcome.record(graph.set_node_effective(&key, value));
    }
    outcome
}

fn set_edges(graph: &mut LegalGraph, ids: Vec<EdgeId>, value: bool) -> RuleOutcome {
    let mut outcome = RuleOutcome::default();
    for id in ids {
        outcome.record(graph.set_edge_effective(id, value));
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexgraph_core::Payload;

    fn graph_with(regulations: &[i64], articles: &[i64]) -> LegalGraph {
        let mut g = LegalGraph::new();
        for id in regulations {
            g.add_node(NodeKey::regulation(*id), Payload::new()).unwrap();
        }
        for id in articles {
            g.add_node(NodeKey::article(*id), Payload::new()).unwrap();
        }
        g
    }

    fn succession(g: &mut LegalGraph, from: i64, to: i64, n: Option<i64>) -> EdgeId {
        g.add_edge(
            EdgeKind::NextArticle,
            NodeKey::article(from),
            NodeKey::article(to),
            n,
            Payload::new(),
        )
        .unwrap()
    }

    fn amended(g: &mut LegalGraph, from: NodeKey, to: NodeKey) {
        g.add_edge(EdgeKind::AmendedBy, from, to, Some(1), Payload::new())
            .unwrap();
    }

    fn node_flag(g: &LegalGraph, key: NodeKey) -> Option<bool> {
        g.node(&key).and_then(|n| n.effective())
    }

    fn edge_flag(g: &LegalGraph, id: EdgeId) -> Option<bool> {
        g.edge(id).and_then(|e| e.effective())
    }

    #[test]
    fn article_policy_default_is_amended_by() {
        assert_eq!(AnnotateOptions::default().article_policy, ArticlePolicy::AmendedBy);
    }

    #[test]
    fn article_policy_deserializes_snake_case() {
        let opts: AnnotateOptions =
            serde_json::from_str(r#"{"article_policy": "implicit"}"#).unwrap();
        assert_eq!(opts.article_policy, ArticlePolicy::Implicit);
        let opts: AnnotateOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts.article_policy, ArticlePolicy::AmendedBy);
    }

    #[test]
    fn regulation_amended_regardless_of_target() {
        let mut g = graph_with(&[1, 2, 3], &[]);
        amended(&mut g, NodeKey::regulation(1), NodeKey::regulation(2));
        amended(&mut g, NodeKey::regulation(2), NodeKey::regulation(3));
        annotate(&mut g).unwrap();
        assert_eq!(node_flag(&g, NodeKey::regulation(1)), Some(false));
        assert_eq!(node_flag(&g, NodeKey::regulation(2)), Some(false));
        assert_eq!(node_flag(&g, NodeKey::regulation(3)), Some(true));
    }

    #[test]
    fn article_amended_by_disables_source_article() {
        let mut g = graph_with(&[], &[1, 2]);
        amended(&mut g, NodeKey::article(1), NodeKey::article(2));
        annotate(&mut g).unwrap();
        assert_eq!(node_flag(&g, NodeKey::article(1)), Some(false));
        assert_eq!(node_flag(&g, NodeKey::article(2)), Some(true));
    }

    #[test]
    fn implicit_policy_fills_unset_and_keeps_set() {
        let mut g = graph_with(&[], &[1, 2]);
        amended(&mut g, NodeKey::article(1), NodeKey::article(2));
        g.set_node_effective(&NodeKey::article(2), false);
        EffectivenessEngine::new(AnnotateOptions {
            article_policy: ArticlePolicy::Implicit,
        })
        .run(&mut g)
        .unwrap();
        assert_eq!(node_flag(&g, NodeKey::article(1)), Some(true));
        assert_eq!(node_flag(&g, NodeKey::article(2)), Some(false));
    }

    #[test]
    fn inbound_propagation() {
        let mut g = graph_with(&[], &[1, 2, 3]);
        amended(&mut g, NodeKey::article(2), NodeKey::article(3));
        let e = succession(&mut g, 1, 2, Some(1));
        annotate(&mut g).unwrap();
        assert_eq!(edge_flag(&g, e), Some(false));
    }

    #[test]
    fn tie_break_skips_edges_without_number() {
        let mut g = graph_with(&[], &[1, 2, 3]);
        let unnumbered = succession(&mut g, 1, 2, None);
        let numbered = succession(&mut g, 1, 3, Some(4));
        annotate(&mut g).unwrap();
        assert_eq!(edge_flag(&g, unnumbered), Some(true));
        assert_eq!(edge_flag(&g, numbered), Some(true));
    }

    #[test]
    fn tie_at_maximum_keeps_both() {
        let mut g = graph_with(&[], &[1, 2, 3, 4]);
        let low = succession(&mut g, 1, 2, Some(1));
        let a = succession(&mut g, 1, 3, Some(2));
        let b = succession(&mut g, 1, 4, Some(2));
        annotate(&mut g).unwrap();
        assert_eq!(edge_flag(&g, low), Some(false));
        assert_eq!(edge_flag(&g, a), Some(true));
        assert_eq!(edge_flag(&g, b), Some(true));
    }

    #[test]
    fn non_tracking_kinds_stay_unset() {
        let mut g = LegalGraph::new();
        g.add_node(NodeKey::new(NodeKind::Definition, 1), Payload::new())
            .unwrap();
        annotate(&mut g).unwrap();
        assert_eq!(node_flag(&g, NodeKey::new(NodeKind::Definition, 1)), None);
    }

    #[test]
    fn report_counts_changes() {
        let mut g = graph_with(&[1, 2], &[1, 2, 3]);
        amended(&mut g, NodeKey::regulation(1), NodeKey::regulation(2));
        succession(&mut g, 1, 2, Some(1));
        succession(&mut g, 1, 3, Some(2));

        let first = annotate(&mut g).unwrap();
        assert_eq!(first.outcome(Rule::RegulationBaseline).written, 2);
        assert_eq!(first.outcome(Rule::RegulationAmended).changed, 1);
        assert_eq!(first.outcome(Rule::SuccessionBaseline).written, 2);
        assert_eq!(first.outcome(Rule::AmendmentTieBreak).changed, 1);

        let second = annotate(&mut g).unwrap();
        assert_eq!(second.outcome(Rule::RegulationBaseline).changed, 1);
        assert_eq!(second.outcome(Rule::AmendmentTieBreak).written, 1);
    }

    #[test]
    fn rule_order_is_declaration_order() {
        let mut sorted = Rule::ALL;
        sorted.sort();
        assert_eq!(sorted, Rule::ALL);
        assert_eq!(Rule::AmendmentTieBreak.to_string(), "amendment_tie_break");
    }
}
