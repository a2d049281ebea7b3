//! # Effectiveness Scenarios
//!
//! End-to-end checks from record batches through the builder and the
//! engine.

use lexgraph_build::build;
use lexgraph_core::{EdgeKind, LegalGraph, NodeKey, Record, RecordBatches, Traversal};
use lexgraph_engine::{annotate, AnnotateOptions, ArticlePolicy, EffectivenessEngine};
use serde_json::{json, Value};

fn batches(entries: Vec<(&str, Vec<Value>)>) -> RecordBatches {
    entries
        .into_iter()
        .map(|(name, values)| {
            let rows: Vec<Record> = values
                .into_iter()
                .filter_map(|v| v.as_object().cloned())
                .collect();
            (name.to_string(), rows)
        })
        .collect()
}

fn succession_flag(g: &LegalGraph, from: i64, to: i64) -> Option<bool> {
    g.outgoing(&NodeKey::article(from), EdgeKind::NextArticle)
        .into_iter()
        .find(|(_, e)| e.to() == NodeKey::article(to))
        .and_then(|(_, e)| e.effective())
}

fn node_flag(g: &LegalGraph, key: NodeKey) -> Option<bool> {
    g.node(&key).and_then(|n| n.effective())
}

#[test]
fn amended_regulation_becomes_ineffective() {
    let mut g = build(&batches(vec![
        ("node_Regulation", vec![json!({"id": 1}), json!({"id": 2})]),
        (
            "edge_reg_AMENDED_BY",
            vec![json!({"from_type": "regulation", "from": 1, "to_type": "regulation", "to": 2, "amendment_number": 1})],
        ),
    ]))
    .unwrap();
    annotate(&mut g).unwrap();
    assert_eq!(node_flag(&g, NodeKey::regulation(1)), Some(false));
    assert_eq!(node_flag(&g, NodeKey::regulation(2)), Some(true));
}

#[test]
fn highest_amendment_wins_among_successors() {
    let mut g = build(&batches(vec![(
        "node_Article",
        vec![
            json!({"id": 1}),
            json!({"id": 2, "previous_article": 1, "amendment_number": 1}),
            json!({"id": 3, "previous_article": 1, "amendment_number": 2}),
        ],
    )]))
    .unwrap();
    annotate(&mut g).unwrap();
    assert_eq!(succession_flag(&g, 1, 2), Some(false));
    assert_eq!(succession_flag(&g, 1, 3), Some(true));
}

fn ineffective_source_batches() -> RecordBatches {
    batches(vec![
        (
            "node_Article",
            vec![
                json!({"id": 5}),
                json!({"id": 6, "previous_article": 5, "amendment_number": 9}),
                json!({"id": 7}),
            ],
        ),
        (
            "edge_art_AMENDED_BY",
            vec![json!({"from_type": "article", "from": 5, "to_type": "article", "to": 7, "amendment_number": 1})],
        ),
    ])
}

#[test]
fn ineffective_source_disables_outgoing_succession() {
    let mut g = build(&ineffective_source_batches()).unwrap();
    annotate(&mut g).unwrap();
    assert_eq!(node_flag(&g, NodeKey::article(5)), Some(false));
    assert_eq!(succession_flag(&g, 5, 6), Some(false));
}

#[test]
fn implicit_policy_honours_caller_flags() {
    let mut g = build(&batches(vec![(
        "node_Article",
        vec![
            json!({"id": 5}),
            json!({"id": 6, "previous_article": 5, "amendment_number": 9}),
        ],
    )]))
    .unwrap();
    g.set_node_effective(&NodeKey::article(5), false);
    let engine = EffectivenessEngine::new(AnnotateOptions {
        article_policy: ArticlePolicy::Implicit,
    });
    engine.run(&mut g).unwrap();
    assert_eq!(succession_flag(&g, 5, 6), Some(false));
    assert_eq!(node_flag(&g, NodeKey::article(6)), Some(true));
}

#[test]
fn implicit_policy_ignores_article_amendments() {
    let mut g = build(&ineffective_source_batches()).unwrap();
    let engine = EffectivenessEngine::new(AnnotateOptions {
        article_policy: ArticlePolicy::Implicit,
    });
    engine.run(&mut g).unwrap();
    assert_eq!(node_flag(&g, NodeKey::article(5)), Some(true));
    assert_eq!(succession_flag(&g, 5, 6), Some(true));
}

#[test]
fn duplicate_links_collapse_before_annotation() {
    let mut g = build(&batches(vec![(
        "node_Article",
        vec![
            json!({"id": 1, "next_article": 2, "amendment_number": 3}),
            json!({"id": 2, "previous_article": 1, "amendment_number": 3}),
        ],
    )]))
    .unwrap();
    annotate(&mut g).unwrap();
    let edges = g.outgoing(&NodeKey::article(1), EdgeKind::NextArticle);
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].1.effective(), Some(true));
}

#[test]
fn rebuild_and_reannotate_gives_same_fingerprint() {
    let input = ineffective_source_batches();
    let mut first = build(&input).unwrap();
    annotate(&mut first).unwrap();
    let mut second = build(&input).unwrap();
    annotate(&mut second).unwrap();
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert_eq!(first.export(), second.export());
}
