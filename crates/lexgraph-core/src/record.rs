//! # Records and Payloads
//!
//! Input arrives as named batches of flat, JSON-object-like rows
//! ([`RecordBatches`]). Once the builder has pulled out the identity and
//! the fields the algorithms need, whatever is left of a row becomes the
//! node's or edge's [`Payload`]: an ordered key/value bag the core never
//! interprets.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One flat input row.
pub type Record = serde_json::Map<String, Value>;

/// Batches keyed by collection name (`node_Article`, `edge_HAS_ARTICLE`, ...).
///
/// A `BTreeMap` so that iteration, and therefore graph construction, is
/// deterministic for a given input.
pub type RecordBatches = BTreeMap<String, Vec<Record>>;

/// Opaque, pass-through attributes attached to a node or edge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(BTreeMap<String, Value>);

impl Payload {
    /// An empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Look up a string field.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// Set a field, returning the previous value.
    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(field.into(), value)
    }

    /// Iterate fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the payload has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Record> for Payload {
    fn from(record: Record) -> Self {
        Self(record.into_iter().collect())
    }
}

impl FromIterator<(String, Value)> for Payload {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
