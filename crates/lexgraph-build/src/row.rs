//! Row-level field parsing with error context.

use lexgraph_core::{GraphError, NodeKind, Record};
use serde_json::Value;

/// Position of a row, carried into every error raised while parsing it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RowCtx<'a> {
    pub collection: &'a str,
    pub row: usize,
}

impl<'a> RowCtx<'a> {
    pub fn new(collection: &'a str, row: usize) -> Self {
        Self { collection, row }
    }

    pub fn malformed(&self, detail: impl Into<String>) -> GraphError {
        GraphError::malformed(self.collection, self.row, detail)
    }

    /// A required integer field. Integer strings are accepted.
    pub fn int(&self, record: &Record, field: &str) -> Result<i64, GraphError> {
        self.opt_int(record, field)?
            .ok_or_else(|| self.malformed(format!("missing required field {field:?}")))
    }

    /// An optional integer field. Absent, `null` and `""` all mean "not set".
    pub fn opt_int(&self, record: &Record, field: &str) -> Result<Option<i64>, GraphError> {
        match record.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(value) => parse_int(value).map(Some).ok_or_else(|| {
                self.malformed(format!("field {field:?} is not an integer: {value}"))
            }),
        }
    }

    /// A required node-kind field (`from_type`, `to_type`).
    pub fn kind(&self, record: &Record, field: &str) -> Result<NodeKind, GraphError> {
        let raw = record
            .get(field)
            .and_then(Value::as_str)
            .ok_or_else(|| self.malformed(format!("missing required field {field:?}")))?;
        NodeKind::parse(raw)
            .ok_or_else(|| self.malformed(format!("field {field:?} names unknown kind {raw:?}")))
    }
}

/// Parse a JSON integer or an integer string.
pub(crate) fn parse_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn ints_accept_numbers_and_numeric_strings() {
        let ctx = RowCtx::new("node_Article", 0);
        let r = record(json!({"a": 5, "b": " 7 ", "c": 1.5, "d": "x"}));
        assert_eq!(ctx.int(&r, "a").unwrap(), 5);
        assert_eq!(ctx.int(&r, "b").unwrap(), 7);
        assert!(ctx.int(&r, "c").is_err());
        assert!(ctx.int(&r, "d").is_err());
    }

    #[test]
    fn empty_values_are_not_set() {
        let ctx = RowCtx::new("node_Article", 2);
        let r = record(json!({"p": null, "q": ""}));
        assert_eq!(ctx.opt_int(&r, "p").unwrap(), None);
        assert_eq!(ctx.opt_int(&r, "q").unwrap(), None);
        assert_eq!(ctx.opt_int(&r, "missing").unwrap(), None);
        let err = ctx.int(&r, "missing").unwrap_err();
        assert!(err.to_string().contains("node_Article[2]"));
    }

    #[test]
    fn kinds_parse_case_insensitively() {
        let ctx = RowCtx::new("edge_HAS_ARTICLE", 0);
        let r = record(json!({"from_type": "Regulation", "to_type": "chapter"}));
        assert_eq!(ctx.kind(&r, "from_type").unwrap(), NodeKind::Regulation);
        assert!(ctx.kind(&r, "to_type").is_err());
    }
}
