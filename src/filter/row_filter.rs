use serde_json::{json, Value};
use std::fmt;

use super::types::FilterOp;
use crate::types::Document;

/// Row-level constraint substituted for a boolean grant
///
/// Rendered into the where-clause dialect for a host's query layer, and
/// evaluated directly against documents when a single record is checked
/// (update/delete of a loaded record).
#[derive(Debug, Clone, PartialEq)]
pub enum RowFilter {
    Equals { field: String, value: Value },
    Or(Vec<RowFilter>),
}

impl RowFilter {
    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        RowFilter::Equals {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn or(filters: impl IntoIterator<Item = RowFilter>) -> Self {
        RowFilter::Or(filters.into_iter().collect())
    }

    /// `{ "field": { "$eq": value } }` / `{ "$or": [ ... ] }`
    pub fn to_where(&self) -> Value {
        match self {
            RowFilter::Equals { field, value } => {
                json!({ field.as_str(): { FilterOp::Eq.key(): value } })
            }
            RowFilter::Or(filters) => {
                let clauses: Vec<Value> = filters.iter().map(RowFilter::to_where).collect();
                json!({ FilterOp::Or.key(): clauses })
            }
        }
    }

    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            RowFilter::Equals { field, value } => doc
                .get(field)
                .map(|actual| same_reference(actual, value))
                .unwrap_or(false),
            // Empty OR matches nothing
            RowFilter::Or(filters) => filters.iter().any(|f| f.matches(doc)),
        }
    }
}

impl fmt::Display for RowFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_where())
    }
}

/// Identifier comparison the way ids travel through payloads: strings and
/// numbers compare by their text, and a populated relationship compares by
/// its `id`.
pub(crate) fn same_reference(actual: &Value, expected: &Value) -> bool {
    match (reference_key(actual), reference_key(expected)) {
        (Some(a), Some(b)) => a == b,
        _ => actual == expected && !actual.is_null(),
    }
}

pub(crate) fn reference_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map.get("id").and_then(reference_key),
        _ => None,
    }
}
