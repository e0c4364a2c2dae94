//! Row data and equality predicates passed to table gateways

use serde_json::Value;

/// Column-to-value mapping for one row, in insertion order
pub type RowData = serde_json::Map<String, Value>;

/// Conjunction of `column = value` conditions
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Predicate {
    conditions: Vec<(String, Value)>,
}

impl Predicate {
    /// Predicate with a single `column = value` condition
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            conditions: vec![(column.into(), value.into())],
        }
    }

    /// Add another `column = value` condition
    pub fn and(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((column.into(), value.into()));
        self
    }

    pub fn conditions(&self) -> &[(String, Value)] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Check whether `row` satisfies every condition
    pub fn matches(&self, row: &RowData) -> bool {
        self.conditions.iter().all(|(column, expected)| {
            row.get(column)
                .is_some_and(|actual| values_equal(actual, expected))
        })
    }
}

/// Compare two cell values the way the relational engine compares them:
/// integers, booleans and numeric strings are interchangeable.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    if a == b {
        return true;
    }
    match (as_integer(a), as_integer(b)) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

/// Interpret a cell value as an integer where that is unambiguous
pub fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => s.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> RowData {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn flag_predicates_match_loosely() {
        let archived = row(json!({"id": 1, "is_archived": 1}));
        let active = row(json!({"id": 2, "is_archived": false}));

        assert!(Predicate::eq("is_archived", 1).matches(&archived));
        assert!(Predicate::eq("is_archived", true).matches(&archived));
        assert!(Predicate::eq("is_archived", 0).matches(&active));
        assert!(!Predicate::eq("is_archived", 0).matches(&archived));
    }

    #[test]
    fn every_condition_must_hold() {
        let data = row(json!({"id": "420", "name": "template name"}));

        assert!(Predicate::eq("id", 420).and("name", "template name").matches(&data));
        assert!(!Predicate::eq("id", 420).and("name", "other").matches(&data));
        assert!(!Predicate::eq("missing", Value::Null).matches(&data));
    }

    #[test]
    fn empty_predicate_matches_everything() {
        assert!(Predicate::default().matches(&RowData::new()));
    }
}
