//! Query matching: arbitrary predicates and nested partial patterns.
//!
//! A [`Matcher`] is either a predicate closure evaluated per record, or a
//! declarative pattern: a (possibly deeply nested) JSON mapping where every
//! leaf present must match the record's value at that path. Fields absent
//! from the pattern are unconstrained, so `{"author": {"name": "Morty"}}`
//! matches every record whose nested `author.name` equals `"Morty"`,
//! whatever else the record or its `author` carries.

use serde_json::Value;

use crate::record::Record;

/// A query matcher, polymorphic over the two forms `find`/`find_one`
/// accept. `serde_json::Value` converts into the pattern form, so call
/// sites can pass `json!({...})` directly.
pub enum Matcher {
    /// An arbitrary predicate over records.
    Predicate(Box<dyn Fn(&Record) -> bool + Send + Sync>),
    /// A nested partial pattern compared structurally against the
    /// record's data (id included).
    Pattern(Value),
}

impl Matcher {
    /// Build a predicate matcher from a closure.
    pub fn predicate(predicate: impl Fn(&Record) -> bool + Send + Sync + 'static) -> Self {
        Matcher::Predicate(Box::new(predicate))
    }

    /// Build a partial-pattern matcher from a JSON mapping.
    pub fn pattern(pattern: Value) -> Self {
        Matcher::Pattern(pattern)
    }

    pub(crate) fn matches(&self, record: &Record) -> bool {
        match self {
            Matcher::Predicate(predicate) => predicate(record),
            Matcher::Pattern(pattern) => value_matches(pattern, &record.to_value()),
        }
    }
}

impl From<Value> for Matcher {
    fn from(pattern: Value) -> Self {
        Matcher::Pattern(pattern)
    }
}

/// True when every leaf present in `pattern` exists in `actual` with a
/// structurally equal value. Mappings recurse and short-circuit on the
/// first mismatch; scalars and sequences compare by equality.
fn value_matches(pattern: &Value, actual: &Value) -> bool {
    match (pattern, actual) {
        (Value::Object(expected), Value::Object(actual)) => expected
            .iter()
            .all(|(key, nested)| actual.get(key).map_or(false, |value| value_matches(nested, value))),
        (Value::Object(_), _) => false,
        _ => pattern == actual,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_scalar_leaf_equality() {
        let actual = json!({ "name": "Rick", "age": 60 });
        assert!(value_matches(&json!({ "name": "Rick" }), &actual));
        assert!(!value_matches(&json!({ "name": "Morty" }), &actual));
        assert!(!value_matches(&json!({ "age": "60" }), &actual));
    }

    #[test]
    fn test_nested_partial_match() {
        let actual = json!({
            "title": "He-yo",
            "author": { "name": "Morty", "karma": 3 },
        });
        assert!(value_matches(&json!({ "author": { "name": "Morty" } }), &actual));
        assert!(!value_matches(&json!({ "author": { "name": "Rick" } }), &actual));
        assert!(!value_matches(&json!({ "author": { "email": "m@x" } }), &actual));
    }

    #[test]
    fn test_missing_path_excludes_record() {
        let actual = json!({ "name": "Rick" });
        assert!(!value_matches(&json!({ "address": { "city": "Springdale" } }), &actual));
    }

    #[test]
    fn test_pattern_mapping_against_scalar_fails() {
        let actual = json!({ "author": "Morty" });
        assert!(!value_matches(&json!({ "author": { "name": "Morty" } }), &actual));
    }

    #[test]
    fn test_empty_pattern_matches_everything() {
        assert!(value_matches(&json!({}), &json!({ "anything": 1 })));
    }

    #[test]
    fn test_sequences_compare_by_equality() {
        let actual = json!({ "tags": ["a", "b"] });
        assert!(value_matches(&json!({ "tags": ["a", "b"] }), &actual));
        assert!(!value_matches(&json!({ "tags": ["a"] }), &actual));
    }
}
