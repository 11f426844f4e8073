//! Structural differ: compares two arbitrary JSON trees and emits a flat,
//! ordered list of field-level changes.
//!
//! Dispatch is by value kind:
//! - absent on both sides → nothing
//! - absent on one side → one record for the whole subtree, no recursion
//! - strings → exact comparison (whitespace and case count)
//! - arrays of primitives → compared as one opaque value
//! - arrays with structured elements → elementwise by index
//! - objects → union of keys, `before` order first
//! - anything else → strict equality, with integer and float forms of a
//!   number treated as equal
//!
//! Output order is traversal order, so the same inputs always give the same list.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::ResumeDocument;

/// Rendered in place of an absent or null value.
pub const EMPTY_PLACEHOLDER: &str = "(empty)";

/// One step of a change path.
///
/// Array elements are bound to the key of the array that holds them, so
/// `experience.items[1]` is `[Key("experience"), Index { key: "items", index: 1 }]`
/// rather than a bare `1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index { key: String, index: usize },
}

impl PathSegment {
    pub fn key(key: impl Into<String>) -> Self {
        PathSegment::Key(key.into())
    }

    pub fn index(key: impl Into<String>, index: usize) -> Self {
        PathSegment::Index {
            key: key.into(),
            index,
        }
    }
}

/// A single leaf-level or whole-subtree difference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeRecord {
    pub path: Vec<PathSegment>,
    pub before: String,
    pub after: String,
}

/// Diffs two optional values. `None` means the value is absent altogether,
/// which is distinct from JSON `null`.
pub fn diff(before: Option<&Value>, after: Option<&Value>) -> Vec<ChangeRecord> {
    let mut changes = Vec::new();
    let mut path = Vec::new();
    walk(before, after, &mut path, &mut changes);
    changes
}

/// Diffs two resume documents.
pub fn diff_documents(before: &ResumeDocument, after: &ResumeDocument) -> Vec<ChangeRecord> {
    diff(Some(before.as_value()), Some(after.as_value()))
}

fn walk(
    before: Option<&Value>,
    after: Option<&Value>,
    path: &mut Vec<PathSegment>,
    out: &mut Vec<ChangeRecord>,
) {
    let (b, a) = match (before, after) {
        (None, None) => return,
        (Some(b), Some(a)) => (b, a),
        _ => {
            record(path, before, after, out);
            return;
        }
    };

    match (b, a) {
        (Value::String(x), Value::String(y)) => {
            if x != y {
                record(path, before, after, out);
            }
        }
        (Value::Array(xs), Value::Array(ys)) => {
            if all_primitive(xs) && all_primitive(ys) {
                let same = xs.len() == ys.len()
                    && xs.iter().zip(ys).all(|(x, y)| primitive_eq(x, y));
                if !same {
                    record(path, before, after, out);
                }
            } else {
                walk_elements(xs, ys, path, out);
            }
        }
        (Value::Object(xm), Value::Object(ym)) => walk_members(xm, ym, path, out),
        _ => {
            if !primitive_eq(b, a) {
                record(path, before, after, out);
            }
        }
    }
}

/// `3` and `3.0` are the same number; everything else is plain equality.
fn primitive_eq(x: &Value, y: &Value) -> bool {
    match (x, y) {
        (Value::Number(m), Value::Number(n)) => match (m.as_i64(), n.as_i64()) {
            (Some(i), Some(j)) => i == j,
            _ => match (m.as_u64(), n.as_u64()) {
                (Some(i), Some(j)) => i == j,
                _ => m.as_f64() == n.as_f64(),
            },
        },
        _ => x == y,
    }
}

fn walk_members(
    before: &Map<String, Value>,
    after: &Map<String, Value>,
    path: &mut Vec<PathSegment>,
    out: &mut Vec<ChangeRecord>,
) {
    for (key, value) in before {
        path.push(PathSegment::Key(key.clone()));
        walk(Some(value), after.get(key), path, out);
        path.pop();
    }
    for (key, value) in after {
        if before.contains_key(key) {
            continue;
        }
        path.push(PathSegment::Key(key.clone()));
        walk(None, Some(value), path, out);
        path.pop();
    }
}

fn walk_elements(
    before: &[Value],
    after: &[Value],
    path: &mut Vec<PathSegment>,
    out: &mut Vec<ChangeRecord>,
) {
    // The array's own key moves into each element's Index segment.
    let parent = match path.last() {
        Some(PathSegment::Key(_)) => path.pop(),
        _ => None,
    };
    let parent_key = match &parent {
        Some(PathSegment::Key(k)) => k.clone(),
        _ => String::new(),
    };

    for index in 0..before.len().max(after.len()) {
        path.push(PathSegment::index(parent_key.clone(), index));
        walk(before.get(index), after.get(index), path, out);
        path.pop();
    }

    if let Some(segment) = parent {
        path.push(segment);
    }
}

fn all_primitive(values: &[Value]) -> bool {
    values
        .iter()
        .all(|v| !matches!(v, Value::Array(_) | Value::Object(_)))
}

fn record(
    path: &[PathSegment],
    before: Option<&Value>,
    after: Option<&Value>,
    out: &mut Vec<ChangeRecord>,
) {
    out.push(ChangeRecord {
        path: path.to_vec(),
        before: display_value(before),
        after: display_value(after),
    });
}

/// Renders a value for the change list.
///
/// Absent, null and empty arrays render as [`EMPTY_PLACEHOLDER`]; arrays are
/// comma-joined; objects fall back to compact JSON.
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => EMPTY_PLACEHOLDER.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Array(items)) if items.is_empty() => EMPTY_PLACEHOLDER.to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| display_value(Some(v)))
            .collect::<Vec<_>>()
            .join(", "),
        Some(obj @ Value::Object(_)) => serde_json::to_string(obj).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keys(path: &[&str]) -> Vec<PathSegment> {
        path.iter().map(|k| PathSegment::key(*k)).collect()
    }

    #[test]
    fn test_identical_documents_produce_no_changes() {
        let doc = json!({
            "basics": {"name": "A", "email": "a@example.com", "url": {"label": "", "href": ""}},
            "sections": {
                "experience": {"id": "e", "name": "Experience", "visible": true, "items": [
                    {"id": "1", "visible": true, "position": "Engineer", "keywords": ["rust", "go"]}
                ]}
            }
        });
        assert!(diff(Some(&doc), Some(&doc)).is_empty());
    }

    #[test]
    fn test_removed_key_yields_single_record() {
        let changes = diff(Some(&json!({"a": 1})), Some(&json!({})));
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].path, keys(&["a"]));
        assert_eq!(changes[0].before, "1");
        assert_eq!(changes[0].after, EMPTY_PLACEHOLDER);
    }

    #[test]
    fn test_added_subtree_is_not_expanded() {
        let after = json!({"a": {"b": {"c": 1, "d": [1, 2]}}});
        let changes = diff(Some(&json!({})), Some(&after));
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].path, keys(&["a"]));
        assert_eq!(changes[0].before, EMPTY_PLACEHOLDER);
    }

    #[test]
    fn test_primitive_array_is_one_change() {
        let changes = diff(
            Some(&json!({"tags": ["x", "y"]})),
            Some(&json!({"tags": ["x", "y", "z"]})),
        );
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].path, keys(&["tags"]));
        assert_eq!(changes[0].before, "x, y");
        assert_eq!(changes[0].after, "x, y, z");
    }

    #[test]
    fn test_reordered_primitive_array_counts_as_change() {
        let changes = diff(Some(&json!(["a", "b"])), Some(&json!(["b", "a"])));
        assert_eq!(changes.len(), 1);
        assert!(changes[0].path.is_empty());
    }

    #[test]
    fn test_structured_array_diffs_by_index() {
        let before = json!({"experience": {"items": [
            {"id": "1", "position": "Intern"},
            {"id": "2", "position": "Engineer"}
        ]}});
        let after = json!({"experience": {"items": [
            {"id": "1", "position": "Intern"},
            {"id": "2", "position": "Senior Engineer"}
        ]}});
        let changes = diff(Some(&before), Some(&after));
        assert_eq!(changes.len(), 1);
        assert_eq!(
            changes[0].path,
            vec![
                PathSegment::key("experience"),
                PathSegment::index("items", 1),
                PathSegment::key("position"),
            ]
        );
        assert_eq!(changes[0].before, "Engineer");
        assert_eq!(changes[0].after, "Senior Engineer");
    }

    #[test]
    fn test_appended_structured_element_is_one_record() {
        let before = json!({"items": [{"id": "1"}]});
        let after = json!({"items": [{"id": "1"}, {"id": "2", "name": "New"}]});
        let changes = diff(Some(&before), Some(&after));
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].path, vec![PathSegment::index("items", 1)]);
        assert_eq!(changes[0].before, EMPTY_PLACEHOLDER);
        assert!(changes[0].after.contains("\"New\""));
    }

    #[test]
    fn test_mixed_array_uses_elementwise_rule() {
        // One side holds an object, so the primitive shortcut does not apply.
        let changes = diff(Some(&json!({"k": ["a"]})), Some(&json!({"k": [{"x": 1}]})));
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].path, vec![PathSegment::index("k", 0)]);
        assert_eq!(changes[0].before, "a");
    }

    #[test]
    fn test_string_comparison_is_exact() {
        assert_eq!(diff(Some(&json!("Rust")), Some(&json!("rust"))).len(), 1);
        assert_eq!(diff(Some(&json!("a")), Some(&json!("a "))).len(), 1);
        assert!(diff(Some(&json!("same")), Some(&json!("same"))).is_empty());
    }

    #[test]
    fn test_scalar_and_kind_mismatches() {
        let changes = diff(
            Some(&json!({"visible": true, "score": 3, "note": null, "level": "x"})),
            Some(&json!({"visible": false, "score": 3, "note": "hi", "level": ["x"]})),
        );
        let paths: Vec<_> = changes.iter().map(|c| c.path.clone()).collect();
        assert_eq!(
            paths,
            vec![keys(&["visible"]), keys(&["note"]), keys(&["level"])]
        );
        assert_eq!(changes[0].before, "true");
        assert_eq!(changes[0].after, "false");
        assert_eq!(changes[1].before, EMPTY_PLACEHOLDER);
        assert_eq!(changes[2].after, "x");
    }

    #[test]
    fn test_integer_and_float_forms_of_a_number_are_equal() {
        let before: Value = serde_json::from_str(r#"{"score": 3, "ranks": [1, 2]}"#).unwrap();
        let after: Value = serde_json::from_str(r#"{"score": 3.0, "ranks": [1.0, 2]}"#).unwrap();
        assert!(diff(Some(&before), Some(&after)).is_empty());

        let changed: Value = serde_json::from_str(r#"{"score": 3.5, "ranks": [1, 2]}"#).unwrap();
        let changes = diff(Some(&before), Some(&changed));
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].path, keys(&["score"]));
        assert_eq!(changes[0].after, "3.5");
    }

    #[test]
    fn test_null_on_both_sides_is_unchanged() {
        assert!(diff(Some(&json!({"a": null})), Some(&json!({"a": null}))).is_empty());
    }

    #[test]
    fn test_key_order_is_before_then_new_after_keys() {
        let changes = diff(
            Some(&json!({"z": "1", "a": "1"})),
            Some(&json!({"n": "2", "a": "2", "z": "2"})),
        );
        let paths: Vec<_> = changes.iter().map(|c| c.path.clone()).collect();
        assert_eq!(paths, vec![keys(&["z"]), keys(&["a"]), keys(&["n"])]);
    }

    #[test]
    fn test_nested_arrays_keep_distinct_paths() {
        let changes = diff(Some(&json!({"m": [[{"a": 1}]]})), Some(&json!({"m": [[{"a": 2}]]})));
        assert_eq!(changes.len(), 1);
        assert_eq!(
            changes[0].path,
            vec![
                PathSegment::index("m", 0),
                PathSegment::index("", 0),
                PathSegment::key("a"),
            ]
        );
    }

    #[test]
    fn test_no_duplicate_paths() {
        let before = json!({"sections": {"a": {"items": [{"x": "1", "y": "1"}, {"x": "1"}]}}});
        let after = json!({"sections": {"a": {"items": [{"x": "2", "y": "2"}], "extra": "e"}}});
        let changes = diff(Some(&before), Some(&after));
        for (i, c) in changes.iter().enumerate() {
            assert!(changes[i + 1..].iter().all(|o| o.path != c.path));
        }
        assert_eq!(changes.len(), 4);
    }

    #[test]
    fn test_display_value_rendering() {
        assert_eq!(display_value(None), EMPTY_PLACEHOLDER);
        assert_eq!(display_value(Some(&json!(null))), EMPTY_PLACEHOLDER);
        assert_eq!(display_value(Some(&json!([]))), EMPTY_PLACEHOLDER);
        assert_eq!(display_value(Some(&json!(2.5))), "2.5");
        assert_eq!(display_value(Some(&json!(["a", 1, true]))), "a, 1, true");
        assert_eq!(display_value(Some(&json!({"k": "v"}))), r#"{"k":"v"}"#);
    }

    #[test]
    fn test_path_segment_serializes_untagged() {
        let path = vec![PathSegment::key("sections"), PathSegment::index("items", 2)];
        assert_eq!(
            serde_json::to_value(&path).unwrap(),
            json!(["sections", {"key": "items", "index": 2}])
        );
    }
}
