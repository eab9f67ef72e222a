//! JSON normalization applied between extraction and schema validation.
//!
//! Models return list fields in several shapes: plain strings, objects
//! with a `description` key, bare scalars, or nothing at all. The schema
//! wants `Vec<String>`, so normalization rewrites those fields in place
//! before the typed parse.

use serde_json::Value;

/// Rewrites `parent[key]` as an array of strings.
///
/// Missing or null fields become an empty array; a non-array value is
/// wrapped as a single-element array rather than dropped.
pub fn normalize_list_field(parent: &mut Value, key: &str) {
    let Some(map) = parent.as_object_mut() else {
        return;
    };
    let normalized: Vec<Value> = match map.get(key) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| Value::String(stringify_item(item)))
            .collect(),
        Some(other) => vec![Value::String(stringify_item(other))],
    };
    map.insert(key.to_string(), Value::Array(normalized));
}

fn stringify_item(item: &Value) -> String {
    match item {
        Value::String(s) => s.clone(),
        Value::Object(map) => match map.get("description").and_then(Value::as_str) {
            Some(description) => description.to_string(),
            None => item.to_string(),
        },
        other => other.to_string(),
    }
}
