//! Flattening of raw API records into tabular rows
//!
//! Raw records are deeply nested and any field may be missing. Flattening
//! never fails: an absent key at any level becomes `null` (or an empty list
//! or no column at all, depending on the field) and the row is still produced.
//!
//! - [`movies`] - one row per movie, main or extended table layout
//! - [`persons`] - one row per (person, movie) pair

use serde_json::Value;

pub mod movies;
pub mod persons;

/// Value of `record[key]`, or `null` when the record is not an object or lacks the key
pub(crate) fn field(record: &Value, key: &str) -> Value {
    record.get(key).cloned().unwrap_or(Value::Null)
}

/// Value of `record[outer][inner]`, `null` if any level is missing
pub(crate) fn nested(record: &Value, outer: &str, inner: &str) -> Value {
    record
        .get(outer)
        .and_then(|o| o.get(inner))
        .cloned()
        .unwrap_or(Value::Null)
}

/// Elements of the array at `record[key]`; empty when absent or not an array
pub(crate) fn items<'a>(record: &'a Value, key: &str) -> &'a [Value] {
    record
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// `item[name_key]` for every element of `record[key]` that carries it
pub(crate) fn collect_field(record: &Value, key: &str, name_key: &str) -> Value {
    Value::Array(
        items(record, key)
            .iter()
            .filter_map(|item| item.get(name_key).cloned())
            .collect(),
    )
}

/// Text form of a scalar: strings verbatim, `null` as empty, the rest as JSON
pub(crate) fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
