//! Schema-less records.
//!
//! Every resource stores open JSON objects; the only fields the engine looks
//! at with a type are the identifier field and, for cancellation, `status`.

use serde_json::{Map, Value};

/// One record: field name -> dynamically typed value, in insertion order.
pub type Record = Map<String, Value>;

/// Identifier carried by `record` under `field`, if it is non-empty.
/// Non-string identifiers are keyed by their JSON text.
pub fn identifier(record: &Record, field: &str) -> Option<String> {
    match record.get(field)? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Text form of a scalar value; `None` for null, arrays and objects.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Numeric view of a value, accepting numeric strings.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Non-empty text of `record[field]`.
pub fn text_field(record: &Record, field: &str) -> Option<String> {
    record.get(field).and_then(scalar_text).filter(|s| !s.is_empty())
}

/// Equality used by search. A string filter also matches a scalar record
/// value whose JSON text is identical, since query strings carry no types.
pub fn field_matches(actual: &Value, expected: &Value) -> bool {
    if actual == expected {
        return true;
    }
    match expected {
        Value::String(s) if !actual.is_string() => scalar_text(actual).as_deref() == Some(s.as_str()),
        _ => false,
    }
}

/// A filter field the record does not have never excludes it.
pub fn matches_filters(record: &Record, filters: &Map<String, Value>) -> bool {
    filters
        .iter()
        .all(|(field, expected)| record.get(field).map_or(true, |actual| field_matches(actual, expected)))
}

/// Shallow merge: fields in `partial` overwrite, everything else survives.
pub fn merge(target: &mut Record, partial: Record) {
    for (field, value) in partial {
        target.insert(field, value);
    }
}
