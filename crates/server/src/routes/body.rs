//! Request body decoding.
//!
//! Bodies are read as raw bytes so a missing `Content-Type` or an empty
//! body is something the handler decides about, not an extractor rejection.

use axum::body::Bytes;
use serde_json::Value;
use service::record::Record;

#[derive(Debug, PartialEq)]
pub enum JsonBody {
    /// No bytes, `null`, or `{}`.
    Empty,
    Object(Record),
    /// Valid JSON that is not an object.
    NotObject,
    Invalid,
}

pub fn decode(bytes: &Bytes) -> JsonBody {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return JsonBody::Empty;
    }
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Null) => JsonBody::Empty,
        Ok(Value::Object(map)) if map.is_empty() => JsonBody::Empty,
        Ok(Value::Object(map)) => JsonBody::Object(map),
        Ok(_) => JsonBody::NotObject,
        Err(_) => JsonBody::Invalid,
    }
}

/// Object body or an empty record, for endpoints that validate fields themselves.
pub fn decode_lenient(bytes: &Bytes) -> Record {
    match decode(bytes) {
        JsonBody::Object(map) => map,
        _ => Record::new(),
    }
}
