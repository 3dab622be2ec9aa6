use serde_json::{Map, Value};

/// Shallow-merge two optional JSON objects; keys in `overrides` win.
///
/// Non-object values in `overrides` replace `base` entirely. Returns `None` only
/// when both sides are `None`.
pub fn merge_objects(base: Option<Value>, overrides: Option<Value>) -> Option<Value> {
    match (base, overrides) {
        (None, None) => None,
        (Some(base), None) => Some(base),
        (None, Some(overrides)) => Some(overrides),
        (Some(Value::Object(mut base)), Some(Value::Object(overrides))) => {
            base.extend(overrides);
            Some(Value::Object(base))
        }
        (Some(_), Some(overrides)) => Some(overrides),
    }
}

/// Insert `key` at the front of an object payload, wrapping non-objects.
pub fn with_leading_key(key: &str, value: Value, payload: Value) -> Value {
    let mut merged = Map::new();
    merged.insert(key.to_string(), value);
    match payload {
        Value::Object(fields) => merged.extend(fields),
        Value::Null => {}
        other => {
            merged.insert("data".to_string(), other);
        }
    }
    Value::Object(merged)
}
