use serde_json::Value;

/// Recursively drop object fields whose value is `null`.
///
/// Array elements are left alone so indices keep their meaning.
pub fn prune_null_fields(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for v in map.values_mut() {
                prune_null_fields(v);
            }
            map.retain(|_, v| !v.is_null());
        }
        Value::Array(arr) => arr.iter_mut().for_each(prune_null_fields),
        _ => {}
    }
}

/// Cloned copy of `value` with null object fields removed.
pub fn without_null_fields(value: &Value) -> Value {
    let mut cloned = value.clone();
    prune_null_fields(&mut cloned);
    cloned
}

/// True for `null`, blank strings, and empty arrays/objects.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Non-blank string found by walking `path` through nested objects.
pub fn string_at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    let mut current = value;
    for key in path {
        current = current.get(key)?;
    }
    current.as_str().map(str::trim).filter(|s| !s.is_empty())
}
