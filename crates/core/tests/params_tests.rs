use crate::core::error::GatewayError;
use crate::core::params::ParamReader;
use serde_json::{json, Map as JsonMap, Value};

fn params(value: Value) -> JsonMap<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

fn message(err: GatewayError) -> String {
    match err {
        GatewayError::InvalidInput { message } => message,
        other => panic!("unexpected error variant: {other:?}"),
    }
}

#[test]
fn blank_and_null_values_count_as_unset() {
    let map = params(json!({"a": null, "b": "  ", "c": "x"}));
    let reader = ParamReader::new(&map);
    assert!(!reader.is_set("a"));
    assert!(!reader.is_set("b"));
    assert!(!reader.is_set("missing"));
    assert!(reader.is_set("c"));
}

#[test]
fn defaults_only_fill_unset_keys() {
    let map = params(json!({"model_name": "kling-v2", "mode": null}));
    let reader = ParamReader::new(&map);
    assert_eq!(reader.str_or("model_name", "kling-v1").unwrap(), "kling-v2");
    assert_eq!(reader.str_or("mode", "std").unwrap(), "std");
    assert_eq!(reader.str_or("duration", "5").unwrap(), "5");
}

#[test]
fn wrong_types_are_input_errors() {
    let map = params(json!({"duration": 5, "width": "720", "cfg_scale": "high"}));
    let reader = ParamReader::new(&map);
    assert_eq!(
        message(reader.optional_str("duration").unwrap_err()),
        "`duration` must be a string"
    );
    assert_eq!(
        message(reader.required_u32("width").unwrap_err()),
        "`width` must be a positive integer"
    );
    assert_eq!(
        message(reader.optional_f64("cfg_scale").unwrap_err()),
        "`cfg_scale` must be a number"
    );
    assert_eq!(
        message(reader.required_str("prompt").unwrap_err()),
        "`prompt` is required"
    );
}

#[test]
fn zero_and_negative_integers_are_rejected() {
    let map = params(json!({"n": 0, "width": -1}));
    let reader = ParamReader::new(&map);
    assert!(reader.optional_u32("n").is_err());
    assert!(reader.optional_u32("width").is_err());
}

#[test]
fn first_str_accepts_string_or_array() {
    let map = params(json!({
        "single": "https://x/a.png",
        "list": ["https://x/b.png", "https://x/c.png"],
        "empty": [],
        "blank_first": [""],
        "numbers": [1]
    }));
    let reader = ParamReader::new(&map);
    assert_eq!(reader.first_str("single").unwrap().as_deref(), Some("https://x/a.png"));
    assert_eq!(reader.first_str("list").unwrap().as_deref(), Some("https://x/b.png"));
    assert_eq!(reader.first_str("empty").unwrap(), None);
    assert_eq!(reader.first_str("blank_first").unwrap(), None);
    assert!(reader.first_str("numbers").is_err());
}

#[test]
fn structured_values_are_returned_only_when_non_empty() {
    let map = params(json!({
        "dynamic_masks": [],
        "padded": [{}, {"mask": "m"}],
        "camera_control": {},
        "camera": {"type": "simple"},
        "refs": ["", "https://x/r.png"]
    }));
    let reader = ParamReader::new(&map);
    assert_eq!(reader.non_empty_array("dynamic_masks").unwrap(), None);
    assert_eq!(
        reader.non_empty_array("padded").unwrap(),
        Some(vec![json!({"mask": "m"})])
    );
    assert_eq!(reader.non_empty_object("camera_control").unwrap(), None);
    assert_eq!(
        reader.non_empty_object("camera").unwrap(),
        Some(json!({"type": "simple"}))
    );
    assert_eq!(
        reader.non_empty_str_array("refs").unwrap(),
        Some(vec!["https://x/r.png".to_string()])
    );
    assert!(reader.non_empty_object("refs").is_err());
}
