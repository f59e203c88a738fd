use serde_json::{Map as JsonMap, Value};
use thiserror::Error;

/// Inbound `{action, ...params}` body, split into the action and the
/// remaining provider parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub action: String,
    pub params: JsonMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestShapeError {
    #[error("request body must be a JSON object")]
    NotAnObject,
    #[error("Missing action parameter")]
    MissingAction,
}

impl GenerationRequest {
    pub fn from_value(value: Value) -> Result<Self, RequestShapeError> {
        let Value::Object(mut params) = value else {
            return Err(RequestShapeError::NotAnObject);
        };
        let action = match params.remove("action") {
            Some(Value::String(action)) if !action.trim().is_empty() => action.trim().to_string(),
            _ => return Err(RequestShapeError::MissingAction),
        };
        Ok(Self { action, params })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn splits_action_from_params() {
        let req = GenerationRequest::from_value(json!({"action": "video", "prompt": "a cat"}))
            .expect("valid request");
        assert_eq!(req.action, "video");
        assert_eq!(req.params.get("prompt"), Some(&json!("a cat")));
        assert!(!req.params.contains_key("action"));
    }

    #[test]
    fn rejects_missing_empty_or_non_string_action() {
        for body in [
            json!({"prompt": "x"}),
            json!({"action": ""}),
            json!({"action": "   "}),
            json!({"action": 3}),
            json!({"action": null}),
        ] {
            assert_eq!(
                GenerationRequest::from_value(body),
                Err(RequestShapeError::MissingAction)
            );
        }
        assert_eq!(
            GenerationRequest::from_value(json!(["video"])),
            Err(RequestShapeError::NotAnObject)
        );
    }
}
