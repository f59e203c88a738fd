use serde_json::Value;

use crate::gateway_core::adapter::WireConvention;
use crate::gateway_core::json::{is_empty_value, string_at};

/// OpenAI-style error bodies: `{error: {message}}`, with `message` and a
/// bare string `error` as fallbacks.
pub struct CometApiConvention;

impl WireConvention for CometApiConvention {
    fn accepts(&self, body: &Value) -> bool {
        body.get("error").map_or(true, is_empty_value)
    }

    fn error_message(&self, body: &Value) -> Option<String> {
        string_at(body, &["error", "message"])
            .or_else(|| string_at(body, &["message"]))
            .or_else(|| string_at(body, &["error"]))
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extraction_order_is_nested_then_message_then_string() {
        let all = json!({"error": {"message": "nested"}, "message": "top"});
        assert_eq!(CometApiConvention.error_message(&all).as_deref(), Some("nested"));

        let top = json!({"error": {"code": "x"}, "message": "top"});
        assert_eq!(CometApiConvention.error_message(&top).as_deref(), Some("top"));

        let bare = json!({"error": "quota exceeded"});
        assert_eq!(
            CometApiConvention.error_message(&bare).as_deref(),
            Some("quota exceeded")
        );

        assert_eq!(CometApiConvention.error_message(&json!({"code": 1})), None);
    }

    #[test]
    fn bodies_with_an_error_field_are_not_accepted() {
        assert!(CometApiConvention.accepts(&json!({"id": "video_1", "status": "queued"})));
        assert!(CometApiConvention.accepts(&json!({"data": [], "error": null})));
        assert!(!CometApiConvention.accepts(&json!({"error": {"message": "bad"}})));
        assert!(!CometApiConvention.accepts(&json!({"error": "bad"})));
    }
}
