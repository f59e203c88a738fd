use serde_json::Value;

use crate::gateway_core::adapter::WireConvention;
use crate::gateway_core::json::string_at;

/// Kling wraps every response in `{code, message, request_id, data}`;
/// only `code == 0` means success.
pub struct KlingConvention;

impl WireConvention for KlingConvention {
    fn accepts(&self, body: &Value) -> bool {
        body.get("code").and_then(Value::as_i64) == Some(0)
    }

    fn error_message(&self, body: &Value) -> Option<String> {
        string_at(body, &["message"]).map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn only_code_zero_is_success() {
        assert!(KlingConvention.accepts(&json!({"code": 0, "data": {}})));
        assert!(!KlingConvention.accepts(&json!({"code": 1102, "message": "balance"})));
        assert!(!KlingConvention.accepts(&json!({"data": {}})));
        assert!(!KlingConvention.accepts(&json!({"code": "0"})));
    }

    #[test]
    fn message_is_the_error_field() {
        assert_eq!(
            KlingConvention.error_message(&json!({"code": 1102, "message": "account balance not enough"})),
            Some("account balance not enough".into())
        );
        assert_eq!(KlingConvention.error_message(&json!({"code": 1102, "message": ""})), None);
    }
}
