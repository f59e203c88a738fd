use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Call bookkeeping that never reaches the caller but feeds the usage log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallMeta {
    /// Id of the key record that authenticated the call.
    pub api_key_id: Option<String>,
    /// Upstream HTTP status, when a response was received.
    pub status_code: Option<u16>,
    /// Model name sent upstream, when the operation has one.
    pub model: Option<String>,
}

/// Normalized outcome of a single provider call.
///
/// Exactly one of `data`/`error` is set, matching `success`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Wall-clock milliseconds spent on the outbound request.
    pub duration: u64,
    #[serde(skip)]
    pub meta: CallMeta,
}

impl CallResult {
    pub fn succeeded(data: Value, duration: u64, meta: CallMeta) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            duration,
            meta,
        }
    }

    pub fn failed(error: impl Into<String>, duration: u64, meta: CallMeta) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            duration,
            meta,
        }
    }

    /// Status code recorded in the usage log: the upstream error status when
    /// there is one, 200 for success and 500 otherwise.
    pub fn usage_status_code(&self) -> u16 {
        match (self.success, self.meta.status_code) {
            (true, _) => 200,
            (false, Some(status)) if !(200..300).contains(&status) => status,
            (false, _) => 500,
        }
    }
}

/// Uniform body returned by every platform endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
}

impl ResultEnvelope {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            duration: None,
        }
    }

    pub fn with_duration(mut self, duration: u64) -> Self {
        self.duration = Some(duration);
        self
    }
}

impl From<CallResult> for ResultEnvelope {
    fn from(result: CallResult) -> Self {
        Self {
            success: result.success,
            data: result.data,
            error: result.error,
            duration: Some(result.duration),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn failed_result_serializes_without_data_or_meta() {
        let meta = CallMeta {
            api_key_id: Some("key-1".into()),
            status_code: Some(502),
            model: None,
        };
        let result = CallResult::failed("Kling video generation failed", 12, meta);
        let value = serde_json::to_value(&result).expect("serialize");
        assert_eq!(
            value,
            json!({"success": false, "error": "Kling video generation failed", "duration": 12})
        );
        assert_eq!(result.usage_status_code(), 502);
    }

    #[test]
    fn provider_level_failure_on_2xx_is_logged_as_500() {
        let meta = CallMeta {
            status_code: Some(200),
            ..Default::default()
        };
        let result = CallResult::failed("bad code", 3, meta);
        assert_eq!(result.usage_status_code(), 500);
    }

    #[test]
    fn envelope_keeps_duration_from_call_result() {
        let result = CallResult::succeeded(json!({"task_id": "t1"}), 40, CallMeta::default());
        let envelope = ResultEnvelope::from(result);
        assert!(envelope.success);
        assert_eq!(envelope.duration, Some(40));
        assert_eq!(envelope.data, Some(json!({"task_id": "t1"})));
        assert!(envelope.error.is_none());
    }
}
