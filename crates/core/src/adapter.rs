use async_trait::async_trait;
use serde_json::Value;
use std::future::Future;
use std::time::Instant;

use crate::core::error::{GatewayError, TransportError};
use crate::core::transport::TransportResponse;
use crate::gateway_types::{CallMeta, CallResult, Platform};

/// Static description of one provider operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub platform: Platform,
    pub name: &'static str,
    pub method: &'static str,
    /// Provider endpoint path (templated for lookups), recorded in usage logs.
    pub endpoint: &'static str,
    /// Error message used when the provider gives no structured reason.
    pub failure_label: &'static str,
}

/// Provider-specific reading of a parsed response body.
pub trait WireConvention: Send + Sync {
    /// Whether a 2xx JSON body actually reports success.
    fn accepts(&self, _body: &Value) -> bool {
        true
    }

    /// Structured error message carried by the body, if any.
    fn error_message(&self, body: &Value) -> Option<String>;
}

/// One provider/operation pair: typed params in, normalized result out.
///
/// Provider and transport failures come back as `Ok` with `success: false`.
/// `Err` is reserved for failures that happen before any request is sent
/// (missing credential, unbuildable request).
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    type Params: Send + Sync;

    fn operation(&self) -> &'static Operation;

    async fn call(&self, params: &Self::Params) -> Result<CallResult, GatewayError>;
}

/// Run one outbound request, timing it from dispatch to full body read.
pub async fn timed<F>(send: F) -> (Result<TransportResponse, TransportError>, u64)
where
    F: Future<Output = Result<TransportResponse, TransportError>>,
{
    let started = Instant::now();
    let outcome = send.await;
    let elapsed = started.elapsed().as_millis();
    (outcome, u64::try_from(elapsed).unwrap_or(u64::MAX))
}

/// Normalize a transport outcome into a `CallResult`.
///
/// Error message order: the provider's structured field, then (for failures
/// without an HTTP response) the transport error text, then the operation's
/// fixed failure label.
pub fn classify(
    op: &Operation,
    convention: &dyn WireConvention,
    outcome: Result<TransportResponse, TransportError>,
    duration: u64,
    mut meta: CallMeta,
) -> CallResult {
    match outcome {
        Ok(response) => {
            meta.status_code = Some(response.status);
            if convention.accepts(&response.body) {
                CallResult::succeeded(response.body, duration, meta)
            } else {
                let message = convention
                    .error_message(&response.body)
                    .unwrap_or_else(|| op.failure_label.to_string());
                CallResult::failed(message, duration, meta)
            }
        }
        Err(TransportError::HttpStatus { status, body, .. }) => {
            meta.status_code = Some(status);
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|parsed| convention.error_message(&parsed))
                .unwrap_or_else(|| op.failure_label.to_string());
            CallResult::failed(message, duration, meta)
        }
        Err(other) => {
            let text = other.to_string();
            let message = if text.trim().is_empty() {
                op.failure_label.to_string()
            } else {
                text
            };
            CallResult::failed(message, duration, meta)
        }
    }
}
