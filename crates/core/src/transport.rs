use crate::core::error::TransportError;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, SystemTime};

#[derive(Clone, Debug)]
pub struct TransportConfig {
    /// Overall request timeout, covering connect, send and full body read
    pub request_timeout: Option<Duration>,
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// Whether to strip object fields with null values from JSON bodies before sending
    pub strip_null_fields: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            request_timeout: Some(Duration::from_secs(120)),
            connect_timeout: Duration::from_secs(10),
            strip_null_fields: true,
        }
    }
}

/// Successful (2xx) upstream response whose body parsed as JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Value,
    pub headers: Vec<(String, String)>,
}

/// Body payload captured for transport observers.
#[derive(Debug, Clone)]
pub enum TransportBody {
    Json(Value),
    Text(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartForm {
    pub fields: Vec<MultipartField>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn push_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push(MultipartField {
            name: name.into(),
            value: MultipartValue::Text(value.into()),
        });
    }

    pub fn push_bytes(
        &mut self,
        name: impl Into<String>,
        data: Vec<u8>,
        filename: Option<String>,
        content_type: Option<String>,
    ) {
        self.fields.push(MultipartField {
            name: name.into(),
            value: MultipartValue::Bytes {
                data,
                filename,
                content_type,
            },
        });
    }

    /// First text value for `name`, if any.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.iter().find_map(|f| match &f.value {
            MultipartValue::Text(text) if f.name == name => Some(text.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultipartField {
    pub name: String,
    pub value: MultipartValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MultipartValue {
    Text(String),
    Bytes {
        data: Vec<u8>,
        filename: Option<String>,
        content_type: Option<String>,
    },
}

/// Structured event emitted by transport implementations.
#[derive(Debug, Clone)]
pub struct TransportEvent {
    pub started_at: SystemTime,
    pub latency: Option<Duration>,
    pub method: String,
    pub url: String,
    pub status: Option<u16>,
    pub request_body: Option<TransportBody>,
    pub response_size: Option<usize>,
    pub error: Option<String>,
}

/// Observer hook for transport events.
pub trait TransportObserver: Send + Sync {
    fn on_event(&self, event: TransportEvent);
}

static TRANSPORT_OBSERVER: OnceLock<Arc<dyn TransportObserver>> = OnceLock::new();

/// Register a transport observer (one-time).
pub fn set_transport_observer(observer: Arc<dyn TransportObserver>) -> bool {
    TRANSPORT_OBSERVER.set(observer).is_ok()
}

/// Emit a transport event if an observer is registered.
pub fn emit_transport_event(event: TransportEvent) {
    if let Some(observer) = TRANSPORT_OBSERVER.get() {
        observer.on_event(event);
    }
}

/// Observer that writes every outbound request to the `tracing` log.
pub struct TracingTransportObserver;

impl TransportObserver for TracingTransportObserver {
    fn on_event(&self, event: TransportEvent) {
        let latency_ms = event.latency.map(|d| d.as_millis() as u64);
        match &event.error {
            Some(error) => tracing::debug!(
                target: "genmedia::transport",
                method = %event.method,
                url = %event.url,
                status = ?event.status,
                latency_ms = ?latency_ms,
                %error,
                "outbound request failed"
            ),
            None => tracing::debug!(
                target: "genmedia::transport",
                method = %event.method,
                url = %event.url,
                status = ?event.status,
                latency_ms = ?latency_ms,
                response_size = ?event.response_size,
                "outbound request completed"
            ),
        }
    }
}

/// Outbound HTTP seam used by every provider adapter.
///
/// Implementations return `TransportError::HttpStatus` for non-2xx responses
/// (body preserved) and `TransportError::BodyRead` when a 2xx body is not JSON.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Perform a JSON POST request and return the parsed JSON response.
    async fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Value,
        cfg: &TransportConfig,
    ) -> Result<TransportResponse, TransportError>;

    /// Perform a multipart/form-data POST request and return the parsed JSON response.
    async fn post_multipart(
        &self,
        _url: &str,
        _headers: &[(String, String)],
        _form: &MultipartForm,
        _cfg: &TransportConfig,
    ) -> Result<TransportResponse, TransportError> {
        Err(TransportError::Other(
            "multipart form-data is not supported by this transport".into(),
        ))
    }

    /// Perform a GET request and return the parsed JSON response.
    async fn get_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        cfg: &TransportConfig,
    ) -> Result<TransportResponse, TransportError>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Value,
        cfg: &TransportConfig,
    ) -> Result<TransportResponse, TransportError> {
        (**self).post_json(url, headers, body, cfg).await
    }

    async fn post_multipart(
        &self,
        url: &str,
        headers: &[(String, String)],
        form: &MultipartForm,
        cfg: &TransportConfig,
    ) -> Result<TransportResponse, TransportError> {
        (**self).post_multipart(url, headers, form, cfg).await
    }

    async fn get_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        cfg: &TransportConfig,
    ) -> Result<TransportResponse, TransportError> {
        (**self).get_json(url, headers, cfg).await
    }
}
