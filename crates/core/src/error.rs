use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Missing or malformed caller parameter; maps to HTTP 400.
    #[error("{message}")]
    InvalidInput { message: String },
    #[error("Unsupported action '{action}' for platform {platform}")]
    UnsupportedAction { platform: String, action: String },
    #[error("no active API key configured for {scope}")]
    MissingCredential { scope: String },
    #[error("invalid credential for {scope}: {message}")]
    InvalidCredential { scope: String, message: String },
    #[error("configuration error: {message}")]
    Configuration { message: String },
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl GatewayError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        GatewayError::InvalidInput {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        GatewayError::Configuration {
            message: message.into(),
        }
    }

    /// True for errors caused by the caller's request rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            GatewayError::InvalidInput { .. } | GatewayError::UnsupportedAction { .. }
        )
    }

    /// HTTP status the router answers with when this error escapes an adapter.
    pub fn status_code(&self) -> u16 {
        if self.is_client_error() {
            400
        } else {
            500
        }
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("http status {status}: {sanitized}")]
    HttpStatus {
        status: u16,
        /// upstream body (may carry provider detail; only log sanitized)
        body: String,
        /// Sanitized message for display
        sanitized: String,
    },
    #[error("network: {0}")]
    Network(String),
    #[error("connect timeout after {0:?}")]
    ConnectTimeout(Duration),
    #[error("request timed out after {0:?}")]
    RequestTimeout(Duration),
    #[error("body read error: {0}")]
    BodyRead(String),
    #[error("other: {0}")]
    Other(String),
}

pub fn build_http_status_transport_error(status: u16, body: String) -> TransportError {
    TransportError::HttpStatus {
        status,
        sanitized: display_body_for_error(&body),
        body,
    }
}

pub fn display_body_for_error(body: &str) -> String {
    let trimmed = body.trim();
    let looks_like_json = trimmed.starts_with('{') || trimmed.starts_with('[');
    if looks_like_json {
        match serde_json::from_str::<Value>(trimmed) {
            Ok(v) => v.to_string(), // minified JSON
            Err(_) => format!("{} bytes", body.len()),
        }
    } else {
        format!("{} bytes", body.len())
    }
}
