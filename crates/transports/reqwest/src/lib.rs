use crate::gateway_core::error::{display_body_for_error, TransportError};
use crate::gateway_core::transport::{
    emit_transport_event, HttpTransport, MultipartForm, MultipartValue, TransportBody,
    TransportConfig, TransportEvent, TransportResponse,
};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::error::Error as StdError;
use std::time::{Duration, Instant, SystemTime};
use tracing::debug;

/// Production `HttpTransport`: one pooled reqwest client shared by every adapter.
pub struct ReqwestTransport {
    client: Client,
    request_timeout: Option<Duration>,
    connect_timeout: Duration,
}

impl ReqwestTransport {
    fn configure_builder(
        mut builder: reqwest::ClientBuilder,
        cfg: &TransportConfig,
    ) -> reqwest::ClientBuilder {
        builder = builder
            .tcp_keepalive(Some(Duration::from_secs(60)))
            .pool_idle_timeout(Duration::from_secs(90));
        if let Some(req_timeout) = cfg.request_timeout {
            builder = builder.timeout(req_timeout);
        }
        builder.connect_timeout(cfg.connect_timeout)
    }

    fn try_new_with_builder(
        cfg: &TransportConfig,
        builder: reqwest::ClientBuilder,
    ) -> Result<Self, TransportError> {
        let builder = Self::configure_builder(builder, cfg);
        let client = builder.build().map_err(|err| {
            TransportError::Other(format!(
                "reqwest client build failed: {}",
                format_reqwest_error_chain(&err)
            ))
        })?;
        Ok(Self {
            client,
            request_timeout: cfg.request_timeout,
            connect_timeout: cfg.connect_timeout,
        })
    }

    pub fn try_new(cfg: &TransportConfig) -> Result<Self, TransportError> {
        Self::try_new_with_builder(cfg, Client::builder())
    }

    /// Apply caller headers; the body encoder owns `content-type`.
    fn with_headers(mut req: RequestBuilder, headers: &[(String, String)]) -> RequestBuilder {
        for (k, v) in headers {
            if !k.eq_ignore_ascii_case("content-type") {
                req = req.header(k, v);
            }
        }
        req
    }

    fn map_send_error(&self, err: &reqwest::Error, detail: String) -> TransportError {
        if err.is_timeout() {
            if err.is_connect() {
                TransportError::ConnectTimeout(self.connect_timeout)
            } else {
                TransportError::RequestTimeout(self.request_timeout.unwrap_or_default())
            }
        } else if err.is_connect() {
            TransportError::Network(format!("connect: {detail}"))
        } else {
            TransportError::Network(detail)
        }
    }

    /// Send `req`, read the whole body and parse it as JSON.
    ///
    /// Non-2xx responses become `HttpStatus` with the raw body preserved.
    async fn execute(
        &self,
        req: RequestBuilder,
        fallback_method: &str,
        fallback_url: &str,
        request_body: Option<TransportBody>,
    ) -> Result<TransportResponse, TransportError> {
        let started_at = SystemTime::now();
        let start_instant = Instant::now();
        let (method, request_url) = match req.try_clone().and_then(|r| r.build().ok()) {
            Some(built) => (built.method().to_string(), built.url().to_string()),
            None => (fallback_method.to_string(), fallback_url.to_string()),
        };
        let event = |status: Option<u16>, size: Option<usize>, error: Option<String>| {
            TransportEvent {
                started_at,
                latency: Some(start_instant.elapsed()),
                method: method.clone(),
                url: request_url.clone(),
                status,
                request_body: request_body.clone(),
                response_size: size,
                error,
            }
        };

        let resp = match req.send().await {
            Ok(r) => r,
            Err(e) => {
                let detail = format_reqwest_error_chain(&e);
                debug!(target: "genmedia::transport::reqwest", %detail, "reqwest send failed");
                let mapped = self.map_send_error(&e, detail);
                emit_transport_event(event(None, None, Some(mapped.to_string())));
                return Err(mapped);
            }
        };

        let status = resp.status();
        let res_headers = header_pairs(resp.headers());

        let text = match resp.text().await {
            Ok(text) => text,
            Err(e) => {
                let mapped = if e.is_timeout() {
                    TransportError::RequestTimeout(self.request_timeout.unwrap_or_default())
                } else {
                    TransportError::BodyRead(format_reqwest_error_chain(&e))
                };
                emit_transport_event(event(Some(status.as_u16()), None, Some(mapped.to_string())));
                return Err(mapped);
            }
        };

        if !status.is_success() {
            let sanitized = display_body_for_error(&text);
            emit_transport_event(event(
                Some(status.as_u16()),
                Some(text.len()),
                Some(format!("HTTP {}: {}", status.as_u16(), sanitized)),
            ));
            return Err(TransportError::HttpStatus {
                status: status.as_u16(),
                body: text,
                sanitized,
            });
        }

        let json: Value = match serde_json::from_str(&text) {
            Ok(json) => json,
            Err(_) => {
                let err = TransportError::BodyRead(format!(
                    "invalid json ({})",
                    display_body_for_error(&text)
                ));
                emit_transport_event(event(
                    Some(status.as_u16()),
                    Some(text.len()),
                    Some(err.to_string()),
                ));
                return Err(err);
            }
        };
        emit_transport_event(event(Some(status.as_u16()), Some(text.len()), None));
        Ok(TransportResponse {
            status: status.as_u16(),
            body: json,
            headers: res_headers,
        })
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        let cfg = TransportConfig::default();
        Self {
            client: Client::new(),
            request_timeout: cfg.request_timeout,
            connect_timeout: cfg.connect_timeout,
        }
    }
}

fn build_form(form: &MultipartForm) -> Result<Form, TransportError> {
    let mut req_form = Form::new();
    for field in &form.fields {
        match &field.value {
            MultipartValue::Text(text) => {
                req_form = req_form.text(field.name.clone(), text.clone());
            }
            MultipartValue::Bytes {
                data,
                filename,
                content_type,
            } => {
                let mut part = Part::bytes(data.clone());
                if let Some(name) = filename {
                    part = part.file_name(name.clone());
                }
                if let Some(ct) = content_type {
                    part = part
                        .mime_str(ct)
                        .map_err(|e| TransportError::Other(e.to_string()))?;
                }
                req_form = req_form.part(field.name.clone(), part);
            }
        }
    }
    Ok(req_form)
}

/// Text-only snapshot of a form for transport observers.
fn form_snapshot(form: &MultipartForm) -> TransportBody {
    let fields = form
        .fields
        .iter()
        .map(|f| match &f.value {
            MultipartValue::Text(text) => format!("{}={}", f.name, text),
            MultipartValue::Bytes { data, .. } => format!("{}=<{} bytes>", f.name, data.len()),
        })
        .collect::<Vec<_>>();
    TransportBody::Text(fields.join("&"))
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Value,
        cfg: &TransportConfig,
    ) -> Result<TransportResponse, TransportError> {
        // Clean body by stripping null fields if configured
        let cleaned_body: Value = if cfg.strip_null_fields {
            crate::gateway_core::json::without_null_fields(body)
        } else {
            body.clone()
        };
        let req = Self::with_headers(self.client.post(url).json(&cleaned_body), headers);
        self.execute(req, "POST", url, Some(TransportBody::Json(cleaned_body)))
            .await
    }

    async fn post_multipart(
        &self,
        url: &str,
        headers: &[(String, String)],
        form: &MultipartForm,
        _cfg: &TransportConfig,
    ) -> Result<TransportResponse, TransportError> {
        let req = Self::with_headers(self.client.post(url).multipart(build_form(form)?), headers);
        self.execute(req, "POST", url, Some(form_snapshot(form)))
            .await
    }

    async fn get_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        _cfg: &TransportConfig,
    ) -> Result<TransportResponse, TransportError> {
        let req = Self::with_headers(self.client.get(url), headers);
        self.execute(req, "GET", url, None).await
    }
}

fn header_pairs(headers: &http::HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .filter_map(|(k, v)| v.to_str().ok().map(|s| (k.to_string(), s.to_string())))
        .collect()
}

fn format_reqwest_error_chain(err: &reqwest::Error) -> String {
    let mut out = err.to_string();
    let mut current = err.source();
    while let Some(src) = current {
        out.push_str(": ");
        out.push_str(&src.to_string());
        current = src.source();
    }
    out
}

#[cfg(test)]
#[path = "../tests/reqwest_transport_tests.rs"]
mod reqwest_transport_tests;
