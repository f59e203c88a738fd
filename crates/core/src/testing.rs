//! Recording `HttpTransport` double shared by the test modules.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::core::error::{build_http_status_transport_error, TransportError};
use crate::core::json::without_null_fields;
use crate::core::transport::{HttpTransport, MultipartForm, TransportConfig, TransportResponse};

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedBody {
    Json(Value),
    Form(MultipartForm),
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: RecordedBody,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn json(&self) -> Option<&Value> {
        match &self.body {
            RecordedBody::Json(v) => Some(v),
            _ => None,
        }
    }

    pub fn form(&self) -> Option<&MultipartForm> {
        match &self.body {
            RecordedBody::Form(f) => Some(f),
            _ => None,
        }
    }
}

pub enum Scripted {
    Json(u16, Value),
    Status(u16, String),
    Fail(fn() -> TransportError),
}

/// Records every request and answers from a script (default: `200 {}`).
#[derive(Clone, Default)]
pub struct RecordingTransport {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    script: Arc<Mutex<VecDeque<Scripted>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond_json(self, body: Value) -> Self {
        self.push(Scripted::Json(200, body))
    }

    pub fn respond_status(self, status: u16, body: impl Into<String>) -> Self {
        self.push(Scripted::Status(status, body.into()))
    }

    pub fn fail_with(self, make: fn() -> TransportError) -> Self {
        self.push(Scripted::Fail(make))
    }

    fn push(self, scripted: Scripted) -> Self {
        self.script.lock().unwrap().push_back(scripted);
        self
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<RecordedRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    fn answer(&self, request: RecordedRequest) -> Result<TransportResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        let next = self.script.lock().unwrap().pop_front();
        match next {
            None => Ok(TransportResponse {
                status: 200,
                body: Value::Object(Default::default()),
                headers: Vec::new(),
            }),
            Some(Scripted::Json(status, body)) => Ok(TransportResponse {
                status,
                body,
                headers: Vec::new(),
            }),
            Some(Scripted::Status(status, body)) => {
                Err(build_http_status_transport_error(status, body))
            }
            Some(Scripted::Fail(make)) => Err(make()),
        }
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Value,
        cfg: &TransportConfig,
    ) -> Result<TransportResponse, TransportError> {
        let cleaned = if cfg.strip_null_fields {
            without_null_fields(body)
        } else {
            body.clone()
        };
        self.answer(RecordedRequest {
            method: "POST",
            url: url.to_string(),
            headers: headers.to_vec(),
            body: RecordedBody::Json(cleaned),
        })
    }

    async fn post_multipart(
        &self,
        url: &str,
        headers: &[(String, String)],
        form: &MultipartForm,
        _cfg: &TransportConfig,
    ) -> Result<TransportResponse, TransportError> {
        self.answer(RecordedRequest {
            method: "POST",
            url: url.to_string(),
            headers: headers.to_vec(),
            body: RecordedBody::Form(form.clone()),
        })
    }

    async fn get_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        _cfg: &TransportConfig,
    ) -> Result<TransportResponse, TransportError> {
        self.answer(RecordedRequest {
            method: "GET",
            url: url.to_string(),
            headers: headers.to_vec(),
            body: RecordedBody::Empty,
        })
    }
}
