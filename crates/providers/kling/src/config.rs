use std::sync::Arc;

use crate::gateway_core::transport::{HttpTransport, TransportConfig};
use crate::gateway_provider::KeyStore;

pub const DEFAULT_BASE_URL: &str = "https://api.klingai.com";

/// Everything a Kling adapter needs; shared by the three Kling operations.
pub struct KlingConfig<T: HttpTransport> {
    pub base_url: String,
    pub http: T,
    pub transport_cfg: TransportConfig,
    pub keys: Arc<dyn KeyStore>,
}

impl<T: HttpTransport> KlingConfig<T> {
    pub fn new(http: T, keys: Arc<dyn KeyStore>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            http,
            transport_cfg: TransportConfig::default(),
            keys,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_transport_config(mut self, transport_cfg: TransportConfig) -> Self {
        self.transport_cfg = transport_cfg;
        self
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}
