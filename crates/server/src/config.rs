use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::gateway_core::error::GatewayError;
use crate::gateway_core::transport::TransportConfig;
use crate::provider_cometapi::config::DEFAULT_BASE_URL as COMETAPI_DEFAULT_BASE_URL;
use crate::provider_kling::config::DEFAULT_BASE_URL as KLING_DEFAULT_BASE_URL;

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_UPLOAD_DIR: &str = "public/uploads";
pub const DEFAULT_UPLOAD_URL_PREFIX: &str = "/uploads";
pub const DEFAULT_UPLOAD_MAX_BYTES: usize = 10 * 1024 * 1024;

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub bind: SocketAddr,
    pub kling_base_url: String,
    pub cometapi_base_url: String,
    pub upload_dir: PathBuf,
    /// Public URL prefix uploaded files are served under.
    pub upload_url_prefix: String,
    pub upload_max_bytes: usize,
    /// JSONL usage log; `None` logs usage through `tracing` only.
    pub usage_log_path: Option<PathBuf>,
    /// JSON key file; `None` seeds keys from the environment.
    pub api_keys_file: Option<PathBuf>,
    pub transport: TransportConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            kling_base_url: KLING_DEFAULT_BASE_URL.to_string(),
            cometapi_base_url: COMETAPI_DEFAULT_BASE_URL.to_string(),
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            upload_url_prefix: DEFAULT_UPLOAD_URL_PREFIX.to_string(),
            upload_max_bytes: DEFAULT_UPLOAD_MAX_BYTES,
            usage_log_path: None,
            api_keys_file: None,
            transport: TransportConfig::default(),
        }
    }
}

fn parse<T: FromStr>(name: &str, raw: &str) -> Result<T, GatewayError> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| GatewayError::configuration(format!("{name}: invalid value '{raw}'")))
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, GatewayError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, GatewayError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut cfg = Self::default();

        if let Some(raw) = get("GATEWAY_BIND") {
            cfg.bind = parse("GATEWAY_BIND", &raw)?;
        }
        if let Some(raw) = get("KLING_BASE_URL") {
            cfg.kling_base_url = raw.trim().to_string();
        }
        if let Some(raw) = get("COMETAPI_BASE_URL") {
            cfg.cometapi_base_url = raw.trim().to_string();
        }
        if let Some(raw) = get("UPLOAD_DIR") {
            cfg.upload_dir = PathBuf::from(raw.trim());
        }
        if let Some(raw) = get("UPLOAD_URL_PREFIX") {
            cfg.upload_url_prefix = raw.trim().trim_end_matches('/').to_string();
        }
        if let Some(raw) = get("UPLOAD_MAX_BYTES") {
            cfg.upload_max_bytes = parse("UPLOAD_MAX_BYTES", &raw)?;
        }
        cfg.usage_log_path = get("USAGE_LOG_PATH").map(|raw| PathBuf::from(raw.trim()));
        cfg.api_keys_file = get("API_KEYS_FILE").map(|raw| PathBuf::from(raw.trim()));
        if let Some(raw) = get("PROVIDER_TIMEOUT_SECS") {
            let secs: u64 = parse("PROVIDER_TIMEOUT_SECS", &raw)?;
            cfg.transport.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(raw) = get("PROVIDER_CONNECT_TIMEOUT_SECS") {
            cfg.transport.connect_timeout =
                Duration::from_secs(parse("PROVIDER_CONNECT_TIMEOUT_SECS", &raw)?);
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), GatewayError> {
        for (name, value) in [
            ("KLING_BASE_URL", &self.kling_base_url),
            ("COMETAPI_BASE_URL", &self.cometapi_base_url),
        ] {
            url::Url::parse(value)
                .map_err(|err| GatewayError::configuration(format!("{name}: {err}")))?;
        }
        let prefix = self.upload_url_prefix.as_str();
        if !prefix.starts_with('/') || prefix.len() < 2 {
            return Err(GatewayError::configuration(format!(
                "UPLOAD_URL_PREFIX: must be an absolute path other than '/', got '{prefix}'"
            )));
        }
        if self.upload_max_bytes == 0 {
            return Err(GatewayError::configuration(
                "UPLOAD_MAX_BYTES: must be greater than zero",
            ));
        }
        Ok(())
    }
}
