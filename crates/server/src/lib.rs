//! HTTP surface of the gateway: platform endpoints, uploads, media
//! extraction, health and static serving of uploaded files.

pub mod config;
pub mod routes;
pub mod upload;

use std::sync::Arc;

use crate::gateway_core::error::GatewayError;
use crate::gateway_core::transport::{set_transport_observer, TracingTransportObserver};
use crate::gateway_core::usage::{JsonlUsageSink, TracingUsageSink, UsageRecorder, UsageSink};
use crate::gateway_provider::{FileKeyStore, KeyStore, StaticKeyStore};
use crate::provider_cometapi::CometApiConfig;
use crate::provider_kling::KlingConfig;
use crate::reqwest_transport::ReqwestTransport;
use crate::router::ActionRouter;

pub use config::GatewayConfig;
pub use routes::{router, AppState};
pub use upload::{StoredUpload, UploadError, UploadPolicy};

fn key_store(config: &GatewayConfig) -> Arc<dyn KeyStore> {
    match &config.api_keys_file {
        Some(path) => {
            tracing::info!(target: "genmedia::server", path = %path.display(), "using key file");
            Arc::new(FileKeyStore::new(path))
        }
        None => {
            let store = StaticKeyStore::from_env();
            let scopes: Vec<String> = store.records().into_iter().map(|r| r.platform).collect();
            tracing::info!(target: "genmedia::server", ?scopes, "using environment keys");
            Arc::new(store)
        }
    }
}

fn usage_sink(config: &GatewayConfig) -> Arc<dyn UsageSink> {
    match &config.usage_log_path {
        Some(path) => Arc::new(JsonlUsageSink::new(path)),
        None => Arc::new(TracingUsageSink),
    }
}

/// Wire the production state: reqwest transport, key store, usage sink.
pub fn build_state(config: &GatewayConfig) -> Result<AppState, GatewayError> {
    let http = Arc::new(ReqwestTransport::try_new(&config.transport)?);
    let keys = key_store(config);
    let kling = KlingConfig::new(http.clone(), keys.clone())
        .with_base_url(config.kling_base_url.clone())
        .with_transport_config(config.transport.clone());
    let cometapi = CometApiConfig::new(http, keys)
        .with_base_url(config.cometapi_base_url.clone())
        .with_transport_config(config.transport.clone());
    let handler = ActionRouter::new(
        Arc::new(kling),
        Arc::new(cometapi),
        UsageRecorder::new(usage_sink(config)),
    );
    Ok(AppState {
        handler: Arc::new(handler),
        uploads: Arc::new(UploadPolicy {
            dir: config.upload_dir.clone(),
            url_prefix: config.upload_url_prefix.clone(),
            max_bytes: config.upload_max_bytes,
        }),
    })
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
    tracing::info!(target: "genmedia::server", "shutting down");
}

/// Bind and serve until Ctrl-C.
pub async fn run(config: GatewayConfig) -> Result<(), GatewayError> {
    set_transport_observer(Arc::new(TracingTransportObserver));
    let state = build_state(&config)?;
    let app = router(state, config.transport.request_timeout);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    tracing::info!(target: "genmedia::server", addr = %config.bind, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

#[cfg(test)]
#[path = "../tests/config_tests.rs"]
mod config_tests;

#[cfg(test)]
#[path = "../tests/routes_tests.rs"]
mod routes_tests;
