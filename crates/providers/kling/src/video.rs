use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::gateway_core::adapter::{classify, timed, Operation, ProviderAdapter};
use crate::gateway_core::error::GatewayError;
use crate::gateway_core::transport::HttpTransport;
use crate::gateway_provider::require_credential;
use crate::gateway_types::{CallMeta, CallResult, Platform};

use crate::provider_kling::auth::encode_jwt;
use crate::provider_kling::config::KlingConfig;
use crate::provider_kling::error::KlingConvention;
use crate::provider_kling::params::{
    KlingImageToVideoParams, KlingTaskQuery, KlingTextToVideoParams,
};

pub static IMAGE_TO_VIDEO: Operation = Operation {
    platform: Platform::Kling,
    name: "video",
    method: "POST",
    endpoint: "/v1/videos/image2video",
    failure_label: "Kling video generation failed",
};

pub static TEXT_TO_VIDEO: Operation = Operation {
    platform: Platform::Kling,
    name: "text",
    method: "POST",
    endpoint: "/v1/videos/text2video",
    failure_label: "Kling video generation failed",
};

pub static TASK_STATUS: Operation = Operation {
    platform: Platform::Kling,
    name: "status",
    method: "GET",
    endpoint: "/v1/videos/{task_type}/{task_id}",
    failure_label: "Kling status check failed",
};

enum Outbound {
    Post { path: &'static str, body: Value },
    Get { path: String },
}

/// Sign, send and classify one Kling request.
async fn dispatch<T: HttpTransport>(
    cfg: &KlingConfig<T>,
    op: &'static Operation,
    outbound: Outbound,
    model: Option<String>,
) -> Result<CallResult, GatewayError> {
    let scope = op.platform.credential_scope();
    let active = require_credential(cfg.keys.as_ref(), scope).await?;
    let (access_key, secret_key) = active.access_key_pair(scope)?;
    let token = encode_jwt(access_key, secret_key, Utc::now().timestamp())?;
    let headers = vec![
        ("Authorization".to_string(), format!("Bearer {token}")),
        ("Accept".to_string(), "application/json".to_string()),
    ];
    let meta = CallMeta {
        api_key_id: Some(active.record.id.clone()),
        status_code: None,
        model,
    };

    let (outcome, duration) = match outbound {
        Outbound::Post { path, body } => {
            let url = cfg.endpoint(path);
            debug!(target: "genmedia::kling", operation = op.name, %url, "dispatching");
            timed(cfg.http.post_json(&url, &headers, &body, &cfg.transport_cfg)).await
        }
        Outbound::Get { path } => {
            let url = cfg.endpoint(&path);
            debug!(target: "genmedia::kling", operation = op.name, %url, "dispatching");
            timed(cfg.http.get_json(&url, &headers, &cfg.transport_cfg)).await
        }
    };
    Ok(classify(op, &KlingConvention, outcome, duration, meta))
}

pub struct KlingImageToVideo<T: HttpTransport> {
    cfg: Arc<KlingConfig<T>>,
}

impl<T: HttpTransport> KlingImageToVideo<T> {
    pub fn new(cfg: Arc<KlingConfig<T>>) -> Self {
        Self { cfg }
    }
}

#[async_trait]
impl<T: HttpTransport> ProviderAdapter for KlingImageToVideo<T> {
    type Params = KlingImageToVideoParams;

    fn operation(&self) -> &'static Operation {
        &IMAGE_TO_VIDEO
    }

    async fn call(&self, params: &Self::Params) -> Result<CallResult, GatewayError> {
        let outbound = Outbound::Post {
            path: IMAGE_TO_VIDEO.endpoint,
            body: params.to_body()?,
        };
        dispatch(
            &self.cfg,
            &IMAGE_TO_VIDEO,
            outbound,
            Some(params.model_name.clone()),
        )
        .await
    }
}

pub struct KlingTextToVideo<T: HttpTransport> {
    cfg: Arc<KlingConfig<T>>,
}

impl<T: HttpTransport> KlingTextToVideo<T> {
    pub fn new(cfg: Arc<KlingConfig<T>>) -> Self {
        Self { cfg }
    }
}

#[async_trait]
impl<T: HttpTransport> ProviderAdapter for KlingTextToVideo<T> {
    type Params = KlingTextToVideoParams;

    fn operation(&self) -> &'static Operation {
        &TEXT_TO_VIDEO
    }

    async fn call(&self, params: &Self::Params) -> Result<CallResult, GatewayError> {
        let outbound = Outbound::Post {
            path: TEXT_TO_VIDEO.endpoint,
            body: params.to_body()?,
        };
        dispatch(
            &self.cfg,
            &TEXT_TO_VIDEO,
            outbound,
            Some(params.model_name.clone()),
        )
        .await
    }
}

pub struct KlingTaskStatus<T: HttpTransport> {
    cfg: Arc<KlingConfig<T>>,
}

impl<T: HttpTransport> KlingTaskStatus<T> {
    pub fn new(cfg: Arc<KlingConfig<T>>) -> Self {
        Self { cfg }
    }
}

#[async_trait]
impl<T: HttpTransport> ProviderAdapter for KlingTaskStatus<T> {
    type Params = KlingTaskQuery;

    fn operation(&self) -> &'static Operation {
        &TASK_STATUS
    }

    async fn call(&self, params: &Self::Params) -> Result<CallResult, GatewayError> {
        let outbound = Outbound::Get {
            path: params.path(),
        };
        dispatch(&self.cfg, &TASK_STATUS, outbound, None).await
    }
}
