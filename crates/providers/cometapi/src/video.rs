use async_trait::async_trait;
use std::sync::Arc;

use crate::gateway_core::adapter::{Operation, ProviderAdapter};
use crate::gateway_core::error::GatewayError;
use crate::gateway_core::transport::HttpTransport;
use crate::gateway_types::{CallResult, Platform};

use crate::provider_cometapi::client::{dispatch, Outbound};
use crate::provider_cometapi::config::CometApiConfig;
use crate::provider_cometapi::params::{CometVideoParams, CometVideoQuery};

const CREATE_PATH: &str = "/v1/videos";

pub static SORA_VIDEO: Operation = Operation {
    platform: Platform::CometApiSora,
    name: "video",
    method: "POST",
    endpoint: CREATE_PATH,
    failure_label: "Sora video generation failed",
};

pub static SORA_STATUS: Operation = Operation {
    platform: Platform::CometApiSora,
    name: "status",
    method: "GET",
    endpoint: "/v1/videos/{task_id}",
    failure_label: "Sora status check failed",
};

pub static VEO_VIDEO: Operation = Operation {
    platform: Platform::CometApiVeo,
    name: "video",
    method: "POST",
    endpoint: CREATE_PATH,
    failure_label: "Veo video generation failed",
};

pub static VEO_STATUS: Operation = Operation {
    platform: Platform::CometApiVeo,
    name: "status",
    method: "GET",
    endpoint: "/v1/videos/{task_id}",
    failure_label: "Veo status check failed",
};

/// Video job creation (Sora or Veo); returns the provider's job object.
pub struct CometVideo<T: HttpTransport> {
    cfg: Arc<CometApiConfig<T>>,
    op: &'static Operation,
}

impl<T: HttpTransport> CometVideo<T> {
    pub fn sora(cfg: Arc<CometApiConfig<T>>) -> Self {
        Self {
            cfg,
            op: &SORA_VIDEO,
        }
    }

    pub fn veo(cfg: Arc<CometApiConfig<T>>) -> Self {
        Self {
            cfg,
            op: &VEO_VIDEO,
        }
    }
}

#[async_trait]
impl<T: HttpTransport> ProviderAdapter for CometVideo<T> {
    type Params = CometVideoParams;

    fn operation(&self) -> &'static Operation {
        self.op
    }

    async fn call(&self, params: &Self::Params) -> Result<CallResult, GatewayError> {
        let outbound = Outbound::Form {
            path: CREATE_PATH,
            form: params.to_form(),
        };
        dispatch(&self.cfg, self.op, outbound, Some(params.model.clone())).await
    }
}

/// Single status lookup for a previously created video job.
pub struct CometVideoStatus<T: HttpTransport> {
    cfg: Arc<CometApiConfig<T>>,
    op: &'static Operation,
}

impl<T: HttpTransport> CometVideoStatus<T> {
    pub fn sora(cfg: Arc<CometApiConfig<T>>) -> Self {
        Self {
            cfg,
            op: &SORA_STATUS,
        }
    }

    pub fn veo(cfg: Arc<CometApiConfig<T>>) -> Self {
        Self {
            cfg,
            op: &VEO_STATUS,
        }
    }
}

#[async_trait]
impl<T: HttpTransport> ProviderAdapter for CometVideoStatus<T> {
    type Params = CometVideoQuery;

    fn operation(&self) -> &'static Operation {
        self.op
    }

    async fn call(&self, params: &Self::Params) -> Result<CallResult, GatewayError> {
        let outbound = Outbound::Get {
            path: params.path(),
        };
        dispatch(&self.cfg, self.op, outbound, None).await
    }
}
