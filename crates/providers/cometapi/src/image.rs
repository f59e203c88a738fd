use async_trait::async_trait;
use std::sync::Arc;

use crate::gateway_core::adapter::{Operation, ProviderAdapter};
use crate::gateway_core::error::GatewayError;
use crate::gateway_core::transport::HttpTransport;
use crate::gateway_types::{CallResult, Platform};

use crate::provider_cometapi::client::{dispatch, Outbound};
use crate::provider_cometapi::config::CometApiConfig;
use crate::provider_cometapi::params::CometImageParams;

const GENERATIONS_PATH: &str = "/v1/images/generations";

pub static NANOBANANA_IMAGE: Operation = Operation {
    platform: Platform::CometApiNanobanana,
    name: "image",
    method: "POST",
    endpoint: GENERATIONS_PATH,
    failure_label: "Nanobanana image generation failed",
};

pub static SEEDREAM_IMAGE: Operation = Operation {
    platform: Platform::CometApiSeedream,
    name: "image",
    method: "POST",
    endpoint: GENERATIONS_PATH,
    failure_label: "Seedream image generation failed",
};

pub struct CometImage<T: HttpTransport> {
    cfg: Arc<CometApiConfig<T>>,
    op: &'static Operation,
}

impl<T: HttpTransport> CometImage<T> {
    pub fn nanobanana(cfg: Arc<CometApiConfig<T>>) -> Self {
        Self {
            cfg,
            op: &NANOBANANA_IMAGE,
        }
    }

    pub fn seedream(cfg: Arc<CometApiConfig<T>>) -> Self {
        Self {
            cfg,
            op: &SEEDREAM_IMAGE,
        }
    }
}

#[async_trait]
impl<T: HttpTransport> ProviderAdapter for CometImage<T> {
    type Params = CometImageParams;

    fn operation(&self) -> &'static Operation {
        self.op
    }

    async fn call(&self, params: &Self::Params) -> Result<CallResult, GatewayError> {
        let outbound = Outbound::Json {
            path: GENERATIONS_PATH,
            body: params.to_body()?,
        };
        dispatch(&self.cfg, self.op, outbound, Some(params.model.clone())).await
    }
}
