//! Inbound `{action, ...params}` handling for every platform endpoint.
//!
//! The router validates the body, plans exactly one adapter operation, runs
//! it, records one usage entry and turns the outcome into an HTTP status plus
//! a `ResultEnvelope`. Requests rejected before planning completes never
//! reach a provider and are not recorded.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::gateway_core::adapter::{Operation, ProviderAdapter};
use crate::gateway_core::error::GatewayError;
use crate::gateway_core::transport::HttpTransport;
use crate::gateway_core::usage::UsageRecorder;
use crate::gateway_types::{
    CallResult, GenerationRequest, Platform, ResultEnvelope, UsageLogEntry,
};
use crate::provider_cometapi::{
    CometApiConfig, CometImage, CometImageParams, CometVideo, CometVideoParams, CometVideoQuery,
    CometVideoStatus,
};
use crate::provider_kling::{
    KlingConfig, KlingImageToVideo, KlingImageToVideoParams, KlingTaskQuery, KlingTaskStatus,
    KlingTextToVideo, KlingTextToVideoParams,
};

/// Recorded as `apiKeyId` when a call failed before a credential was resolved.
pub const UNRESOLVED_KEY_ID: &str = "unresolved";

/// One planned provider operation with its typed parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum AdapterRequest {
    KlingImageToVideo(KlingImageToVideoParams),
    KlingTextToVideo(KlingTextToVideoParams),
    KlingTaskStatus(KlingTaskQuery),
    SoraVideo(CometVideoParams),
    SoraStatus(CometVideoQuery),
    VeoVideo(CometVideoParams),
    VeoStatus(CometVideoQuery),
    NanobananaImage(CometImageParams),
    SeedreamImage(CometImageParams),
}

impl AdapterRequest {
    /// Select the operation for `(platform, action)` and read its parameters.
    pub fn plan(platform: Platform, request: &GenerationRequest) -> Result<Self, GatewayError> {
        let params = &request.params;
        let planned = match (platform, request.action.as_str()) {
            (Platform::Kling, "video") => {
                Self::KlingImageToVideo(KlingImageToVideoParams::from_params(params)?)
            }
            (Platform::Kling, "text") => {
                Self::KlingTextToVideo(KlingTextToVideoParams::from_params(params)?)
            }
            (Platform::Kling, "status") => {
                Self::KlingTaskStatus(KlingTaskQuery::from_params(params)?)
            }
            (Platform::CometApiSora, "video") => Self::SoraVideo(CometVideoParams::sora(params)?),
            (Platform::CometApiSora, "status") => {
                Self::SoraStatus(CometVideoQuery::from_params(params)?)
            }
            (Platform::CometApiVeo, "video") => Self::VeoVideo(CometVideoParams::veo(params)?),
            (Platform::CometApiVeo, "status") => {
                Self::VeoStatus(CometVideoQuery::from_params(params)?)
            }
            (Platform::CometApiNanobanana, "image") => {
                Self::NanobananaImage(CometImageParams::nanobanana(params)?)
            }
            (Platform::CometApiSeedream, "image") => {
                Self::SeedreamImage(CometImageParams::seedream(params)?)
            }
            (platform, action) => {
                return Err(GatewayError::UnsupportedAction {
                    platform: platform.id().to_string(),
                    action: action.to_string(),
                })
            }
        };
        Ok(planned)
    }

    /// Model the operation will send upstream, if it has one.
    pub fn model(&self) -> Option<&str> {
        match self {
            Self::KlingImageToVideo(p) => Some(&p.model_name),
            Self::KlingTextToVideo(p) => Some(&p.model_name),
            Self::SoraVideo(p) | Self::VeoVideo(p) => Some(&p.model),
            Self::NanobananaImage(p) | Self::SeedreamImage(p) => Some(&p.model),
            Self::KlingTaskStatus(_) | Self::SoraStatus(_) | Self::VeoStatus(_) => None,
        }
    }
}

/// HTTP status plus body for one inbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct RouterResponse {
    pub status: u16,
    pub envelope: ResultEnvelope,
}

impl RouterResponse {
    fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            envelope: ResultEnvelope::failure(message),
        }
    }
}

/// Object-safe entry point used by the HTTP layer.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn handle(&self, platform: Platform, body: &[u8]) -> RouterResponse;
}

struct Adapters<T: HttpTransport> {
    kling_image_to_video: KlingImageToVideo<T>,
    kling_text_to_video: KlingTextToVideo<T>,
    kling_status: KlingTaskStatus<T>,
    sora_video: CometVideo<T>,
    sora_status: CometVideoStatus<T>,
    veo_video: CometVideo<T>,
    veo_status: CometVideoStatus<T>,
    nanobanana: CometImage<T>,
    seedream: CometImage<T>,
}

async fn run<A: ProviderAdapter>(
    adapter: &A,
    params: &A::Params,
) -> (&'static Operation, Result<CallResult, GatewayError>) {
    (adapter.operation(), adapter.call(params).await)
}

pub struct ActionRouter<T: HttpTransport> {
    adapters: Adapters<T>,
    usage: UsageRecorder,
}

impl<T: HttpTransport> ActionRouter<T> {
    pub fn new(
        kling: Arc<KlingConfig<T>>,
        cometapi: Arc<CometApiConfig<T>>,
        usage: UsageRecorder,
    ) -> Self {
        Self {
            adapters: Adapters {
                kling_image_to_video: KlingImageToVideo::new(kling.clone()),
                kling_text_to_video: KlingTextToVideo::new(kling.clone()),
                kling_status: KlingTaskStatus::new(kling),
                sora_video: CometVideo::sora(cometapi.clone()),
                sora_status: CometVideoStatus::sora(cometapi.clone()),
                veo_video: CometVideo::veo(cometapi.clone()),
                veo_status: CometVideoStatus::veo(cometapi.clone()),
                nanobanana: CometImage::nanobanana(cometapi.clone()),
                seedream: CometImage::seedream(cometapi),
            },
            usage,
        }
    }

    async fn execute(
        &self,
        request: &AdapterRequest,
    ) -> (&'static Operation, Result<CallResult, GatewayError>) {
        let a = &self.adapters;
        match request {
            AdapterRequest::KlingImageToVideo(p) => run(&a.kling_image_to_video, p).await,
            AdapterRequest::KlingTextToVideo(p) => run(&a.kling_text_to_video, p).await,
            AdapterRequest::KlingTaskStatus(p) => run(&a.kling_status, p).await,
            AdapterRequest::SoraVideo(p) => run(&a.sora_video, p).await,
            AdapterRequest::SoraStatus(p) => run(&a.sora_status, p).await,
            AdapterRequest::VeoVideo(p) => run(&a.veo_video, p).await,
            AdapterRequest::VeoStatus(p) => run(&a.veo_status, p).await,
            AdapterRequest::NanobananaImage(p) => run(&a.nanobanana, p).await,
            AdapterRequest::SeedreamImage(p) => run(&a.seedream, p).await,
        }
    }
}

fn usage_entry(
    op: &Operation,
    request: &AdapterRequest,
    outcome: &Result<CallResult, GatewayError>,
) -> UsageLogEntry {
    let base = UsageLogEntry {
        platform: op.platform.id().to_string(),
        api_key_id: UNRESOLVED_KEY_ID.to_string(),
        endpoint: op.endpoint.to_string(),
        method: op.method.to_string(),
        status_code: 500,
        success: false,
        error_message: None,
        duration: None,
        model: request.model().map(str::to_string),
        created_at: Utc::now(),
    };
    match outcome {
        Ok(result) => UsageLogEntry {
            api_key_id: result
                .meta
                .api_key_id
                .clone()
                .unwrap_or_else(|| UNRESOLVED_KEY_ID.to_string()),
            status_code: result.usage_status_code(),
            success: result.success,
            error_message: result.error.clone(),
            duration: Some(result.duration),
            model: result
                .meta
                .model
                .clone()
                .or_else(|| request.model().map(str::to_string)),
            ..base
        },
        Err(err) => UsageLogEntry {
            status_code: err.status_code(),
            error_message: Some(err.to_string()),
            ..base
        },
    }
}

#[async_trait]
impl<T: HttpTransport + 'static> RequestHandler for ActionRouter<T> {
    #[instrument(name = "router.handle", skip_all, fields(platform = %platform))]
    async fn handle(&self, platform: Platform, body: &[u8]) -> RouterResponse {
        let value: Value = match serde_json::from_slice(body) {
            Ok(value) => value,
            Err(err) => return RouterResponse::rejected(500, err.to_string()),
        };
        let request = match GenerationRequest::from_value(value) {
            Ok(request) => request,
            Err(err) => return RouterResponse::rejected(400, err.to_string()),
        };
        let planned = match AdapterRequest::plan(platform, &request) {
            Ok(planned) => planned,
            Err(err) => return RouterResponse::rejected(err.status_code(), err.to_string()),
        };

        let (op, outcome) = self.execute(&planned).await;
        let entry = usage_entry(op, &planned, &outcome);
        info!(
            target: "genmedia::router",
            action = op.name,
            endpoint = op.endpoint,
            success = entry.success,
            status_code = entry.status_code,
            duration_ms = ?entry.duration,
            "provider call finished"
        );
        self.usage.record(entry).await;

        match outcome {
            Ok(result) => RouterResponse {
                status: 200,
                envelope: ResultEnvelope::from(result),
            },
            Err(err) => {
                warn!(target: "genmedia::router", action = op.name, error = %err, "adapter error");
                RouterResponse::rejected(err.status_code(), err.to_string())
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/router_tests.rs"]
mod router_tests;
