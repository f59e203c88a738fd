use serde_json::Value;
use tracing::debug;

use crate::gateway_core::adapter::{classify, timed, Operation};
use crate::gateway_core::error::GatewayError;
use crate::gateway_core::transport::{HttpTransport, MultipartForm};
use crate::gateway_provider::require_credential;
use crate::gateway_types::{CallMeta, CallResult};

use crate::provider_cometapi::config::CometApiConfig;
use crate::provider_cometapi::error::CometApiConvention;

pub(crate) enum Outbound {
    Json { path: &'static str, body: Value },
    Form { path: &'static str, form: MultipartForm },
    Get { path: String },
}

/// Authenticate, send and classify one CometAPI request.
pub(crate) async fn dispatch<T: HttpTransport>(
    cfg: &CometApiConfig<T>,
    op: &'static Operation,
    outbound: Outbound,
    model: Option<String>,
) -> Result<CallResult, GatewayError> {
    let scope = op.platform.credential_scope();
    let active = require_credential(cfg.keys.as_ref(), scope).await?;
    let headers = vec![
        ("Authorization".to_string(), active.bearer(scope)?),
        ("Accept".to_string(), "application/json".to_string()),
    ];
    let meta = CallMeta {
        api_key_id: Some(active.record.id.clone()),
        status_code: None,
        model,
    };

    let (outcome, duration) = match outbound {
        Outbound::Json { path, body } => {
            let url = cfg.endpoint(path);
            debug!(target: "genmedia::cometapi", platform = %op.platform, operation = op.name, %url, "dispatching");
            timed(cfg.http.post_json(&url, &headers, &body, &cfg.transport_cfg)).await
        }
        Outbound::Form { path, form } => {
            let url = cfg.endpoint(path);
            debug!(target: "genmedia::cometapi", platform = %op.platform, operation = op.name, %url, "dispatching");
            timed(cfg.http.post_multipart(&url, &headers, &form, &cfg.transport_cfg)).await
        }
        Outbound::Get { path } => {
            let url = cfg.endpoint(&path);
            debug!(target: "genmedia::cometapi", platform = %op.platform, operation = op.name, %url, "dispatching");
            timed(cfg.http.get_json(&url, &headers, &cfg.transport_cfg)).await
        }
    };
    Ok(classify(op, &CometApiConvention, outcome, duration, meta))
}
