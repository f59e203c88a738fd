use axum::extract::rejection::{BytesRejection, JsonRejection};
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use bytes::Bytes;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::gateway_core::media::extract_media;
use crate::gateway_types::{Platform, ResultEnvelope};
use crate::router::RequestHandler;
use crate::server::upload::{receive_upload, UploadPolicy};

/// Generation request bodies are small JSON documents.
const JSON_BODY_LIMIT: usize = 1024 * 1024;
/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;
/// Added to the provider timeout so upstream timeouts surface as envelopes.
const RESPONSE_GRACE: Duration = Duration::from_secs(15);

#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<dyn RequestHandler>,
    pub uploads: Arc<UploadPolicy>,
}

/// Body rejections (oversized, unreadable) answered in the platform envelope.
fn rejected(status: StatusCode, message: String) -> Response {
    tracing::warn!(target: "genmedia::server", %status, error = %message, "request body rejected");
    (status, Json(ResultEnvelope::failure(message))).into_response()
}

async fn dispatch_platform(
    state: AppState,
    platform: Platform,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => return rejected(rejection.status(), rejection.body_text()),
    };
    let response = state.handler.handle(platform, &body).await;
    let status =
        StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(response.envelope)).into_response()
}

async fn upload_handler(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    match receive_upload(&state.uploads, &mut multipart).await {
        Ok(stored) => {
            tracing::info!(
                target: "genmedia::upload",
                filename = %stored.filename,
                size = stored.size,
                "stored upload"
            );
            Json(json!({
                "success": true,
                "url": stored.url,
                "filename": stored.filename,
                "size": stored.size,
            }))
            .into_response()
        }
        Err(err) => {
            tracing::warn!(target: "genmedia::upload", error = %err, "upload rejected");
            (
                err.status(),
                Json(json!({"success": false, "error": err.to_string()})),
            )
                .into_response()
        }
    }
}

async fn extract_handler(body: Result<Json<Value>, JsonRejection>) -> Response {
    match body {
        Ok(Json(value)) => Json(extract_media(&value)).into_response(),
        Err(rejection) => rejected(rejection.status(), rejection.body_text()),
    }
}

async fn health_handler() -> Json<Value> {
    let platforms: Vec<&str> = Platform::ALL.iter().map(|p| p.id()).collect();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "platforms": platforms,
    }))
}

/// Build the HTTP surface. `request_timeout` is the outbound provider timeout.
pub fn router(state: AppState, request_timeout: Option<Duration>) -> Router {
    let mut api = Router::new();
    for platform in Platform::ALL {
        api = api.route(
            platform.route_path(),
            post(
                move |State(state): State<AppState>, body: Result<Bytes, BytesRejection>| {
                    dispatch_platform(state, platform, body)
                },
            ),
        );
    }
    let api = api
        .route("/api/media/extract", post(extract_handler))
        .layer(DefaultBodyLimit::max(JSON_BODY_LIMIT));

    let upload_limit = state.uploads.max_bytes + MULTIPART_OVERHEAD;
    let uploads = Router::new()
        .route("/api/upload", post(upload_handler))
        .layer(DefaultBodyLimit::max(upload_limit));

    let mut app = Router::new()
        .merge(api)
        .merge(uploads)
        .route("/api/health", get(health_handler))
        .nest_service(
            &state.uploads.url_prefix,
            ServeDir::new(&state.uploads.dir),
        );
    if let Some(timeout) = request_timeout {
        app = app.layer(TimeoutLayer::with_status_code(
            StatusCode::GATEWAY_TIMEOUT,
            timeout + RESPONSE_GRACE,
        ));
    }
    app.layer(TraceLayer::new_for_http()).with_state(state)
}
