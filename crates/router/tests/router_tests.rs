use crate::gateway_core::testing::RecordingTransport;
use crate::gateway_core::usage::{MemoryUsageSink, UsageRecorder};
use crate::gateway_provider::{Credentials, StaticKeyStore};
use crate::gateway_types::{ApiKeyRecord, GenerationRequest, Platform};
use crate::provider_cometapi::CometApiConfig;
use crate::provider_kling::KlingConfig;
use crate::router::{ActionRouter, AdapterRequest, RequestHandler, UNRESOLVED_KEY_ID};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;

fn record(id: &str, platform: &str) -> ApiKeyRecord {
    ApiKeyRecord {
        id: id.into(),
        platform: platform.into(),
        key_name: None,
        is_active: true,
        created_at: Utc::now(),
        last_used_at: None,
        key_preview: None,
    }
}

fn full_store() -> StaticKeyStore {
    StaticKeyStore::new()
        .with(
            record("kling-1", "kling"),
            Credentials::AccessKeyPair {
                access_key: "ak".into(),
                secret_key: "sk".into(),
            },
        )
        .with(
            record("comet-1", "cometapi"),
            Credentials::ApiKey("sk-comet".into()),
        )
}

struct Harness {
    router: ActionRouter<RecordingTransport>,
    transport: RecordingTransport,
    sink: Arc<MemoryUsageSink>,
}

fn harness_with(transport: RecordingTransport, store: StaticKeyStore) -> Harness {
    let store = Arc::new(store);
    let sink = Arc::new(MemoryUsageSink::new());
    let kling = Arc::new(
        KlingConfig::new(transport.clone(), store.clone()).with_base_url("https://kling.test"),
    );
    let comet = Arc::new(
        CometApiConfig::new(transport.clone(), store).with_base_url("https://comet.test"),
    );
    Harness {
        router: ActionRouter::new(kling, comet, UsageRecorder::new(sink.clone())),
        transport,
        sink,
    }
}

fn harness(transport: RecordingTransport) -> Harness {
    harness_with(transport, full_store())
}

fn body(value: Value) -> Vec<u8> {
    serde_json::to_vec(&value).expect("encode body")
}

#[tokio::test]
async fn missing_action_is_rejected_without_outbound_call() {
    let h = harness(RecordingTransport::new());
    let response = h
        .router
        .handle(Platform::Kling, &body(json!({"image": "https://x/a.png"})))
        .await;
    assert_eq!(response.status, 400);
    assert!(!response.envelope.success);
    assert_eq!(
        response.envelope.error.as_deref(),
        Some("Missing action parameter")
    );
    assert_eq!(h.transport.calls(), 0);
    assert!(h.sink.entries().is_empty());
}

#[tokio::test]
async fn unsupported_action_is_a_client_error() {
    let h = harness(RecordingTransport::new());
    let response = h
        .router
        .handle(Platform::CometApiNanobanana, &body(json!({"action": "video"})))
        .await;
    assert_eq!(response.status, 400);
    assert_eq!(
        response.envelope.error.as_deref(),
        Some("Unsupported action 'video' for platform cometapi-nanobanana")
    );
    assert_eq!(h.transport.calls(), 0);
}

#[tokio::test]
async fn invalid_parameter_is_rejected_before_dispatch() {
    let h = harness(RecordingTransport::new());
    let response = h
        .router
        .handle(
            Platform::CometApiSora,
            &body(json!({"action": "video", "prompt": "fox", "duration": "4", "width": 1, "height": 1})),
        )
        .await;
    assert_eq!(response.status, 400);
    assert_eq!(h.transport.calls(), 0);
    assert!(h.sink.entries().is_empty());
}

#[tokio::test]
async fn malformed_json_is_a_server_error() {
    let h = harness(RecordingTransport::new());
    let response = h.router.handle(Platform::Kling, b"{\"action\": ").await;
    assert_eq!(response.status, 500);
    assert!(!response.envelope.success);
    assert!(response.envelope.error.is_some());
    assert_eq!(h.transport.calls(), 0);
}

#[tokio::test]
async fn successful_call_records_one_success_entry() {
    let transport = RecordingTransport::new()
        .respond_json(json!({"code": 0, "data": {"task_id": "t-42", "task_status": "submitted"}}));
    let h = harness(transport);
    let response = h
        .router
        .handle(
            Platform::Kling,
            &body(json!({"action": "video", "image": ["https://x/a.png"], "prompt": "cat"})),
        )
        .await;

    assert_eq!(response.status, 200);
    assert!(response.envelope.success);
    assert!(response.envelope.duration.is_some());
    assert_eq!(h.transport.calls(), 1);

    let entries = h.sink.entries();
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert!(entry.success);
    assert_eq!(entry.platform, "kling");
    assert_eq!(entry.api_key_id, "kling-1");
    assert_eq!(entry.endpoint, "/v1/videos/image2video");
    assert_eq!(entry.method, "POST");
    assert_eq!(entry.status_code, 200);
    assert_eq!(entry.model.as_deref(), Some("kling-v1"));
    assert!(entry.error_message.is_none());
}

#[tokio::test]
async fn provider_failure_is_200_with_failure_entry() {
    let transport = RecordingTransport::new().respond_status(
        400,
        r#"{"error":{"message":"prompt rejected by safety system"}}"#,
    );
    let h = harness(transport);
    let response = h
        .router
        .handle(
            Platform::CometApiSeedream,
            &body(json!({"action": "image", "prompt": "owl"})),
        )
        .await;

    assert_eq!(response.status, 200);
    assert!(!response.envelope.success);
    assert_eq!(
        response.envelope.error.as_deref(),
        Some("prompt rejected by safety system")
    );

    let entries = h.sink.entries();
    assert_eq!(entries.len(), 1);
    assert!(!entries[0].success);
    assert_eq!(entries[0].status_code, 400);
    assert_eq!(
        entries[0].error_message.as_deref(),
        Some("prompt rejected by safety system")
    );
    assert_eq!(entries[0].platform, "cometapi-seedream");
}

#[tokio::test]
async fn missing_credential_is_500_and_still_recorded() {
    let h = harness_with(RecordingTransport::new(), StaticKeyStore::new());
    let response = h
        .router
        .handle(
            Platform::CometApiVeo,
            &body(json!({"action": "video", "prompt": "rain"})),
        )
        .await;

    assert_eq!(response.status, 500);
    assert_eq!(
        response.envelope.error.as_deref(),
        Some("no active API key configured for cometapi")
    );
    assert_eq!(h.transport.calls(), 0);

    let entries = h.sink.entries();
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert!(!entry.success);
    assert_eq!(entry.status_code, 500);
    assert_eq!(entry.api_key_id, UNRESOLVED_KEY_ID);
    assert_eq!(entry.model.as_deref(), Some("veo3-fast"));
    assert!(entry
        .error_message
        .as_deref()
        .is_some_and(|m| !m.is_empty()));
}

#[tokio::test]
async fn status_action_routes_to_get_lookup() {
    let h = harness(RecordingTransport::new().respond_json(json!({"id": "video_9", "status": "in_progress"})));
    let response = h
        .router
        .handle(
            Platform::CometApiSora,
            &body(json!({"action": "status", "taskId": "video_9"})),
        )
        .await;
    assert_eq!(response.status, 200);
    let request = h.transport.last().expect("request");
    assert_eq!(request.method, "GET");
    assert_eq!(request.url, "https://comet.test/v1/videos/video_9");
    assert_eq!(h.sink.entries()[0].endpoint, "/v1/videos/{task_id}");
}

#[test]
fn planning_is_deterministic_and_keeps_explicit_values() {
    let request = GenerationRequest::from_value(json!({
        "action": "text",
        "prompt": "waves",
        "mode": "pro",
        "aspect_ratio": "9:16"
    }))
    .expect("request");
    let first = AdapterRequest::plan(Platform::Kling, &request).expect("plan");
    let second = AdapterRequest::plan(Platform::Kling, &request).expect("plan");
    assert_eq!(first, second);
    match first {
        AdapterRequest::KlingTextToVideo(params) => {
            assert_eq!(params.mode, "pro");
            assert_eq!(params.aspect_ratio, "9:16");
            assert_eq!(params.duration, "5");
        }
        other => panic!("unexpected plan: {other:?}"),
    }
}

#[test]
fn every_platform_rejects_unknown_actions() {
    let request = GenerationRequest::from_value(json!({"action": "lipsync"})).expect("request");
    for platform in Platform::ALL {
        let err = AdapterRequest::plan(platform, &request).unwrap_err();
        assert_eq!(err.status_code(), 400);
    }
}
