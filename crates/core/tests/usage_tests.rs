use crate::core::error::GatewayError;
use crate::core::usage::{JsonlUsageSink, MemoryUsageSink, UsageRecorder, UsageSink};
use crate::gateway_types::UsageLogEntry;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn entry(success: bool) -> UsageLogEntry {
    UsageLogEntry {
        platform: "kling".into(),
        api_key_id: "key-1".into(),
        endpoint: "/v1/videos/image2video".into(),
        method: "POST".into(),
        status_code: if success { 200 } else { 500 },
        success,
        error_message: (!success).then(|| "Kling video generation failed".to_string()),
        duration: Some(120),
        model: Some("kling-v1".into()),
        created_at: Utc::now(),
    }
}

struct FailingSink {
    attempts: AtomicUsize,
}

#[async_trait]
impl UsageSink for FailingSink {
    async fn append(&self, _entry: &UsageLogEntry) -> Result<(), GatewayError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(GatewayError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only filesystem",
        )))
    }
}

#[tokio::test]
async fn recorder_swallows_sink_failures() {
    let sink = Arc::new(FailingSink {
        attempts: AtomicUsize::new(0),
    });
    let recorder = UsageRecorder::new(sink.clone());
    recorder.record(entry(true)).await;
    assert_eq!(sink.attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn memory_sink_keeps_entries_in_order() {
    let sink = Arc::new(MemoryUsageSink::new());
    let recorder = UsageRecorder::new(sink.clone());
    recorder.record(entry(true)).await;
    recorder.record(entry(false)).await;
    let entries = sink.entries();
    assert_eq!(entries.len(), 2);
    assert!(entries[0].success);
    assert!(!entries[1].success);
}

#[tokio::test]
async fn jsonl_sink_appends_one_camel_case_line_per_entry() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("logs").join("usage.jsonl");
    let sink = JsonlUsageSink::new(&path);
    sink.append(&entry(true)).await.expect("first append");
    sink.append(&entry(false)).await.expect("second append");

    let text = std::fs::read_to_string(&path).expect("log file");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    let second: serde_json::Value = serde_json::from_str(lines[1]).expect("json line");
    assert_eq!(second["apiKeyId"], "key-1");
    assert_eq!(second["statusCode"], 500);
    assert_eq!(second["success"], false);
    assert_eq!(second["errorMessage"], "Kling video generation failed");
}
