use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::io::AsyncWriteExt;

use crate::core::error::GatewayError;
use crate::gateway_types::UsageLogEntry;

/// Append-only destination for usage-log entries.
#[async_trait]
pub trait UsageSink: Send + Sync {
    async fn append(&self, entry: &UsageLogEntry) -> Result<(), GatewayError>;
}

/// Records usage entries without ever failing the caller.
#[derive(Clone)]
pub struct UsageRecorder {
    sink: Arc<dyn UsageSink>,
}

impl UsageRecorder {
    pub fn new(sink: Arc<dyn UsageSink>) -> Self {
        Self { sink }
    }

    pub async fn record(&self, entry: UsageLogEntry) {
        if let Err(err) = self.sink.append(&entry).await {
            tracing::warn!(
                target: "genmedia::usage",
                platform = %entry.platform,
                endpoint = %entry.endpoint,
                error = %err,
                "failed to persist usage entry"
            );
        }
    }
}

/// Writes each entry as one JSON line.
pub struct JsonlUsageSink {
    path: PathBuf,
    lock: tokio::sync::Mutex<()>,
}

impl JsonlUsageSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: tokio::sync::Mutex::new(()),
        }
    }
}

#[async_trait]
impl UsageSink for JsonlUsageSink {
    async fn append(&self, entry: &UsageLogEntry) -> Result<(), GatewayError> {
        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');
        let _guard = self.lock.lock().await;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(&line).await?;
        file.flush().await?;
        Ok(())
    }
}

/// Emits each entry as a structured `tracing` event.
pub struct TracingUsageSink;

#[async_trait]
impl UsageSink for TracingUsageSink {
    async fn append(&self, entry: &UsageLogEntry) -> Result<(), GatewayError> {
        tracing::info!(
            target: "genmedia::usage",
            platform = %entry.platform,
            api_key_id = %entry.api_key_id,
            endpoint = %entry.endpoint,
            method = %entry.method,
            status_code = entry.status_code,
            success = entry.success,
            duration_ms = ?entry.duration,
            model = ?entry.model,
            error = ?entry.error_message,
            "provider call"
        );
        Ok(())
    }
}

/// Keeps entries in memory; handy for embedding hosts and tests.
#[derive(Default)]
pub struct MemoryUsageSink {
    entries: Mutex<Vec<UsageLogEntry>>,
}

impl MemoryUsageSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<UsageLogEntry> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl UsageSink for MemoryUsageSink {
    async fn append(&self, entry: &UsageLogEntry) -> Result<(), GatewayError> {
        self.entries
            .lock()
            .map_err(|_| GatewayError::configuration("usage log lock poisoned"))?
            .push(entry.clone());
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/usage_tests.rs"]
mod usage_tests;
