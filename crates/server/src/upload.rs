//! Image uploads for provider reference inputs.
//!
//! Accepted files are written into a public directory and served back under
//! a URL prefix, so providers can fetch them by URL.

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use chrono::Utc;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

pub const ALLOWED_TYPES: &[&str] = &["image/jpeg", "image/png"];

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No file uploaded")]
    MissingFile,
    #[error("Only JPEG and PNG images are allowed")]
    UnsupportedType { content_type: Option<String> },
    #[error("File exceeds the maximum size of {max_bytes} bytes")]
    TooLarge { max_bytes: usize },
    #[error("Malformed upload: {0}")]
    Malformed(String),
    #[error("Failed to store upload: {0}")]
    Io(#[from] std::io::Error),
}

impl UploadError {
    pub fn status(&self) -> StatusCode {
        match self {
            UploadError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

/// Where uploads go and how large they may be.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub dir: PathBuf,
    pub url_prefix: String,
    pub max_bytes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredUpload {
    pub url: String,
    pub filename: String,
    pub size: usize,
}

/// Replace every character outside `[A-Za-z0-9._-]` with `_`.
pub fn sanitize_filename(original: &str) -> String {
    let base = original.rsplit(['/', '\\']).next().unwrap_or(original);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Effective media type: the declared one, or a guess from the file name
/// when nothing useful was declared.
pub fn effective_type(content_type: Option<&str>, filename: &str) -> Option<String> {
    let declared = content_type
        .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase())
        .filter(|ct| !ct.is_empty() && ct != "application/octet-stream");
    declared.or_else(|| {
        mime_guess::from_path(filename)
            .first()
            .map(|m| m.essence_str().to_string())
    })
}

pub fn is_allowed_type(content_type: Option<&str>, filename: &str) -> bool {
    effective_type(content_type, filename)
        .is_some_and(|ct| ALLOWED_TYPES.contains(&ct.as_str()))
}

/// Write `data` as `<unix-millis>-<sanitized name>`, never overwriting.
pub async fn store_upload(
    policy: &UploadPolicy,
    original_name: &str,
    content_type: Option<&str>,
    data: &[u8],
) -> Result<StoredUpload, UploadError> {
    if !is_allowed_type(content_type, original_name) {
        return Err(UploadError::UnsupportedType {
            content_type: content_type.map(str::to_string),
        });
    }
    if data.len() > policy.max_bytes {
        return Err(UploadError::TooLarge {
            max_bytes: policy.max_bytes,
        });
    }

    tokio::fs::create_dir_all(&policy.dir).await?;
    let sanitized = sanitize_filename(original_name);
    let millis = Utc::now().timestamp_millis();
    let mut filename = format!("{millis}-{sanitized}");
    let mut file = match create_new(&policy.dir.join(&filename)).await {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::AlreadyExists => {
            let suffix = uuid::Uuid::new_v4().simple().to_string();
            filename = format!("{millis}-{}-{sanitized}", &suffix[..8]);
            create_new(&policy.dir.join(&filename)).await?
        }
        Err(err) => return Err(err.into()),
    };
    file.write_all(data).await?;
    file.flush().await?;

    Ok(StoredUpload {
        url: format!("{}/{}", policy.url_prefix.trim_end_matches('/'), filename),
        filename,
        size: data.len(),
    })
}

async fn create_new(path: &std::path::Path) -> std::io::Result<tokio::fs::File> {
    tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
}

fn map_multipart_error(err: MultipartError, max_bytes: usize) -> UploadError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadError::TooLarge { max_bytes }
    } else {
        UploadError::Malformed(err.body_text())
    }
}

/// Read a field, giving up as soon as it grows past `max_bytes`.
async fn read_limited(field: &mut Field<'_>, max_bytes: usize) -> Result<Vec<u8>, UploadError> {
    let mut data = Vec::new();
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|err| map_multipart_error(err, max_bytes))?
    {
        if data.len() + chunk.len() > max_bytes {
            return Err(UploadError::TooLarge { max_bytes });
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

/// Pull the `file` field out of a multipart body and store it.
pub async fn receive_upload(
    policy: &UploadPolicy,
    multipart: &mut Multipart,
) -> Result<StoredUpload, UploadError> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|err| map_multipart_error(err, policy.max_bytes))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(str::to_string);
        if !is_allowed_type(content_type.as_deref(), &filename) {
            return Err(UploadError::UnsupportedType { content_type });
        }
        let data = read_limited(&mut field, policy.max_bytes).await?;
        if data.is_empty() {
            return Err(UploadError::MissingFile);
        }
        return store_upload(policy, &filename, content_type.as_deref(), &data).await;
    }
    Err(UploadError::MissingFile)
}
