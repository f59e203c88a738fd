//! Credential resolution for provider adapters.
//!
//! Key management lives outside this crate. Adapters only ever ask a
//! [`KeyStore`] for the currently active credential of a scope, on every call,
//! so activation changes take effect without a restart.

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::gateway_core::error::GatewayError;
use crate::gateway_types::keys::key_preview;
use crate::gateway_types::ApiKeyRecord;

/// Secret material paired with a key record.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Single API key, sent as a bearer token.
    ApiKey(String),
    /// Access/secret pair used to sign short-lived tokens.
    AccessKeyPair {
        access_key: String,
        secret_key: String,
    },
}

impl Credentials {
    pub fn as_bearer(&self) -> Option<String> {
        match self {
            Credentials::ApiKey(s) => Some(if s.to_lowercase().starts_with("bearer ") {
                s.clone()
            } else {
                format!("Bearer {}", s)
            }),
            _ => None,
        }
    }

    pub fn as_access_key_pair(&self) -> Option<(&str, &str)> {
        match self {
            Credentials::AccessKeyPair {
                access_key,
                secret_key,
            } => Some((access_key.as_str(), secret_key.as_str())),
            _ => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Credentials::ApiKey(_) => "api key",
            Credentials::AccessKeyPair { .. } => "access key pair",
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::ApiKey(key) => f.debug_tuple("ApiKey").field(&key_preview(key)).finish(),
            Credentials::AccessKeyPair { access_key, .. } => f
                .debug_struct("AccessKeyPair")
                .field("access_key", &key_preview(access_key))
                .field("secret_key", &"<redacted>")
                .finish(),
        }
    }
}

/// The active key record for a scope and its secret.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveCredential {
    pub record: ApiKeyRecord,
    pub credentials: Credentials,
}

impl ActiveCredential {
    /// Bearer header value, or `InvalidCredential` if this is not an API key.
    pub fn bearer(&self, scope: &str) -> Result<String, GatewayError> {
        self.credentials
            .as_bearer()
            .ok_or_else(|| wrong_kind(scope, "api key", &self.credentials))
    }

    /// Access/secret pair, or `InvalidCredential` if this is an API key.
    pub fn access_key_pair(&self, scope: &str) -> Result<(&str, &str), GatewayError> {
        self.credentials
            .as_access_key_pair()
            .ok_or_else(|| wrong_kind(scope, "access key pair", &self.credentials))
    }
}

fn wrong_kind(scope: &str, expected: &str, got: &Credentials) -> GatewayError {
    GatewayError::InvalidCredential {
        scope: scope.to_string(),
        message: format!("expected {expected}, found {}", got.kind()),
    }
}

/// Read-only view of the external key-management store.
#[async_trait]
pub trait KeyStore: Send + Sync {
    /// Active credential for `scope` (`kling`, `cometapi`), if one exists.
    async fn active_credential(&self, scope: &str)
        -> Result<Option<ActiveCredential>, GatewayError>;
}

/// Resolve the active credential or fail with `MissingCredential`.
pub async fn require_credential(
    store: &dyn KeyStore,
    scope: &str,
) -> Result<ActiveCredential, GatewayError> {
    store
        .active_credential(scope)
        .await?
        .ok_or_else(|| GatewayError::MissingCredential {
            scope: scope.to_string(),
        })
}

fn first_active<'a, I>(entries: I, scope: &str) -> Option<&'a ActiveCredential>
where
    I: IntoIterator<Item = &'a ActiveCredential>,
{
    entries
        .into_iter()
        .find(|c| c.record.is_active && c.record.platform.eq_ignore_ascii_case(scope))
}

/// In-memory key store.
#[derive(Debug, Default)]
pub struct StaticKeyStore {
    entries: RwLock<Vec<ActiveCredential>>,
}

impl StaticKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, record: ApiKeyRecord, credentials: Credentials) -> Self {
        self.insert(record, credentials);
        self
    }

    pub fn insert(&self, record: ApiKeyRecord, credentials: Credentials) {
        if let Ok(mut entries) = self.entries.write() {
            entries.push(ActiveCredential {
                record,
                credentials,
            });
        }
    }

    /// Flip the active flag of key `id`. Returns false when no such key exists.
    pub fn set_active(&self, id: &str, active: bool) -> bool {
        let Ok(mut entries) = self.entries.write() else {
            return false;
        };
        match entries.iter_mut().find(|c| c.record.id == id) {
            Some(entry) => {
                entry.record.is_active = active;
                true
            }
            None => false,
        }
    }

    pub fn records(&self) -> Vec<ApiKeyRecord> {
        self.entries
            .read()
            .map(|entries| entries.iter().map(|c| c.record.clone()).collect())
            .unwrap_or_default()
    }

    /// Seed from `KLING_ACCESS_KEY`/`KLING_SECRET_KEY` and `COMETAPI_KEY`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let store = Self::new();
        if let (Some(access_key), Some(secret_key)) =
            (get("KLING_ACCESS_KEY"), get("KLING_SECRET_KEY"))
        {
            let record = env_record("kling", &access_key);
            store.insert(
                record,
                Credentials::AccessKeyPair {
                    access_key,
                    secret_key,
                },
            );
        }
        if let Some(key) = get("COMETAPI_KEY") {
            store.insert(env_record("cometapi", &key), Credentials::ApiKey(key));
        }
        store
    }
}

fn env_record(scope: &str, secret: &str) -> ApiKeyRecord {
    ApiKeyRecord {
        id: format!("env-{scope}"),
        platform: scope.to_string(),
        key_name: Some("environment".to_string()),
        is_active: true,
        created_at: Utc::now(),
        last_used_at: None,
        key_preview: Some(key_preview(secret)),
    }
}

#[async_trait]
impl KeyStore for StaticKeyStore {
    async fn active_credential(
        &self,
        scope: &str,
    ) -> Result<Option<ActiveCredential>, GatewayError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| GatewayError::configuration("key store lock poisoned"))?;
        Ok(first_active(entries.iter(), scope).cloned())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredKey {
    #[serde(flatten)]
    record: ApiKeyRecord,
    #[serde(default)]
    secret: Option<String>,
    #[serde(default)]
    access_key: Option<String>,
    #[serde(default)]
    secret_key: Option<String>,
}

impl StoredKey {
    fn into_credential(self) -> Result<ActiveCredential, GatewayError> {
        let credentials = match (self.access_key, self.secret_key, self.secret) {
            (Some(access_key), Some(secret_key), _) => Credentials::AccessKeyPair {
                access_key,
                secret_key,
            },
            (_, _, Some(secret)) => Credentials::ApiKey(secret),
            _ => {
                return Err(GatewayError::InvalidCredential {
                    scope: self.record.platform.clone(),
                    message: format!("key {} has no secret material", self.record.id),
                })
            }
        };
        Ok(ActiveCredential {
            record: self.record,
            credentials,
        })
    }
}

/// Key store backed by a JSON array file, re-read on every lookup.
///
/// Each element is an `ApiKeyRecord` plus either `secret` or the
/// `accessKey`/`secretKey` pair.
#[derive(Debug, Clone)]
pub struct FileKeyStore {
    path: PathBuf,
}

impl FileKeyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl KeyStore for FileKeyStore {
    async fn active_credential(
        &self,
        scope: &str,
    ) -> Result<Option<ActiveCredential>, GatewayError> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        let stored: Vec<StoredKey> = serde_json::from_str(&raw)?;
        let candidate = stored
            .into_iter()
            .find(|k| k.record.is_active && k.record.platform.eq_ignore_ascii_case(scope));
        candidate.map(StoredKey::into_credential).transpose()
    }
}

#[cfg(test)]
#[path = "../tests/keystore_tests.rs"]
mod keystore_tests;
