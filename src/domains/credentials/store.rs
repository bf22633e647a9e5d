//! Credential cache lookup.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// A cached credential as stored on disk: `{ "value": "...", "expiresAt": 1700000000000 }`.
///
/// `expiresAt` is an absolute timestamp in milliseconds since the Unix epoch.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub value: String,

    #[serde(default)]
    pub expires_at: Option<f64>,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("value", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl Credential {
    /// Whether the credential expired strictly before `now_ms`.
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        self.expires_at
            .is_some_and(|expires_at| expires_at < now_ms as f64)
    }
}

/// Outcome of a credential lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialLookup {
    Found(String),
    Missing,
    Expired,
    /// The cache entry exists but could not be read or parsed.
    Unreadable(String),
}

impl CredentialLookup {
    /// Collapse every outcome except `Found` into "no credential".
    pub fn into_value(self) -> Option<String> {
        match self {
            Self::Found(value) => Some(value),
            Self::Missing | Self::Expired | Self::Unreadable(_) => None,
        }
    }
}

/// Read access to cached credentials.
#[async_trait]
pub trait CredentialReader: Send + Sync {
    /// Look up the credential for `(workspace_id, source_slug)`.
    async fn lookup(&self, workspace_id: &str, source_slug: &str) -> CredentialLookup;

    /// The credential value, or `None` if it is absent, expired or unreadable.
    async fn read_credential(&self, workspace_id: &str, source_slug: &str) -> Option<String> {
        self.lookup(workspace_id, source_slug).await.into_value()
    }
}

/// Credential cache backed by JSON files under a root directory.
///
/// Layout: `<root>/<workspace>/<source-slug>.json`.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    root: PathBuf,
}

impl FileCredentialStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Cache file location for a (workspace, source) pair.
    pub fn credential_path(&self, workspace_id: &str, source_slug: &str) -> PathBuf {
        self.root
            .join(path_component(workspace_id))
            .join(format!("{}.json", path_component(source_slug)))
    }

    async fn lookup_at(&self, path: &Path, now_ms: i64) -> CredentialLookup {
        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return CredentialLookup::Missing,
            Err(e) => return CredentialLookup::Unreadable(e.to_string()),
        };

        let credential: Credential = match serde_json::from_str(&raw) {
            Ok(credential) => credential,
            Err(e) => return CredentialLookup::Unreadable(e.to_string()),
        };

        if credential.is_expired_at(now_ms) {
            CredentialLookup::Expired
        } else {
            CredentialLookup::Found(credential.value)
        }
    }
}

#[async_trait]
impl CredentialReader for FileCredentialStore {
    async fn lookup(&self, workspace_id: &str, source_slug: &str) -> CredentialLookup {
        let path = self.credential_path(workspace_id, source_slug);
        let lookup = self
            .lookup_at(&path, chrono::Utc::now().timestamp_millis())
            .await;
        match &lookup {
            CredentialLookup::Found(_) => debug!("Credential found for source {}", source_slug),
            CredentialLookup::Missing => {
                debug!("No credential cached at {}", path.display())
            }
            CredentialLookup::Expired => debug!("Credential for source {} expired", source_slug),
            CredentialLookup::Unreadable(reason) => {
                debug!("Ignoring unreadable credential {}: {}", path.display(), reason)
            }
        }
        lookup
    }
}

/// Keep identity strings from escaping the store root.
fn path_component(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.chars().all(|c| c == '.') {
        cleaned.replace('.', "_")
    } else {
        cleaned
    }
}

/// In-memory credential reader for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct StaticCredentials {
    values: std::collections::HashMap<(String, String), String>,
}

#[cfg(test)]
impl StaticCredentials {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with(
        mut self,
        workspace_id: &str,
        source_slug: &str,
        value: impl Into<String>,
    ) -> Self {
        self.values.insert(
            (workspace_id.to_string(), source_slug.to_string()),
            value.into(),
        );
        self
    }
}

#[cfg(test)]
#[async_trait]
impl CredentialReader for StaticCredentials {
    async fn lookup(&self, workspace_id: &str, source_slug: &str) -> CredentialLookup {
        self.values
            .get(&(workspace_id.to_string(), source_slug.to_string()))
            .cloned()
            .map_or(CredentialLookup::Missing, CredentialLookup::Found)
    }
}
