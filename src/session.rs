use crate::api::ApiError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Durable home of the bearer token between runs
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn set_token(&self, token: &str) -> Result<(), ApiError>;

    async fn token(&self) -> Result<Option<String>, ApiError>;

    async fn clear(&self) -> Result<(), ApiError>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
}

/// Token persisted as `{"token": "..."}` in a JSON file
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<StoredSession, ApiError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => Ok(serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("Ignoring unreadable session file {}: {}", self.path.display(), e);
                StoredSession::default()
            })),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoredSession::default()),
            Err(e) => Err(ApiError::Storage(e.to_string())),
        }
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn set_token(&self, token: &str) -> Result<(), ApiError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ApiError::Storage(e.to_string()))?;
        }

        let stored = StoredSession {
            token: Some(token.to_string()),
        };
        let json = serde_json::to_string_pretty(&stored)
            .map_err(|e| ApiError::Storage(e.to_string()))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| ApiError::Storage(e.to_string()))?;

        debug!("Stored session token in {}", self.path.display());
        Ok(())
    }

    async fn token(&self) -> Result<Option<String>, ApiError> {
        Ok(self.read().await?.token.filter(|t| !t.is_empty()))
    }

    async fn clear(&self) -> Result<(), ApiError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!("Removed session file {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ApiError::Storage(e.to_string())),
        }
    }
}

/// Process-local store, used by tests and embedders that keep no state on disk
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.token.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn set_token(&self, token: &str) -> Result<(), ApiError> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    async fn token(&self) -> Result<Option<String>, ApiError> {
        Ok(self.slot().clone())
    }

    async fn clear(&self) -> Result<(), ApiError> {
        *self.slot() = None;
        Ok(())
    }
}
