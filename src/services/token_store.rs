// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Durable storage for the OAuth grant.

use crate::error::AppError;
use crate::models::CredentialRecord;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Loads and saves the single credential record.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Returns `Ok(None)` when nothing usable has been stored yet.
    async fn load(&self) -> Result<Option<CredentialRecord>, AppError>;

    /// Replaces the stored record.
    async fn save(&self, record: &CredentialRecord) -> Result<(), AppError>;
}

/// JSON file token store.
///
/// Writes go to a sibling temp file which is fsynced and renamed over the
/// target, so a crash mid-write leaves the previous record intact.
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

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<CredentialRecord>, AppError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "Token file not found");
                return Ok(None);
            }
            Err(e) => {
                return Err(AppError::Io(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        match serde_json::from_str::<CredentialRecord>(&contents) {
            Ok(record) if record.refresh_token.is_empty() => {
                tracing::warn!(path = %self.path.display(), "Token file has no refresh token, ignoring it");
                Ok(None)
            }
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Token file is malformed, ignoring it"
                );
                Ok(None)
            }
        }
    }

    async fn save(&self, record: &CredentialRecord) -> Result<(), AppError> {
        let json = serde_json::to_vec_pretty(record).map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Failed to serialize tokens: {}", e))
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Io(format!("Failed to create token directory: {}", e)))?;
        }

        let temp_path = self.temp_path();
        {
            let mut file = tokio::fs::File::create(&temp_path)
                .await
                .map_err(|e| AppError::Io(format!("Failed to create temp token file: {}", e)))?;
            file.write_all(&json)
                .await
                .map_err(|e| AppError::Io(format!("Failed to write temp token file: {}", e)))?;
            file.sync_all()
                .await
                .map_err(|e| AppError::Io(format!("Failed to sync temp token file: {}", e)))?;
        }

        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| AppError::Io(format!("Failed to replace token file: {}", e)))?;

        tracing::debug!(path = %self.path.display(), "Tokens persisted");
        Ok(())
    }
}
