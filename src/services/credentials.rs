// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth credential lifecycle: load or seed, expiry check, refresh, persist.

use crate::error::AppError;
use crate::models::CredentialRecord;
use crate::services::strava::StravaClient;
use crate::services::token_store::TokenStore;
use crate::time_utils::{format_epoch, now_epoch_secs};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// A ready-to-send `Authorization: Bearer ...` header.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthHeader {
    value: String,
}

impl AuthHeader {
    pub const NAME: &'static str = "Authorization";

    fn bearer(access_token: &str) -> Self {
        Self {
            value: format!("Bearer {}", access_token),
        }
    }

    /// Full header value, including the `Bearer ` prefix.
    pub fn value(&self) -> &str {
        &self.value
    }

    fn access_token(&self) -> &str {
        self.value.strip_prefix("Bearer ").unwrap_or(&self.value)
    }
}

impl fmt::Debug for AuthHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthHeader(Bearer <redacted>)")
    }
}

/// Owns the OAuth grant and hands out valid bearer headers.
///
/// Every header request re-checks expiry and refreshes when needed. The
/// check and the refresh run under one lock, so concurrent callers never
/// start two refreshes that would each persist a different token pair.
pub struct CredentialManager {
    client: StravaClient,
    store: Arc<dyn TokenStore>,
    refresh_margin_secs: i64,
    record: Mutex<CredentialRecord>,
    /// Mirror of `record.expires_at`, readable while a refresh holds the lock.
    expires_at: AtomicI64,
}

impl CredentialManager {
    /// Load the stored grant (or seed one) and make sure it is current.
    ///
    /// Returns only once the access token is valid, so the first request
    /// made with this manager never has to wait on a refresh.
    pub async fn initialize(
        client: StravaClient,
        store: Arc<dyn TokenStore>,
        seed_refresh_token: Option<String>,
        refresh_margin_secs: i64,
    ) -> Result<Self, AppError> {
        let record = match store.load().await? {
            Some(record) => {
                tracing::info!(
                    expires_at = %format_epoch(record.expires_at),
                    "Loaded stored Strava credentials"
                );
                record
            }
            None => {
                let refresh_token = seed_refresh_token
                    .filter(|t| !t.trim().is_empty())
                    .ok_or(AppError::ConfigurationMissing("STRAVA_REFRESH_TOKEN"))?;
                tracing::info!("No stored credentials, seeding from configured refresh token");
                CredentialRecord::seed(refresh_token)
            }
        };

        let manager = Self {
            client,
            store,
            refresh_margin_secs,
            expires_at: AtomicI64::new(record.expires_at),
            record: Mutex::new(record),
        };

        {
            let mut record = manager.record.lock().await;
            if manager.needs_refresh(&record) {
                manager.refresh_locked(&mut record).await?;
            }
        }

        Ok(manager)
    }

    /// Header for the next Strava request, refreshing first if expired.
    pub async fn auth_header(&self) -> Result<AuthHeader, AppError> {
        let mut record = self.record.lock().await;
        if self.needs_refresh(&record) {
            self.refresh_locked(&mut record).await?;
        }
        bearer_for(&record)
    }

    /// Recover from a 401 on `rejected`.
    ///
    /// Refreshes only if the rejected token is still the current one; when
    /// another caller already replaced it, the newer header is returned as-is.
    pub async fn refresh_rejected(&self, rejected: &AuthHeader) -> Result<AuthHeader, AppError> {
        let mut record = self.record.lock().await;
        if rejected.access_token() == record.access_token {
            tracing::info!("Access token rejected by Strava, forcing refresh");
            self.refresh_locked(&mut record).await?;
        } else {
            tracing::debug!("Rejected token already replaced, reusing current one");
        }
        bearer_for(&record)
    }

    /// Copy of the in-memory record. Waits for any refresh in flight.
    pub async fn snapshot(&self) -> CredentialRecord {
        self.record.lock().await.clone()
    }

    /// Expiry of the current access token, without waiting on a refresh.
    pub fn expires_at(&self) -> i64 {
        self.expires_at.load(Ordering::Acquire)
    }

    fn needs_refresh(&self, record: &CredentialRecord) -> bool {
        record.is_expired_at(now_epoch_secs(), self.refresh_margin_secs)
    }

    /// Refresh while holding the record lock.
    ///
    /// The new record is persisted before it replaces the in-memory one, so
    /// on any failure memory and disk still agree on the previous grant.
    async fn refresh_locked(&self, record: &mut CredentialRecord) -> Result<(), AppError> {
        tracing::info!(
            expires_at = %format_epoch(record.expires_at),
            "Access token expired, refreshing"
        );

        let response = self.client.refresh_token(&record.refresh_token).await?;
        if response.access_token.is_empty() {
            return Err(AppError::InvalidResponse(
                "Token response has an empty access_token".to_string(),
            ));
        }

        let mut updated = record.clone();
        updated.apply_refresh(response);
        self.store.save(&updated).await?;
        *record = updated;
        self.expires_at.store(record.expires_at, Ordering::Release);

        tracing::info!(
            expires_at = %format_epoch(record.expires_at),
            "Token refreshed and persisted"
        );
        Ok(())
    }
}

fn bearer_for(record: &CredentialRecord) -> Result<AuthHeader, AppError> {
    if record.access_token.is_empty() {
        return Err(AppError::InvalidToken);
    }
    Ok(AuthHeader::bearer(&record.access_token))
}
