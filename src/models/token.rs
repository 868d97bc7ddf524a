// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth grant as persisted in the token file.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The current OAuth grant.
///
/// `expires_at` is Unix epoch seconds; 0 means the access token must be
/// treated as already expired.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Bearer token (empty if never obtained)
    #[serde(default)]
    pub access_token: String,
    /// Long-lived token exchanged for new access tokens
    pub refresh_token: String,
    /// When the access token expires (epoch seconds)
    #[serde(default)]
    pub expires_at: i64,
    /// Granted OAuth scopes, as reported by Strava
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl CredentialRecord {
    /// Seed record for a refresh token with no access token yet.
    pub fn seed(refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: String::new(),
            refresh_token: refresh_token.into(),
            expires_at: 0,
            scope: None,
        }
    }

    /// Whether the access token must be refreshed before use at `now`.
    ///
    /// Strictly greater-than: a token expiring at exactly `now` is still
    /// valid for that second. `margin_secs` moves the cutoff earlier.
    pub fn is_expired_at(&self, now: i64, margin_secs: i64) -> bool {
        now.saturating_add(margin_secs) > self.expires_at
    }

    /// Merge a token endpoint response into this record.
    pub fn apply_refresh(&mut self, response: TokenRefreshResponse) {
        self.access_token = response.access_token;
        self.expires_at = response.expires_at;
        if let Some(refresh_token) = response.refresh_token.filter(|t| !t.is_empty()) {
            self.refresh_token = refresh_token;
        }
        if response.scope.is_some() {
            self.scope = response.scope;
        }
    }
}

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("access_token", &redact(&self.access_token))
            .field("refresh_token", &redact(&self.refresh_token))
            .field("expires_at", &self.expires_at)
            .field("scope", &self.scope)
            .finish()
    }
}

fn redact(token: &str) -> &'static str {
    if token.is_empty() {
        "<empty>"
    } else {
        "<redacted>"
    }
}

/// Token refresh response from Strava.
#[derive(Clone, Deserialize)]
pub struct TokenRefreshResponse {
    pub access_token: String,
    pub expires_at: i64,
    /// Strava may rotate the refresh token on any refresh.
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}
