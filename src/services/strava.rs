// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client for listing activities and fetching their streams.
//!
//! Handles:
//! - Paginated activity listing
//! - Activity stream fetching with per-status error mapping
//! - Athlete profile lookup
//! - The refresh-token grant against the OAuth token endpoint

use crate::config::{DEFAULT_API_BASE_URL, DEFAULT_TOKEN_URL};
use crate::error::AppError;
use crate::models::{
    ActivitySummary, AthleteProfile, Resolution, StreamBundle, StreamType, TokenRefreshResponse,
};
use crate::services::credentials::AuthHeader;
use crate::services::http::{HttpRequest, HttpResponse, HttpTransport};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Longest error body carried in an error value.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    token_url: String,
    client_id: String,
    client_secret: String,
}

impl StravaClient {
    /// Create a new Strava client with OAuth credentials.
    pub fn new(client_id: String, client_secret: String, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            base_url: DEFAULT_API_BASE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            client_id,
            client_secret,
        }
    }

    /// Point the client at different API and token endpoints.
    pub fn with_endpoints(mut self, base_url: &str, token_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self.token_url = token_url.to_string();
        self
    }

    /// List the athlete's activities, newest first (one page).
    pub async fn list_activities(
        &self,
        auth: &AuthHeader,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<ActivitySummary>, AppError> {
        let request = HttpRequest::get(format!("{}/athlete/activities", self.base_url))
            .header(AuthHeader::NAME, auth.value())
            .query("per_page", per_page)
            .query("page", page);

        let activities: Option<Vec<ActivitySummary>> =
            self.execute_json(request, "activity list").await?;
        Ok(activities.unwrap_or_default())
    }

    /// Get authenticated athlete profile.
    pub async fn get_athlete(&self, auth: &AuthHeader) -> Result<AthleteProfile, AppError> {
        let request = HttpRequest::get(format!("{}/athlete", self.base_url))
            .header(AuthHeader::NAME, auth.value());
        self.execute_json(request, "athlete").await
    }

    /// Fetch telemetry streams for one activity, keyed by type.
    ///
    /// An empty `stream_types` requests every known type. Strava leaves out
    /// types the activity has no data for.
    pub async fn get_activity_streams(
        &self,
        auth: &AuthHeader,
        activity_id: u64,
        stream_types: &[StreamType],
        resolution: Resolution,
    ) -> Result<StreamBundle, AppError> {
        let all = StreamType::ALL;
        let stream_types: &[StreamType] = if stream_types.is_empty() {
            &all
        } else {
            stream_types
        };

        let request = HttpRequest::get(format!(
            "{}/activities/{}/streams",
            self.base_url, activity_id
        ))
        .header(AuthHeader::NAME, auth.value())
        .query("keys", StreamType::join(stream_types))
        .query("key_by_type", "true")
        .query("resolution", resolution.as_str());

        let bundle: Option<StreamBundle> = self
            .execute_json(request, &format!("activity {}", activity_id))
            .await?;
        let bundle = bundle.unwrap_or_default();

        tracing::info!(
            activity_id,
            stream_types = bundle.len(),
            "Retrieved activity streams"
        );
        Ok(bundle)
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// Any non-2xx answer is [`AppError::TokenRefresh`]; nothing is retried.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenRefreshResponse, AppError> {
        if self.client_id.is_empty() {
            return Err(AppError::ConfigurationMissing("STRAVA_CLIENT_ID"));
        }
        if self.client_secret.is_empty() {
            return Err(AppError::ConfigurationMissing("STRAVA_CLIENT_SECRET"));
        }
        if refresh_token.is_empty() {
            return Err(AppError::ConfigurationMissing("STRAVA_REFRESH_TOKEN"));
        }

        let request = HttpRequest::post_form(
            self.token_url.clone(),
            vec![
                ("client_id".to_string(), self.client_id.clone()),
                ("client_secret".to_string(), self.client_secret.clone()),
                ("grant_type".to_string(), "refresh_token".to_string()),
                ("refresh_token".to_string(), refresh_token.to_string()),
            ],
        );

        let response = self.transport.send(request).await?;
        if !response.is_success() {
            tracing::error!(status = response.status, "Strava token refresh rejected");
            return Err(AppError::TokenRefresh {
                status: response.status,
                body: truncate(&response.body),
            });
        }

        serde_json::from_str(&response.body).map_err(|e| {
            AppError::InvalidResponse(format!("Failed to parse token response: {}", e))
        })
    }

    /// Send a request and parse a successful JSON body.
    async fn execute_json<T: DeserializeOwned>(
        &self,
        request: HttpRequest,
        resource: &str,
    ) -> Result<T, AppError> {
        let response = self.transport.send(request).await?;
        let response = check_response(response, resource)?;

        serde_json::from_str(&response.body)
            .map_err(|e| AppError::InvalidResponse(format!("JSON parse error for {}: {}", resource, e)))
    }
}

/// Check response status and return the matching error if not successful.
fn check_response(response: HttpResponse, resource: &str) -> Result<HttpResponse, AppError> {
    if response.is_success() {
        return Ok(response);
    }

    match response.status {
        401 => {
            tracing::warn!(resource, "Strava rejected the access token (401)");
            Err(AppError::Unauthorized)
        }
        403 => {
            tracing::warn!(resource, "Strava denied access (403)");
            Err(AppError::Forbidden)
        }
        404 => Err(AppError::NotFound(resource.to_string())),
        429 => {
            tracing::warn!(resource, "Strava rate limit hit (429)");
            Err(AppError::RateLimited)
        }
        status => {
            tracing::warn!(resource, status, "Strava request failed");
            Err(AppError::Provider {
                status,
                body: truncate(&response.body),
            })
        }
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(MAX_ERROR_BODY_CHARS).collect()
}
