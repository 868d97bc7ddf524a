// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity lookup service.
//!
//! Handles the core workflow:
//! 1. Get a valid bearer header (refreshing the token if needed)
//! 2. Page through the athlete's activities to find the first of a type
//! 3. Fetch that activity's telemetry streams
//! 4. Shape the streams into plotting columns

use crate::error::{AppError, Result};
use crate::models::{
    ActivitySummary, AthleteProfile, Resolution, StreamBundle, StreamTable, StreamType,
};
use crate::services::credentials::CredentialManager;
use crate::services::scanner::{PageError, PageSource, PagedScanner};
use crate::services::strava::StravaClient;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

/// Everything shown for one activity lookup.
#[derive(Debug, Clone, Serialize)]
pub struct RideReport {
    pub athlete: AthleteProfile,
    /// First activity of the requested type, newest first.
    pub activity: Option<ActivitySummary>,
    pub streams: Option<StreamBundle>,
    pub table: StreamTable,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_speed_kmh: Option<f64>,
}

/// The athlete's activity listing, authenticated with a fresh header per page.
struct ActivityPages<'a> {
    client: &'a StravaClient,
    credentials: &'a CredentialManager,
}

#[async_trait]
impl<'a> PageSource<ActivitySummary> for ActivityPages<'a> {
    async fn fetch_page(
        &self,
        page: u32,
        per_page: u32,
    ) -> std::result::Result<Vec<ActivitySummary>, PageError> {
        // A failed refresh must surface, even when the token endpoint is unreachable.
        let auth = self
            .credentials
            .auth_header()
            .await
            .map_err(PageError::Setup)?;
        let activities = self.client.list_activities(&auth, page, per_page).await?;
        tracing::debug!(page, count = activities.len(), "Fetched activity page");
        Ok(activities)
    }
}

/// High-level Strava service combining credentials, paging and stream fetch.
#[derive(Clone)]
pub struct ActivityService {
    client: StravaClient,
    credentials: Arc<CredentialManager>,
    scanner: PagedScanner,
}

impl ActivityService {
    pub fn new(
        client: StravaClient,
        credentials: Arc<CredentialManager>,
        scanner: PagedScanner,
    ) -> Self {
        Self {
            client,
            credentials,
            scanner,
        }
    }

    pub fn credentials(&self) -> &CredentialManager {
        &self.credentials
    }

    /// Get authenticated athlete profile.
    pub async fn get_athlete(&self) -> Result<AthleteProfile> {
        let auth = self.credentials.auth_header().await?;
        self.client.get_athlete(&auth).await
    }

    /// Find the most recent activity with the given category tag.
    pub async fn find_first_activity(&self, activity_type: &str) -> Result<Option<ActivitySummary>> {
        let pages = ActivityPages {
            client: &self.client,
            credentials: &self.credentials,
        };

        let found = self
            .scanner
            .find_first(&pages, |activity: &ActivitySummary| {
                tracing::debug!(
                    activity_id = activity.id,
                    activity_type = %activity.activity_type,
                    "Checking activity"
                );
                activity.is_type(activity_type)
            })
            .await?;

        match &found {
            Some(activity) => {
                tracing::info!(activity_id = activity.id, activity_type, "Found activity")
            }
            None => tracing::info!(activity_type, "No matching activity found"),
        }
        Ok(found)
    }

    /// Fetch streams for an activity.
    ///
    /// A 401 is retried once after forcing a token refresh; every other
    /// failure is returned to the caller untouched.
    pub async fn get_activity_streams(
        &self,
        activity_id: u64,
        stream_types: &[StreamType],
        resolution: Resolution,
    ) -> Result<StreamBundle> {
        let auth = self.credentials.auth_header().await?;
        match self
            .client
            .get_activity_streams(&auth, activity_id, stream_types, resolution)
            .await
        {
            Err(AppError::Unauthorized) => {
                let auth = self.credentials.refresh_rejected(&auth).await?;
                self.client
                    .get_activity_streams(&auth, activity_id, stream_types, resolution)
                    .await
            }
            other => other,
        }
    }

    /// Athlete, first activity of `activity_type`, its streams and table.
    pub async fn fetch_ride_report(
        &self,
        activity_type: &str,
        resolution: Resolution,
    ) -> Result<RideReport> {
        let athlete = self.get_athlete().await?;
        let activity = self.find_first_activity(activity_type).await?;

        let streams = match &activity {
            Some(activity) => Some(
                self.get_activity_streams(activity.id, &StreamType::ALL, resolution)
                    .await?,
            ),
            None => None,
        };

        let table = streams
            .as_ref()
            .map(StreamTable::from_bundle)
            .unwrap_or_default();
        if streams.is_some() && !table.has_speed_profile() {
            tracing::warn!("Speed or time data not available for this activity");
        }

        Ok(RideReport {
            athlete,
            average_speed_kmh: table.average_speed_kmh(),
            activity,
            streams,
            table,
        })
    }
}
