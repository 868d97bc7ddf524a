// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes backing the activity viewer.

use crate::error::{AppError, Result};
use crate::models::Resolution;
use crate::services::RideReport;
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

const DEFAULT_ACTIVITY_TYPE: &str = "Ride";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/ride", get(get_ride))
}

#[derive(Deserialize)]
struct RideQuery {
    /// Activity category tag to look for (Ride, Run, Hike, ...)
    #[serde(rename = "type")]
    activity_type: Option<String>,
    /// Stream resolution (low, medium, high, all)
    #[serde(default)]
    resolution: Resolution,
}

/// Fetch the athlete profile, their latest activity of the requested type,
/// and that activity's streams and plotting table.
async fn get_ride(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RideQuery>,
) -> Result<Json<RideReport>> {
    let activity_type = params
        .activity_type
        .as_deref()
        .map(str::trim)
        .unwrap_or(DEFAULT_ACTIVITY_TYPE);
    if activity_type.is_empty() {
        return Err(AppError::BadRequest("type must not be empty".to_string()));
    }

    tracing::info!(
        activity_type,
        resolution = params.resolution.as_str(),
        "Fetching Strava data"
    );

    let report = state
        .activity_service
        .fetch_ride_report(activity_type, params.resolution)
        .await?;

    Ok(Json(report))
}
