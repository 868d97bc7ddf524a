// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava athlete and activity listing models.

use serde::{Deserialize, Serialize};

/// Summary activity from the `/athlete/activities` listing.
///
/// Only the fields used for matching are typed; everything else Strava sends
/// is kept as-is so it can be handed back to the client untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitySummary {
    pub id: u64,
    pub name: String,
    /// Legacy category tag (Ride, Run, Hike, etc.)
    #[serde(rename = "type")]
    pub activity_type: String,
    /// Finer-grained category (MountainBikeRide, TrailRun, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sport_type: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ActivitySummary {
    /// Whether this activity carries the given category tag.
    pub fn is_type(&self, activity_type: &str) -> bool {
        self.activity_type == activity_type
    }
}

/// Authenticated athlete profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AthleteProfile {
    pub id: u64,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
