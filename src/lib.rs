// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava-Streams: fetch an athlete's latest ride and its telemetry
//!
//! This crate keeps a Strava OAuth grant fresh, pages through the athlete's
//! activities to find the first one of a given type, and turns its streams
//! into plotting-ready columns.

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::ActivityService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub activity_service: ActivityService,
}
