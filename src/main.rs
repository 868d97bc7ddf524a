// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava-Streams API Server
//!
//! Serves the athlete's latest ride and its telemetry, keeping the Strava
//! OAuth grant fresh in a local token file.

use std::sync::Arc;
use strava_streams::{
    config::Config,
    services::{
        ActivityService, CredentialManager, FileTokenStore, PagedScanner, ReqwestTransport,
        StravaClient,
    },
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Strava-Streams API");

    let transport = Arc::new(ReqwestTransport::new(config.request_timeout)?);
    let client = StravaClient::new(
        config.strava_client_id.clone(),
        config.strava_client_secret.clone(),
        transport,
    )
    .with_endpoints(&config.api_base_url, &config.token_url);

    // Credentials must be valid before the first request is served
    let token_store = Arc::new(FileTokenStore::new(config.token_file.clone()));
    tracing::info!(path = %config.token_file.display(), "Loading Strava credentials");
    let credentials = CredentialManager::initialize(
        client.clone(),
        token_store,
        config.strava_refresh_token.clone(),
        config.token_refresh_margin_secs,
    )
    .await?;

    let activity_service = ActivityService::new(
        client,
        Arc::new(credentials),
        PagedScanner::new(config.page_size, config.max_pages),
    );

    let state = Arc::new(AppState {
        config: config.clone(),
        activity_service,
    });

    let app = strava_streams::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,strava_streams=debug"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
