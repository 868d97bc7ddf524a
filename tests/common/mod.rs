// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use strava_streams::config::Config;
use strava_streams::models::CredentialRecord;
use strava_streams::routes::create_router;
use strava_streams::services::{
    ActivityService, CredentialManager, FileTokenStore, PagedScanner, ReqwestTransport,
    StravaClient, TokenStore,
};
use strava_streams::time_utils::now_epoch_secs;
use strava_streams::AppState;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN_PATH: &str = "/oauth/token";

/// Strava client pointed at the mock server.
#[allow(dead_code)]
pub fn test_client(server: &MockServer) -> StravaClient {
    let transport = Arc::new(
        ReqwestTransport::new(Duration::from_secs(5)).expect("Failed to build transport"),
    );
    StravaClient::new(
        "test_client_id".to_string(),
        "test_secret".to_string(),
        transport,
    )
    .with_endpoints(&server.uri(), &format!("{}{}", server.uri(), TOKEN_PATH))
}

/// A record whose access token stays valid for an hour.
#[allow(dead_code)]
pub fn valid_record(access_token: &str) -> CredentialRecord {
    CredentialRecord {
        access_token: access_token.to_string(),
        refresh_token: "stored_refresh".to_string(),
        expires_at: now_epoch_secs() + 3600,
        scope: Some("read,activity:read_all".to_string()),
    }
}

/// Write `record` to a token file and return a store for it.
#[allow(dead_code)]
pub async fn store_with(dir: &Path, record: &CredentialRecord) -> Arc<FileTokenStore> {
    let store = Arc::new(FileTokenStore::new(dir.join("strava_tokens.json")));
    store.save(record).await.expect("Failed to seed token file");
    store
}

/// Mount a token endpoint answering every refresh with `access_token`.
#[allow(dead_code)]
pub async fn mount_refresh(server: &MockServer, access_token: &str, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token_type": "Bearer",
            "access_token": access_token,
            "refresh_token": "rotated_refresh",
            "expires_at": now_epoch_secs() + 21600,
            "expires_in": 21600
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

/// Number of requests the mock server saw for `request_path`.
#[allow(dead_code)]
pub async fn request_count(server: &MockServer, request_path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == request_path)
        .count()
}

/// Activity service with a still-valid stored token.
#[allow(dead_code)]
pub async fn test_service(server: &MockServer, dir: &Path, page_size: u32) -> ActivityService {
    let client = test_client(server);
    let store = store_with(dir, &valid_record("valid_access")).await;
    let credentials = CredentialManager::initialize(client.clone(), store, None, 0)
        .await
        .expect("Failed to initialize credentials");
    ActivityService::new(
        client,
        Arc::new(credentials),
        PagedScanner::new(page_size, 10),
    )
}

/// Create a test app backed by the mock server.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub async fn create_test_app(server: &MockServer, dir: &Path) -> (axum::Router, Arc<AppState>) {
    let config = Config {
        api_base_url: server.uri(),
        token_url: format!("{}{}", server.uri(), TOKEN_PATH),
        token_file: dir.join("strava_tokens.json"),
        page_size: 2,
        ..Config::default()
    };
    let activity_service = test_service(server, dir, config.page_size).await;

    let state = Arc::new(AppState {
        config,
        activity_service,
    });

    (create_router(state.clone()), state)
}
