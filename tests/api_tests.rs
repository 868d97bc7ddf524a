// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP API tests.
//!
//! These tests drive the router end to end against a mock Strava:
//! 1. The health check answers without touching Strava
//! 2. `/api/ride` combines athlete, activity lookup and streams
//! 3. Strava failures map to JSON error bodies

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    response::Response,
};
use serde_json::{json, Value};
use std::time::Duration;
use strava_streams::time_utils::{format_epoch, now_epoch_secs};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::{create_test_app, request_count, TOKEN_PATH};

async fn get(app: axum::Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn mount_athlete(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/athlete"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1234,
            "firstname": "Ada",
            "lastname": "Rider",
            "city": "Palo Alto"
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_health_check() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let (app, _state) = create_test_app(&server, dir.path()).await;

    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert!(body["token_expires_at"].as_str().unwrap().ends_with('Z'));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_health_answers_during_slow_refresh() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let new_expiry = now_epoch_secs() + 21600;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "access_token": "slow_access",
                    "refresh_token": "rotated_refresh",
                    "expires_at": new_expiry
                }))
                .set_delay(Duration::from_secs(3)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (app, state) = create_test_app(&server, dir.path()).await;
    let old_expiry = state.activity_service.credentials().expires_at();

    let refresh_state = state.clone();
    let refresh = tokio::spawn(async move {
        let credentials = refresh_state.activity_service.credentials();
        let current = credentials.auth_header().await?;
        credentials.refresh_rejected(&current).await
    });
    // Let the refresh take the credential lock.
    tokio::time::sleep(Duration::from_millis(200)).await;

    let response = tokio::time::timeout(Duration::from_secs(1), get(app, "/health"))
        .await
        .expect("/health waited on the token refresh");
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["token_expires_at"], format_epoch(old_expiry));

    let header = refresh.await.expect("Task join failed").unwrap();
    assert_eq!(header.value(), "Bearer slow_access");
    assert_eq!(state.activity_service.credentials().expires_at(), new_expiry);
}

#[tokio::test]
async fn test_ride_report() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_athlete(&server).await;
    Mock::given(method("GET"))
        .and(path("/athlete/activities"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 7, "name": "Lunch Run", "type": "Run"},
            {"id": 8, "name": "Morning Ride", "type": "Ride", "distance": 20000.0}
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/activities/8/streams"))
        .and(query_param("resolution", "medium"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "time": {"data": [0, 60, 120]},
            "velocity_smooth": {"data": [5.0, 10.0, null]},
            "distance": {"data": [0.0, 300.0, 900.0]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (app, _state) = create_test_app(&server, dir.path()).await;
    let response = get(app, "/api/ride?resolution=medium").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["athlete"]["id"], 1234);
    assert_eq!(body["athlete"]["city"], "Palo Alto");
    assert_eq!(body["activity"]["id"], 8);
    assert_eq!(body["activity"]["name"], "Morning Ride");
    assert_eq!(body["streams"]["velocity_smooth"]["data"][2], Value::Null);
    assert_eq!(body["table"]["speed_kmh"], json!([18.0, 36.0, 0.0]));
    assert_eq!(body["table"]["distance_km"], json!([0.0, 0.3, 0.9]));
    assert_eq!(body["table"]["time_minutes"], json!([0.0, 1.0, 2.0]));
    assert_eq!(body["average_speed_kmh"], 18.0);
}

#[tokio::test]
async fn test_ride_report_without_match() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_athlete(&server).await;
    Mock::given(method("GET"))
        .and(path("/athlete/activities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 7, "name": "Lunch Run", "type": "Run"}
        ])))
        .mount(&server)
        .await;

    let (app, _state) = create_test_app(&server, dir.path()).await;
    let response = get(app, "/api/ride").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["activity"], Value::Null);
    assert_eq!(body["streams"], Value::Null);
    assert_eq!(body["table"], json!({}));
    assert_eq!(request_count(&server, "/athlete/activities").await, 1);
}

#[tokio::test]
async fn test_ride_report_custom_type() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_athlete(&server).await;
    Mock::given(method("GET"))
        .and(path("/athlete/activities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 5, "name": "Trail", "type": "Hike"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/activities/5/streams"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let (app, _state) = create_test_app(&server, dir.path()).await;
    let response = get(app, "/api/ride?type=Hike").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["activity"]["id"], 5);
    assert_eq!(body["streams"], json!({}));
}

#[tokio::test]
async fn test_empty_type_is_rejected() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let (app, _state) = create_test_app(&server, dir.path()).await;

    let response = get(app, "/api/ride?type=").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_rate_limit_maps_to_429() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    Mock::given(method("GET"))
        .and(path("/athlete"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let (app, _state) = create_test_app(&server, dir.path()).await;
    let response = get(app, "/api/ride").await;

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let body = json_body(response).await;
    assert_eq!(body["error"], "rate_limited");
}

#[tokio::test]
async fn test_forbidden_maps_to_403() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    Mock::given(method("GET"))
        .and(path("/athlete"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let (app, _state) = create_test_app(&server, dir.path()).await;
    let response = get(app, "/api/ride").await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = json_body(response).await;
    assert_eq!(body["error"], "forbidden");
}
