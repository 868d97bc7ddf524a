// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
///
/// Each Strava failure mode has its own variant so callers can branch on it
/// (back off on `RateLimited`, refresh and retry once on `Unauthorized`)
/// instead of matching on message text.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Missing required configuration: {0}")]
    ConfigurationMissing(&'static str),

    #[error("Token refresh failed with HTTP {status}: {body}")]
    TokenRefresh { status: u16, body: String },

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Strava rejected the access token")]
    Unauthorized,

    #[error("Access to this Strava resource is forbidden")]
    Forbidden,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Strava rate limit exceeded")]
    RateLimited,

    #[error("Strava API error: HTTP {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("Unexpected Strava response: {0}")]
    InvalidResponse(String),

    #[error("Token storage error: {0}")]
    Io(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Whether backing off and retrying the same call can succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Transport(_) | AppError::RateLimited => true,
            AppError::Provider { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Whether the failure means the user has to reconnect their account.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            AppError::Unauthorized | AppError::InvalidToken | AppError::TokenRefresh { .. }
        )
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message, details) = match &self {
            AppError::ConfigurationMissing(name) => {
                tracing::error!(setting = name, "Configuration missing");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "configuration_missing",
                    "Server is not configured for Strava access",
                    None,
                )
            }
            AppError::TokenRefresh { status, body } => {
                tracing::error!(status, body = %body, "Strava token refresh failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "token_refresh_failed",
                    "Could not refresh Strava access, reconnect your Strava account",
                    None,
                )
            }
            AppError::InvalidToken | AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Strava access was rejected, reconnect your Strava account",
                None,
            ),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                "forbidden",
                "You do not have permission to view this activity",
                None,
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                "not_found",
                "The requested activity was not found",
                Some(msg.clone()),
            ),
            AppError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "rate_limited",
                "Strava rate limit reached, try again later",
                None,
            ),
            AppError::Transport(msg) => (
                StatusCode::BAD_GATEWAY,
                "strava_unreachable",
                "Strava could not be reached, try again",
                Some(msg.clone()),
            ),
            AppError::Provider { status, body } => (
                StatusCode::BAD_GATEWAY,
                "strava_error",
                "Strava returned an error",
                Some(format!("HTTP {}: {}", status, body)),
            ),
            AppError::InvalidResponse(msg) => (
                StatusCode::BAD_GATEWAY,
                "strava_error",
                "Strava returned an unexpected response",
                Some(msg.clone()),
            ),
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                "bad_request",
                "Invalid request",
                Some(msg.clone()),
            ),
            AppError::Io(msg) => {
                tracing::error!(error = %msg, "Token storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "storage_error",
                    "Could not read or write stored credentials",
                    None,
                )
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error",
                    None,
                )
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            message: message.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
