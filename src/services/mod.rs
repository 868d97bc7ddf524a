// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod activity;
pub mod credentials;
pub mod http;
pub mod scanner;
pub mod strava;
pub mod token_store;

pub use activity::{ActivityService, RideReport};
pub use credentials::{AuthHeader, CredentialManager};
pub use http::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
pub use scanner::{PageError, PageSource, PagedScanner, ScanState};
pub use strava::StravaClient;
pub use token_store::{FileTokenStore, TokenStore};
