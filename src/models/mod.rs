// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod streams;
pub mod table;
pub mod token;

pub use activity::{ActivitySummary, AthleteProfile};
pub use streams::{Resolution, Stream, StreamBundle, StreamSample, StreamType};
pub use table::StreamTable;
pub use token::{CredentialRecord, TokenRefreshResponse};
