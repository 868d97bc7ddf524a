// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Activity telemetry streams (`/activities/{id}/streams?key_by_type=true`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Stream keys requested from Strava.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamType {
    Time,
    VelocitySmooth,
    Distance,
    Altitude,
    Heartrate,
    Cadence,
    Watts,
    Latlng,
}

impl StreamType {
    /// Every stream type, in the order they are requested by default.
    pub const ALL: [StreamType; 8] = [
        StreamType::Time,
        StreamType::VelocitySmooth,
        StreamType::Distance,
        StreamType::Altitude,
        StreamType::Heartrate,
        StreamType::Cadence,
        StreamType::Watts,
        StreamType::Latlng,
    ];

    /// Key used by Strava in requests and in the keyed response.
    pub fn as_str(self) -> &'static str {
        match self {
            StreamType::Time => "time",
            StreamType::VelocitySmooth => "velocity_smooth",
            StreamType::Distance => "distance",
            StreamType::Altitude => "altitude",
            StreamType::Heartrate => "heartrate",
            StreamType::Cadence => "cadence",
            StreamType::Watts => "watts",
            StreamType::Latlng => "latlng",
        }
    }

    /// Comma-separated `keys` query parameter.
    pub fn join(types: &[StreamType]) -> String {
        types
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for StreamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sampling resolution for stream requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    Low,
    Medium,
    #[default]
    High,
    All,
}

impl Resolution {
    pub fn as_str(self) -> &'static str {
        match self {
            Resolution::Low => "low",
            Resolution::Medium => "medium",
            Resolution::High => "high",
            Resolution::All => "all",
        }
    }
}

/// One sample of a stream.
///
/// Most streams are numeric; `latlng` carries coordinate pairs and `moving`
/// carries booleans.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StreamSample {
    Scalar(f64),
    Point([f64; 2]),
    Flag(bool),
}

impl StreamSample {
    /// Numeric value, if this is a scalar sample.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StreamSample::Scalar(v) => Some(*v),
            _ => None,
        }
    }
}

/// A single telemetry series. Missing samples are kept as `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stream {
    pub data: Vec<Option<StreamSample>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
}

impl Stream {
    /// Samples as numbers; non-numeric and missing samples become `None`.
    pub fn values(&self) -> Vec<Option<f64>> {
        self.data
            .iter()
            .map(|s| s.as_ref().and_then(StreamSample::as_f64))
            .collect()
    }
}

/// Streams of one activity keyed by type name.
///
/// Strava omits types the activity has no data for, so any lookup may miss.
/// Unknown keys are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamBundle(BTreeMap<String, Stream>);

impl StreamBundle {
    pub fn get(&self, stream_type: StreamType) -> Option<&Stream> {
        self.0.get(stream_type.as_str())
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Stream> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
