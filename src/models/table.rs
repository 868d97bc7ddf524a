// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Column-oriented view of an activity's streams, ready for plotting.

use super::streams::{StreamBundle, StreamType};
use serde::Serialize;

const SECONDS_PER_MINUTE: f64 = 60.0;
const SECONDS_PER_HOUR: f64 = 3600.0;
const MS_TO_KMH: f64 = 3.6;
const MS_TO_MPH: f64 = 2.237;
const METERS_PER_KM: f64 = 1000.0;

/// Plotting columns derived from a [`StreamBundle`].
///
/// A column is present only when its source stream was returned. Speed and
/// distance columns replace missing samples with 0; the raw series keep them
/// as `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StreamTable {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_seconds: Option<Vec<Option<f64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_minutes: Option<Vec<Option<f64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_hours: Option<Vec<Option<f64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed_ms: Option<Vec<Option<f64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed_kmh: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed_mph: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altitude: Option<Vec<Option<f64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heartrate: Option<Vec<Option<f64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cadence: Option<Vec<Option<f64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watts: Option<Vec<Option<f64>>>,
}

impl StreamTable {
    pub fn from_bundle(bundle: &StreamBundle) -> Self {
        let column = |t: StreamType| bundle.get(t).map(|s| s.values());
        let scaled = |col: &Vec<Option<f64>>, divisor: f64| {
            col.iter().map(|v| v.map(|v| v / divisor)).collect::<Vec<_>>()
        };
        let zero_filled = |col: &Vec<Option<f64>>, factor: f64| {
            col.iter()
                .map(|v| v.map_or(0.0, |v| v * factor))
                .collect::<Vec<_>>()
        };

        let time = column(StreamType::Time);
        let velocity = column(StreamType::VelocitySmooth);
        let distance = column(StreamType::Distance);

        Self {
            time_minutes: time.as_ref().map(|t| scaled(t, SECONDS_PER_MINUTE)),
            time_hours: time.as_ref().map(|t| scaled(t, SECONDS_PER_HOUR)),
            time_seconds: time,
            speed_kmh: velocity.as_ref().map(|v| zero_filled(v, MS_TO_KMH)),
            speed_mph: velocity.as_ref().map(|v| zero_filled(v, MS_TO_MPH)),
            speed_ms: velocity,
            distance_km: distance.as_ref().map(|d| {
                d.iter()
                    .map(|v| v.map_or(0.0, |v| v / METERS_PER_KM))
                    .collect()
            }),
            altitude: column(StreamType::Altitude),
            heartrate: column(StreamType::Heartrate),
            cadence: column(StreamType::Cadence),
            watts: column(StreamType::Watts),
        }
    }

    /// Number of rows (length of the longest column).
    pub fn rows(&self) -> usize {
        [
            self.time_seconds.as_ref().map(Vec::len),
            self.speed_kmh.as_ref().map(Vec::len),
            self.distance_km.as_ref().map(Vec::len),
            self.altitude.as_ref().map(Vec::len),
            self.heartrate.as_ref().map(Vec::len),
            self.cadence.as_ref().map(Vec::len),
            self.watts.as_ref().map(Vec::len),
        ]
        .into_iter()
        .flatten()
        .max()
        .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows() == 0
    }

    /// Whether both axes of the speed-over-time plot are available.
    pub fn has_speed_profile(&self) -> bool {
        self.time_minutes.is_some() && self.speed_kmh.is_some()
    }

    /// Mean of `speed_kmh`, drawn as the average line of the speed plot.
    pub fn average_speed_kmh(&self) -> Option<f64> {
        let speeds = self.speed_kmh.as_ref().filter(|s| !s.is_empty())?;
        Some(speeds.iter().sum::<f64>() / speeds.len() as f64)
    }
}
