// ABOUTME: Activity metadata model with identifier newtype and per-kilometre split efforts
// ABOUTME: Provides the builder used by ingestion code and tests to assemble activities
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::SportType;

/// Provider-assigned activity identifier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ActivityId(String);

impl ActivityId {
    /// Create an activity id from a provider string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActivityId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<ActivityId> for String {
    fn from(id: ActivityId) -> Self {
        id.0
    }
}

/// Per-kilometre split effort within an activity
///
/// The TRIMP segment branch consumes these when present; splits without an
/// average heart rate are skipped there.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SplitEffort {
    /// Moving time for this split in seconds
    pub moving_time_seconds: u64,
    /// Average heart rate during the split (BPM)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_heart_rate: Option<u32>,
}

/// Fitness activity metadata
///
/// Metadata-only view of an activity; the per-second sample streams live in
/// [`super::Stream`] and are keyed by the activity id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Activity {
    /// Unique identifier from the provider
    pub id: ActivityId,
    /// Activity name
    pub name: String,
    /// Sport type
    pub sport: SportType,
    /// When the activity started (UTC)
    pub start_date: DateTime<Utc>,
    /// Moving time in seconds (excludes stopped time)
    pub moving_time_seconds: u64,
    /// Average heart rate (BPM)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_heart_rate: Option<u32>,
    /// Maximum heart rate (BPM)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_heart_rate: Option<u32>,
    /// Average power (watts)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_power: Option<u32>,
    /// Maximum power (watts)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_power: Option<u32>,
    /// Average speed (m/s)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_speed: Option<f64>,
    /// Per-kilometre split efforts, when the provider supplies them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub splits: Option<Vec<SplitEffort>>,
}

impl Activity {
    /// Start building an activity from its required fields
    #[must_use]
    pub fn builder(
        id: impl Into<String>,
        sport: SportType,
        start_date: DateTime<Utc>,
        moving_time_seconds: u64,
    ) -> ActivityBuilder {
        ActivityBuilder {
            activity: Self {
                id: ActivityId::new(id),
                name: String::new(),
                sport,
                start_date,
                moving_time_seconds,
                average_heart_rate: None,
                max_heart_rate: None,
                average_power: None,
                max_power: None,
                average_speed: None,
                splits: None,
            },
        }
    }

    /// Calendar day the activity started on
    #[must_use]
    pub fn start_day(&self) -> NaiveDate {
        self.start_date.date_naive()
    }

    /// Moving time in minutes
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn moving_time_minutes(&self) -> f64 {
        self.moving_time_seconds as f64 / 60.0
    }
}

/// Builder for [`Activity`]
#[derive(Debug, Clone)]
pub struct ActivityBuilder {
    activity: Activity,
}

impl ActivityBuilder {
    /// Set the activity name
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.activity.name = name.into();
        self
    }

    /// Set average and maximum heart rate
    #[must_use]
    pub fn heart_rate(mut self, average: u32, max: Option<u32>) -> Self {
        self.activity.average_heart_rate = Some(average);
        self.activity.max_heart_rate = max;
        self
    }

    /// Set average and maximum power
    #[must_use]
    pub fn power(mut self, average: u32, max: Option<u32>) -> Self {
        self.activity.average_power = Some(average);
        self.activity.max_power = max;
        self
    }

    /// Set average speed in m/s
    #[must_use]
    pub fn average_speed(mut self, speed: f64) -> Self {
        self.activity.average_speed = Some(speed);
        self
    }

    /// Attach per-kilometre split efforts
    #[must_use]
    pub fn splits(mut self, splits: Vec<SplitEffort>) -> Self {
        self.activity.splits = Some(splits);
        self
    }

    /// Finish building
    #[must_use]
    pub fn build(self) -> Activity {
        self.activity
    }
}
