// ABOUTME: Per-second sample streams for activities with the heart-rate data-quality guard
// ABOUTME: Defines StreamKind and Stream; a corrupt heart-rate stream is absent as a whole
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};

use super::ActivityId;
use crate::constants::physiology::MAX_PLAUSIBLE_HEART_RATE_BPM;

/// Kind of per-second sample stream
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StreamKind {
    /// Power in watts
    Watts,
    /// Heart rate in BPM
    HeartRate,
    /// Cadence in RPM or steps/min
    Cadence,
    /// Speed in m/s
    Velocity,
    /// Altitude in meters
    Altitude,
    /// Temperature in Celsius
    Temperature,
}

/// Ordered sample series for one (activity, stream kind) pair
///
/// Index equals elapsed seconds from activity start. Streams are immutable
/// once ingested; derived best-averages are invalidated only by
/// re-ingestion, never by time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stream {
    /// Owning activity
    pub activity: ActivityId,
    /// Stream kind
    pub kind: StreamKind,
    /// One sample per elapsed second
    pub samples: Vec<f64>,
}

impl Stream {
    /// Create a stream for an activity
    pub fn new(activity: impl Into<ActivityId>, kind: StreamKind, samples: Vec<f64>) -> Self {
        Self {
            activity: activity.into(),
            kind,
            samples,
        }
    }

    /// Samples usable for analysis, applying the data-quality guard.
    ///
    /// A heart-rate stream containing any sample above 300 bpm is sensor
    /// garbage and is treated as entirely absent, not filtered
    /// sample-by-sample. Other stream kinds pass through unchanged.
    #[must_use]
    pub fn usable_samples(&self) -> Option<&[f64]> {
        if self.kind == StreamKind::HeartRate
            && self
                .samples
                .iter()
                .any(|&bpm| bpm > MAX_PLAUSIBLE_HEART_RATE_BPM)
        {
            return None;
        }
        Some(&self.samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corrupt_heart_rate_stream_is_absent_as_a_whole() {
        let mut samples = vec![120.0; 600];
        samples[300] = 301.0;
        let stream = Stream::new("activity-1", StreamKind::HeartRate, samples);
        assert!(stream.usable_samples().is_none());
    }

    #[test]
    fn test_plausible_heart_rate_stream_passes() {
        let stream = Stream::new("activity-1", StreamKind::HeartRate, vec![120.0; 600]);
        assert_eq!(stream.usable_samples().map(<[f64]>::len), Some(600));
    }

    #[test]
    fn test_guard_only_applies_to_heart_rate() {
        // 1500 W sprint spikes are legitimate power data
        let stream = Stream::new("activity-1", StreamKind::Watts, vec![1500.0; 10]);
        assert!(stream.usable_samples().is_some());
    }
}
