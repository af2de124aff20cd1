// ABOUTME: Sliding-window best-average extraction over per-second sample series
// ABOUTME: O(n) rolling-sum maximum mean plus the BestAverages duration map
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Best (maximum) average of any contiguous fixed-length window in a series.
///
/// Formula: `max over i of mean(samples[i .. i + w])`, rounded to the nearest
/// integer. Computed with a rolling sum (`+ new tail - old head`) in O(n)
/// time and O(1) extra space.
///
/// Returns `None` when the series is shorter than the window or the window
/// is zero: a best average over a window the series cannot fill is "not
/// available", never zero. Intended for non-negative sample streams (watts,
/// BPM).
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn best_average(samples: &[f64], window_seconds: usize) -> Option<u32> {
    if window_seconds == 0 || samples.len() < window_seconds {
        return None;
    }

    let mut window_sum: f64 = samples[..window_seconds].iter().sum();
    let mut max_sum = window_sum;

    for i in window_seconds..samples.len() {
        window_sum += samples[i] - samples[i - window_seconds];
        if window_sum > max_sum {
            max_sum = window_sum;
        }
    }

    Some((max_sum / window_seconds as f64).round().max(0.0) as u32)
}

/// Best averages for one (activity, stream kind) pair, keyed by window length
///
/// Computed once per ingestion and cacheable; durations the series cannot
/// fill are simply absent from the map.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BestAverages(BTreeMap<u32, u32>);

impl BestAverages {
    /// Compute best averages for every window length in `durations`
    #[must_use]
    pub fn compute(samples: &[f64], durations: &[u32]) -> Self {
        let map = durations
            .iter()
            .filter_map(|&seconds| {
                best_average(samples, seconds as usize).map(|value| (seconds, value))
            })
            .collect();
        Self(map)
    }

    /// Best average for a window length, when available
    #[must_use]
    pub fn get(&self, duration_seconds: u32) -> Option<u32> {
        self.0.get(&duration_seconds).copied()
    }

    /// Iterate `(duration_seconds, value)` pairs in ascending duration order
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.0.iter().map(|(&d, &v)| (d, v))
    }

    /// Number of available durations
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no duration is available
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
