// ABOUTME: Training Impulse (TRIMP) estimation with a cascading data-availability strategy
// ABOUTME: Splits, whole-activity HR, pace/speed heuristics, and a duration-only fallback
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};
use tracing::debug;

use veloform_core::constants::{intensity_tables, physiology};
use veloform_core::errors::AppResult;
use veloform_core::models::{Activity, AthleteProfile};

use crate::config::AnalysisConfig;

/// Which branch of the cascade produced a TRIMP score
///
/// The cascade tries branches in order and the first one with usable data
/// wins.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrimpBranch {
    /// Per-kilometre splits with average heart rate
    Splits,
    /// Whole-activity average heart rate
    HeartRate,
    /// Pace (run/walk) or speed (ride) heuristic
    PaceSpeed,
    /// Fixed-intensity duration-only fallback
    DurationOnly,
}

impl TrimpBranch {
    /// Branch name for logging and debugging
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Splits => "splits",
            Self::HeartRate => "heart_rate",
            Self::PaceSpeed => "pace_speed",
            Self::DurationOnly => "duration_only",
        }
    }
}

/// TRIMP score with the branch that produced it
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TrimpScore {
    /// Final scaled TRIMP value
    pub value: f64,
    /// Cascade branch that produced the value
    pub branch: TrimpBranch,
}

/// Physiologically-grounded per-activity training load estimator
///
/// Core formula (Banister-style):
/// `trimp = duration_minutes x intensity x exp(1.67 x intensity)`,
/// with a long-effort decay past 60 minutes floored at 0.7 and a single
/// global scale of 0.7875 applied to the final value of every branch.
#[derive(Debug, Clone)]
pub struct TrimpCalculator {
    scale: f64,
    fallback_intensity: f64,
}

impl Default for TrimpCalculator {
    fn default() -> Self {
        Self {
            scale: physiology::TRIMP_GLOBAL_SCALE,
            fallback_intensity: physiology::TRIMP_FALLBACK_INTENSITY,
        }
    }
}

impl TrimpCalculator {
    /// Create a calculator from validated configuration
    #[must_use]
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            scale: config.trimp_scale,
            fallback_intensity: config.fallback_intensity,
        }
    }

    /// Calculate the TRIMP for an activity
    ///
    /// Zero or negative duration yields 0, which daily aggregation excludes.
    ///
    /// # Errors
    ///
    /// Returns an error when the athlete's age-predicted max heart rate
    /// cannot be resolved for the activity date.
    pub fn calculate(&self, activity: &Activity, profile: &AthleteProfile) -> AppResult<f64> {
        self.calculate_detailed(activity, profile)
            .map(|score| score.value)
    }

    /// Calculate the TRIMP and report which cascade branch produced it
    ///
    /// # Errors
    ///
    /// Returns an error when the athlete's age-predicted max heart rate
    /// cannot be resolved for the activity date.
    pub fn calculate_detailed(
        &self,
        activity: &Activity,
        profile: &AthleteProfile,
    ) -> AppResult<TrimpScore> {
        let minutes = activity.moving_time_minutes();
        if minutes <= 0.0 {
            return Ok(TrimpScore {
                value: 0.0,
                branch: TrimpBranch::DurationOnly,
            });
        }

        let max_hr = profile.max_heart_rate_on(activity.start_day())?;
        let resting_hr = profile.resting_heart_rate().map(f64::from);

        let (raw, branch) = Self::from_splits(activity, max_hr, resting_hr)
            .or_else(|| Self::from_average_heart_rate(activity, minutes, max_hr, resting_hr))
            .or_else(|| self.from_pace_or_speed(activity, minutes))
            .unwrap_or_else(|| {
                (
                    banister(minutes, self.fallback_intensity),
                    TrimpBranch::DurationOnly,
                )
            });

        let value = raw * self.scale;
        debug!(
            activity = %activity.id,
            branch = branch.name(),
            trimp = value,
            "calculated TRIMP"
        );
        Ok(TrimpScore { value, branch })
    }

    /// Segment branch: sum the core formula over per-km splits with HR
    fn from_splits(
        activity: &Activity,
        max_hr: f64,
        resting_hr: Option<f64>,
    ) -> Option<(f64, TrimpBranch)> {
        let splits = activity.splits.as_deref()?;

        #[allow(clippy::cast_precision_loss)]
        let sum: f64 = splits
            .iter()
            .filter_map(|split| {
                let avg_hr = f64::from(split.average_heart_rate?);
                let split_minutes = split.moving_time_seconds as f64 / 60.0;
                let ratio = heart_rate_reserve_ratio(avg_hr, max_hr, resting_hr);
                Some(banister(split_minutes, ratio))
            })
            .sum();

        // A zero sum means no split carried usable HR; fall through.
        (sum > 0.0).then_some((sum, TrimpBranch::Splits))
    }

    /// Whole-activity branch: same HR-reserve logic on the activity averages
    fn from_average_heart_rate(
        activity: &Activity,
        minutes: f64,
        max_hr: f64,
        resting_hr: Option<f64>,
    ) -> Option<(f64, TrimpBranch)> {
        let avg_hr = f64::from(activity.average_heart_rate?);
        let ratio = heart_rate_reserve_ratio(avg_hr, max_hr, resting_hr);
        Some((banister(minutes, ratio), TrimpBranch::HeartRate))
    }

    /// Pace/speed branch: threshold tables for run/walk and rides; other
    /// sports with speed data get the duration-only intensity
    fn from_pace_or_speed(&self, activity: &Activity, minutes: f64) -> Option<(f64, TrimpBranch)> {
        let speed_mps = activity.average_speed?;

        let intensity = if activity.sport.is_run_or_walk() {
            pace_intensity(speed_mps)
        } else if activity.sport.is_ride() {
            speed_intensity(speed_mps)
        } else {
            self.fallback_intensity
        };

        Some((banister(minutes, intensity), TrimpBranch::PaceSpeed))
    }
}

/// Heart-rate reserve ratio, clamped to [0, 1].
///
/// `(avg - resting) / (max - resting)`; when resting HR is unavailable or
/// `max <= resting`, falls back to `avg / max`.
fn heart_rate_reserve_ratio(avg_hr: f64, max_hr: f64, resting_hr: Option<f64>) -> f64 {
    match resting_hr {
        Some(resting) if max_hr > resting => ((avg_hr - resting) / (max_hr - resting)).clamp(0.0, 1.0),
        _ => {
            if max_hr > 0.0 {
                (avg_hr / max_hr).clamp(0.0, 1.0)
            } else {
                0.0
            }
        }
    }
}

/// Banister core formula with the long-effort decay correction.
///
/// `trimp = minutes x i x exp(1.67 x i)`; past 60 minutes a linear decay of
/// 0.005/minute applies, floored at 0.7.
fn banister(minutes: f64, intensity: f64) -> f64 {
    let mut trimp = minutes * intensity * (physiology::TRIMP_EXPONENTIAL_FACTOR * intensity).exp();

    if minutes > physiology::TRIMP_DECAY_ONSET_MINUTES {
        let decay = physiology::TRIMP_DECAY_PER_MINUTE
            .mul_add(-(minutes - physiology::TRIMP_DECAY_ONSET_MINUTES), 1.0);
        trimp *= decay.max(physiology::TRIMP_DECAY_FLOOR);
    }
    trimp
}

/// Map run/walk average speed (m/s) to intensity via pace in min/km.
///
/// The table is ascending, fastest pace first; the first threshold the pace
/// is at or under wins (a 4.0 min/km pace maps to 0.75, not 0.65).
fn pace_intensity(speed_mps: f64) -> f64 {
    if speed_mps <= 0.0 {
        return intensity_tables::RUN_PACE_DEFAULT;
    }
    let pace_min_per_km = 1000.0 / speed_mps / 60.0;

    for &(max_pace, intensity) in &intensity_tables::RUN_PACE {
        if pace_min_per_km <= max_pace {
            return intensity;
        }
    }
    intensity_tables::RUN_PACE_DEFAULT
}

/// Map ride average speed (m/s) to intensity via speed in km/h.
///
/// The table is descending, fastest speed first; the first threshold the
/// speed meets or exceeds wins.
fn speed_intensity(speed_mps: f64) -> f64 {
    let speed_kmh = speed_mps * 3.6;

    for &(min_speed, intensity) in &intensity_tables::RIDE_SPEED {
        if speed_kmh >= min_speed {
            return intensity;
        }
    }
    intensity_tables::RIDE_SPEED_DEFAULT
}
