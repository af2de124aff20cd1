// ABOUTME: Per-activity and cross-activity power curves in absolute watts and W/kg
// ABOUTME: Pairs cached best averages with dated bodyweight; missing weight is fatal
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use veloform_core::errors::{AppError, AppResult};
use veloform_core::models::{Activity, ActivityId, AthleteProfile};

use crate::algorithms::BestAverages;

/// Best-average power over one canonical duration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PowerOutput {
    /// Window length in seconds
    pub duration_seconds: u32,
    /// Best average power in watts
    pub watts: u32,
    /// Relative power in W/kg against bodyweight on the activity date, 2 dp
    pub watts_per_kg: f64,
    /// Owning activity; set on record-curve entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity: Option<ActivityId>,
}

impl PowerOutput {
    /// Human-readable duration label ("30 s", "20 m", "1 h")
    #[must_use]
    pub fn duration_label(&self) -> String {
        let seconds = self.duration_seconds;
        if seconds < 60 {
            format!("{seconds} s")
        } else if seconds % 3600 == 0 {
            format!("{} h", seconds / 3600)
        } else if seconds % 60 == 0 {
            format!("{} m", seconds / 60)
        } else {
            format!("{} m {} s", seconds / 60, seconds % 60)
        }
    }
}

/// Bodyweight on the activity date, fatal when no record covers it.
///
/// Never silently defaults to zero: the operator must be told to backfill
/// the weight history.
fn weight_for(activity: &Activity, profile: &AthleteProfile) -> AppResult<f64> {
    profile.weight_kg_on(activity.start_day()).ok_or_else(|| {
        AppError::reference_data_missing("bodyweight", activity.id.as_str(), activity.start_day())
    })
}

/// Round to two decimal places
fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Build the duration-ordered power curve for one activity.
///
/// Durations the power stream could not fill are absent from the map.
///
/// # Errors
///
/// Returns `ErrorCode::ReferenceDataMissing` when no bodyweight record
/// covers the activity date.
pub fn build_activity_curve(
    activity: &Activity,
    best: &BestAverages,
    profile: &AthleteProfile,
) -> AppResult<BTreeMap<u32, PowerOutput>> {
    let weight_kg = weight_for(activity, profile)?;

    Ok(best
        .iter()
        .map(|(duration_seconds, watts)| {
            (
                duration_seconds,
                PowerOutput {
                    duration_seconds,
                    watts,
                    watts_per_kg: round_2dp(f64::from(watts) / weight_kg),
                    activity: Some(activity.id.clone()),
                },
            )
        })
        .collect())
}

/// Build the global record curve across activities.
///
/// For each duration, selects the activity with the greatest cached best
/// average; ties break toward the most recent activity. Each entry carries
/// its owning activity, and W/kg uses the bodyweight on that activity's
/// date.
///
/// # Errors
///
/// Returns `ErrorCode::ReferenceDataMissing` when no bodyweight record
/// covers a record-holding activity's date.
pub fn build_record_curve(
    entries: &[(&Activity, &BestAverages)],
    profile: &AthleteProfile,
    durations: &[u32],
) -> AppResult<Vec<PowerOutput>> {
    let mut curve = Vec::with_capacity(durations.len());

    for &duration_seconds in durations {
        let record = entries
            .iter()
            .filter_map(|&(activity, best)| {
                best.get(duration_seconds).map(|watts| (activity, watts))
            })
            .max_by_key(|&(activity, watts)| (watts, activity.start_date));

        if let Some((activity, watts)) = record {
            let weight_kg = weight_for(activity, profile)?;
            curve.push(PowerOutput {
                duration_seconds,
                watts,
                watts_per_kg: round_2dp(f64::from(watts) / weight_kg),
                activity: Some(activity.id.clone()),
            });
        }
    }

    Ok(curve)
}
