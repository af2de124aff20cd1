// ABOUTME: Legacy per-activity intensity score feeding the training-intensity heatmap
// ABOUTME: FTP/power branch first, adjusted max-HR branch second, otherwise no score
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use tracing::debug;

use veloform_core::constants::physiology::INTENSITY_MAX_HR_ADJUSTMENT;
use veloform_core::errors::AppResult;
use veloform_core::models::{Activity, AthleteProfile};

/// Seconds per hour as f64 for intensity normalization
const SECONDS_PER_HOUR: f64 = 3600.0;

/// Legacy single-score per-activity intensity estimator
///
/// Produces a roughly 0-100 score per activity (an hour at threshold scores
/// 100), summed per calendar day for the heatmap signal. Kept independent of
/// the TRIMP estimator: the two coexist and disagree by design.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntensityEstimator;

impl IntensityEstimator {
    /// Score an activity; `None` when neither branch has usable data, which
    /// excludes the activity from its day's sum.
    ///
    /// Cascade, first applicable wins:
    /// 1. FTP on the date and average power:
    ///    `score = duration x power x (power/FTP) / (FTP x 3600) x 100`
    /// 2. Average heart rate against 0.92-adjusted max HR, same shape.
    ///
    /// # Errors
    ///
    /// Returns an error when the heart-rate branch needs the athlete's max
    /// heart rate and it cannot be resolved for the activity date.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn score(&self, activity: &Activity, profile: &AthleteProfile) -> AppResult<Option<u32>> {
        let duration_seconds = activity.moving_time_seconds as f64;

        if let (Some(ftp), Some(avg_power)) = (
            profile.ftp_on(activity.start_day()),
            activity.average_power,
        ) {
            if ftp > 0 {
                let ftp = f64::from(ftp);
                let avg_power = f64::from(avg_power);
                let intensity_factor = avg_power / ftp;
                let score = (duration_seconds * avg_power * intensity_factor
                    / (ftp * SECONDS_PER_HOUR)
                    * 100.0)
                    .round() as u32;
                debug!(activity = %activity.id, score, "intensity from power");
                return Ok(Some(score));
            }
        }

        if let Some(avg_hr) = activity.average_heart_rate {
            let adjusted_max_hr = (profile.max_heart_rate_on(activity.start_day())?
                * INTENSITY_MAX_HR_ADJUSTMENT)
                .round();
            if adjusted_max_hr > 0.0 {
                let avg_hr = f64::from(avg_hr);
                let intensity_factor = avg_hr / adjusted_max_hr;
                let score = (duration_seconds * avg_hr * intensity_factor
                    / (adjusted_max_hr * SECONDS_PER_HOUR)
                    * 100.0)
                    .round() as u32;
                debug!(activity = %activity.id, score, "intensity from heart rate");
                return Ok(Some(score));
            }
        }

        Ok(None)
    }
}
