// ABOUTME: Day-by-day training-load model: CTL/ATL/TSB, acute:chronic ratio, monotony, strain
// ABOUTME: Continuous-EMA recurrence over calendar days with resume-from-tail support
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use veloform_core::constants::physiology::{
    ATL_WINDOW_DAYS, CTL_WINDOW_DAYS, MONOTONY_WINDOW_DAYS,
};

use crate::config::AnalysisConfig;

/// One day of the training-load series
///
/// `tsb` uses the current-day form `ctl_d - atl_d` everywhere; see the model
/// docs. Values are rounded for presentation only after the full recurrence
/// completes, so rounding error never feeds back into subsequent days.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainingLoadPoint {
    /// Calendar day
    pub date: NaiveDate,
    /// Aggregate TRIMP for the day, rounded to an integer
    pub trimp: u32,
    /// Chronic Training Load ("fitness"), 1 dp
    pub ctl: f64,
    /// Acute Training Load ("fatigue"), 1 dp
    pub atl: f64,
    /// Training Stress Balance `ctl - atl` ("form"), 1 dp
    pub tsb: f64,
    /// Acute:chronic ratio `atl / ctl` (0 when ctl is 0), 2 dp
    pub ac_ratio: f64,
    /// Weekly monotony `mean / stddev` of the trailing 7 daily loads, 2 dp;
    /// absent until 7 contiguous days have been processed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monotony: Option<f64>,
    /// Weekly strain `weekly_trimp_sum x monotony`, rounded to an integer;
    /// absent whenever monotony is
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strain: Option<u32>,
}

/// Most recent CTL/ATL state, for resuming the recurrence incrementally
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LoadState {
    /// Chronic Training Load on the day before the resume window
    pub ctl: f64,
    /// Acute Training Load on the day before the resume window
    pub atl: f64,
}

/// Chronic/acute training-load model over calendar days
///
/// Continuous EMA with `decay = exp(-1/T)`:
/// `ctl_d = ctl_{d-1} x decay + trimp_d x (1 - decay)`, analogous for ATL.
/// Seed: the first processed day sets `ctl_0 = atl_0 = trimp_0`, `tsb_0 = 0`.
/// Days between the first and last input date with no training count as
/// zero-TRIMP rest days. The recurrence is strictly sequential and must
/// never be parallelized across days.
#[derive(Debug, Clone)]
pub struct TrainingLoadModel {
    ctl_days: i64,
    atl_days: i64,
}

impl Default for TrainingLoadModel {
    fn default() -> Self {
        Self::new()
    }
}

impl TrainingLoadModel {
    /// Create a model with the standard 42/7-day windows
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ctl_days: CTL_WINDOW_DAYS,
            atl_days: ATL_WINDOW_DAYS,
        }
    }

    /// Create a model from validated configuration
    #[must_use]
    pub const fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            ctl_days: config.ctl_days,
            atl_days: config.atl_days,
        }
    }

    /// Compute the full series from day zero
    #[must_use]
    pub fn compute(&self, daily_trimp: &BTreeMap<NaiveDate, f64>) -> Vec<TrainingLoadPoint> {
        self.run(daily_trimp, None)
    }

    /// Resume the recurrence from a previously computed tail state.
    ///
    /// `tail` is the CTL/ATL of the most recent day before `daily_trimp`
    /// begins; no re-seeding happens. Monotony stays absent until 7 days of
    /// the resumed window have been processed, since the prior window's
    /// daily loads are not available here.
    #[must_use]
    pub fn extend(
        &self,
        daily_trimp: &BTreeMap<NaiveDate, f64>,
        tail: LoadState,
    ) -> Vec<TrainingLoadPoint> {
        self.run(daily_trimp, Some(tail))
    }

    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn run(
        &self,
        daily_trimp: &BTreeMap<NaiveDate, f64>,
        tail: Option<LoadState>,
    ) -> Vec<TrainingLoadPoint> {
        let (Some((&first_day, _)), Some((&last_day, _))) =
            (daily_trimp.iter().next(), daily_trimp.iter().next_back())
        else {
            return Vec::new();
        };

        let ctl_decay = (-1.0 / self.ctl_days as f64).exp();
        let atl_decay = (-1.0 / self.atl_days as f64).exp();

        let total_days = (last_day - first_day).num_days() + 1;
        let mut raw: Vec<(NaiveDate, f64, f64, f64)> = Vec::with_capacity(total_days as usize);
        let mut window: Vec<f64> = Vec::with_capacity(total_days as usize);

        let mut state = tail;
        for offset in 0..total_days {
            let date = first_day + Duration::days(offset);
            let trimp = daily_trimp.get(&date).copied().unwrap_or(0.0);

            let next = match state {
                // Seed: the first processed day carries its TRIMP straight
                // into both loads, making tsb_0 exactly 0.
                None => LoadState { ctl: trimp, atl: trimp },
                Some(prev) => LoadState {
                    ctl: trimp.mul_add(1.0 - ctl_decay, prev.ctl * ctl_decay),
                    atl: trimp.mul_add(1.0 - atl_decay, prev.atl * atl_decay),
                },
            };
            state = Some(next);
            window.push(trimp);
            raw.push((date, trimp, next.ctl, next.atl));
        }

        debug!(
            days = raw.len(),
            resumed = tail.is_some(),
            "training load recurrence complete"
        );

        // Rounding happens only now, on the way out.
        raw.iter()
            .enumerate()
            .map(|(index, &(date, trimp, ctl, atl))| {
                let tsb = ctl - atl;
                let ac_ratio = if ctl > 0.0 { atl / ctl } else { 0.0 };

                let monotony = (index + 1 >= MONOTONY_WINDOW_DAYS)
                    .then(|| weekly_monotony(&window[index + 1 - MONOTONY_WINDOW_DAYS..=index]));
                let strain = monotony.map(|(monotony, weekly_sum)| {
                    (weekly_sum * monotony).round() as u32
                });

                TrainingLoadPoint {
                    date,
                    trimp: trimp.round() as u32,
                    ctl: round_1dp(ctl),
                    atl: round_1dp(atl),
                    tsb: round_1dp(tsb),
                    ac_ratio: round_2dp(ac_ratio),
                    monotony: monotony.map(|(monotony, _)| round_2dp(monotony)),
                    strain,
                }
            })
            .collect()
    }
}

/// Monotony and weekly sum over exactly the trailing 7 daily loads.
///
/// Monotony is `mean / population stddev`, 0 when the stddev is 0.
#[allow(clippy::cast_precision_loss)]
fn weekly_monotony(week: &[f64]) -> (f64, f64) {
    let n = week.len() as f64;
    let sum: f64 = week.iter().sum();
    let mean = sum / n;
    let variance = week.iter().map(|&t| (t - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();

    let monotony = if stddev > 0.0 { mean / stddev } else { 0.0 };
    (monotony, sum)
}

fn round_1dp(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn series(values: &[(u32, f64)]) -> BTreeMap<NaiveDate, f64> {
        values.iter().map(|&(d, t)| (date(d), t)).collect()
    }

    #[test]
    fn test_day_zero_seeding() {
        let points = TrainingLoadModel::new().compute(&series(&[(1, 80.0)]));
        assert_eq!(points.len(), 1);
        assert!((points[0].ctl - 80.0).abs() < f64::EPSILON);
        assert!((points[0].atl - 80.0).abs() < f64::EPSILON);
        assert!(points[0].tsb.abs() < f64::EPSILON);
    }

    #[test]
    fn test_recurrence_follows_continuous_ema() {
        let points = TrainingLoadModel::new().compute(&series(&[(1, 100.0), (2, 50.0)]));

        let ctl_decay = (-1.0f64 / 42.0).exp();
        let atl_decay = (-1.0f64 / 7.0).exp();
        let expected_ctl = 100.0f64.mul_add(ctl_decay, 50.0 * (1.0 - ctl_decay));
        let expected_atl = 100.0f64.mul_add(atl_decay, 50.0 * (1.0 - atl_decay));

        assert!((points[1].ctl - round_1dp(expected_ctl)).abs() < f64::EPSILON);
        assert!((points[1].atl - round_1dp(expected_atl)).abs() < f64::EPSILON);
        assert!((points[1].tsb - round_1dp(expected_ctl - expected_atl)).abs() < 1e-9);
    }

    #[test]
    fn test_rest_days_between_inputs_count_as_zero() {
        let points = TrainingLoadModel::new().compute(&series(&[(1, 100.0), (4, 60.0)]));
        assert_eq!(points.len(), 4);
        assert_eq!(points[1].trimp, 0);
        assert_eq!(points[2].trimp, 0);
        // Loads decay through the rest days
        assert!(points[2].atl < points[1].atl);
        assert!(points[1].atl < points[0].atl);
    }

    #[test]
    fn test_constant_load_converges_to_steady_state() {
        let daily: BTreeMap<NaiveDate, f64> = (0..200)
            .map(|offset| (date(1) + Duration::days(offset), 100.0))
            .collect();

        let points = TrainingLoadModel::new().compute(&daily);
        let last = points.last().unwrap();
        // Seeded at 100 with constant 100 input, the EMA holds steady
        assert!((last.ctl - 100.0).abs() < 0.1);
        assert!((last.atl - 100.0).abs() < 0.1);
        assert!(last.tsb.abs() < 0.1);
        assert!((last.ac_ratio - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_monotony_absent_before_seven_days() {
        let daily: BTreeMap<NaiveDate, f64> = (0..8)
            .map(|offset| (date(1) + Duration::days(offset), 50.0 + (offset % 3) as f64))
            .collect();

        let points = TrainingLoadModel::new().compute(&daily);
        assert!(points[5].monotony.is_none());
        assert!(points[6].monotony.is_some());
        assert!(points[7].strain.is_some());
    }

    #[test]
    fn test_monotony_zero_when_stddev_zero() {
        let daily: BTreeMap<NaiveDate, f64> = (0..7)
            .map(|offset| (date(1) + Duration::days(offset), 100.0))
            .collect();

        let points = TrainingLoadModel::new().compute(&daily);
        let last = points.last().unwrap();
        assert_eq!(last.monotony, Some(0.0));
        assert_eq!(last.strain, Some(0));
    }

    #[test]
    fn test_monotony_matches_mean_over_stddev() {
        let week = [100.0, 50.0, 100.0, 50.0, 100.0, 50.0, 100.0];
        let daily: BTreeMap<NaiveDate, f64> = week
            .iter()
            .enumerate()
            .map(|(offset, &t)| (date(1) + Duration::days(offset as i64), t))
            .collect();

        let points = TrainingLoadModel::new().compute(&daily);
        let (expected_monotony, expected_sum) = weekly_monotony(&week);
        let last = points.last().unwrap();
        assert_eq!(last.monotony, Some(round_2dp(expected_monotony)));
        assert_eq!(last.strain, Some((expected_sum * expected_monotony).round() as u32));
    }

    #[test]
    fn test_extend_resumes_from_tail_without_reseeding() {
        let model = TrainingLoadModel::new();

        // Full run over 10 days
        let full: BTreeMap<NaiveDate, f64> = (0..10)
            .map(|offset| (date(1) + Duration::days(offset), 60.0 + offset as f64 * 5.0))
            .collect();
        let full_points = model.compute(&full);

        // Same series split at day 6, resuming from day 5's state
        let head: BTreeMap<NaiveDate, f64> = full.range(..date(6)).map(|(&d, &t)| (d, t)).collect();
        let tail_input: BTreeMap<NaiveDate, f64> =
            full.range(date(6)..).map(|(&d, &t)| (d, t)).collect();

        let head_points = model.compute(&head);
        let last = head_points.last().unwrap();
        let resumed = model.extend(
            &tail_input,
            LoadState {
                ctl: last.ctl,
                atl: last.atl,
            },
        );

        // Tail state is rounded to 1 dp, so allow a small drift
        for (resumed_point, full_point) in resumed.iter().zip(&full_points[5..]) {
            assert_eq!(resumed_point.date, full_point.date);
            assert!((resumed_point.ctl - full_point.ctl).abs() <= 0.1);
            assert!((resumed_point.atl - full_point.atl).abs() <= 0.1);
        }
    }

    #[test]
    fn test_empty_input_yields_empty_series() {
        assert!(TrainingLoadModel::new().compute(&BTreeMap::new()).is_empty());
    }

    #[test]
    fn test_ac_ratio_guarded_against_zero_ctl() {
        let points = TrainingLoadModel::new().compute(&series(&[(1, 0.0)]));
        assert!((points[0].ac_ratio).abs() < f64::EPSILON);
    }
}
