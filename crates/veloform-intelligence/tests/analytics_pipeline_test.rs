// ABOUTME: Integration tests for the analytics pipeline through public interfaces
// ABOUTME: Exercises best averages, power curves, TRIMP, intensity, and the load model together
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use veloform_core::constants::durations::{ALL_SECONDS, REDACTED_SECONDS};
use veloform_core::errors::ErrorCode;
use veloform_core::models::{
    Activity, ActivityBuilder, ActivityId, AthleteProfile, MaxHrFormula, SportType, Stream,
    StreamKind,
};
use veloform_intelligence::algorithms::{best_average, TrimpCalculator};
use veloform_intelligence::training_load::{LoadState, TrainingLoadModel};
use veloform_intelligence::{AnalysisConfig, BatchAnalyzer};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Athlete born 1994-01-01: Fox max HR 190 through the 2024 test season
fn test_profile() -> AthleteProfile {
    AthleteProfile::new(date(1994, 1, 1), MaxHrFormula::Fox)
        .with_resting_heart_rate(50)
        .with_weight(date(2024, 1, 1), 72.0)
        .with_ftp(date(2024, 1, 1), 250)
}

fn ride_builder(id: &str, day: u32, moving_time_seconds: u64) -> ActivityBuilder {
    Activity::builder(
        id,
        SportType::Ride,
        Utc.with_ymd_and_hms(2024, 6, day, 8, 0, 0).unwrap(),
        moving_time_seconds,
    )
    .name(format!("Ride {id}"))
}

fn ride_on(id: &str, day: u32, moving_time_seconds: u64) -> Activity {
    ride_builder(id, day, moving_time_seconds).build()
}

// === Sliding-window best average ===

#[test]
fn test_best_average_canonical_example() {
    // Series [100, 200, 300, 400], w=2: windows average 150, 250, 350
    assert_eq!(best_average(&[100.0, 200.0, 300.0, 400.0], 2), Some(350));
}

#[test]
fn test_best_average_not_available_beyond_series_length() {
    let samples = vec![250.0; 100];
    for window in 101..130 {
        assert_eq!(best_average(&samples, window), None);
    }
}

#[test]
fn test_best_average_matches_brute_force_on_random_series() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..100 {
        let len = rng.gen_range(1..600);
        let samples: Vec<f64> = (0..len).map(|_| rng.gen_range(0.0..900.0)).collect();
        let window = rng.gen_range(1..=len);

        let brute = samples
            .windows(window)
            .map(|w| w.iter().sum::<f64>() / window as f64)
            .fold(f64::MIN, f64::max)
            .round() as u32;

        assert_eq!(
            best_average(&samples, window),
            Some(brute),
            "series len {len}, window {window}"
        );
    }
}

#[test]
fn test_canonical_duration_sets_are_pinned() {
    assert_eq!(
        ALL_SECONDS,
        [
            1, 5, 10, 15, 30, 45, 60, 120, 180, 240, 300, 390, 480, 720, 960, 1200, 1800, 2400,
            3000, 3600
        ]
    );
    assert_eq!(REDACTED_SECONDS, [5, 10, 30, 60, 300, 480, 1200, 3600]);
    // The privacy-limited set is a subset of the full contract
    assert!(REDACTED_SECONDS.iter().all(|d| ALL_SECONDS.contains(d)));
}

// === Power curves through the analyzer ===

#[test]
fn test_activity_power_curve_in_watts_and_watts_per_kg() {
    // 10 minutes: 5 at 200 W, 5 at 300 W
    let mut samples = vec![200.0; 300];
    samples.extend(std::iter::repeat(300.0).take(300));

    let analyzer = BatchAnalyzer::new(
        AnalysisConfig::default(),
        test_profile(),
        vec![ride_on("activity-1", 1, 600)],
        vec![Stream::new("activity-1", StreamKind::Watts, samples)],
    )
    .unwrap();

    let curve = analyzer
        .activity_power_curve(&ActivityId::new("activity-1"))
        .unwrap();

    // 300 s best is the solid 300 W block: 300 / 72 kg = 4.17 W/kg
    assert_eq!(curve[&300].watts, 300);
    assert!((curve[&300].watts_per_kg - 4.17).abs() < f64::EPSILON);
    // 480 s best ends at the stream tail: (180*200 + 300*300) / 480 = 262.5
    assert_eq!(curve[&480].watts, 263);
    // Durations beyond the stream are not available, not zero
    assert!(!curve.contains_key(&720));
}

#[test]
fn test_missing_bodyweight_aborts_with_reference_data_error() {
    let profile = AthleteProfile::new(date(1994, 1, 1), MaxHrFormula::Fox);
    let analyzer = BatchAnalyzer::new(
        AnalysisConfig::default(),
        profile,
        vec![ride_on("activity-1", 1, 600)],
        vec![Stream::new(
            "activity-1",
            StreamKind::Watts,
            vec![250.0; 600],
        )],
    )
    .unwrap();

    let err = analyzer
        .activity_power_curve(&ActivityId::new("activity-1"))
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ReferenceDataMissing);
    assert!(err.message.contains("activity-1"));
    assert!(err.message.contains("2024-06-01"));
}

#[test]
fn test_record_curve_selects_best_across_activities() {
    let analyzer = BatchAnalyzer::new(
        AnalysisConfig::default(),
        test_profile(),
        vec![
            ride_on("activity-1", 1, 600),
            ride_on("activity-2", 8, 1300),
        ],
        vec![
            Stream::new("activity-1", StreamKind::Watts, vec![320.0; 600]),
            Stream::new("activity-2", StreamKind::Watts, vec![260.0; 1300]),
        ],
    )
    .unwrap();

    let record = analyzer.record_power_curve().unwrap();
    let by_duration: BTreeMap<u32, _> = record
        .iter()
        .map(|output| (output.duration_seconds, output))
        .collect();

    // Short durations: activity-1's 320 W wins
    assert_eq!(by_duration[&60].watts, 320);
    assert_eq!(
        by_duration[&60].activity.as_ref().unwrap().as_str(),
        "activity-1"
    );
    // 1200 s: only activity-2 is long enough
    assert_eq!(by_duration[&1200].watts, 260);
    assert_eq!(
        by_duration[&1200].activity.as_ref().unwrap().as_str(),
        "activity-2"
    );
    // Nothing fills 30 minutes
    assert!(!by_duration.contains_key(&1800));

    // Memoized: second call returns the same curve
    let again = analyzer.record_power_curve().unwrap();
    assert_eq!(record.len(), again.len());
}

// === Intensity and TRIMP ===

#[test]
fn test_hour_at_ftp_scores_one_hundred() {
    let activity = ride_builder("activity-1", 1, 3600).power(250, None).build();

    let analyzer = BatchAnalyzer::new(
        AnalysisConfig::default(),
        test_profile(),
        vec![activity],
        vec![],
    )
    .unwrap();

    let daily = analyzer.daily_intensity().unwrap();
    assert_eq!(daily[&date(2024, 6, 1)], 100);
}

#[test]
fn test_golden_trimp_value() {
    // resting 50, max 190 (Fox, age 30), avg 150, 60 min:
    // ratio = 100/140, trimp = 60 * ratio * exp(1.67 * ratio) * 0.7875
    let activity = ride_builder("activity-1", 1, 3600)
        .heart_rate(150, None)
        .build();

    let trimp = TrimpCalculator::default()
        .calculate(&activity, &test_profile())
        .unwrap();
    assert!((trimp - 111.256_412_537_943).abs() < 1e-6);
}

#[test]
fn test_trimp_non_decreasing_in_intensity() {
    // Same 30-minute ride, higher average speed: at least as much load
    let calc = TrimpCalculator::default();
    let profile = test_profile();

    let slow = ride_builder("activity-1", 1, 1800)
        .average_speed(22.0 / 3.6) // 0.6 intensity
        .build();
    let fast = ride_builder("activity-2", 1, 1800)
        .average_speed(36.0 / 3.6) // 0.9 intensity
        .build();

    let slow_trimp = calc.calculate(&slow, &profile).unwrap();
    let fast_trimp = calc.calculate(&fast, &profile).unwrap();
    assert!(fast_trimp > slow_trimp);
}

#[test]
fn test_zero_duration_activity_excluded_from_daily_sums() {
    let activity = ride_builder("activity-1", 1, 0).heart_rate(150, None).build();

    let analyzer = BatchAnalyzer::new(
        AnalysisConfig::default(),
        test_profile(),
        vec![activity],
        vec![],
    )
    .unwrap();
    assert!(analyzer.daily_trimp().unwrap().is_empty());
}

// === Training load model ===

#[test]
fn test_day_zero_seeding_through_pipeline() {
    let activity = ride_builder("activity-1", 1, 3600)
        .heart_rate(150, None)
        .build();

    let analyzer = BatchAnalyzer::new(
        AnalysisConfig::default(),
        test_profile(),
        vec![activity],
        vec![],
    )
    .unwrap();

    let series = analyzer.training_load().unwrap();
    assert_eq!(series.len(), 1);
    let first = &series[0];
    assert!((first.ctl - first.atl).abs() < f64::EPSILON);
    assert!(first.tsb.abs() < f64::EPSILON);
    assert_eq!(first.trimp, 111); // golden TRIMP, rounded
}

#[test]
fn test_constant_load_converges_to_steady_state() {
    let daily: BTreeMap<NaiveDate, f64> = (0..200)
        .map(|offset| (date(2024, 1, 1) + Duration::days(offset), 100.0))
        .collect();

    let series = TrainingLoadModel::new().compute(&daily);
    assert_eq!(series.len(), 200);
    let last = series.last().unwrap();
    assert!((last.ctl - 100.0).abs() < 0.5);
    assert!((last.atl - 100.0).abs() < 0.5);
    assert!((last.ac_ratio - 1.0).abs() < 0.01);
}

#[test]
fn test_incremental_extension_tracks_full_recomputation() {
    let mut rng = StdRng::seed_from_u64(7);
    let daily: BTreeMap<NaiveDate, f64> = (0..60)
        .map(|offset| {
            let load = if offset % 4 == 0 { 0.0 } else { rng.gen_range(40.0..140.0) };
            (date(2024, 1, 1) + Duration::days(offset), load)
        })
        .collect();

    let model = TrainingLoadModel::new();
    let full = model.compute(&daily);

    let split = date(2024, 2, 1);
    let head: BTreeMap<NaiveDate, f64> =
        daily.range(..split).map(|(&d, &t)| (d, t)).collect();
    let tail_input: BTreeMap<NaiveDate, f64> =
        daily.range(split..).map(|(&d, &t)| (d, t)).collect();

    let head_series = model.compute(&head);
    let last = head_series.last().unwrap();
    let resumed = model.extend(
        &tail_input,
        LoadState {
            ctl: last.ctl,
            atl: last.atl,
        },
    );

    let offset = full.len() - resumed.len();
    for (resumed_point, full_point) in resumed.iter().zip(&full[offset..]) {
        assert_eq!(resumed_point.date, full_point.date);
        // The handed-over tail is rounded to 1 dp; drift stays within it
        assert!((resumed_point.ctl - full_point.ctl).abs() < 0.15);
        assert!((resumed_point.atl - full_point.atl).abs() < 0.15);
        assert!((resumed_point.tsb - full_point.tsb).abs() < 0.25);
    }
}

#[test]
fn test_weekly_monotony_and_strain_shape() {
    let loads = [100.0, 0.0, 80.0, 120.0, 0.0, 90.0, 110.0, 100.0];
    let daily: BTreeMap<NaiveDate, f64> = loads
        .iter()
        .enumerate()
        .map(|(offset, &t)| (date(2024, 1, 1) + Duration::days(offset as i64), t))
        .collect();

    let series = TrainingLoadModel::new().compute(&daily);
    for point in &series[..6] {
        assert!(point.monotony.is_none());
        assert!(point.strain.is_none());
    }
    for point in &series[6..] {
        let monotony = point.monotony.unwrap();
        assert!(monotony > 0.0);
        assert!(point.strain.unwrap() > 0);
    }
}
