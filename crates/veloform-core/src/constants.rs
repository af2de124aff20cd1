// ABOUTME: Application-wide constants organized by domain for the analytics engine
// ABOUTME: Canonical duration sets, physiological factors, and ordered intensity tables
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Analytics Constants
//!
//! Constants are grouped by domain. The canonical duration sets and the
//! ordered intensity tables are part of the stable external contract: any
//! persisted cache keyed by these durations must use the exact values listed,
//! and the tables must be iterated in the order given here.

/// Canonical best-average window lengths, in seconds
pub mod durations {
    /// Full duration set used for per-activity and record power curves.
    ///
    /// Part of the stable contract: persisted caches are keyed by these exact
    /// values.
    pub const ALL_SECONDS: [u32; 20] = [
        1, 5, 10, 15, 30, 45, 60, 120, 180, 240, 300, 390, 480, 720, 960, 1200, 1800, 2400, 3000,
        3600,
    ];

    /// Reduced duration set for privacy-limited display surfaces.
    pub const REDACTED_SECONDS: [u32; 8] = [5, 10, 30, 60, 300, 480, 1200, 3600];
}

/// Physiological factors for load estimation
pub mod physiology {
    /// Heart-rate samples above this are considered sensor garbage; a stream
    /// containing any such sample is treated as entirely absent.
    pub const MAX_PLAUSIBLE_HEART_RATE_BPM: f64 = 300.0;

    /// Banister exponential factor used in the TRIMP core formula
    pub const TRIMP_EXPONENTIAL_FACTOR: f64 = 1.67;

    /// Global scaling factor applied once to the final TRIMP of every branch
    pub const TRIMP_GLOBAL_SCALE: f64 = 0.7875;

    /// Duration beyond which the long-effort decay correction starts
    pub const TRIMP_DECAY_ONSET_MINUTES: f64 = 60.0;

    /// Decay per minute past the onset
    pub const TRIMP_DECAY_PER_MINUTE: f64 = 0.005;

    /// Lower bound for the decay correction
    pub const TRIMP_DECAY_FLOOR: f64 = 0.7;

    /// Fixed intensity when neither heart rate nor pace data exists
    pub const TRIMP_FALLBACK_INTENSITY: f64 = 0.4;

    /// Max-HR adjustment used by the legacy daily intensity score
    pub const INTENSITY_MAX_HR_ADJUSTMENT: f64 = 0.92;

    /// Chronic Training Load window ("fitness"), days
    pub const CTL_WINDOW_DAYS: i64 = 42;

    /// Acute Training Load window ("fatigue"), days
    pub const ATL_WINDOW_DAYS: i64 = 7;

    /// Trailing window for weekly monotony and strain, days
    pub const MONOTONY_WINDOW_DAYS: usize = 7;
}

/// Ordered pace/speed to intensity threshold tables for the TRIMP heuristic
pub mod intensity_tables {
    /// Run/walk pace thresholds: `(max_pace_min_per_km, intensity)`.
    ///
    /// Ascending pace, fastest first; the first threshold the pace is at or
    /// under wins. Iteration order is pinned by tests.
    pub const RUN_PACE: [(f64, f64); 9] = [
        (3.5, 0.85),
        (4.0, 0.75),
        (4.5, 0.65),
        (5.0, 0.60),
        (5.5, 0.55),
        (6.0, 0.50),
        (6.5, 0.45),
        (7.0, 0.40),
        (8.0, 0.35),
    ];

    /// Intensity for run/walk paces slower than every table entry
    pub const RUN_PACE_DEFAULT: f64 = 0.30;

    /// Ride speed thresholds: `(min_speed_kmh, intensity)`.
    ///
    /// Descending speed, fastest first; the first threshold the speed meets
    /// or exceeds wins. Iteration order is pinned by tests.
    pub const RIDE_SPEED: [(f64, f64); 4] = [(35.0, 0.9), (30.0, 0.8), (25.0, 0.7), (20.0, 0.6)];

    /// Intensity for ride speeds below every table entry
    pub const RIDE_SPEED_DEFAULT: f64 = 0.5;
}
