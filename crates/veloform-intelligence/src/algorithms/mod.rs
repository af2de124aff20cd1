// ABOUTME: Core numeric primitives and per-activity load estimators
// ABOUTME: Best-average extraction, TRIMP cascade, and the legacy intensity score
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Algorithm Module
//!
//! The algorithmic heart of the engine, leaf to root:
//!
//! - [`best_average`]: sliding-window maximum-average extraction
//! - [`trimp`]: physiologically-grounded per-activity training load
//! - [`intensity`]: legacy single-score daily intensity estimator
//!
//! Every function here is pure: no side effects, no I/O. Caching and
//! per-date aggregation are the orchestrator's concern.

pub mod best_average;
pub mod intensity;
pub mod trimp;

pub use best_average::{best_average, BestAverages};
pub use intensity::IntensityEstimator;
pub use trimp::{TrimpBranch, TrimpCalculator, TrimpScore};
