// ABOUTME: Training analytics engine: best-average extraction, TRIMP, and the load model
// ABOUTME: Batch-oriented, synchronous, and I/O-free; collaborators supply all inputs
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![deny(unsafe_code)]

//! # Veloform Intelligence
//!
//! The analytics engine for the Veloform platform. Ingests per-activity
//! sample streams and athlete reference data, and derives power/effort
//! duration curves and a day-by-day training-load model.
//!
//! Everything here is a pure function or a memoizing wrapper over in-memory
//! series supplied by external collaborators; no network or blocking I/O
//! occurs inside this crate. Per-activity work is embarrassingly parallel
//! and fans out over a worker pool; the calendar-day recurrence of the load
//! model is strictly sequential.
//!
//! ## Modules
//!
//! - **algorithms**: best-average extraction, TRIMP, and the legacy intensity score
//! - **power_curve**: per-activity and record power curves in W and W/kg
//! - **training_load**: CTL/ATL/TSB recurrence with monotony and strain
//! - **batch_analyzer**: orchestrating service owning the per-batch caches
//! - **config**: validated tunables for the estimators and the load model

/// Core numeric primitives and per-activity estimators
pub mod algorithms;

/// Orchestrating service owning the per-batch memo caches
pub mod batch_analyzer;

/// Validated analysis configuration
pub mod config;

/// Per-activity and cross-activity power curves
pub mod power_curve;

/// Chronic/acute training-load model over calendar days
pub mod training_load;

pub use batch_analyzer::BatchAnalyzer;
pub use config::AnalysisConfig;
