// ABOUTME: Core types and constants for the Veloform training analytics engine
// ABOUTME: Foundation crate with error handling, domain models, and physiological constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![deny(unsafe_code)]

//! # Veloform Core
//!
//! Foundation crate providing shared types and constants for the Veloform
//! training analytics engine. This crate is designed to change infrequently,
//! enabling incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Canonical duration sets and physiological constants
//! - **models**: Domain models (`Activity`, `Stream`, `AthleteProfile`, `SportType`)

/// Unified error handling system with standard error codes
pub mod errors;

/// Canonical duration sets, physiological constants, and intensity tables
pub mod constants;

/// Core data models (`Activity`, `Stream`, `AthleteProfile`, `SportType`)
pub mod models;
