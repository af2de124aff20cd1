// ABOUTME: Core data models for activities, streams, and athlete reference data
// ABOUTME: Re-exports the domain types consumed by the intelligence crate
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain models for the analytics engine.
//!
//! Everything here is a plain value object: no I/O, no global state. The
//! athlete profile in particular replaces the mutable singleton pattern of
//! earlier implementations with an explicitly constructed, passed-in value.

mod activity;
mod athlete;
mod sport;
mod stream;

pub use activity::{Activity, ActivityBuilder, ActivityId, SplitEffort};
pub use athlete::{AthleteProfile, MaxHrFormula};
pub use sport::SportType;
pub use stream::{Stream, StreamKind};
