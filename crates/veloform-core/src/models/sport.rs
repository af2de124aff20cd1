// ABOUTME: Sport type enumeration for fitness activities
// ABOUTME: Defines supported sport types with parsing, display, and dispatch predicates
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Enumeration of supported sport/activity types
///
/// Covers the activity types the analytics dispatch on. The `Other` variant
/// carries provider-specific types that don't map to a standard category;
/// those fall through to the duration-only branches of the estimators.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SportType {
    /// Cycling/biking activity
    Ride,
    /// Running activity
    Run,
    /// Walking activity
    Walk,
    /// Indoor/trainer cycling activity
    VirtualRide,
    /// Treadmill running activity
    VirtualRun,
    /// Provider-specific activity type outside the standard categories
    Other(String),
}

impl SportType {
    /// Whether this is a cycling activity (outdoor or trainer)
    #[must_use]
    pub const fn is_ride(&self) -> bool {
        matches!(self, Self::Ride | Self::VirtualRide)
    }

    /// Whether this activity is paced on foot (run, treadmill run, or walk)
    #[must_use]
    pub const fn is_run_or_walk(&self) -> bool {
        matches!(self, Self::Run | Self::VirtualRun | Self::Walk)
    }
}

impl fmt::Display for SportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ride => f.write_str("ride"),
            Self::Run => f.write_str("run"),
            Self::Walk => f.write_str("walk"),
            Self::VirtualRide => f.write_str("virtual_ride"),
            Self::VirtualRun => f.write_str("virtual_run"),
            Self::Other(name) => f.write_str(name),
        }
    }
}

impl FromStr for SportType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "ride" => Self::Ride,
            "run" => Self::Run,
            "walk" => Self::Walk,
            "virtual_ride" | "virtualride" => Self::VirtualRide,
            "virtual_run" | "virtualrun" => Self::VirtualRun,
            other => Self::Other(other.to_owned()),
        })
    }
}
