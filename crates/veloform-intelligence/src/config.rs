// ABOUTME: Configuration-driven tunables for the analytics engine replacing magic numbers
// ABOUTME: Provides a validated AnalysisConfig defaulting to the canonical constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};
use thiserror::Error;

use veloform_core::constants::{durations, physiology};
use veloform_core::errors::AppError;

/// Analysis configuration errors
#[derive(Debug, Error)]
pub enum AnalysisConfigError {
    /// An EMA window is zero or negative
    #[error("Invalid window: {0}")]
    InvalidWindow(String),

    /// A scaling factor or intensity is outside its permitted range
    #[error("Invalid factor: {0}")]
    InvalidFactor(String),
}

impl From<AnalysisConfigError> for AppError {
    fn from(error: AnalysisConfigError) -> Self {
        Self::config_invalid(error.to_string())
    }
}

/// Tunables for the estimators and the training-load model
///
/// Defaults reproduce the canonical behavior; deviate only for
/// experimentation. The duration set is part of the stable contract with
/// persisted caches and should stay on its default in production.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Chronic Training Load window in days
    pub ctl_days: i64,
    /// Acute Training Load window in days
    pub atl_days: i64,
    /// Global scaling factor applied to every TRIMP branch
    pub trimp_scale: f64,
    /// Intensity for the duration-only TRIMP fallback
    pub fallback_intensity: f64,
    /// Best-average window lengths, in seconds
    pub durations: Vec<u32>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            ctl_days: physiology::CTL_WINDOW_DAYS,
            atl_days: physiology::ATL_WINDOW_DAYS,
            trimp_scale: physiology::TRIMP_GLOBAL_SCALE,
            fallback_intensity: physiology::TRIMP_FALLBACK_INTENSITY,
            durations: durations::ALL_SECONDS.to_vec(),
        }
    }
}

impl AnalysisConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `AnalysisConfigError` when a window is non-positive or a
    /// factor is outside (0, 1].
    pub fn validate(&self) -> Result<(), AnalysisConfigError> {
        if self.ctl_days <= 0 || self.atl_days <= 0 {
            return Err(AnalysisConfigError::InvalidWindow(format!(
                "EMA windows must be positive, got ctl={} atl={}",
                self.ctl_days, self.atl_days
            )));
        }
        if self.trimp_scale <= 0.0 || self.trimp_scale > 1.0 {
            return Err(AnalysisConfigError::InvalidFactor(format!(
                "TRIMP scale must be in (0, 1], got {}",
                self.trimp_scale
            )));
        }
        if self.fallback_intensity <= 0.0 || self.fallback_intensity > 1.0 {
            return Err(AnalysisConfigError::InvalidFactor(format!(
                "Fallback intensity must be in (0, 1], got {}",
                self.fallback_intensity
            )));
        }
        Ok(())
    }
}
