// ABOUTME: Unified error handling system with standard error codes for analytics failures
// ABOUTME: Defines AppError, ErrorCode, and convenience constructors shared across the workspace
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Unified Error Handling System
//!
//! Centralized error handling for the Veloform analytics engine. Defines
//! standard error types and error codes so that every module reports failures
//! consistently.
//!
//! Missing athlete reference data (bodyweight, FTP history) is a *fatal*
//! condition: the batch must abort with an actionable message naming the
//! activity and date so the operator can backfill history. Insufficient
//! samples for a window, by contrast, is a non-fatal "not available" and is
//! expressed as `Option::None` at the call site, never as an error.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the analytics engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation (3000-3999)
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    #[serde(rename = "VALUE_OUT_OF_RANGE")]
    ValueOutOfRange = 3003,

    // Resource Management (4000-4999)
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound = 4000,
    #[serde(rename = "REFERENCE_DATA_MISSING")]
    ReferenceDataMissing = 4004,

    // Configuration (6000-6999)
    #[serde(rename = "CONFIG_INVALID")]
    ConfigInvalid = 6002,

    // Internal Errors (9000-9999)
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
}

impl ErrorCode {
    /// Get a human-readable description for this error code
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "Invalid input",
            Self::ValueOutOfRange => "Value out of range",
            Self::ResourceNotFound => "Resource not found",
            Self::ReferenceDataMissing => "Reference data missing",
            Self::ConfigInvalid => "Invalid configuration",
            Self::InternalError => "Internal error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Application error with standard code, message, and optional details
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct AppError {
    /// Standard error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Additional structured details
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a new error with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: serde_json::Value::Null,
        }
    }

    /// Attach structured details to this error
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Value outside its permitted range
    pub fn value_out_of_range(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValueOutOfRange, message)
    }

    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Athlete reference data missing for a date required by a computation.
    ///
    /// This is fatal for the batch: the operator must backfill the athlete's
    /// history before the computation can be retried.
    pub fn reference_data_missing(
        kind: &str,
        activity_id: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        let activity_id = activity_id.into();
        Self::new(
            ErrorCode::ReferenceDataMissing,
            format!(
                "no {kind} record covers {date}, required by activity {activity_id}; \
                 backfill the athlete's {kind} history"
            ),
        )
        .with_details(serde_json::json!({
            "kind": kind,
            "activity": activity_id,
            "date": date.to_string(),
        }))
    }

    /// Invalid configuration
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalid, message)
    }

    /// Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}
