// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for fieldreport.

use thiserror::Error;

/// Which required artifact is missing from a submission.
///
/// Checked in declaration order; the first missing artifact wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationFailure {
    MissingSignature,
    MissingPhoto,
    MissingLocation,
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::MissingSignature => "signature is missing",
            Self::MissingPhoto => "at least one photo is required",
            Self::MissingLocation => "location is not available",
        };
        f.write_str(text)
    }
}

/// Top-level error type for all fieldreport operations.
#[derive(Debug, Error)]
pub enum FieldReportError {
    // -- Device access --
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("device unavailable: {0}")]
    DeviceUnavailable(String),

    // -- Transport --
    #[error("network failure: {0}")]
    Network(String),

    // -- Submission --
    #[error("validation failed: {0}")]
    Validation(ValidationFailure),

    #[error("a submission is already in progress")]
    SubmissionInFlight,

    // -- Document --
    #[error("report rendering failed: {0}")]
    Render(String),

    #[error("image processing failed: {0}")]
    Image(String),

    // -- Configuration / persistence --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Platform bridge --
    #[error("feature not available on this platform")]
    PlatformUnavailable,
}

impl From<ValidationFailure> for FieldReportError {
    fn from(failure: ValidationFailure) -> Self {
        Self::Validation(failure)
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FieldReportError>;
