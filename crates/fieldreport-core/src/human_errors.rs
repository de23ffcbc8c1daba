// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the worker in the field.
//
// Every technical error is mapped to plain language with a clear next step.
// Nothing is retried automatically; `can_retry` only tells the UI whether
// pressing the button again is worth suggesting.

use crate::error::{FieldReportError, ValidationFailure};

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The user must do something first (sign, take a photo, grant access).
    ActionRequired,
    /// Connectivity or service hiccup — trying again later may work.
    Transient,
    /// Cannot be fixed from the form — device or setup problem.
    Permanent,
}

/// A human-readable error with a plain message and an actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Short summary (shown as the alert heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether submitting again without changes may succeed.
    pub can_retry: bool,
    pub severity: Severity,
}

/// Convert a `FieldReportError` into a `HumanError` fit for a blocking alert.
pub fn humanize_error(err: &FieldReportError) -> HumanError {
    match err {
        FieldReportError::PermissionDenied(detail) => {
            let what = if detail.contains("camera") {
                "the camera"
            } else if detail.contains("location") || detail.contains("geolocation") {
                "your location"
            } else {
                "this device feature"
            };
            HumanError {
                message: format!("Access to {what} was denied."),
                suggestion: "Allow access in the browser or system settings, then reload the form."
                    .into(),
                can_retry: false,
                severity: Severity::ActionRequired,
            }
        }

        FieldReportError::DeviceUnavailable(detail) => HumanError {
            message: "A required device is not available.".into(),
            suggestion: format!(
                "Make sure the device has a working camera and location services are on. ({detail})"
            ),
            can_retry: false,
            severity: Severity::Permanent,
        },

        FieldReportError::Network(_) => HumanError {
            message: "The report could not be sent.".into(),
            suggestion: "Check your connection and press send again. Your photos and signature are kept."
                .into(),
            can_retry: true,
            severity: Severity::Transient,
        },

        FieldReportError::Validation(failure) => humanize_validation(*failure),

        FieldReportError::SubmissionInFlight => HumanError {
            message: "The report is already being sent.".into(),
            suggestion: "Wait for the current attempt to finish.".into(),
            can_retry: false,
            severity: Severity::ActionRequired,
        },

        FieldReportError::Render(_) | FieldReportError::Image(_) => HumanError {
            message: "The PDF could not be generated.".into(),
            suggestion: "Press send again. If it keeps failing, remove the last photo and retake it."
                .into(),
            can_retry: true,
            severity: Severity::Transient,
        },

        FieldReportError::Config(detail) => HumanError {
            message: "The app is not set up correctly.".into(),
            suggestion: format!("Ask your administrator to check the configuration. ({detail})"),
            can_retry: false,
            severity: Severity::Permanent,
        },

        FieldReportError::Io(_) | FieldReportError::Serialization(_) => HumanError {
            message: "A file could not be read or written.".into(),
            suggestion: "Check the file exists and is readable, then try again.".into(),
            can_retry: true,
            severity: Severity::Transient,
        },

        FieldReportError::PlatformUnavailable => HumanError {
            message: "This feature isn't available on this device.".into(),
            suggestion: "Use a phone or tablet with a camera and location services.".into(),
            can_retry: false,
            severity: Severity::Permanent,
        },
    }
}

fn humanize_validation(failure: ValidationFailure) -> HumanError {
    let (message, suggestion) = match failure {
        ValidationFailure::MissingSignature => (
            "Please sign the form before sending.",
            "Draw your signature in the box.",
        ),
        ValidationFailure::MissingPhoto => (
            "Please take at least one photo before sending.",
            "Use the camera button to capture the cable.",
        ),
        ValidationFailure::MissingLocation => (
            "Your location could not be determined.",
            "Check location permissions, then reload the form and try again.",
        ),
    };
    HumanError {
        message: message.into(),
        suggestion: suggestion.into(),
        can_retry: false,
        severity: Severity::ActionRequired,
    }
}
