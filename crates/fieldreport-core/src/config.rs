// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.
//
// Secrets (the hosted-email access token) are never written back to disk:
// they are skipped on serialisation and are expected to be injected through
// the environment at load time.

use serde::{Deserialize, Serialize};

use crate::error::{FieldReportError, Result};
use crate::types::ChannelKind;

/// Persistent application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub channel: ChannelConfig,
    pub capture: CaptureConfig,
    pub signature: SignatureConfig,
    pub geocoder: GeocoderConfig,
    pub report: ReportConfig,
}

/// Which delivery channel this deployment uses, plus per-channel settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    pub kind: ChannelKind,
    pub relay: RelayConfig,
    pub emailjs: EmailJsConfig,
    pub mailto: MailtoConfig,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            kind: ChannelKind::Relay,
            relay: RelayConfig::default(),
            emailjs: EmailJsConfig::default(),
            mailto: MailtoConfig::default(),
        }
    }
}

/// Mail relay accepting the multipart report upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Full URL of the `send-email` endpoint.
    pub endpoint: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3000/api/send-email".into(),
        }
    }
}

/// Hosted templated-email service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailJsConfig {
    pub endpoint: String,
    pub service_id: String,
    pub template_id: String,
    /// Public key identifying the account (sent as `user_id`).
    pub public_key: String,
    /// Private access token. Environment only; never persisted.
    #[serde(skip_serializing)]
    pub access_token: Option<String>,
}

impl Default for EmailJsConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.emailjs.com/api/v1.0/email/send".into(),
            service_id: String::new(),
            template_id: String::new(),
            public_key: String::new(),
            access_token: None,
        }
    }
}

/// Local mail-client handoff.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MailtoConfig {
    /// Recipient used when the form's email field is empty.
    pub default_recipient: Option<String>,
}

/// Photo capture settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub max_width: u32,
    pub max_height: u32,
    /// JPEG quality (1-100) for resized photos.
    pub jpeg_quality: u8,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            max_width: 600,
            max_height: 600,
            jpeg_quality: 80,
        }
    }
}

/// Signature surface settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SignatureConfig {
    pub width: u32,
    pub height: u32,
    pub line_width: u32,
    /// Bytes above the blank-surface encoding required to count as signed.
    pub ink_margin: usize,
}

impl Default for SignatureConfig {
    fn default() -> Self {
        Self {
            width: 300,
            height: 150,
            line_width: 3,
            ink_margin: 1,
        }
    }
}

/// Reverse-geocoding lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    /// Base URL; `/reverse` is appended.
    pub base_url: String,
    pub user_agent: String,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".into(),
            user_agent: concat!("fieldreport/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

/// Report document settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Fixed page width; height follows the rendered sheet's aspect ratio.
    pub page_width_mm: f32,
    pub title: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            page_width_mm: 210.0,
            title: "Cable identification report".into(),
        }
    }
}

impl AppConfig {
    /// Reject settings that would only fail later, mid-submission.
    pub fn validate(&self) -> Result<()> {
        match self.channel.kind {
            ChannelKind::Relay => {
                if self.channel.relay.endpoint.trim().is_empty() {
                    return Err(FieldReportError::Config(
                        "channel.relay.endpoint must not be empty".into(),
                    ));
                }
            }
            ChannelKind::EmailJs => {
                let emailjs = &self.channel.emailjs;
                for (name, value) in [
                    ("service_id", &emailjs.service_id),
                    ("template_id", &emailjs.template_id),
                    ("public_key", &emailjs.public_key),
                ] {
                    if value.trim().is_empty() {
                        return Err(FieldReportError::Config(format!(
                            "channel.emailjs.{name} must be set"
                        )));
                    }
                }
            }
            ChannelKind::Mailto => {}
        }

        if self.capture.max_width == 0 || self.capture.max_height == 0 {
            return Err(FieldReportError::Config(
                "capture bounds must be non-zero".into(),
            ));
        }
        if !(1..=100).contains(&self.capture.jpeg_quality) {
            return Err(FieldReportError::Config(format!(
                "capture.jpeg_quality must be 1-100, got {}",
                self.capture.jpeg_quality
            )));
        }
        if self.signature.width == 0 || self.signature.height == 0 {
            return Err(FieldReportError::Config(
                "signature surface must be non-zero".into(),
            ));
        }
        if self.report.page_width_mm <= 0.0 {
            return Err(FieldReportError::Config(
                "report.page_width_mm must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Copy safe to print or persist: secrets removed.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.channel.emailjs.access_token.is_some() {
            copy.channel.emailjs.access_token = Some("<redacted>".into());
        }
        copy
    }
}
