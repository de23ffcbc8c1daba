// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for a field report session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationFailure;

/// Text shown in place of an address when reverse geocoding fails.
pub const ADDRESS_UNAVAILABLE: &str = "Address unavailable.";

/// Stable identifier assigned to a photo at capture time.
///
/// Removal always goes through this id, never through the photo bytes, so two
/// byte-identical captures stay independently removable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhotoId(pub Uuid);

impl PhotoId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PhotoId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PhotoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raster encodings produced by the capture pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageEncoding {
    Png,
    Jpeg,
}

impl ImageEncoding {
    /// MIME type used in multipart parts and data URLs.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    /// File extension used for attachment names.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }
}

/// One still frame grabbed from a live camera stream, at native resolution.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8 pixels, row-major.
    pub rgba: Vec<u8>,
}

/// A photo in the session's capture roll.
#[derive(Debug, Clone)]
pub struct CapturedPhoto {
    pub id: PhotoId,
    /// Encoded (resized) image bytes.
    pub data: Vec<u8>,
    pub encoding: ImageEncoding,
    pub width: u32,
    pub height: u32,
    pub captured_at: DateTime<Utc>,
}

/// Encoded export of the signature surface.
#[derive(Debug, Clone)]
pub struct SignatureImage {
    /// PNG bytes of the whole drawing surface.
    pub data: Vec<u8>,
    /// Smallest encoded size that counts as "signed". A blank surface of the
    /// same dimensions always encodes below this.
    pub min_present_len: usize,
}

impl SignatureImage {
    /// Whether the surface carries enough ink to count as a signature.
    pub fn is_present(&self) -> bool {
        self.data.len() >= self.min_present_len
    }
}

/// Device coordinates from a successful position fix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoLocation {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl std::fmt::Display for GeoLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Debug formatting keeps the decimal point on whole degrees (40.0, not 40).
        write!(f, "Lat: {:?}, Lon: {:?}", self.latitude, self.longitude)
    }
}

/// Human-readable address resolved from a [`GeoLocation`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address(pub String);

impl Address {
    /// The fixed placeholder used when the lookup fails.
    pub fn unavailable() -> Self {
        Self(ADDRESS_UNAVAILABLE.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Location half of the session state.
///
/// `address` is only ever set alongside `location`; a failed position fix
/// clears both.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationState {
    pub location: Option<GeoLocation>,
    pub address: Option<Address>,
}

impl LocationState {
    pub fn resolved(location: GeoLocation, address: Address) -> Self {
        Self {
            location: Some(location),
            address: Some(address),
        }
    }
}

/// Text fields the worker fills in on the report form.
///
/// Serialised with the wire names the mail relay expects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormValues {
    pub work_reference: String,
    pub cable_description: String,
    pub chain_description: String,
    pub marked_description: String,
    pub full_name: String,
    pub company: String,
    pub equipment: String,
    pub email: String,
    pub date: String,
}

impl FormValues {
    /// `(wire name, label, value)` for every field, in form order.
    pub fn fields(&self) -> [(&'static str, &'static str, &str); 9] {
        [
            ("workReference", "Work reference", self.work_reference.as_str()),
            ("cableDescription", "Cable description", self.cable_description.as_str()),
            ("chainDescription", "Electrical chain", self.chain_description.as_str()),
            ("markedDescription", "Marking description", self.marked_description.as_str()),
            ("fullName", "Worker name", self.full_name.as_str()),
            ("company", "Company", self.company.as_str()),
            ("equipment", "Equipment used", self.equipment.as_str()),
            ("email", "Destination email", self.email.as_str()),
            ("date", "Date", self.date.as_str()),
        ]
    }

    /// `Label: value` lines as printed on the report sheet and in mail bodies.
    pub fn summary_lines(&self) -> Vec<String> {
        self.fields()
            .iter()
            .map(|(_, label, value)| format!("{label}: {value}"))
            .collect()
    }
}

/// Rendered single-page report, produced fresh for every submission attempt.
#[derive(Debug, Clone)]
pub struct ReportArtifact {
    pub pdf: Vec<u8>,
    pub file_name: String,
    /// SHA-256 of `pdf`, lowercase hex.
    pub sha256: String,
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub created_at: DateTime<Utc>,
}

/// Everything collected in a session at the moment the user presses submit.
#[derive(Debug, Clone)]
pub struct SubmissionDraft {
    pub signature: SignatureImage,
    pub photos: Vec<CapturedPhoto>,
    pub location: LocationState,
    pub form: FormValues,
}

impl SubmissionDraft {
    /// Short-circuiting gate: signature, then photos, then location.
    pub fn validate(&self) -> std::result::Result<GeoLocation, ValidationFailure> {
        if !self.signature.is_present() {
            return Err(ValidationFailure::MissingSignature);
        }
        if self.photos.is_empty() {
            return Err(ValidationFailure::MissingPhoto);
        }
        self.location.location.ok_or(ValidationFailure::MissingLocation)
    }
}

/// The delivery mechanisms a deployment can be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    /// Multipart upload to the mail relay.
    Relay,
    /// Hosted templated-email API.
    EmailJs,
    /// Pre-filled `mailto:` link handed to the local mail client.
    Mailto,
}

impl std::fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Relay => "relay",
            Self::EmailJs => "emailjs",
            Self::Mailto => "mailto",
        };
        f.write_str(name)
    }
}

/// Outcome of a successful hand-off to a delivery channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub channel: ChannelKind,
    /// False when the channel cannot confirm delivery (mail-client handoff).
    pub confirmed: bool,
    pub detail: String,
}
