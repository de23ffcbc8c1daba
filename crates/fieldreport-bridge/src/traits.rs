// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for native capabilities.
//
// Camera and geolocation are asynchronous on every host (permission prompts,
// sensor warm-up), so those traits are async. Frame grabs and mail-client
// handoff are immediate.

use async_trait::async_trait;
use fieldreport_core::error::Result;
use fieldreport_core::types::{GeoLocation, VideoFrame};

/// Unified bridge that groups all native capabilities a session needs.
pub trait PlatformBridge: NativeCamera + NativeGeolocation + NativeMailClient {
    /// Human-readable platform name (e.g. "Android 14", "Desktop").
    fn platform_name(&self) -> &str;
}

/// Which camera to ask for when opening a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraFacing {
    /// Rear ("environment") camera, pointed away from the user.
    Environment,
    /// Whatever camera the device offers.
    Any,
}

/// Live video from the device camera.
#[async_trait]
pub trait NativeCamera: Send + Sync {
    /// Request a stream. Fails with `PermissionDenied` when the user refuses
    /// and `DeviceUnavailable` when no matching camera exists.
    async fn open_stream(&self, facing: CameraFacing) -> Result<Box<dyn VideoStream>>;
}

/// An open camera stream.
pub trait VideoStream: Send + Sync {
    /// The current frame at the stream's native resolution.
    fn grab_frame(&self) -> Result<VideoFrame>;

    /// Release the camera. Further grabs may fail.
    fn stop(&self);
}

/// Options for a one-shot position request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub high_accuracy: bool,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
        }
    }
}

/// Device positioning.
#[async_trait]
pub trait NativeGeolocation: Send + Sync {
    /// Whether the host exposes geolocation at all.
    fn is_available(&self) -> bool;

    /// Acquire the current position once.
    async fn current_position(&self, options: PositionOptions) -> Result<GeoLocation>;
}

/// Hand a `mailto:` URI to the system mail client.
pub trait NativeMailClient: Send + Sync {
    /// Returns Ok(()) if the client was launched. Whether the mail is ever
    /// sent is outside the app's knowledge.
    fn open_mail_uri(&self, uri: &str) -> Result<()>;
}
