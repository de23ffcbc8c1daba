// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub bridge for builds where no native host is wired in.
//
// Every capability returns `PlatformUnavailable`; geolocation reports itself
// as absent so callers take the "not supported" path instead of waiting.

use async_trait::async_trait;
use fieldreport_core::error::{FieldReportError, Result};
use fieldreport_core::types::GeoLocation;

use crate::traits::*;

/// No-op bridge.
pub struct StubBridge;

impl PlatformBridge for StubBridge {
    fn platform_name(&self) -> &str {
        "Headless (stub)"
    }
}

#[async_trait]
impl NativeCamera for StubBridge {
    async fn open_stream(&self, facing: CameraFacing) -> Result<Box<dyn VideoStream>> {
        tracing::warn!(?facing, "NativeCamera::open_stream called on stub bridge");
        Err(FieldReportError::PlatformUnavailable)
    }
}

#[async_trait]
impl NativeGeolocation for StubBridge {
    fn is_available(&self) -> bool {
        false
    }

    async fn current_position(&self, _options: PositionOptions) -> Result<GeoLocation> {
        tracing::warn!("NativeGeolocation::current_position called on stub bridge");
        Err(FieldReportError::PlatformUnavailable)
    }
}

impl NativeMailClient for StubBridge {
    fn open_mail_uri(&self, _uri: &str) -> Result<()> {
        tracing::warn!("NativeMailClient::open_mail_uri called on stub bridge");
        Err(FieldReportError::PlatformUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stub_camera_is_unavailable() {
        let result = StubBridge.open_stream(CameraFacing::Environment).await;
        assert!(matches!(result, Err(FieldReportError::PlatformUnavailable)));
    }

    #[test]
    fn stub_geolocation_reports_absent() {
        assert!(!StubBridge.is_available());
    }

    #[test]
    fn stub_mail_client_is_unavailable() {
        let bridge: Box<dyn PlatformBridge> = Box::new(StubBridge);
        assert_eq!(bridge.platform_name(), "Headless (stub)");
        assert!(bridge.open_mail_uri("mailto:a@b.c").is_err());
    }
}
