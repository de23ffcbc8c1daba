// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Location resolution — one high-accuracy position fix, then a best-effort
// reverse-geocoding lookup. The two are separate steps: only the fix is
// required for submission, and a failed lookup degrades to the
// "Address unavailable." placeholder.

use std::sync::Arc;

use async_trait::async_trait;
use fieldreport_bridge::{NativeGeolocation, PositionOptions};
use fieldreport_core::error::{FieldReportError, Result};
use fieldreport_core::types::{Address, GeoLocation};
use tracing::{info, instrument, warn};

/// Coordinates to a human-readable place name.
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn reverse(&self, location: GeoLocation) -> Result<Address>;
}

#[derive(Clone)]
pub struct LocationResolver {
    geolocation: Arc<dyn NativeGeolocation>,
    geocoder: Arc<dyn ReverseGeocoder>,
}

impl LocationResolver {
    pub fn new(geolocation: Arc<dyn NativeGeolocation>, geocoder: Arc<dyn ReverseGeocoder>) -> Self {
        Self {
            geolocation,
            geocoder,
        }
    }

    /// One position fix with high accuracy requested. An error means the
    /// caller keeps no location at all.
    #[instrument(skip(self))]
    pub async fn acquire(&self) -> Result<GeoLocation> {
        if !self.geolocation.is_available() {
            warn!("geolocation is not supported");
            return Err(FieldReportError::DeviceUnavailable(
                "geolocation is not supported on this device".into(),
            ));
        }
        let location = self
            .geolocation
            .current_position(PositionOptions { high_accuracy: true })
            .await
            .inspect_err(|err| warn!(error = %err, "could not obtain a position"))?;
        info!(%location, "position fixed");
        Ok(location)
    }

    /// Reverse lookup; never fails.
    #[instrument(skip(self))]
    pub async fn lookup_address(&self, location: GeoLocation) -> Address {
        match self.geocoder.reverse(location).await {
            Ok(address) => {
                info!(%address, "address resolved");
                address
            }
            Err(err) => {
                warn!(error = %err, "reverse geocoding failed");
                Address::unavailable()
            }
        }
    }
}
