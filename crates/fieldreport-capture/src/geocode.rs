// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Reverse geocoding against a Nominatim-compatible `/reverse` endpoint.

use async_trait::async_trait;
use fieldreport_core::config::GeocoderConfig;
use fieldreport_core::error::{FieldReportError, Result};
use fieldreport_core::types::{Address, GeoLocation};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::location::ReverseGeocoder;

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    display_name: Option<String>,
}

/// HTTP client for `GET {base_url}/reverse?format=json&lat=..&lon=..`.
pub struct NominatimGeocoder {
    http: reqwest::Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(base_url: impl Into<String>, user_agent: &str) -> Result<Self> {
        // Nominatim's usage policy requires an identifying User-Agent.
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|err| FieldReportError::Network(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        })
    }

    pub fn from_config(config: &GeocoderConfig) -> Result<Self> {
        Self::new(config.base_url.clone(), &config.user_agent)
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    #[instrument(skip(self))]
    async fn reverse(&self, location: GeoLocation) -> Result<Address> {
        let url = format!("{}/reverse", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("format", "json".to_owned()),
                ("lat", location.latitude.to_string()),
                ("lon", location.longitude.to_string()),
            ])
            .send()
            .await
            .map_err(|err| FieldReportError::Network(format!("geocoder request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FieldReportError::Network(format!("geocoder returned {status}")));
        }

        let body: ReverseResponse = response
            .json()
            .await
            .map_err(|err| FieldReportError::Network(format!("invalid geocoder response: {err}")))?;
        let name = body
            .display_name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| FieldReportError::Network("geocoder response has no display_name".into()))?;
        debug!(address = %name, "address resolved");
        Ok(Address(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use std::collections::HashMap;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn resolves_display_name() {
        let app = Router::new().route(
            "/reverse",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                assert_eq!(params["format"], "json");
                Json(serde_json::json!({
                    "display_name": format!("Somewhere at {},{}", params["lat"], params["lon"]),
                }))
            }),
        );
        let base = serve(app).await;

        let geocoder = NominatimGeocoder::new(base, "fieldreport-test").unwrap();
        let address = geocoder.reverse(GeoLocation::new(40.5, -3.25)).await.unwrap();
        assert_eq!(address.as_str(), "Somewhere at 40.5,-3.25");
    }

    #[tokio::test]
    async fn server_error_is_a_network_failure() {
        let app = Router::new().route("/reverse", get(|| async { StatusCode::SERVICE_UNAVAILABLE }));
        let base = serve(app).await;

        let geocoder = NominatimGeocoder::new(base, "fieldreport-test").unwrap();
        let err = geocoder.reverse(GeoLocation::new(0.0, 0.0)).await.unwrap_err();
        assert!(matches!(err, FieldReportError::Network(_)));
    }

    #[tokio::test]
    async fn missing_display_name_is_a_failure() {
        let app = Router::new().route("/reverse", get(|| async { Json(serde_json::json!({})) }));
        let base = serve(app).await;

        let geocoder = NominatimGeocoder::new(base, "fieldreport-test").unwrap();
        assert!(geocoder.reverse(GeoLocation::new(0.0, 0.0)).await.is_err());
    }
}
