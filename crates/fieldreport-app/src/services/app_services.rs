// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer — loads configuration and builds the session and the
// dispatcher from it.
//
// Configuration is layered with figment: built-in defaults, then the JSON
// config file, then `FIELDREPORT_` environment variables (`__` separates
// nesting levels, e.g. `FIELDREPORT_CHANNEL__EMAILJS__ACCESS_TOKEN`).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized};
use fieldreport_capture::{
    CameraCapture, LocationResolver, NominatimGeocoder, ReverseGeocoder, SignaturePad,
};
use fieldreport_core::AppConfig;
use fieldreport_core::error::{FieldReportError, Result};
use fieldreport_core::types::ReportArtifact;
use fieldreport_dispatch::{SubmissionDispatcher, build_channel};
use fieldreport_document::{ImageResizer, ReportComposer};
use tracing::{debug, info};

use super::data_dir;
use crate::desktop::Devices;
use crate::notify::Notifier;
use crate::session::FieldSession;

pub const CONFIG_FILE: &str = "config.json";
const ENV_PREFIX: &str = "FIELDREPORT_";

/// Load and validate configuration from `path` (missing file = defaults).
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let config: AppConfig = Figment::new()
        .merge(Serialized::defaults(AppConfig::default()))
        .merge(Json::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|err| FieldReportError::Config(err.to_string()))?;
    config.validate()?;
    debug!(path = %path.display(), channel = %config.channel.kind, "configuration loaded");
    Ok(config)
}

/// Settings, storage and devices for one process.
#[derive(Clone)]
pub struct AppServices {
    config: AppConfig,
    data_dir: PathBuf,
    devices: Devices,
}

impl AppServices {
    pub fn new(config: AppConfig, data_dir: PathBuf, devices: Devices) -> Self {
        Self {
            config,
            data_dir,
            devices,
        }
    }

    /// Resolve the data directory and load the config file from it, or from
    /// `config_path` when given.
    pub fn init(config_path: Option<&Path>, devices: Devices) -> Result<Self> {
        let dir = data_dir::data_dir();
        let path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| dir.join(CONFIG_FILE));
        info!(data_dir = %dir.display(), config = %path.display(), "initialising app services");
        let config = load_config(&path)?;
        Ok(Self::new(config, dir, devices))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Reverse geocoder from the `geocoder` section.
    pub fn geocoder(&self) -> Result<Arc<dyn ReverseGeocoder>> {
        Ok(Arc::new(NominatimGeocoder::from_config(&self.config.geocoder)?))
    }

    /// Dispatcher wired to the configured channel.
    pub fn dispatcher(&self) -> Result<SubmissionDispatcher> {
        let channel = build_channel(&self.config.channel, self.devices.mail_client.clone())?;
        Ok(SubmissionDispatcher::new(
            ReportComposer::from_config(&self.config.report),
            channel,
        ))
    }

    /// A fresh, not yet started session.
    pub fn session(
        &self,
        geocoder: Arc<dyn ReverseGeocoder>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<FieldSession> {
        let camera = CameraCapture::new(
            self.devices.camera.clone(),
            ImageResizer::from_config(&self.config.capture),
        );
        let signature = SignaturePad::from_config(&self.config.signature)?;
        let locator = LocationResolver::new(self.devices.geolocation.clone(), geocoder);
        Ok(FieldSession::new(camera, signature, locator, notifier))
    }

    /// Keep a copy of a composed report under `reports/<sha256>.pdf`.
    pub fn store_report(&self, artifact: &ReportArtifact) -> Result<PathBuf> {
        let path = data_dir::subdir(&self.data_dir, "reports").join(format!("{}.pdf", artifact.sha256));
        if !path.exists() {
            std::fs::write(&path, &artifact.pdf)?;
        }
        Ok(path)
    }

    /// Write the effective configuration (secrets excluded) to the data dir.
    pub fn save_config(&self) -> Result<PathBuf> {
        let path = self.data_dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(&self.config)?;
        std::fs::write(&path, json)?;
        info!(path = %path.display(), "configuration written");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::desktop::DesktopBridge;
    use fieldreport_core::types::ChannelKind;

    fn services(dir: &Path, config: AppConfig) -> AppServices {
        let devices = Devices::from_bridge(Arc::new(DesktopBridge::new(vec![], None)));
        AppServices::new(config, dir.to_path_buf(), devices)
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config.channel.kind, ChannelKind::Relay);
        assert_eq!(config.capture.max_width, 600);
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(
            &path,
            r#"{ "channel": { "kind": "mailto", "mailto": { "default_recipient": "office@example.com" } },
                 "capture": { "jpeg_quality": 70 } }"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.channel.kind, ChannelKind::Mailto);
        assert_eq!(
            config.channel.mailto.default_recipient.as_deref(),
            Some("office@example.com")
        );
        assert_eq!(config.capture.jpeg_quality, 70);
        assert_eq!(config.capture.max_height, 600);
    }

    #[test]
    fn invalid_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{ "channel": { "kind": "emailjs" } }"#).unwrap();
        assert!(matches!(load_config(&path), Err(FieldReportError::Config(_))));
    }

    #[test]
    fn saved_config_round_trips_without_secrets() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.channel.emailjs.access_token = Some("secret".into());
        let path = services(dir.path(), config).save_config().unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(!written.contains("secret"));
        assert!(load_config(&path).is_ok());
    }

    #[test]
    fn configuration_needs_no_devices() {
        let dir = tempfile::tempdir().unwrap();
        let devices = Devices::from_bridge(Arc::new(fieldreport_bridge::StubBridge));
        let services = AppServices::new(AppConfig::default(), dir.path().to_path_buf(), devices);
        let path = services.save_config().unwrap();
        assert_eq!(load_config(&path).unwrap().channel.kind, ChannelKind::Relay);
    }

    #[test]
    fn reports_are_stored_by_fingerprint() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = ReportArtifact {
            pdf: b"%PDF-1.7".to_vec(),
            file_name: "report.pdf".into(),
            sha256: "abc123".into(),
            page_width_mm: 210.0,
            page_height_mm: 100.0,
            created_at: chrono::Utc::now(),
        };
        let path = services(dir.path(), AppConfig::default())
            .store_report(&artifact)
            .unwrap();
        assert!(path.ends_with("reports/abc123.pdf"));
        assert_eq!(std::fs::read(path).unwrap(), b"%PDF-1.7");
    }
}
