// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command handlers for the `fieldreport` binary.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use fieldreport_bridge::StubBridge;
use fieldreport_capture::{PointerEvent, PointerPhase, ReverseGeocoder, SurfaceRect};
use fieldreport_core::error::{FieldReportError, Result};
use fieldreport_core::types::{Address, FormValues, GeoLocation};
use tracing::{debug, info, warn};

use crate::cli::{CaptureArgs, Cli, Command, ConfigCommand};
use crate::desktop::{DesktopBridge, Devices};
use crate::notify::ConsoleNotifier;
use crate::services::AppServices;
use crate::session::FieldSession;

/// How long a command waits for the address before sending without it.
const ADDRESS_WAIT: Duration = Duration::from_secs(15);

/// One stroke as a polyline in surface pixels.
pub type Stroke = Vec<[f32; 2]>;

pub async fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Command::Submit(args) => submit(cli.config.as_deref(), &args).await,
        Command::Preview { capture, output } => {
            preview(cli.config.as_deref(), &capture, output).await
        }
        Command::Config(command) => config(cli.config.as_deref(), command),
    }
}

async fn submit(config_path: Option<&Path>, args: &CaptureArgs) -> Result<ExitCode> {
    let services = services_for(config_path, args)?;
    let session = capture_session(&services, args).await?;
    let dispatcher = services.dispatcher()?;

    // The session has already alerted the user on failure.
    Ok(match session.submit(&dispatcher).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    })
}

async fn preview(
    config_path: Option<&Path>,
    args: &CaptureArgs,
    output: Option<PathBuf>,
) -> Result<ExitCode> {
    let services = services_for(config_path, args)?;
    let session = capture_session(&services, args).await?;
    let dispatcher = services.dispatcher()?;

    let Ok(artifact) = session.preview(&dispatcher) else {
        return Ok(ExitCode::FAILURE);
    };
    let path = match output {
        Some(path) => {
            std::fs::write(&path, &artifact.pdf)?;
            path
        }
        None => services.store_report(&artifact)?,
    };
    println!("{} ({})", path.display(), artifact.sha256);
    Ok(ExitCode::SUCCESS)
}

fn config(config_path: Option<&Path>, command: ConfigCommand) -> Result<ExitCode> {
    // Configuration commands touch no device.
    let devices = Devices::from_bridge(Arc::new(StubBridge));
    let services = AppServices::init(config_path, devices)?;
    match command {
        ConfigCommand::Show => {
            println!("{}", serde_json::to_string_pretty(&services.config().redacted())?);
        }
        ConfigCommand::Init => {
            let path = services.save_config()?;
            println!("{}", path.display());
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn services_for(config_path: Option<&Path>, args: &CaptureArgs) -> Result<AppServices> {
    let position = args.lat.zip(args.lon).map(|(lat, lon)| GeoLocation::new(lat, lon));
    let bridge = Arc::new(DesktopBridge::new(args.photos.clone(), position));
    AppServices::init(config_path, Devices::from_bridge(bridge))
}

/// Start a session and feed it the desktop inputs: one capture per image
/// file, the signature strokes and the form.
async fn capture_session(services: &AppServices, args: &CaptureArgs) -> Result<FieldSession> {
    let geocoder: Arc<dyn ReverseGeocoder> = if args.offline {
        Arc::new(OfflineGeocoder)
    } else {
        services.geocoder()?
    };
    let mut session = services.session(geocoder, Arc::new(ConsoleNotifier))?;
    session.start().await;

    for _ in &args.photos {
        if session.capture_photo().is_none() {
            break;
        }
    }

    let strokes = load_strokes(&args.signature)?;
    replay_strokes(&mut session, &strokes);

    if let Some(path) = &args.form {
        *session.form_mut() = load_form(path)?;
    }

    if session.location().location.is_some()
        && tokio::time::timeout(ADDRESS_WAIT, session.address_resolved())
            .await
            .is_err()
    {
        warn!(waited = ?ADDRESS_WAIT, "address lookup still pending; sending without it");
    }
    info!(
        photos = session.photos().len(),
        strokes = strokes.len(),
        located = session.location().location.is_some(),
        "session inputs loaded"
    );
    Ok(session)
}

pub fn load_strokes(path: &Path) -> Result<Vec<Stroke>> {
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

pub fn load_form(path: &Path) -> Result<FormValues> {
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

/// Draw each stroke as mouse down, moves, up.
pub fn replay_strokes(session: &mut FieldSession, strokes: &[Stroke]) {
    let rect = SurfaceRect::default();
    for stroke in strokes {
        let (Some([x0, y0]), Some([xn, yn])) = (stroke.first(), stroke.last()) else {
            continue;
        };
        session.handle_pointer(PointerEvent::mouse(PointerPhase::Down, *x0, *y0), rect);
        for [x, y] in &stroke[1..] {
            session.handle_pointer(PointerEvent::mouse(PointerPhase::Move, *x, *y), rect);
        }
        session.handle_pointer(PointerEvent::mouse(PointerPhase::Up, *xn, *yn), rect);
    }
    debug!(strokes = strokes.len(), "signature strokes replayed");
}

/// Used with `--offline`: every lookup fails, so the address falls back to
/// the placeholder.
struct OfflineGeocoder;

#[async_trait]
impl ReverseGeocoder for OfflineGeocoder {
    async fn reverse(&self, _location: GeoLocation) -> Result<Address> {
        Err(FieldReportError::Network("reverse geocoding disabled (--offline)".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strokes_parse_from_nested_arrays() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sig.json");
        std::fs::write(&path, "[[[1, 2], [3.5, 4]], [[10, 10]]]").unwrap();
        let strokes = load_strokes(&path).unwrap();
        assert_eq!(strokes.len(), 2);
        assert_eq!(strokes[0][1], [3.5, 4.0]);
    }

    #[test]
    fn form_uses_wire_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("form.json");
        std::fs::write(&path, r#"{ "workReference": "WR-9", "fullName": "Ana" }"#).unwrap();
        let form = load_form(&path).unwrap();
        assert_eq!(form.work_reference, "WR-9");
        assert_eq!(form.full_name, "Ana");
        assert!(form.company.is_empty());
    }

    #[test]
    fn malformed_strokes_are_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sig.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(load_strokes(&path), Err(FieldReportError::Serialization(_))));
    }
}
