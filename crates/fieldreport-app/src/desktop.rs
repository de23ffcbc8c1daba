// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Desktop device implementations for the CLI.
//
// There is no live camera or GPS on a workstation: image files stand in for
// camera frames (one file per grab, in order) and the position is supplied on
// the command line. The mail client is the system's `mailto:` handler.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::process::Command;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fieldreport_bridge::{
    CameraFacing, NativeCamera, NativeGeolocation, NativeMailClient, PlatformBridge,
    PositionOptions, VideoStream,
};
use fieldreport_core::error::{FieldReportError, Result};
use fieldreport_core::types::{GeoLocation, VideoFrame};
use tracing::{debug, info};

pub struct DesktopBridge {
    frames: Vec<PathBuf>,
    position: Option<GeoLocation>,
}

impl DesktopBridge {
    pub fn new(frames: Vec<PathBuf>, position: Option<GeoLocation>) -> Self {
        Self { frames, position }
    }
}

impl PlatformBridge for DesktopBridge {
    fn platform_name(&self) -> &str {
        "Desktop"
    }
}

#[async_trait]
impl NativeCamera for DesktopBridge {
    async fn open_stream(&self, facing: CameraFacing) -> Result<Box<dyn VideoStream>> {
        if facing == CameraFacing::Environment {
            return Err(FieldReportError::DeviceUnavailable(
                "no rear-facing camera on desktop".into(),
            ));
        }
        if self.frames.is_empty() {
            return Err(FieldReportError::DeviceUnavailable(
                "no image files were given as camera frames".into(),
            ));
        }
        info!(frames = self.frames.len(), "file-backed camera opened");
        Ok(Box::new(FileStream {
            queue: Mutex::new(self.frames.iter().cloned().collect()),
        }))
    }
}

/// Yields one decoded image file per grab.
struct FileStream {
    queue: Mutex<VecDeque<PathBuf>>,
}

impl VideoStream for FileStream {
    fn grab_frame(&self) -> Result<VideoFrame> {
        let next = self
            .queue
            .lock()
            .map_err(|_| FieldReportError::DeviceUnavailable("frame queue poisoned".into()))?
            .pop_front();
        let path = next.ok_or_else(|| {
            FieldReportError::DeviceUnavailable("no more image files to use as frames".into())
        })?;

        let raster = image::open(&path)
            .map_err(|err| FieldReportError::Image(format!("{}: {err}", path.display())))?
            .to_rgba8();
        debug!(path = %path.display(), width = raster.width(), height = raster.height(), "frame read");
        Ok(VideoFrame {
            width: raster.width(),
            height: raster.height(),
            rgba: raster.into_raw(),
        })
    }

    fn stop(&self) {
        if let Ok(mut queue) = self.queue.lock() {
            queue.clear();
        }
    }
}

#[async_trait]
impl NativeGeolocation for DesktopBridge {
    fn is_available(&self) -> bool {
        self.position.is_some()
    }

    async fn current_position(&self, _options: PositionOptions) -> Result<GeoLocation> {
        self.position.ok_or_else(|| {
            FieldReportError::DeviceUnavailable("no coordinates were given".into())
        })
    }
}

/// The system URI handler, invoked with `uri` as one argument.
///
/// No shell sits in between: `cmd /C start` would split the URI at the `&`
/// between query parameters, so Windows goes through the URL protocol
/// handler directly.
fn mail_launcher(uri: &str) -> Command {
    let mut command = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut rundll = Command::new("rundll32");
        rundll.arg("url.dll,FileProtocolHandler");
        rundll
    } else {
        Command::new("xdg-open")
    };
    command.arg(uri);
    command
}

impl NativeMailClient for DesktopBridge {
    fn open_mail_uri(&self, uri: &str) -> Result<()> {
        let mut command = mail_launcher(uri);
        debug!(program = ?command.get_program(), "opening mail client");
        let status = command.status()?;
        if !status.success() {
            return Err(FieldReportError::DeviceUnavailable(format!(
                "mail client launcher exited with {status}"
            )));
        }
        Ok(())
    }
}

/// The three device capabilities a session needs, split out of one bridge.
#[derive(Clone)]
pub struct Devices {
    pub camera: Arc<dyn NativeCamera>,
    pub geolocation: Arc<dyn NativeGeolocation>,
    pub mail_client: Arc<dyn NativeMailClient>,
}

impl Devices {
    pub fn from_bridge<B: PlatformBridge + 'static>(bridge: Arc<B>) -> Self {
        info!(platform = bridge.platform_name(), "platform bridge selected");
        Self {
            camera: bridge.clone(),
            geolocation: bridge.clone(),
            mail_client: bridge,
        }
    }
}
