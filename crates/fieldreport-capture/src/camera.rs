// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Camera capture — open a stream (rear camera first, any camera second),
// grab stills at native resolution, bound them through the resizer and keep
// them in an ordered, id-addressed photo roll.

use std::sync::Arc;

use chrono::Utc;
use fieldreport_bridge::{CameraFacing, NativeCamera, VideoStream};
use fieldreport_core::error::{FieldReportError, Result};
use fieldreport_core::types::{CapturedPhoto, PhotoId, VideoFrame};
use fieldreport_document::ImageResizer;
use image::{DynamicImage, RgbaImage};
use tracing::{debug, error, info, instrument, warn};

/// Captured photos in capture order. Insertion order is display order.
#[derive(Debug, Clone, Default)]
pub struct PhotoRoll {
    photos: Vec<CapturedPhoto>,
}

impl PhotoRoll {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, photo: CapturedPhoto) -> PhotoId {
        let id = photo.id;
        self.photos.push(photo);
        id
    }

    /// Remove exactly the photo with this id. Other entries, including
    /// byte-identical ones, are untouched.
    pub fn remove(&mut self, id: PhotoId) -> Option<CapturedPhoto> {
        let index = self.photos.iter().position(|photo| photo.id == id)?;
        Some(self.photos.remove(index))
    }

    pub fn get(&self, id: PhotoId) -> Option<&CapturedPhoto> {
        self.photos.iter().find(|photo| photo.id == id)
    }

    /// Ids in display order, one per thumbnail.
    pub fn ids(&self) -> Vec<PhotoId> {
        self.photos.iter().map(|photo| photo.id).collect()
    }

    /// Most recent capture, shown as the large preview.
    pub fn latest(&self) -> Option<&CapturedPhoto> {
        self.photos.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CapturedPhoto> {
        self.photos.iter()
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    pub fn clear(&mut self) {
        self.photos.clear();
    }

    pub fn to_vec(&self) -> Vec<CapturedPhoto> {
        self.photos.clone()
    }
}

/// Live camera plus the session's photo roll.
pub struct CameraCapture {
    camera: Arc<dyn NativeCamera>,
    stream: Option<Box<dyn VideoStream>>,
    resizer: ImageResizer,
    roll: PhotoRoll,
}

impl CameraCapture {
    pub fn new(camera: Arc<dyn NativeCamera>, resizer: ImageResizer) -> Self {
        Self {
            camera,
            stream: None,
            resizer,
            roll: PhotoRoll::new(),
        }
    }

    /// Open the rear camera, falling back to any camera.
    ///
    /// On total failure capture stays disabled and the last error is
    /// returned for the user-facing notice.
    pub async fn start(&mut self) -> Result<()> {
        let stream = match self.camera.open_stream(CameraFacing::Environment).await {
            Ok(stream) => stream,
            Err(err) => {
                warn!(error = %err, "rear camera unavailable, trying any camera");
                match self.camera.open_stream(CameraFacing::Any).await {
                    Ok(stream) => stream,
                    Err(err) => {
                        error!(error = %err, "could not access any camera");
                        self.stream = None;
                        return Err(err);
                    }
                }
            }
        };
        info!("camera stream started");
        self.stream = Some(stream);
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.stream.is_some()
    }

    /// Grab the current frame, bound it to the resizer's box and append it.
    #[instrument(skip(self), fields(roll = self.roll.len()))]
    pub fn capture(&mut self) -> Result<PhotoId> {
        let Some(stream) = self.stream.as_ref() else {
            warn!("capture requested without an active stream");
            return Err(FieldReportError::DeviceUnavailable("the camera is not active".into()));
        };

        let frame = stream.grab_frame()?;
        let raster = frame_to_raster(frame)?;
        debug!(width = raster.width(), height = raster.height(), "frame grabbed");

        let resized = self.resizer.resize(&DynamicImage::ImageRgba8(raster))?;
        let photo = CapturedPhoto {
            id: PhotoId::new(),
            data: resized.data,
            encoding: resized.encoding,
            width: resized.width,
            height: resized.height,
            captured_at: Utc::now(),
        };
        let id = self.roll.push(photo);
        info!(photo = %id, count = self.roll.len(), "photo captured");
        Ok(id)
    }

    /// Remove one photo (its thumbnail's delete control).
    pub fn remove(&mut self, id: PhotoId) -> Option<CapturedPhoto> {
        let removed = self.roll.remove(id);
        if removed.is_some() {
            debug!(photo = %id, remaining = self.roll.len(), "photo removed");
        }
        removed
    }

    pub fn photos(&self) -> &PhotoRoll {
        &self.roll
    }

    /// Release the stream. Captured photos are kept.
    pub fn stop(&mut self) {
        if let Some(stream) = self.stream.take() {
            stream.stop();
            info!("camera stream stopped");
        }
    }

    /// Stop the stream and drop every photo.
    pub fn reset(&mut self) {
        self.stop();
        self.roll.clear();
    }
}

fn frame_to_raster(frame: VideoFrame) -> Result<RgbaImage> {
    if frame.width == 0 || frame.height == 0 {
        return Err(FieldReportError::DeviceUnavailable(
            "the camera has not produced a frame yet".into(),
        ));
    }
    let (width, height) = (frame.width, frame.height);
    RgbaImage::from_raw(width, height, frame.rgba).ok_or_else(|| {
        FieldReportError::Image(format!("frame buffer does not match {width}x{height} RGBA"))
    })
}
