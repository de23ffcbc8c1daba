// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image resizer — scale captured frames down to a bounding box and re-encode
// them as fixed-quality JPEG. Operates on in-memory images using the `image`
// crate.

use fieldreport_core::config::CaptureConfig;
use fieldreport_core::error::FieldReportError;
use fieldreport_core::types::ImageEncoding;
use image::DynamicImage;
use image::imageops::FilterType;
use tracing::{debug, instrument};

/// Target dimensions for an image of `width` x `height` inside the box.
///
/// The longer side picks the constrained dimension. Only that side is
/// compared against its bound, and the image is never scaled up. Degenerate
/// (zero) dimensions pass through unchanged.
pub fn fit_dimensions(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 || max_width == 0 || max_height == 0 {
        return (width, height);
    }

    if width > height {
        if width > max_width {
            let scaled = (height as f64 * max_width as f64 / width as f64).round() as u32;
            return (max_width, scaled.max(1));
        }
    } else if height > max_height {
        let scaled = (width as f64 * max_height as f64 / height as f64).round() as u32;
        return (scaled.max(1), max_height);
    }

    (width, height)
}

/// A resized, encoded photo.
#[derive(Debug, Clone)]
pub struct ResizedImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub encoding: ImageEncoding,
}

/// Bounded-dimension resizer with a fixed JPEG quality.
#[derive(Debug, Clone)]
pub struct ImageResizer {
    max_width: u32,
    max_height: u32,
    jpeg_quality: u8,
}

impl ImageResizer {
    pub fn new(max_width: u32, max_height: u32, jpeg_quality: u8) -> Self {
        Self {
            max_width,
            max_height,
            jpeg_quality: jpeg_quality.clamp(1, 100),
        }
    }

    pub fn from_config(config: &CaptureConfig) -> Self {
        Self::new(config.max_width, config.max_height, config.jpeg_quality)
    }

    /// Bounding box as `(max_width, max_height)`.
    pub fn bounds(&self) -> (u32, u32) {
        (self.max_width, self.max_height)
    }

    /// Decode `data` (PNG, JPEG, ...) and resize it.
    #[instrument(skip(self, data), fields(data_len = data.len()))]
    pub fn resize_bytes(&self, data: &[u8]) -> Result<ResizedImage, FieldReportError> {
        let img = image::load_from_memory(data).map_err(|err| {
            FieldReportError::Image(format!("failed to decode image: {}", err))
        })?;
        self.resize(&img)
    }

    /// Resize `img` to fit the bounding box and encode it as JPEG.
    ///
    /// Images already inside the box keep their dimensions and are only
    /// re-encoded.
    #[instrument(skip(self, img), fields(width = img.width(), height = img.height()))]
    pub fn resize(&self, img: &DynamicImage) -> Result<ResizedImage, FieldReportError> {
        let (width, height) =
            fit_dimensions(img.width(), img.height(), self.max_width, self.max_height);

        let data = if (width, height) == (img.width(), img.height()) {
            debug!("image within bounds, re-encoding only");
            encode_jpeg(img, self.jpeg_quality)?
        } else {
            debug!(new_w = width, new_h = height, "scaling image down");
            let resized = img.resize_exact(width, height, FilterType::Lanczos3);
            encode_jpeg(&resized, self.jpeg_quality)?
        };

        Ok(ResizedImage {
            data,
            width,
            height,
            encoding: ImageEncoding::Jpeg,
        })
    }
}

/// Encode as JPEG with the given quality (1-100). Alpha is dropped.
fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, FieldReportError> {
    let mut buffer = Vec::new();
    let rgb = img.to_rgb8();
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
    rgb.write_with_encoder(encoder)
        .map_err(|err| FieldReportError::Image(format!("JPEG encoding failed: {}", err)))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn solid(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([90, 120, 200])))
    }

    #[test]
    fn landscape_is_bounded_by_width() {
        assert_eq!(fit_dimensions(1200, 800, 600, 600), (600, 400));
    }

    #[test]
    fn portrait_is_bounded_by_height() {
        assert_eq!(fit_dimensions(800, 1200, 600, 600), (400, 600));
    }

    #[test]
    fn square_uses_height_branch() {
        assert_eq!(fit_dimensions(1000, 1000, 600, 600), (600, 600));
    }

    #[test]
    fn small_images_are_not_upscaled() {
        assert_eq!(fit_dimensions(320, 240, 600, 600), (320, 240));
        assert_eq!(fit_dimensions(600, 600, 600, 600), (600, 600));
    }

    #[test]
    fn aspect_ratio_is_preserved_within_rounding() {
        for (w, h) in [(1920, 1080), (1080, 1920), (4032, 3024), (641, 479)] {
            let (nw, nh) = fit_dimensions(w, h, 600, 600);
            assert_eq!(nw.max(nh), 600);
            let before = w as f64 / h as f64;
            let after = nw as f64 / nh as f64;
            // One pixel of rounding on the short side.
            let tolerance = before / nh.min(nw) as f64 + 1e-9;
            assert!((before - after).abs() <= tolerance, "{w}x{h} -> {nw}x{nh}");
        }
    }

    #[test]
    fn zero_dimensions_pass_through() {
        assert_eq!(fit_dimensions(0, 480, 600, 600), (0, 480));
        assert_eq!(fit_dimensions(640, 0, 600, 600), (640, 0));
    }

    #[test]
    fn resize_encodes_jpeg_at_target_size() {
        let resizer = ImageResizer::new(600, 600, 80);
        let out = resizer.resize(&solid(1280, 720)).unwrap();
        assert_eq!((out.width, out.height), (600, 338));
        assert_eq!(out.encoding, ImageEncoding::Jpeg);

        let decoded = image::load_from_memory(&out.data).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (600, 338));
    }

    #[test]
    fn in_bounds_image_keeps_dimensions() {
        let resizer = ImageResizer::new(600, 600, 80);
        let out = resizer.resize(&solid(200, 100)).unwrap();
        assert_eq!((out.width, out.height), (200, 100));
    }

    #[test]
    fn garbage_bytes_are_an_image_error() {
        let resizer = ImageResizer::new(600, 600, 80);
        let err = resizer.resize_bytes(b"not an image").unwrap_err();
        assert!(matches!(err, FieldReportError::Image(_)));
    }
}
