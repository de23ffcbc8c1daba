// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Report sheet — the on-screen form as a single raster snapshot.
//
// Layout, top to bottom, on a white sheet of fixed pixel width:
//   1. header band: one row per form line (left blank here; the PDF wrapper
//      writes the text into it so it stays selectable)
//   2. captured photos in a two-column grid, in capture order
//   3. the signature surface

use ::image::imageops::{self, FilterType};
use ::image::{DynamicImage, Rgba, RgbaImage};
use fieldreport_core::error::{FieldReportError, Result};
use fieldreport_core::types::{CapturedPhoto, SignatureImage};
use tracing::{debug, instrument};

use crate::image::resizer::fit_dimensions;

/// Pixel width of every rendered sheet.
pub const SHEET_WIDTH_PX: u32 = 800;
/// Outer margin and header text inset.
pub const MARGIN_PX: u32 = 24;
/// Height of one header text row.
pub const LINE_HEIGHT_PX: u32 = 28;

const GAP_PX: u32 = 12;
const PHOTO_COLUMNS: usize = 2;
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// A rendered sheet plus the text that belongs in its header band.
#[derive(Debug, Clone)]
pub struct RenderedSheet {
    pub image: RgbaImage,
    /// Header lines, one per [`LINE_HEIGHT_PX`] row starting at [`MARGIN_PX`].
    pub lines: Vec<String>,
}

impl RenderedSheet {
    /// Height of the reserved header band, including the top margin.
    pub fn header_band_px(&self) -> u32 {
        MARGIN_PX + self.lines.len() as u32 * LINE_HEIGHT_PX
    }
}

/// Renders form lines, photos and signature into a [`RenderedSheet`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SheetRenderer;

impl SheetRenderer {
    /// Draw the sheet. Photo and signature bytes are decoded here; a
    /// corrupt artifact is a render failure.
    #[instrument(skip_all, fields(lines = lines.len(), photos = photos.len()))]
    pub fn render(
        &self,
        lines: Vec<String>,
        photos: &[CapturedPhoto],
        signature: &SignatureImage,
    ) -> Result<RenderedSheet> {
        let content_w = SHEET_WIDTH_PX - 2 * MARGIN_PX;
        let cell_w = (content_w - GAP_PX * (PHOTO_COLUMNS as u32 - 1)) / PHOTO_COLUMNS as u32;

        let tiles = photos
            .iter()
            .map(|photo| {
                let img = decode(&photo.data, "photo")?;
                let (w, h) = fit_dimensions(img.width(), img.height(), cell_w, cell_w);
                Ok(img.resize_exact(w, h, FilterType::Triangle))
            })
            .collect::<Result<Vec<DynamicImage>>>()?;

        let signature_img = {
            let img = decode(&signature.data, "signature")?;
            let (w, h) = fit_dimensions(img.width(), img.height(), content_w, content_w);
            img.resize_exact(w, h, FilterType::Triangle)
        };

        let header_band = MARGIN_PX + lines.len() as u32 * LINE_HEIGHT_PX;
        let row_heights: Vec<u32> = tiles
            .chunks(PHOTO_COLUMNS)
            .map(|row| row.iter().map(DynamicImage::height).max().unwrap_or(0))
            .collect();
        let photos_h: u32 = row_heights.iter().map(|h| h + GAP_PX).sum();
        let total_h = header_band + GAP_PX + photos_h + signature_img.height() + MARGIN_PX;

        let mut sheet = RgbaImage::from_pixel(SHEET_WIDTH_PX, total_h, WHITE);

        let mut y = header_band + GAP_PX;
        for (row, row_h) in tiles.chunks(PHOTO_COLUMNS).zip(&row_heights) {
            let mut x = MARGIN_PX;
            for tile in row {
                imageops::overlay(&mut sheet, &tile.to_rgba8(), x as i64, y as i64);
                x += cell_w + GAP_PX;
            }
            y += row_h + GAP_PX;
        }

        imageops::overlay(&mut sheet, &signature_img.to_rgba8(), MARGIN_PX as i64, y as i64);

        debug!(width = SHEET_WIDTH_PX, height = total_h, "sheet rendered");
        Ok(RenderedSheet {
            image: sheet,
            lines,
        })
    }
}

fn decode(data: &[u8], what: &str) -> Result<DynamicImage> {
    ::image::load_from_memory(data)
        .map_err(|err| FieldReportError::Render(format!("failed to decode {what}: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use fieldreport_core::types::{ImageEncoding, PhotoId};
    use std::io::Cursor;

    fn png(width: u32, height: u32, color: Rgba<u8>) -> Vec<u8> {
        let mut buf = Vec::new();
        RgbaImage::from_pixel(width, height, color)
            .write_to(&mut Cursor::new(&mut buf), ::image::ImageFormat::Png)
            .unwrap();
        buf
    }

    fn photo(width: u32, height: u32) -> CapturedPhoto {
        CapturedPhoto {
            id: PhotoId::new(),
            data: png(width, height, Rgba([200, 30, 30, 255])),
            encoding: ImageEncoding::Png,
            width,
            height,
            captured_at: Utc::now(),
        }
    }

    fn signature() -> SignatureImage {
        SignatureImage {
            data: png(300, 150, Rgba([0, 0, 0, 0])),
            min_present_len: 0,
        }
    }

    #[test]
    fn sheet_has_fixed_width_and_grows_with_rows() {
        let lines = vec!["Work reference: A".to_string(); 3];
        let one = SheetRenderer
            .render(lines.clone(), &[photo(600, 400)], &signature())
            .unwrap();
        let three = SheetRenderer
            .render(lines, &[photo(600, 400), photo(600, 400), photo(600, 400)], &signature())
            .unwrap();

        assert_eq!(one.image.width(), SHEET_WIDTH_PX);
        assert!(three.image.height() > one.image.height());
    }

    #[test]
    fn photos_are_drawn_below_header_band() {
        let sheet = SheetRenderer
            .render(vec!["a".into(), "b".into()], &[photo(100, 100)], &signature())
            .unwrap();
        let band = sheet.header_band_px();
        assert_eq!(band, MARGIN_PX + 2 * LINE_HEIGHT_PX);

        // Header band stays white, first photo cell is red.
        assert_eq!(*sheet.image.get_pixel(MARGIN_PX + 5, band - 5), WHITE);
        let px = sheet.image.get_pixel(MARGIN_PX + 5, band + GAP_PX + 5);
        assert_eq!(px.0[0], 200);
    }

    #[test]
    fn corrupt_photo_is_render_failure() {
        let mut bad = photo(10, 10);
        bad.data = vec![1, 2, 3];
        let err = SheetRenderer.render(vec![], &[bad], &signature()).unwrap_err();
        assert!(matches!(err, FieldReportError::Render(_)));
    }
}
