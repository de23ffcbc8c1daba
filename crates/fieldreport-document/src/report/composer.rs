// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Report composer — wrap the rendered sheet into a single-page PDF using
// `printpdf` 0.8.
//
// The page has a fixed width; its height follows the sheet's aspect ratio so
// the raster fills the page edge to edge. Header lines are written as text on
// top of the raster, inside the band the sheet renderer left blank.

use chrono::Utc;
use fieldreport_core::config::ReportConfig;
use fieldreport_core::error::{FieldReportError, Result};
use fieldreport_core::types::{ReportArtifact, SubmissionDraft};
use printpdf::{
    BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt, RawImage,
    RawImageData, RawImageFormat, TextItem, XObjectTransform,
};
use tracing::{debug, info, instrument};

use super::sheet::{LINE_HEIGHT_PX, MARGIN_PX, RenderedSheet, SheetRenderer};
use crate::integrity::hash_bytes;

/// File name of the PDF part/attachment.
pub const REPORT_FILE_NAME: &str = "report.pdf";

/// Header text size relative to a header row.
const FONT_TO_LINE_RATIO: f32 = 0.5;

/// Renders the report sheet and wraps it into a one-page PDF.
#[derive(Debug, Clone)]
pub struct ReportComposer {
    page_width_mm: f32,
    title: String,
    renderer: SheetRenderer,
}

impl ReportComposer {
    pub fn new(page_width_mm: f32, title: impl Into<String>) -> Self {
        Self {
            page_width_mm,
            title: title.into(),
            renderer: SheetRenderer,
        }
    }

    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(config.page_width_mm, config.title.clone())
    }

    /// Header lines for a draft: form values, then location and address.
    pub fn header_lines(draft: &SubmissionDraft) -> Vec<String> {
        let mut lines = draft.form.summary_lines();
        let location = draft
            .location
            .location
            .map(|loc| loc.to_string())
            .unwrap_or_else(|| "unknown".into());
        lines.push(format!("Location: {location}"));
        if let Some(address) = &draft.location.address {
            lines.push(format!("Address: {address}"));
        }
        lines
    }

    /// Render the draft's sheet and wrap it. A new artifact every call.
    #[instrument(skip_all, fields(photos = draft.photos.len()))]
    pub fn compose(&self, draft: &SubmissionDraft) -> Result<ReportArtifact> {
        let sheet = self.renderer.render(
            Self::header_lines(draft),
            &draft.photos,
            &draft.signature,
        )?;
        self.wrap_sheet(&sheet)
    }

    /// Wrap an already rendered sheet into a single-page PDF.
    #[instrument(skip_all, fields(width = sheet.image.width(), height = sheet.image.height()))]
    pub fn wrap_sheet(&self, sheet: &RenderedSheet) -> Result<ReportArtifact> {
        let img_width = sheet.image.width();
        let img_height = sheet.image.height();
        if img_width == 0 || img_height == 0 {
            return Err(FieldReportError::Render("sheet has no pixels".into()));
        }

        let page_w = Mm(self.page_width_mm);
        let page_h = Mm(self.page_width_mm * img_height as f32 / img_width as f32);
        info!(
            page_w_mm = page_w.0,
            page_h_mm = page_h.0,
            title = %self.title,
            "Creating report PDF"
        );

        // printpdf takes RGB8; the sheet is opaque so dropping alpha is lossless.
        let rgb = ::image::DynamicImage::ImageRgba8(sheet.image.clone()).to_rgb8();
        let raw = RawImage {
            pixels: RawImageData::U8(rgb.into_raw()),
            width: img_width as usize,
            height: img_height as usize,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };

        let mut doc = PdfDocument::new(&self.title);
        let xobject_id = doc.add_image(&raw);

        // Native size at the chosen DPI, then scale to the page width.
        let dpi: f32 = 150.0;
        let page_w_pt = page_w.into_pt().0;
        let page_h_pt = page_h.into_pt().0;
        let img_w_pt = img_width as f32 / dpi * 72.0;
        let scale = page_w_pt / img_w_pt;

        let mut ops = vec![Op::UseXobject {
            id: xobject_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(0.0)),
                translate_y: Some(Pt(0.0)),
                scale_x: Some(scale),
                scale_y: Some(scale),
                dpi: Some(dpi),
                rotate: None,
            },
        }];

        // Sheet pixels to page points.
        let px_to_pt = page_w_pt / img_width as f32;
        let font_size = Pt(LINE_HEIGHT_PX as f32 * FONT_TO_LINE_RATIO * px_to_pt);
        for (idx, line) in sheet.lines.iter().enumerate() {
            // Baseline sits a quarter row above the bottom of the row.
            let baseline_px =
                MARGIN_PX as f32 + (idx as f32 + 0.75) * LINE_HEIGHT_PX as f32;
            ops.push(Op::StartTextSection);
            ops.push(Op::SetTextCursor {
                pos: Point {
                    x: Pt(MARGIN_PX as f32 * px_to_pt),
                    y: Pt(page_h_pt - baseline_px * px_to_pt),
                },
            });
            ops.push(Op::SetFontSizeBuiltinFont {
                size: font_size,
                font: BuiltinFont::Helvetica,
            });
            ops.push(Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text(line.clone())],
                font: BuiltinFont::Helvetica,
            });
            ops.push(Op::EndTextSection);
        }

        doc.with_pages(vec![PdfPage::new(page_w, page_h, ops)]);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let pdf = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if pdf.is_empty() {
            return Err(FieldReportError::Render("PDF serialisation produced no bytes".into()));
        }
        debug!(bytes = pdf.len(), warnings = warnings.len(), scale, "report PDF written");

        Ok(ReportArtifact {
            sha256: hash_bytes(&pdf),
            pdf,
            file_name: REPORT_FILE_NAME.to_owned(),
            page_width_mm: page_w.0,
            page_height_mm: page_h.0,
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::image::{Rgba, RgbaImage};
    use fieldreport_core::types::{
        Address, CapturedPhoto, FormValues, GeoLocation, ImageEncoding, LocationState, PhotoId,
        SignatureImage,
    };
    use std::io::Cursor;

    fn png(width: u32, height: u32, color: Rgba<u8>) -> Vec<u8> {
        let mut buf = Vec::new();
        RgbaImage::from_pixel(width, height, color)
            .write_to(&mut Cursor::new(&mut buf), ::image::ImageFormat::Png)
            .unwrap();
        buf
    }

    fn draft() -> SubmissionDraft {
        SubmissionDraft {
            signature: SignatureImage {
                data: png(300, 150, Rgba([0, 0, 0, 255])),
                min_present_len: 0,
            },
            photos: vec![CapturedPhoto {
                id: PhotoId::new(),
                data: png(600, 400, Rgba([10, 120, 40, 255])),
                encoding: ImageEncoding::Png,
                width: 600,
                height: 400,
                captured_at: Utc::now(),
            }],
            location: LocationState::resolved(GeoLocation::new(40.0, -3.0), Address("Madrid".into())),
            form: FormValues {
                work_reference: "WR-12".into(),
                ..FormValues::default()
            },
        }
    }

    #[test]
    fn compose_produces_single_page_pdf() {
        let composer = ReportComposer::new(210.0, "Report");
        let artifact = composer.compose(&draft()).unwrap();

        assert!(artifact.pdf.starts_with(b"%PDF"));
        let parsed = lopdf::Document::load_mem(&artifact.pdf).unwrap();
        assert_eq!(parsed.get_pages().len(), 1);
        assert_eq!(artifact.file_name, REPORT_FILE_NAME);
        assert_eq!(artifact.sha256, hash_bytes(&artifact.pdf));
    }

    #[test]
    fn page_height_follows_sheet_aspect_ratio() {
        let composer = ReportComposer::new(210.0, "Report");
        let sheet = RenderedSheet {
            image: RgbaImage::from_pixel(800, 1600, Rgba([255, 255, 255, 255])),
            lines: vec![],
        };
        let artifact = composer.wrap_sheet(&sheet).unwrap();
        assert_eq!(artifact.page_width_mm, 210.0);
        assert!((artifact.page_height_mm - 420.0).abs() < 0.01);
    }

    #[test]
    fn header_lines_include_location_and_address() {
        let lines = ReportComposer::header_lines(&draft());
        assert!(lines.contains(&"Work reference: WR-12".to_string()));
        assert!(lines.contains(&"Location: Lat: 40.0, Lon: -3.0".to_string()));
        assert!(lines.contains(&"Address: Madrid".to_string()));
    }

    #[test]
    fn every_compose_is_a_fresh_artifact() {
        let composer = ReportComposer::new(210.0, "Report");
        let first = composer.compose(&draft()).unwrap();
        let second = composer.compose(&draft()).unwrap();
        assert!(second.created_at >= first.created_at);
        assert!(!second.pdf.is_empty());
    }

    #[test]
    fn empty_sheet_is_rejected() {
        let composer = ReportComposer::new(210.0, "Report");
        let sheet = RenderedSheet {
            image: RgbaImage::new(0, 0),
            lines: vec![],
        };
        assert!(matches!(
            composer.wrap_sheet(&sheet),
            Err(FieldReportError::Render(_))
        ));
    }
}
