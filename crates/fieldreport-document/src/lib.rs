// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// fieldreport-document — Raster and document work for a field report.
//
// Provides the bounded photo resizer used by camera capture, the report sheet
// renderer (form lines, photo grid, signature) and the single-page PDF wrapper
// that turns the sheet into the submitted report.

pub mod image;
pub mod integrity;
pub mod report;

// Re-export the primary structs so callers can use `fieldreport_document::ImageResizer` etc.
pub use self::image::resizer::{ImageResizer, ResizedImage, fit_dimensions};
pub use report::composer::ReportComposer;
pub use report::sheet::{RenderedSheet, SheetRenderer};
