// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the fieldreport-document crate.
// Measures the capture-path resize (full HD frame down to the 600x600 box)
// and the PDF wrap of a typical report sheet.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, Rgba, RgbaImage};

use fieldreport_document::{ImageResizer, RenderedSheet, ReportComposer};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Resize a 1920x1080 synthetic frame with a gradient so the JPEG encoder has
/// real work to do.
fn bench_resize_frame(c: &mut Criterion) {
    let frame = RgbaImage::from_fn(1920, 1080, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
    });
    let dynamic = DynamicImage::ImageRgba8(frame);
    let resizer = ImageResizer::new(600, 600, 80);

    c.bench_function("resize_frame (1920x1080 -> 600x338)", |b| {
        b.iter(|| {
            let out = resizer.resize(black_box(&dynamic)).expect("resize");
            black_box(out.data.len());
        });
    });
}

/// Wrap an 800x1400 sheet into a single-page PDF.
fn bench_wrap_sheet(c: &mut Criterion) {
    let sheet = RenderedSheet {
        image: RgbaImage::from_pixel(800, 1400, Rgba([255, 255, 255, 255])),
        lines: (0..11).map(|i| format!("Line {i}: value")).collect(),
    };
    let composer = ReportComposer::new(210.0, "Bench report");

    c.bench_function("wrap_sheet (800x1400)", |b| {
        b.iter(|| {
            let artifact = composer.wrap_sheet(black_box(&sheet)).expect("wrap");
            black_box(artifact.pdf.len());
        });
    });
}

criterion_group!(benches, bench_resize_frame, bench_wrap_sheet);
criterion_main!(benches);
