// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Signature pad — freehand strokes on a fixed-size raster.
//
// Mouse events arrive in surface coordinates already; touch events carry
// viewport coordinates and are translated by the surface's bounding rect.
// Strokes are drawn with round caps by stamping filled discs along each
// segment, so the line looks the same at any pointer speed.

use std::io::Cursor;

use fieldreport_core::config::SignatureConfig;
use fieldreport_core::error::{FieldReportError, Result};
use fieldreport_core::types::SignatureImage;
use image::{ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::draw_filled_circle_mut;
use tracing::{debug, instrument, trace};

const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const PAPER: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Whether a stroke is in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawState {
    Idle,
    /// Pen down; `last` is the previous point of the stroke.
    Drawing { last: (f32, f32) },
}

/// Top-left corner of the surface in viewport coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SurfaceRect {
    pub left: f32,
    pub top: f32,
}

/// Where the pointer is, in the coordinate space its source reports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    /// Offset relative to the surface.
    Mouse { offset_x: f32, offset_y: f32 },
    /// Viewport position of the first touch point.
    Touch { client_x: f32, client_y: f32 },
}

impl PointerInput {
    fn to_surface(self, rect: SurfaceRect) -> (f32, f32) {
        match self {
            PointerInput::Mouse { offset_x, offset_y } => (offset_x, offset_y),
            PointerInput::Touch { client_x, client_y } => (client_x - rect.left, client_y - rect.top),
        }
    }

    fn is_touch(&self) -> bool {
        matches!(self, PointerInput::Touch { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    /// Pointer left the surface (mouse only in practice).
    Leave,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub input: PointerInput,
}

impl PointerEvent {
    pub fn mouse(phase: PointerPhase, x: f32, y: f32) -> Self {
        Self {
            phase,
            input: PointerInput::Mouse {
                offset_x: x,
                offset_y: y,
            },
        }
    }

    pub fn touch(phase: PointerPhase, x: f32, y: f32) -> Self {
        Self {
            phase,
            input: PointerInput::Touch {
                client_x: x,
                client_y: y,
            },
        }
    }
}

/// Freehand drawing surface.
pub struct SignaturePad {
    surface: RgbaImage,
    state: DrawState,
    line_width: u32,
    /// Whether any stroke has landed on the surface since the last clear.
    inked: bool,
    /// Encoded length of the blank surface plus the ink margin.
    min_present_len: usize,
}

impl SignaturePad {
    pub fn new(width: u32, height: u32, line_width: u32, ink_margin: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(FieldReportError::Config(format!(
                "signature surface must not be empty ({width}x{height})"
            )));
        }
        let surface = RgbaImage::from_pixel(width, height, PAPER);
        let blank_len = encode_png(&surface)?.len();
        debug!(width, height, blank_len, "signature pad ready");
        Ok(Self {
            surface,
            state: DrawState::Idle,
            line_width: line_width.max(1),
            inked: false,
            min_present_len: blank_len + ink_margin,
        })
    }

    pub fn from_config(config: &SignatureConfig) -> Result<Self> {
        Self::new(config.width, config.height, config.line_width, config.ink_margin)
    }

    pub fn state(&self) -> DrawState {
        self.state
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.surface.dimensions()
    }

    /// Feed one pointer event. Returns `true` when the host should suppress
    /// its default handling (touch scrolling while signing).
    pub fn handle(&mut self, event: PointerEvent, rect: SurfaceRect) -> bool {
        let point = event.input.to_surface(rect);
        let prevent_default = event.input.is_touch();

        match (event.phase, self.state) {
            (PointerPhase::Down, _) => {
                if is_finite(point) {
                    self.state = DrawState::Drawing { last: point };
                }
            }
            (PointerPhase::Move, DrawState::Drawing { last }) => {
                if is_finite(point) {
                    self.stroke(last, point);
                    self.state = DrawState::Drawing { last: point };
                } else {
                    trace!("ignoring non-finite pointer position");
                }
            }
            (PointerPhase::Move, DrawState::Idle) => {}
            (PointerPhase::Up | PointerPhase::Leave, _) => {
                self.state = DrawState::Idle;
            }
        }
        prevent_default
    }

    /// Wipe the surface back to blank.
    pub fn clear(&mut self) {
        self.surface = RgbaImage::from_pixel(self.surface.width(), self.surface.height(), PAPER);
        self.state = DrawState::Idle;
        self.inked = false;
        debug!("signature cleared");
    }

    pub fn is_inked(&self) -> bool {
        self.inked
    }

    /// Encode the surface as PNG.
    ///
    /// The threshold is clamped so an inked surface always meets it and a
    /// blank one never does, whatever size the encoder produces.
    #[instrument(skip(self))]
    pub fn export(&self) -> Result<SignatureImage> {
        let data = encode_png(&self.surface)?;
        let min_present_len = if self.inked {
            self.min_present_len.min(data.len())
        } else {
            self.min_present_len.max(data.len() + 1)
        };
        debug!(bytes = data.len(), threshold = min_present_len, inked = self.inked, "signature exported");
        Ok(SignatureImage {
            data,
            min_present_len,
        })
    }

    fn stroke(&mut self, from: (f32, f32), to: (f32, f32)) {
        let radius = (self.line_width as f32 / 2.0).round().max(1.0) as i32;
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as u32;
        let (width, height) = (self.surface.width() as i32, self.surface.height() as i32);
        for step in 0..=steps {
            let t = step as f32 / steps as f32;
            let x = (from.0 + dx * t).round() as i32;
            let y = (from.1 + dy * t).round() as i32;
            draw_filled_circle_mut(&mut self.surface, (x, y), radius, INK);
            // Stamps entirely outside the surface leave no ink.
            if x > -radius && y > -radius && x < width + radius && y < height + radius {
                self.inked = true;
            }
        }
    }
}

fn is_finite((x, y): (f32, f32)) -> bool {
    x.is_finite() && y.is_finite()
}

fn encode_png(surface: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    surface
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|err| FieldReportError::Image(format!("failed to encode signature: {err}")))?;
    Ok(buf)
}
