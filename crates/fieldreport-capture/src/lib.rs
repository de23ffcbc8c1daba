// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// fieldreport-capture — Everything the worker captures before submitting:
// camera stills into a photo roll, a freehand signature, and the device
// location with its resolved address.

pub mod camera;
pub mod geocode;
pub mod location;
pub mod signature;

pub use camera::{CameraCapture, PhotoRoll};
pub use geocode::NominatimGeocoder;
pub use location::{LocationResolver, ReverseGeocoder};
pub use signature::{DrawState, PointerEvent, PointerInput, PointerPhase, SignaturePad, SurfaceRect};
