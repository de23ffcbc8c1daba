// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — bounded resize and lossy re-encode of captured photos.

pub mod resizer;

pub use resizer::ImageResizer;
