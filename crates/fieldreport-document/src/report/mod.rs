// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Report module — sheet rendering and single-page PDF composition.

pub mod composer;
pub mod sheet;

pub use composer::ReportComposer;
pub use sheet::{RenderedSheet, SheetRenderer};
