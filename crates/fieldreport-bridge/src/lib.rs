// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! fieldreport — Platform capability bridge.
//!
//! Defines the traits the capture pipeline uses to reach device features it
//! does not implement itself: a live camera stream, a one-shot position fix,
//! and the system mail client. Hosts (browser shell, mobile wrapper, desktop
//! CLI) provide implementations; the stub reports every capability as
//! unavailable.

pub mod stub;
pub mod traits;

pub use stub::StubBridge;
pub use traits::*;
