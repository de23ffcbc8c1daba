// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Submit control state. Disabled with a busy label for the length of one
// attempt; the guard puts it back on every exit path, including early `?`
// returns and panics unwinding through the dispatcher.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

pub const DEFAULT_LABEL: &str = "Send report";
pub const BUSY_LABEL: &str = "Generating PDF...";

#[derive(Debug, Default)]
pub struct SubmitControl {
    busy: AtomicBool,
}

impl SubmitControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        !self.busy.load(Ordering::Acquire)
    }

    pub fn label(&self) -> &'static str {
        if self.is_enabled() { DEFAULT_LABEL } else { BUSY_LABEL }
    }

    /// Disable the control. `None` if an attempt is already running.
    pub fn try_begin(&self) -> Option<BusyGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| {
                debug!("submit control disabled");
                BusyGuard { control: self }
            })
    }
}

/// Re-enables the control when dropped.
#[derive(Debug)]
pub struct BusyGuard<'a> {
    control: &'a SubmitControl,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.control.busy.store(false, Ordering::Release);
        debug!("submit control restored");
    }
}
