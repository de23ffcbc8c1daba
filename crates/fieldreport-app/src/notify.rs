// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// User-facing notifications. Every failure caught at an operation boundary
// ends up here as a blocking alert; successful submissions get a confirmation.

use fieldreport_core::human_errors::HumanError;

pub trait Notifier: Send + Sync {
    fn alert(&self, error: &HumanError);
    fn confirm(&self, message: &str);
}

/// Writes notifications to the terminal.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn alert(&self, error: &HumanError) {
        eprintln!("{}", error.message);
        eprintln!("  {}", error.suggestion);
    }

    fn confirm(&self, message: &str) {
        println!("{message}");
    }
}
