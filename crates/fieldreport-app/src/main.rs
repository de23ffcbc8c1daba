// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// fieldreport — capture, sign and send cable identification reports.
//
// Entry point. Parses arguments, initialises logging and runs the command.

use std::process::ExitCode;

use clap::Parser;
use fieldreport_app::cli::Cli;
use fieldreport_app::commands;
use fieldreport_app::logging::init_logging;
use fieldreport_app::notify::{ConsoleNotifier, Notifier};
use fieldreport_core::human_errors::humanize_error;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbosity());

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "fieldreport starting");

    match commands::run(cli).await {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            ConsoleNotifier.alert(&humanize_error(&err));
            ExitCode::FAILURE
        }
    }
}
