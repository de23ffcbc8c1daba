// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line interface of the `fieldreport` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::logging::Verbosity;

/// fieldreport - capture, sign and send cable identification reports
#[derive(Debug, Parser)]
#[command(name = "fieldreport")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a JSON configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build the report and send it through the configured channel
    Submit(CaptureArgs),

    /// Build the report PDF without sending it
    Preview {
        #[command(flatten)]
        capture: CaptureArgs,

        /// Where to write the PDF (default: the data directory's reports/)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Inspect or initialise configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Inputs standing in for the device on a desktop.
#[derive(Debug, Args)]
pub struct CaptureArgs {
    /// Image file used as one camera frame (repeat for more photos)
    #[arg(long = "photo", value_name = "FILE", required = true)]
    pub photos: Vec<PathBuf>,

    /// JSON file of signature strokes: `[[[x, y], ...], ...]`
    #[arg(long, value_name = "FILE")]
    pub signature: PathBuf,

    /// Latitude of the position fix
    #[arg(long, allow_negative_numbers = true, requires = "lon")]
    pub lat: Option<f64>,

    /// Longitude of the position fix
    #[arg(long, allow_negative_numbers = true, requires = "lat")]
    pub lon: Option<f64>,

    /// JSON file with the form values (wire names, e.g. `workReference`)
    #[arg(long, value_name = "FILE")]
    pub form: Option<PathBuf>,

    /// Skip the reverse-geocoding lookup
    #[arg(long)]
    pub offline: bool,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration (secrets redacted)
    Show,

    /// Write the effective configuration to the data directory
    Init,
}

impl Cli {
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_submit_with_negative_longitude() {
        let cli = Cli::try_parse_from([
            "fieldreport",
            "submit",
            "--photo",
            "a.jpg",
            "--photo",
            "b.jpg",
            "--signature",
            "sig.json",
            "--lat",
            "40.0",
            "--lon",
            "-3.0",
        ])
        .unwrap();
        let Command::Submit(ref args) = cli.command else {
            panic!("expected submit");
        };
        assert_eq!(args.photos.len(), 2);
        assert_eq!(args.lon, Some(-3.0));
        assert_eq!(cli.verbosity(), Verbosity::Normal);
    }

    #[test]
    fn quiet_wins_over_verbose() {
        let cli = Cli::try_parse_from(["fieldreport", "-vv", "-q", "config", "show"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Quiet);
    }
}
