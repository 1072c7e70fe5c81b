// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! SketchPlan CLI - floor plan sketch processing from the command line.
//!
//! # Commands
//!
//! - `sketchplan process <image>` - Detect the plot, walls, openings and rooms,
//!   calibrate and write `layout.json` plus a `layout.dxf` drawing
//! - `sketchplan plan <layout.json>` - Label rooms, score placement and write
//!   `plan.json` with an SVG diagram
//! - `sketchplan export <plan.json> --format <json|svg|dxf>` - Write a plan
//!   download
//!
//! Results are printed to stdout as JSON; logs go to stderr. Failures print
//! `{"error": <kind>, "details": <message>, ...}` and exit with 2 for bad
//! input or 1 otherwise. Argument errors are reported by clap, also with 2.

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod args;
mod commands;
mod config;

use args::{Cli, Command};
use config::{Config, LogFormat};

const DEFAULT_LOG_FILTER: &str = "info,sketchplan_vision=debug,sketchplan_plan=debug";

fn main() -> ExitCode {
    let config = Config::from_env();
    init_logging(config.log_format);

    let cli = Cli::parse();

    tracing::debug!(
        output_dir = %config.output_dir.display(),
        seed = ?config.seed,
        "Starting SketchPlan"
    );

    let outcome = match &cli.command {
        Command::Process(a) => commands::process(a, &config),
        Command::Plan(a) => commands::plan(a, &config),
        Command::Export(a) => commands::export(a, &config),
    };

    match outcome {
        Ok(Ok(report)) => {
            println!("{}", pretty(&report));
            ExitCode::SUCCESS
        }
        Ok(Err(failure)) => {
            tracing::error!(error = %failure.report["error"], "command failed");
            println!("{}", pretty(&failure.report));
            ExitCode::from(if failure.client_error { 2 } else { 1 })
        }
        Err(e) => {
            tracing::error!("{:#}", e);
            let report = serde_json::json!({ "error": "io_failed", "details": format!("{:#}", e) });
            println!("{}", pretty(&report));
            ExitCode::FAILURE
        }
    }
}

fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn pretty(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
