//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - installs logging
//! - parses CLI arguments
//! - runs the fit + spline pipeline
//! - prints the report (text or JSON)

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::domain::RunConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `nsfit` binary.
pub fn run() -> Result<(), AppError> {
    init_logging();
    let cli = Cli::parse();
    let config = run_config_from_args(&cli);

    let run = pipeline::run(&config)?;

    if cli.json {
        println!("{}", crate::report::format_run_json(&run)?);
    } else {
        println!("{}", crate::report::format_run_summary(&run));
    }
    Ok(())
}

pub fn run_config_from_args(cli: &Cli) -> RunConfig {
    RunConfig {
        max_iterations: cli.max_iterations,
        ftol: cli.ftol,
        xtol: cli.xtol,
        spline_points: cli.spline_points,
        curve_points: cli.curve_points,
        boundary: cli.boundary,
    }
}

/// Log to stderr so stdout stays clean for the report. `RUST_LOG` overrides
/// the default `warn` level.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // A second init (e.g. from tests) is harmless; keep the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
