//! Estimar CLI
//!
//! Capacity planning for LLM training runs.
//!
//! # Usage
//!
//! ```bash
//! # Estimate memory, fit and cost for a plan
//! estimar estimate plan.yaml
//!
//! # Same plan on 16 GPUs in fp32, as JSON
//! estimar estimate plan.yaml --gpus 16 --precision fp32 --format json
//!
//! # Validate a plan
//! estimar validate plan.yaml --detailed
//!
//! # Rank every catalog GPU by cost
//! estimar compare plan.yaml --feasible-only
//!
//! # Reference tables
//! estimar presets
//! estimar gpus
//! estimar quant
//! ```

use clap::Parser;
use estimar::cli::{run_command, Cli, LogLevel};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = LogLevel::from_flags(cli.verbose, cli.quiet);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.tracing_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error [{}]: {e}", e.code());
            ExitCode::FAILURE
        }
    }
}
