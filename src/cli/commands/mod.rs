//! CLI command implementations

mod catalog;
mod compare;
mod estimate;
mod validate;

#[cfg(test)]
mod tests;

use estimar_common::{OutputFormat, Result};
use serde::Serialize;

use crate::cli::LogLevel;
use crate::config::{Cli, Command};

/// Execute a CLI command based on the parsed arguments
pub fn run_command(cli: Cli) -> Result<()> {
    let log_level = LogLevel::from_flags(cli.verbose, cli.quiet);

    match cli.command {
        Command::Estimate(args) => estimate::run_estimate(args, log_level),
        Command::Validate(args) => validate::run_validate(args, log_level),
        Command::Compare(args) => compare::run_compare(args, log_level),
        Command::Presets(args) => catalog::run_presets(args.format),
        Command::Gpus(args) => catalog::run_gpus(args.format),
        Command::Quant(args) => catalog::run_quant(args.format),
    }
}

/// Render `value` as pretty JSON, or fall back to the table renderer.
fn render<T: Serialize + ?Sized>(
    format: OutputFormat,
    value: &T,
    table: impl FnOnce(&T) -> String,
) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => Ok(table(value)),
    }
}
