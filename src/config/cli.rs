//! CLI argument types

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use estimar_common::OutputFormat;

use crate::units::PrecisionMode;

/// Estimar: LLM training memory, fit and cost estimator
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "estimar")]
#[command(author = "PAIML")]
#[command(version)]
#[command(
    about = "Estimate parameters, per-GPU memory, hardware fit and training cost for LLM plans"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Estimate memory, fit and cost for a plan
    Estimate(EstimateArgs),

    /// Check a plan without estimating
    Validate(ValidateArgs),

    /// Estimate a plan on every catalog GPU
    Compare(CompareArgs),

    /// List model presets
    Presets(ListArgs),

    /// List catalog GPUs
    Gpus(ListArgs),

    /// Show the quantization format reference
    Quant(ListArgs),
}

/// Arguments for the estimate command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct EstimateArgs {
    /// Path to YAML plan file
    #[arg(value_name = "PLAN")]
    pub plan: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,

    /// Override GPU count (architecture and hardware)
    #[arg(long)]
    pub gpus: Option<u64>,

    /// Override training precision
    #[arg(long)]
    pub precision: Option<PrecisionMode>,
}

/// Arguments for the validate command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ValidateArgs {
    /// Path to YAML plan file
    #[arg(value_name = "PLAN")]
    pub plan: PathBuf,

    /// Show the resolved plan
    #[arg(short, long)]
    pub detailed: bool,
}

/// Arguments for the compare command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct CompareArgs {
    /// Path to YAML plan file
    #[arg(value_name = "PLAN")]
    pub plan: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,

    /// Only list GPUs the plan fits on
    #[arg(long)]
    pub feasible_only: bool,
}

/// Arguments for listing commands
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Parse arguments without exiting on error.
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}
