//! CLI module for estimar
//!
//! Presentation layer only: commands load a plan, call the engine and
//! render the result. No estimation logic lives here.

mod commands;
mod logging;

pub use commands::run_command;
pub use logging::{log, LogLevel};

// Re-export Cli from config for convenience
pub use crate::config::Cli;
