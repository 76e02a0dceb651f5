//! Shared infrastructure for the estimar CLI.
//!
//! This crate provides common utilities used by the estimar binary:
//! - Error handling with actionable diagnostics and stable error codes
//! - Output format selection (table or JSON)
//! - Table rendering and human-readable number formatting
//!
//! # Toyota Way Principles
//!
//! - **Jidoka**: Rich error messages with actionable diagnostics
//! - **Andon**: Visual problem indication through consistent styling
//! - **Muda Elimination**: Single source of truth for shared code

pub mod cli;
pub mod error;
pub mod output;

pub use cli::OutputFormat;
pub use error::{EstimarError, Result};
pub use output::{Table, TableBuilder};
