//! Output gating for CLI status messages
//!
//! Status lines go through [`log`]; engine diagnostics go through `tracing`
//! and are filtered by the subscriber installed in `main`.

/// Log level for CLI output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Suppress status output
    Quiet,
    /// Normal output level
    #[default]
    Normal,
    /// Verbose output with additional details
    Verbose,
}

impl LogLevel {
    /// Map the global `--verbose`/`--quiet` flags; quiet wins.
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    /// Whether a message at `required` is shown at this level.
    pub fn shows(self, required: LogLevel) -> bool {
        match self {
            Self::Quiet => false,
            Self::Normal => required == Self::Normal,
            Self::Verbose => required != Self::Quiet,
        }
    }

    /// Default `tracing` filter directive for this level, used when
    /// `RUST_LOG` is unset.
    pub fn tracing_directive(self) -> &'static str {
        match self {
            Self::Quiet => "estimar=error",
            Self::Normal => "estimar=warn",
            Self::Verbose => "estimar=debug",
        }
    }
}

/// Log a message if the current level permits it
pub fn log(level: LogLevel, required: LogLevel, msg: &str) {
    if level.shows(required) {
        println!("{msg}");
    }
}
