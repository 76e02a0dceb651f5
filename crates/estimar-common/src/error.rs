//! Error types with actionable diagnostics (Andon principle).
//!
//! All errors include contextual information to help users resolve issues
//! without needing to consult external documentation.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for estimar CLI operations.
pub type Result<T> = std::result::Result<T, EstimarError>;

/// Errors that can occur in the estimar CLI.
///
/// Engine-level range violations arrive here as [`EstimarError::ConfigValue`]
/// so every failure a user sees carries a suggestion and a stable code.
#[derive(Error, Debug)]
pub enum EstimarError {
    /// Plan file not found at expected path.
    #[error("Plan file not found: {path}\n  → Create a plan file or check the path (see `estimar presets` for starting points)")]
    ConfigNotFound { path: PathBuf },

    /// Plan file has invalid syntax.
    #[error("Invalid plan syntax in {path}:\n  {message}\n  → Check YAML syntax at the indicated line")]
    ConfigParsing { path: PathBuf, message: String },

    /// Plan value is invalid.
    #[error("Invalid value for '{field}': {message}\n  → {suggestion}")]
    ConfigValue {
        field: String,
        message: String,
        suggestion: String,
    },

    /// Named preset, GPU or grid region is not in the reference tables.
    #[error("Unknown {kind}: {name}\n  → Available: {available}")]
    UnknownEntry {
        kind: String,
        name: String,
        available: String,
    },

    /// IO error with context.
    #[error("IO error: {context}\n  Cause: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Generic error for unexpected conditions.
    #[error("Internal error: {message}\n  → Please report this bug at https://github.com/paiml/estimar/issues")]
    Internal { message: String },
}

impl EstimarError {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create an unknown-entry error listing the valid names.
    pub fn unknown<I, S>(kind: impl Into<String>, name: impl Into<String>, available: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let available: Vec<String> = available
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect();
        Self::UnknownEntry {
            kind: kind.into(),
            name: name.into(),
            available: available.join(", "),
        }
    }

    /// Check if this error is user-recoverable.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigNotFound { .. }
                | Self::ConfigParsing { .. }
                | Self::ConfigValue { .. }
                | Self::UnknownEntry { .. }
        )
    }

    /// Get the error code for structured output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigNotFound { .. } => "E001",
            Self::ConfigParsing { .. } => "E002",
            Self::ConfigValue { .. } => "E003",
            Self::UnknownEntry { .. } => "E004",
            Self::Io { .. } => "E050",
            Self::Serialization { .. } => "E051",
            Self::Internal { .. } => "E999",
        }
    }
}

impl From<serde_json::Error> for EstimarError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}
