//! Error types for contract analysis
//!
//! Only [`InputError`] is allowed to escape the analysis pipeline. Everything
//! else (unreachable collaborators, malformed field values) is recovered
//! where it happens and logged.

use thiserror::Error;

/// Result alias used across the workspace
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    Input(#[from] InputError),

    #[error("{service} unavailable: {reason}")]
    ExternalUnavailable { service: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for an unreachable or failing collaborator
    pub fn unavailable(service: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::ExternalUnavailable {
            service: service.into(),
            reason: reason.into(),
        }
    }

    /// Whether the caller may recover by degrading to an empty result
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::Input(_))
    }
}

/// Rejected contract text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("contract text is empty")]
    Empty,

    #[error("contract text too short: {length} characters (minimum {minimum})")]
    TooShort { length: usize, minimum: usize },
}
