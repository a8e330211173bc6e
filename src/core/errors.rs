//! Shared error types for the application

use thiserror::Error;

/// Main error type for makeready operations
#[derive(Debug, Error)]
pub enum Error {
    /// The structural export failed schema validation. Carries every
    /// problem found up front so the caller can report them all at once.
    #[error("invalid structural export: {}", .0.join("; "))]
    StructuralInput(Vec<String>),

    /// The survey export failed schema validation.
    #[error("invalid survey export: {}", .0.join("; "))]
    SurveyInput(Vec<String>),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;
