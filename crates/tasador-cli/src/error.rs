//! Error types for tasador-cli

use std::path::PathBuf;
use std::process::ExitCode;
use tasador::error::TasadorError;
use thiserror::Error;

/// Result type alias for CLI operations
pub(crate) type Result<T> = std::result::Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug)]
pub(crate) enum CliError {
    /// Model or encoder artifact absent at startup
    #[error("{0}")]
    MissingArtifact(TasadorError),

    /// Submitted label outside the trained vocabulary
    #[error("{0}")]
    UnknownCategory(TasadorError),

    /// Missing, unknown or out-of-range form input
    #[error("{0}")]
    InvalidInput(TasadorError),

    /// Model call failed
    #[error("{0}")]
    Inference(TasadorError),

    /// Malformed command-line argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Batch input file not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Batch input could not be parsed
    #[error("Invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other library error
    #[error("{0}")]
    Tasador(TasadorError),
}

impl CliError {
    /// Numeric process status for this error
    pub(crate) fn status(&self) -> u8 {
        match self {
            Self::MissingArtifact(_) | Self::FileNotFound(_) => 3,
            Self::UnknownCategory(_) => 4,
            Self::InvalidInput(_) | Self::InvalidArgument(_) => 5,
            Self::Inference(_) => 6,
            Self::Io(_) => 7,
            Self::Csv(_) | Self::Tasador(_) => 1,
        }
    }

    /// Get exit code for this error
    pub(crate) fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.status())
    }
}

impl From<TasadorError> for CliError {
    fn from(e: TasadorError) -> Self {
        match e {
            TasadorError::MissingArtifact { .. } => Self::MissingArtifact(e),
            TasadorError::UnknownCategory { .. } => Self::UnknownCategory(e),
            TasadorError::UnknownFeature { .. }
            | TasadorError::MissingInput { .. }
            | TasadorError::InvalidInput { .. } => Self::InvalidInput(e),
            TasadorError::InferenceError { .. } => Self::Inference(e),
            TasadorError::InvalidConfig { .. } => Self::InvalidArgument(e.to_string()),
            TasadorError::Io(io) => Self::Io(io),
            other => Self::Tasador(other),
        }
    }
}
