//! Error types for tasador operations.
//!
//! Every failure in the estimation pipeline surfaces as a [`TasadorError`].
//! Startup failures (missing or corrupt artifacts) are fatal; per-request
//! failures leave the session usable.

use std::fmt;
use std::path::PathBuf;

/// Which persisted artifact an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// The serialized regression model.
    Model,
    /// The serialized categorical encoders.
    Encoders,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Model => write!(f, "model"),
            ArtifactKind::Encoders => write!(f, "encoders"),
        }
    }
}

/// Main error type for tasador operations.
///
/// # Examples
///
/// ```
/// use tasador::error::TasadorError;
///
/// let err = TasadorError::UnknownCategory {
///     feature: "furnishingstatus".to_string(),
///     label: "luxury".to_string(),
/// };
/// assert!(err.to_string().contains("unknown category"));
/// assert!(err.is_recoverable());
/// ```
#[derive(Debug)]
pub enum TasadorError {
    /// A model or encoder artifact is absent at startup.
    MissingArtifact {
        /// Artifact that could not be found
        kind: ArtifactKind,
        /// Path that was probed
        path: PathBuf,
    },

    /// A submitted label is outside the feature's trained vocabulary.
    UnknownCategory {
        /// Categorical feature name
        feature: String,
        /// Label that was submitted
        label: String,
    },

    /// A feature name is not part of the feature spec or encoder registry.
    UnknownFeature {
        /// Feature name
        feature: String,
    },

    /// A required field has no submitted value.
    MissingInput {
        /// Field name
        field: String,
    },

    /// A numeric input violates its field constraint.
    InvalidInput {
        /// Field name
        field: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// The underlying model call failed.
    InferenceError {
        /// Failure description from the model
        message: String,
    },

    /// Invalid or corrupt artifact contents.
    FormatError {
        /// Error description
        message: String,
    },

    /// Serialization/deserialization error.
    Serialization(String),

    /// A configuration value could not be interpreted.
    InvalidConfig {
        /// Configuration key
        key: String,
        /// Offending value
        value: String,
    },

    /// I/O error (permission denied, disk full, etc.).
    Io(std::io::Error),
}

impl fmt::Display for TasadorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TasadorError::MissingArtifact { kind, path } => {
                write!(f, "Missing {kind} artifact: {}", path.display())
            }
            TasadorError::UnknownCategory { feature, label } => {
                write!(f, "unknown category '{label}' for feature '{feature}'")
            }
            TasadorError::UnknownFeature { feature } => {
                write!(f, "unknown feature '{feature}'")
            }
            TasadorError::MissingInput { field } => {
                write!(f, "missing input for field '{field}'")
            }
            TasadorError::InvalidInput {
                field,
                value,
                constraint,
            } => {
                write!(f, "Invalid input: {field} = {value}, expected {constraint}")
            }
            TasadorError::InferenceError { message } => {
                write!(f, "Inference failed: {message}")
            }
            TasadorError::FormatError { message } => {
                write!(f, "Invalid artifact format: {message}")
            }
            TasadorError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            TasadorError::InvalidConfig { key, value } => {
                write!(f, "Invalid configuration: {key} = {value:?}")
            }
            TasadorError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for TasadorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TasadorError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TasadorError {
    fn from(err: std::io::Error) -> Self {
        TasadorError::Io(err)
    }
}

impl From<csv::Error> for TasadorError {
    fn from(err: csv::Error) -> Self {
        TasadorError::Serialization(err.to_string())
    }
}

impl TasadorError {
    /// Create an inference error from any displayable model failure.
    #[must_use]
    pub fn inference(message: impl fmt::Display) -> Self {
        Self::InferenceError {
            message: message.to_string(),
        }
    }

    /// Create a format error with descriptive context.
    #[must_use]
    pub fn format(message: impl Into<String>) -> Self {
        Self::FormatError {
            message: message.into(),
        }
    }

    /// Returns true if the error concerns a single request and the session
    /// may continue.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            TasadorError::UnknownCategory { .. }
                | TasadorError::UnknownFeature { .. }
                | TasadorError::MissingInput { .. }
                | TasadorError::InvalidInput { .. }
                | TasadorError::InferenceError { .. }
        )
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, TasadorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_artifact_display() {
        let err = TasadorError::MissingArtifact {
            kind: ArtifactKind::Model,
            path: PathBuf::from("housing_model.tsdr"),
        };
        let msg = err.to_string();
        assert!(msg.contains("Missing model artifact"));
        assert!(msg.contains("housing_model.tsdr"));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_unknown_category_display() {
        let err = TasadorError::UnknownCategory {
            feature: "mainroad".to_string(),
            label: "maybe".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'maybe'"));
        assert!(msg.contains("'mainroad'"));
    }

    #[test]
    fn test_invalid_input_display() {
        let err = TasadorError::InvalidInput {
            field: "area".to_string(),
            value: "40".to_string(),
            constraint: ">= 100".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid input: area = 40, expected >= 100");
    }

    #[test]
    fn test_inference_helper() {
        let err = TasadorError::inference("shape mismatch");
        assert!(matches!(err, TasadorError::InferenceError { .. }));
        assert!(err.to_string().contains("shape mismatch"));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_format_helper_not_recoverable() {
        let err = TasadorError::format("bad magic");
        assert!(err.to_string().contains("bad magic"));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_from_io_error() {
        use std::error::Error;
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err: TasadorError = io_err.into();
        assert!(matches!(err, TasadorError::Io(_)));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_source_none_for_domain_errors() {
        use std::error::Error;
        let err = TasadorError::MissingInput {
            field: "area".to_string(),
        };
        assert!(err.source().is_none());
    }
}
