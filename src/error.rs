//! Error types for the activity engine
//!
//! Errors are classified by who has to act:
//! - Caller errors: malformed timestamps, inverted intervals in a snapshot
//! - Environment errors: unreadable config or snapshot files
//!
//! The pure engine functions never fail; only parsing and loading do.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    // Caller errors
    #[error("Invalid timestamp for {field}: {value:?}")]
    InvalidTimestamp { field: &'static str, value: String },

    #[error("Appointment ends ({end}) before it starts ({start})")]
    InvalidRange { start: String, end: String },

    // Environment errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse snapshot: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl EngineError {
    pub fn invalid_timestamp(field: &'static str, value: impl Into<String>) -> Self {
        EngineError::InvalidTimestamp {
            field,
            value: value.into(),
        }
    }

    /// Returns true if the caller supplied bad input and must fix it
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidTimestamp { .. } | EngineError::InvalidRange { .. }
        )
    }

    /// Get a user-friendly recovery suggestion
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EngineError::InvalidTimestamp { .. } => {
                "Use an ISO-8601 timestamp such as 2026-03-02T09:30:00."
            }
            EngineError::InvalidRange { .. } => "Make sure the end time is after the start time.",
            EngineError::Config(_) => "Check the engine configuration file.",
            EngineError::Parse(_) => "Check the snapshot file is valid JSON.",
            EngineError::Io(_) => "Check the file path and permissions.",
        }
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::Io(err.to_string())
    }
}

/// Serializable error representation for JSON consumers
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub message: String,
    pub error_type: ErrorType,
    pub recovery_suggestion: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorType {
    Input,
    Environment,
}

impl From<&EngineError> for ErrorPayload {
    fn from(err: &EngineError) -> Self {
        let error_type = if err.is_caller_error() {
            ErrorType::Input
        } else {
            ErrorType::Environment
        };

        ErrorPayload {
            message: err.to_string(),
            error_type,
            recovery_suggestion: err.recovery_suggestion().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_errors_are_caller_errors() {
        let err = EngineError::invalid_timestamp("dueDate", "next tuesday");
        assert!(err.is_caller_error());
        assert!(err.to_string().contains("dueDate"));

        let payload = ErrorPayload::from(&err);
        assert_eq!(payload.error_type, ErrorType::Input);
        assert!(!payload.recovery_suggestion.is_empty());
    }

    #[test]
    fn io_errors_are_environment_errors() {
        let err: EngineError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(!err.is_caller_error());
        assert_eq!(ErrorPayload::from(&err).error_type, ErrorType::Environment);
    }
}
