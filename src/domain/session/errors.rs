//! Session-specific error types.

use crate::domain::foundation::{ErrorCode, UnknownPhase, ValidationError};

/// Errors raised by session mutations and answer validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Phase pointer outside the fixed set.
    InvalidPhase(String),
    /// Question id not defined by the methodology.
    UnknownQuestion(String),
    /// Validation failed.
    ValidationFailed { field: String, message: String },
}

impl SessionError {
    pub fn invalid_phase(phase: impl Into<String>) -> Self {
        SessionError::InvalidPhase(phase.into())
    }
    pub fn unknown_question(question_id: impl Into<String>) -> Self {
        SessionError::UnknownQuestion(question_id.into())
    }
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        SessionError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }
    pub fn code(&self) -> ErrorCode {
        match self {
            SessionError::InvalidPhase(_) => ErrorCode::InvalidPhase,
            SessionError::UnknownQuestion(_) => ErrorCode::UnknownQuestion,
            SessionError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
        }
    }
    pub fn message(&self) -> String {
        match self {
            SessionError::InvalidPhase(phase) => format!("Invalid phase: {}", phase),
            SessionError::UnknownQuestion(id) => format!("Unknown question: {}", id),
            SessionError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
        }
    }
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for SessionError {}

impl From<UnknownPhase> for SessionError {
    fn from(err: UnknownPhase) -> Self {
        SessionError::InvalidPhase(err.0)
    }
}

impl From<ValidationError> for SessionError {
    fn from(err: ValidationError) -> Self {
        SessionError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}
