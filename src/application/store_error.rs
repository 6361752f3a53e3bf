//! Errors surfaced by the hybrid session store.

use std::fmt;

use thiserror::Error;

use crate::domain::foundation::ErrorCode;
use crate::domain::output::OutputError;
use crate::domain::session::SessionError;
use crate::ports::StorageError;

/// Store operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    Load,
    Get,
    Save,
    Delete,
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StoreOperation::Load => "load",
            StoreOperation::Get => "get",
            StoreOperation::Save => "save",
            StoreOperation::Delete => "delete",
        };
        write!(f, "{}", s)
    }
}

/// Failure of a hybrid store operation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested change is not valid for the session.
    #[error(transparent)]
    InvalidSession(#[from] SessionError),

    /// Neither backend could serve the call.
    ///
    /// `remote` is set when the remote was tried first.
    #[error("Failed to {operation} session data: {local}")]
    Unavailable {
        operation: StoreOperation,
        remote: Option<StorageError>,
        local: StorageError,
    },

    #[error(transparent)]
    Output(#[from] OutputError),
}

impl StoreError {
    pub fn unavailable(
        operation: StoreOperation,
        remote: Option<StorageError>,
        local: StorageError,
    ) -> Self {
        StoreError::Unavailable {
            operation,
            remote,
            local,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            StoreError::InvalidSession(e) => e.code(),
            StoreError::Unavailable { local, .. } => local.code(),
            StoreError::Output(_) => ErrorCode::SerializationError,
        }
    }

    /// Returns true if repeating the call may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            StoreError::InvalidSession(_) | StoreError::Output(_) => false,
            StoreError::Unavailable { local, .. } => matches!(
                local,
                StorageError::Io(_) | StorageError::Timeout(_) | StorageError::RemoteUnavailable(_)
            ),
        }
    }

    /// Wording suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            StoreError::InvalidSession(e) => e.message(),
            StoreError::Unavailable { operation, .. } => {
                let action = match operation {
                    StoreOperation::Load | StoreOperation::Get => "load your sessions",
                    StoreOperation::Save => "save your session",
                    StoreOperation::Delete => "delete the session",
                };
                if self.is_retryable() {
                    format!("We couldn't {}. Please try again.", action)
                } else {
                    format!("We couldn't {}.", action)
                }
            }
            StoreError::Output(_) => "We couldn't prepare the export.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_failure_is_retryable() {
        let err = StoreError::unavailable(
            StoreOperation::Save,
            Some(StorageError::Timeout(5000)),
            StorageError::Io("disk full".to_string()),
        );
        assert!(err.is_retryable());
        assert_eq!(err.user_message(), "We couldn't save your session. Please try again.");
        assert_eq!(err.code(), ErrorCode::StorageError);
    }

    #[test]
    fn invalid_session_is_not_retryable() {
        let err = StoreError::from(SessionError::invalid_phase("deploy"));
        assert!(!err.is_retryable());
        assert_eq!(err.code(), ErrorCode::InvalidPhase);
        assert_eq!(err.user_message(), "Invalid phase: deploy");
    }

    #[test]
    fn serialization_failure_is_not_retryable() {
        let err = StoreError::unavailable(
            StoreOperation::Load,
            None,
            StorageError::Serialization("bad".to_string()),
        );
        assert!(!err.is_retryable());
        assert_eq!(err.user_message(), "We couldn't load your sessions.");
    }
}
