//! Errors shared by every storage port.

use thiserror::Error;

use crate::domain::foundation::{AuthError, ErrorCode};

/// Failure of a storage operation on either backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// A remote call was made without a resolved identity.
    #[error("No authenticated user")]
    Unauthenticated,

    #[error("Remote storage unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("Remote call timed out after {0} ms")]
    Timeout(u64),

    /// Locally stored data could not be parsed.
    #[error("Stored session data is corrupt: {0}")]
    StorageCorrupt(String),

    /// A remote record could not be translated into a session.
    #[error("Invalid session record {id}: {reason}")]
    InvalidRecord { id: String, reason: String },

    /// The backend does not offer this capability.
    #[error("{0} is not supported by this backend")]
    Unsupported(&'static str),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StorageError {
    pub fn remote(message: impl Into<String>) -> Self {
        Self::RemoteUnavailable(message.into())
    }

    pub fn invalid_record(id: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidRecord {
            id: id.to_string(),
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            StorageError::Unauthenticated => ErrorCode::Unauthenticated,
            StorageError::RemoteUnavailable(_) => ErrorCode::RemoteUnavailable,
            StorageError::Timeout(_) => ErrorCode::Timeout,
            StorageError::StorageCorrupt(_) => ErrorCode::StorageCorrupt,
            StorageError::InvalidRecord { .. } => ErrorCode::InvalidRecord,
            StorageError::Unsupported(_) => ErrorCode::Unsupported,
            StorageError::Io(_) => ErrorCode::StorageError,
            StorageError::Serialization(_) => ErrorCode::SerializationError,
        }
    }
}

impl From<AuthError> for StorageError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::SessionExpired => StorageError::Unauthenticated,
            AuthError::ServiceUnavailable(message) => StorageError::RemoteUnavailable(message),
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_variants() {
        assert_eq!(StorageError::Unauthenticated.code(), ErrorCode::Unauthenticated);
        assert_eq!(StorageError::Timeout(5000).code(), ErrorCode::Timeout);
        assert_eq!(
            StorageError::invalid_record("abc", "bad phase").code(),
            ErrorCode::InvalidRecord
        );
        assert_eq!(StorageError::Unsupported("change feed").code(), ErrorCode::Unsupported);
    }

    #[test]
    fn expired_identity_maps_to_unauthenticated() {
        assert_eq!(
            StorageError::from(AuthError::SessionExpired),
            StorageError::Unauthenticated
        );
        assert_eq!(
            StorageError::from(AuthError::service_unavailable("down")),
            StorageError::RemoteUnavailable("down".to_string())
        );
    }

    #[test]
    fn messages_are_descriptive() {
        assert_eq!(
            StorageError::Timeout(250).to_string(),
            "Remote call timed out after 250 ms"
        );
        assert_eq!(
            StorageError::Unsupported("change feed").to_string(),
            "change feed is not supported by this backend"
        );
    }
}
