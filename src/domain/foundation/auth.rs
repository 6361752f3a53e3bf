//! Identity types for the domain layer.
//!
//! These types describe who (if anyone) is signed in. They have no
//! dependency on a particular identity provider; any provider can populate
//! them through the `IdentityProvider` port.

use super::UserId;
use thiserror::Error;

/// A user resolved by the external identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// The unique user identifier from the identity provider.
    pub id: UserId,

    /// User's email address, when the provider shares it.
    pub email: Option<String>,

    /// Display name if available.
    pub display_name: Option<String>,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user.
    pub fn new(id: UserId, email: Option<String>, display_name: Option<String>) -> Self {
        Self {
            id,
            email,
            display_name,
        }
    }

    /// Returns the display name, falling back to the email and then the id.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(self.id.as_str())
    }
}

/// Result of an identity probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityState {
    Authenticated(AuthenticatedUser),
    Anonymous,
}

impl IdentityState {
    /// Returns true when a user is signed in.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, IdentityState::Authenticated(_))
    }

    /// Returns the signed-in user, if any.
    pub fn user(&self) -> Option<&AuthenticatedUser> {
        match self {
            IdentityState::Authenticated(user) => Some(user),
            IdentityState::Anonymous => None,
        }
    }
}

impl From<Option<AuthenticatedUser>> for IdentityState {
    fn from(user: Option<AuthenticatedUser>) -> Self {
        match user {
            Some(user) => IdentityState::Authenticated(user),
            None => IdentityState::Anonymous,
        }
    }
}

/// Errors raised while probing the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The stored credentials are no longer accepted.
    #[error("Session expired")]
    SessionExpired,

    /// The identity provider could not be reached.
    #[error("Identity service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this is a transient error that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::ServiceUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> AuthenticatedUser {
        AuthenticatedUser::new(
            UserId::new("user-123").unwrap(),
            Some("test@example.com".to_string()),
            None,
        )
    }

    #[test]
    fn label_falls_back_to_email_then_id() {
        let user = test_user();
        assert_eq!(user.label(), "test@example.com");

        let bare = AuthenticatedUser::new(UserId::new("user-9").unwrap(), None, None);
        assert_eq!(bare.label(), "user-9");

        let named = AuthenticatedUser::new(
            UserId::new("user-9").unwrap(),
            None,
            Some("Alice".to_string()),
        );
        assert_eq!(named.label(), "Alice");
    }

    #[test]
    fn identity_state_from_option() {
        assert!(IdentityState::from(Some(test_user())).is_authenticated());
        assert_eq!(IdentityState::from(None), IdentityState::Anonymous);
        assert!(IdentityState::Anonymous.user().is_none());
    }

    #[test]
    fn only_service_unavailable_is_transient() {
        assert!(AuthError::service_unavailable("down").is_transient());
        assert!(!AuthError::SessionExpired.is_transient());
    }
}
