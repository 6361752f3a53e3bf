//! Mock identity provider for testing.
//!
//! Implements the `IdentityProvider` port without an external service, so
//! tests can sign users in and out and force probe failures.
//!
//! # Example
//!
//! ```ignore
//! use core_framework::adapters::auth::MockIdentityProvider;
//!
//! let identity = MockIdentityProvider::new().with_test_user("user-123");
//! assert!(identity.current_user().await?.is_some());
//!
//! identity.sign_out();
//! assert!(identity.current_user().await?.is_none());
//! ```

use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::IdentityProvider;

/// Mock identity provider.
///
/// Holds at most one signed-in user. Anonymous by default.
#[derive(Debug, Default)]
pub struct MockIdentityProvider {
    /// Currently signed-in user
    user: RwLock<Option<AuthenticatedUser>>,
    /// Optional error to return from every probe (for error testing)
    force_error: RwLock<Option<AuthError>>,
}

impl MockIdentityProvider {
    /// Creates a provider with nobody signed in.
    pub fn new() -> Self {
        Self::default()
    }

    /// Signs `user` in.
    pub fn with_user(self, user: AuthenticatedUser) -> Self {
        self.sign_in(user);
        self
    }

    /// Signs in a simple test user with the given id.
    ///
    /// An empty id leaves the provider anonymous.
    pub fn with_test_user(self, user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        if let Ok(id) = UserId::new(user_id.clone()) {
            self.sign_in(AuthenticatedUser::new(
                id,
                Some(format!("{}@test.example.com", user_id)),
                Some(format!("Test User {}", user_id)),
            ));
        }
        self
    }

    /// Forces every probe to return the specified error.
    pub fn with_error(self, error: AuthError) -> Self {
        self.set_error(Some(error));
        self
    }

    /// Sets or clears the forced error at runtime.
    pub fn set_error(&self, error: Option<AuthError>) {
        *self.force_error.write().unwrap_or_else(|e| e.into_inner()) = error;
    }

    pub fn sign_in(&self, user: AuthenticatedUser) {
        *self.user.write().unwrap_or_else(|e| e.into_inner()) = Some(user);
    }

    pub fn sign_out(&self) {
        *self.user.write().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn current_user(&self) -> Result<Option<AuthenticatedUser>, AuthError> {
        // Check for forced error
        if let Some(error) = self.force_error.read().unwrap_or_else(|e| e.into_inner()).clone() {
            return Err(error);
        }

        Ok(self.user.read().unwrap_or_else(|e| e.into_inner()).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn anonymous_by_default() {
        let identity = MockIdentityProvider::new();
        assert_eq!(identity.current_user().await.unwrap(), None);
    }

    #[tokio::test]
    async fn sign_in_and_out() {
        let identity = MockIdentityProvider::new().with_test_user("user-1");
        let user = identity.current_user().await.unwrap().unwrap();
        assert_eq!(user.id.as_str(), "user-1");
        assert_eq!(user.email.as_deref(), Some("user-1@test.example.com"));

        identity.sign_out();
        assert_eq!(identity.current_user().await.unwrap(), None);
    }

    #[tokio::test]
    async fn forced_error_wins_over_user() {
        let identity = MockIdentityProvider::new()
            .with_test_user("user-1")
            .with_error(AuthError::service_unavailable("down"));
        assert!(identity.current_user().await.is_err());

        identity.set_error(None);
        assert!(identity.current_user().await.unwrap().is_some());
    }
}
