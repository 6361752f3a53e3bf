//! Identity Provider Port - the inexpensive "who is signed in" probe.
//!
//! Authentication itself happens elsewhere; the store only asks whether a
//! user is currently resolved and which one.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Resolves the currently signed-in user, if any.
///
/// # Contract
///
/// Implementations must:
/// - Return `Ok(None)` when nobody is signed in
/// - Return `AuthError::SessionExpired` when stored credentials were rejected
/// - Return `AuthError::ServiceUnavailable` for transient failures
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn current_user(&self) -> Result<Option<AuthenticatedUser>, AuthError>;
}
