//! Backend resolution - decides which storage serves a call.

use std::sync::Arc;

use crate::domain::foundation::IdentityState;
use crate::ports::BackendKind;

/// Maps the result of an identity probe to a backend.
///
/// Injected into the hybrid store so deployments can pin every call to one
/// backend.
pub type BackendResolver = Arc<dyn Fn(&IdentityState) -> BackendKind + Send + Sync>;

/// Signed-in users are served remotely, everyone else locally.
pub fn resolve_backend(identity: &IdentityState) -> BackendKind {
    if identity.is_authenticated() {
        BackendKind::Remote
    } else {
        BackendKind::Local
    }
}

/// The resolver used when none is injected.
pub fn default_resolver() -> BackendResolver {
    Arc::new(resolve_backend)
}

/// A resolver that always answers `kind`.
pub fn fixed_resolver(kind: BackendKind) -> BackendResolver {
    Arc::new(move |_: &IdentityState| kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{AuthenticatedUser, UserId};

    #[test]
    fn authenticated_resolves_remote() {
        let user = AuthenticatedUser::new(UserId::new("user-1").unwrap(), None, None);
        assert_eq!(
            resolve_backend(&IdentityState::Authenticated(user)),
            BackendKind::Remote
        );
    }

    #[test]
    fn anonymous_resolves_local() {
        assert_eq!(resolve_backend(&IdentityState::Anonymous), BackendKind::Local);
    }

    #[test]
    fn fixed_resolver_ignores_identity() {
        let user = AuthenticatedUser::new(UserId::new("user-1").unwrap(), None, None);
        let resolver = fixed_resolver(BackendKind::Local);
        assert_eq!(resolver(&IdentityState::Authenticated(user)), BackendKind::Local);
    }
}
