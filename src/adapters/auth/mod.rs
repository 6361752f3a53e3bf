//! Identity adapters.
//!
//! Implementations of the `IdentityProvider` port:
//!
//! - `mock` - Test implementation that doesn't require an external service

mod mock;

pub use mock::MockIdentityProvider;
