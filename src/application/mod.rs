//! Application layer - Session store and its wiring.
//!
//! This layer coordinates the domain with the storage ports: it picks a
//! backend per call, applies fallback, and validates changes before they
//! are persisted.

mod backend_resolver;
mod bootstrap;
mod hybrid_session_store;
mod store_error;

pub use backend_resolver::{default_resolver, fixed_resolver, resolve_backend, BackendResolver};
pub use bootstrap::build_store;
pub use hybrid_session_store::{HybridSessionStore, DEFAULT_REMOTE_TIMEOUT};
pub use store_error::{StoreError, StoreOperation};
