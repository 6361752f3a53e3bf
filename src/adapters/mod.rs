//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `local` - Session list on the local device
//! - `remote` - Sessions in the shared remote table, plus an in-memory table
//! - `storage` - Device storage (file, in-memory)
//! - `postgres` - PostgreSQL session table
//! - `auth` - Identity provider implementations

pub mod auth;
pub mod local;
pub mod postgres;
pub mod remote;
pub mod storage;

pub use auth::MockIdentityProvider;
pub use local::{LocalSessionAdapter, DEFAULT_STORAGE_KEY};
pub use postgres::PostgresSessionRecords;
pub use remote::{InMemorySessionRecords, RemoteSessionAdapter};
pub use storage::{FileDeviceStorage, InMemoryDeviceStorage};
