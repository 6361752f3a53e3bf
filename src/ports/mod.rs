//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Storage Ports
//!
//! - `SessionBackend` - Capability interface served by the local and remote adapters
//! - `DeviceStorage` - Key → document store on the local device
//! - `RemoteSessionRecords` - Shared multi-tenant session table with change feed
//!
//! ## Identity Ports
//!
//! - `IdentityProvider` - Probe for the currently signed-in user

mod device_storage;
mod identity_provider;
mod remote_session_records;
mod session_backend;
mod storage_error;

pub use device_storage::DeviceStorage;
pub use identity_provider::IdentityProvider;
pub use remote_session_records::{
    ChangeKind, ChangeNotice, NewSessionRecord, RemoteSessionRecords, SessionRecord,
    SessionRecordPatch,
};
pub use session_backend::{BackendKind, SessionBackend, SessionsCallback, Subscription};
pub use storage_error::StorageError;
