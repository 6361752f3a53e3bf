//! Remote persistence adapter and in-memory session table.
//!
//! - `RemoteSessionAdapter` - Translates session records and scopes calls to the signed-in user
//! - `InMemorySessionRecords` - Shared in-memory table for tests and simulated devices

mod in_memory_session_records;
mod remote_session_adapter;

pub use in_memory_session_records::InMemorySessionRecords;
pub use remote_session_adapter::{
    record_to_session, session_to_new_record, session_to_patch, RemoteSessionAdapter,
};
