//! Local persistence adapter: the session list of one device.

mod local_session_adapter;

pub use local_session_adapter::{LocalSessionAdapter, DEFAULT_STORAGE_KEY};
