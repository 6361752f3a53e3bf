//! Device Storage Port - durable key → document store on the local device.

use super::StorageError;

/// Synchronous key-value storage for whole documents.
///
/// # Contract
///
/// Implementations must:
/// - Return `Ok(None)` for a key that was never written
/// - Replace the whole document on `write`, never append
/// - Make a completed `write` visible to every later `read`
pub trait DeviceStorage: Send + Sync {
    /// Reads the document stored under `key`.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replaces the document stored under `key`.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
