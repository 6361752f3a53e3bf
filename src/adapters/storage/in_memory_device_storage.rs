//! In-Memory Device Storage Adapter
//!
//! Keeps documents in a map. Useful for testing and for simulating several
//! devices in one process.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::ports::{DeviceStorage, StorageError};

/// In-memory document storage.
///
/// Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDeviceStorage {
    documents: Arc<RwLock<HashMap<String, String>>>,
    fail_writes: Arc<RwLock<bool>>,
}

impl InMemoryDeviceStorage {
    /// Create an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage holding `value` under `key`.
    pub fn with_document(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.documents
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.into(), value.into());
        self
    }

    /// Makes every following write fail (for error testing).
    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.write().unwrap_or_else(|e| e.into_inner()) = fail;
    }

    /// Raw document under `key`, bypassing the port.
    pub fn document(&self, key: &str) -> Option<String> {
        self.documents
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }
}

impl DeviceStorage for InMemoryDeviceStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.document(key))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if *self.fail_writes.read().unwrap_or_else(|e| e.into_inner()) {
            return Err(StorageError::Io("device storage is full".to_string()));
        }
        self.documents
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
