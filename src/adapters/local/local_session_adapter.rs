//! Local session adapter.
//!
//! Keeps every session of the device as one JSON array under a single
//! device storage key. All writes replace the whole document, so `upsert`
//! and `remove` are read-modify-write; callers must not run two of them
//! concurrently for the same key (the hybrid store serializes them).

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::foundation::SessionId;
use crate::domain::session::Session;
use crate::ports::{BackendKind, DeviceStorage, SessionBackend, StorageError};

/// Default device storage key for the session list.
pub const DEFAULT_STORAGE_KEY: &str = "core-framework-sessions";

/// Session list persisted on the local device.
#[derive(Clone)]
pub struct LocalSessionAdapter {
    storage: Arc<dyn DeviceStorage>,
    key: String,
}

impl LocalSessionAdapter {
    pub fn new(storage: Arc<dyn DeviceStorage>) -> Self {
        Self::with_key(storage, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(storage: Arc<dyn DeviceStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Loads the stored sessions in stored order.
    ///
    /// Nothing stored yields an empty list. A document that is not a JSON
    /// array is logged and treated as empty; individual entries that do not
    /// parse are logged and skipped.
    pub fn load_all(&self) -> Result<Vec<Session>, StorageError> {
        match self.try_load_all() {
            Err(StorageError::StorageCorrupt(reason)) => {
                tracing::warn!(key = %self.key, "Ignoring corrupt local sessions: {}", reason);
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Same as [`load_all`](Self::load_all) but reports a corrupt document.
    pub fn try_load_all(&self) -> Result<Vec<Session>, StorageError> {
        let Some(raw) = self.storage.read(&self.key)? else {
            return Ok(Vec::new());
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        let entries: Vec<Value> =
            serde_json::from_str(&raw).map_err(|e| StorageError::StorageCorrupt(e.to_string()))?;

        let mut sessions = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            match serde_json::from_value::<Session>(entry) {
                Ok(session) => sessions.push(session),
                Err(e) => {
                    tracing::warn!(key = %self.key, index, "Skipping unreadable local session: {}", e);
                }
            }
        }
        Ok(sessions)
    }

    /// Replaces the stored list with `sessions`.
    pub fn save_all(&self, sessions: &[Session]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(sessions)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.storage.write(&self.key, &raw)
    }

    /// Replaces the session with the same id, or appends it.
    pub fn upsert(&self, session: &Session) -> Result<(), StorageError> {
        let mut sessions = self.load_all()?;
        match sessions.iter_mut().find(|s| s.id() == session.id()) {
            Some(existing) => *existing = session.clone(),
            None => sessions.push(session.clone()),
        }
        self.save_all(&sessions)
    }

    /// Removes the session with `id`; a missing id leaves the list unchanged.
    pub fn remove(&self, id: &SessionId) -> Result<(), StorageError> {
        let sessions = self.load_all()?;
        let before = sessions.len();
        let remaining: Vec<Session> = sessions.into_iter().filter(|s| s.id() != id).collect();
        if remaining.len() == before {
            return Ok(());
        }
        self.save_all(&remaining)
    }

    pub fn find(&self, id: &SessionId) -> Result<Option<Session>, StorageError> {
        Ok(self.load_all()?.into_iter().find(|s| s.id() == id))
    }
}

#[async_trait]
impl SessionBackend for LocalSessionAdapter {
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    async fn load_all(&self) -> Result<Vec<Session>, StorageError> {
        LocalSessionAdapter::load_all(self)
    }

    async fn get(&self, id: &SessionId) -> Result<Option<Session>, StorageError> {
        self.find(id)
    }

    async fn save(&self, session: &Session) -> Result<Session, StorageError> {
        self.upsert(session)?;
        Ok(session.clone())
    }

    async fn delete(&self, id: &SessionId) -> Result<(), StorageError> {
        self.remove(id)
    }
}
