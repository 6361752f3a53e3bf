//! Session Backend Port - the capability interface behind the hybrid store.
//!
//! Two implementations exist: the local adapter (device storage, no
//! network) and the remote adapter (multi-tenant records scoped to the
//! signed-in user). The hybrid store picks one per call.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;

use super::StorageError;
use crate::domain::foundation::SessionId;
use crate::domain::session::Session;

/// Which backend serves a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    Local,
    Remote,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Local => write!(f, "local"),
            BackendKind::Remote => write!(f, "remote"),
        }
    }
}

/// Receives the full, refreshed session list after every change.
pub type SessionsCallback = Arc<dyn Fn(Vec<Session>) + Send + Sync>;

/// Handle for an active change subscription.
///
/// Delivery stops when the handle is dropped or [`Subscription::unsubscribe`]
/// is called.
pub struct Subscription {
    task: JoinHandle<()>,
}

impl Subscription {
    /// Wraps the task that delivers changes.
    pub fn from_task(task: JoinHandle<()>) -> Self {
        Self { task }
    }

    /// Stops delivery.
    pub fn unsubscribe(self) {
        // Drop aborts the task.
    }

    /// Returns true while the delivery task is running.
    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

/// Storage capability used by the hybrid store.
///
/// # Contract
///
/// Implementations must:
/// - Return sessions from `load_all` in the backend's canonical order
/// - Treat `delete` of a missing id as a successful no-op
/// - Return the stored form of the session from `save`; it may carry a
///   server-assigned id and timestamps
/// - Return `StorageError::Unsupported` from `subscribe` when the backend
///   cannot push changes, never an inert subscription
#[async_trait]
pub trait SessionBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    async fn load_all(&self) -> Result<Vec<Session>, StorageError>;

    async fn get(&self, id: &SessionId) -> Result<Option<Session>, StorageError>;

    async fn save(&self, session: &Session) -> Result<Session, StorageError>;

    async fn delete(&self, id: &SessionId) -> Result<(), StorageError>;

    /// Registers `callback` for change notifications.
    async fn subscribe(&self, callback: SessionsCallback) -> Result<Subscription, StorageError> {
        let _ = callback;
        Err(StorageError::Unsupported("change feed"))
    }
}
