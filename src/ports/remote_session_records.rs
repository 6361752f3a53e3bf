//! Remote Session Records Port - the shared, multi-tenant session table.
//!
//! Records use the remote wire shape: snake_case fields, the phase as a raw
//! string and answers as a flat question → text map. Translation to the
//! domain `Session` lives in the remote adapter.

use std::collections::BTreeMap;

use async_trait::async_trait;
use futures::stream::BoxStream;

use super::StorageError;
use crate::domain::foundation::{SessionId, Timestamp, UserId};

/// One row of the remote session table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub id: SessionId,
    pub user_id: UserId,
    pub title: String,
    pub summary: Option<String>,
    pub current_phase: String,
    pub answers: BTreeMap<String, String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Fields of a record to insert; id and timestamps are assigned by the
/// backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSessionRecord {
    pub user_id: UserId,
    pub title: String,
    pub summary: Option<String>,
    pub current_phase: String,
    pub answers: BTreeMap<String, String>,
}

/// Partial update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionRecordPatch {
    pub title: Option<String>,
    pub summary: Option<Option<String>>,
    pub current_phase: Option<String>,
    pub answers: Option<BTreeMap<String, String>>,
}

impl SessionRecordPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.summary.is_none()
            && self.current_phase.is_none()
            && self.answers.is_none()
    }
}

/// What happened to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Inserted,
    Updated,
    Deleted,
}

/// Notification that one of a user's records changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeNotice {
    pub user_id: UserId,
    pub record_id: SessionId,
    pub kind: ChangeKind,
}

/// Port for the remote session table.
///
/// # Contract
///
/// Implementations must:
/// - Scope every call to `user_id`; records of other users are invisible
/// - Return `list` ordered by `updated_at`, newest first
/// - Assign `id`, `created_at` and `updated_at` on insert
/// - Move `updated_at` forward on every update
/// - Return `Ok(None)` from `update` and `Ok(())` from `delete` for a
///   missing record
/// - Emit a `ChangeNotice` on `watch` streams for every insert, update and
///   delete of that user's records
#[async_trait]
pub trait RemoteSessionRecords: Send + Sync {
    async fn list(&self, user_id: &UserId) -> Result<Vec<SessionRecord>, StorageError>;

    async fn get(&self, user_id: &UserId, id: &SessionId) -> Result<Option<SessionRecord>, StorageError>;

    async fn insert(&self, record: NewSessionRecord) -> Result<SessionRecord, StorageError>;

    async fn update(
        &self,
        user_id: &UserId,
        id: &SessionId,
        patch: SessionRecordPatch,
    ) -> Result<Option<SessionRecord>, StorageError>;

    async fn delete(&self, user_id: &UserId, id: &SessionId) -> Result<(), StorageError>;

    /// Opens a change stream for `user_id`. The stream ends when the
    /// backend connection is lost.
    async fn watch(&self, user_id: &UserId) -> Result<BoxStream<'static, ChangeNotice>, StorageError>;
}
