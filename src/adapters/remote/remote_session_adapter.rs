//! Remote session adapter.
//!
//! Serves sessions from the shared session table, scoped to whoever the
//! identity provider reports as signed in. Every call resolves the identity
//! first and fails with `Unauthenticated` when nobody is signed in.
//!
//! # Record translation
//!
//! | Session        | Record          |
//! |----------------|-----------------|
//! | `id`           | `id`            |
//! | `title`        | `title`         |
//! | `summary`      | `summary`       |
//! | `currentPhase` | `current_phase` |
//! | `answers`      | `answers`       |
//! | `createdAt`    | `created_at`    |
//! | `updatedAt`    | `updated_at`    |
//!
//! Answers are a lossy projection: only the text travels. Confidence, note
//! and per-answer timestamps are dropped on write, and on read every
//! answer's `answered_at` becomes the record's `updated_at`.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;

use crate::domain::foundation::{PhaseId, QuestionId, SessionId, UserId};
use crate::domain::session::{Answer, Session, SessionOrigin};
use crate::ports::{
    BackendKind, IdentityProvider, NewSessionRecord, RemoteSessionRecords, SessionBackend,
    SessionRecord, SessionRecordPatch, SessionsCallback, StorageError, Subscription,
};

/// Session storage in the remote multi-tenant backend.
#[derive(Clone)]
pub struct RemoteSessionAdapter {
    records: Arc<dyn RemoteSessionRecords>,
    identity: Arc<dyn IdentityProvider>,
}

impl RemoteSessionAdapter {
    pub fn new(records: Arc<dyn RemoteSessionRecords>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { records, identity }
    }

    /// Sessions of the signed-in user, newest-updated first.
    ///
    /// Records that do not translate are logged and skipped.
    pub async fn list(&self) -> Result<Vec<Session>, StorageError> {
        let user_id = self.require_user().await?;
        list_sessions(self.records.as_ref(), &user_id).await
    }

    pub async fn get(&self, id: &SessionId) -> Result<Option<Session>, StorageError> {
        let user_id = self.require_user().await?;
        match self.records.get(&user_id, id).await? {
            Some(record) => Ok(Some(record_to_session(record)?)),
            None => Ok(None),
        }
    }

    /// Creates a record from `draft`; the result carries the server id and
    /// timestamps.
    ///
    /// A draft whose record could not be read back is rejected before
    /// anything is written.
    pub async fn create(&self, draft: &Session) -> Result<Session, StorageError> {
        let user_id = self.require_user().await?;
        let new = session_to_new_record(&user_id, draft);
        ensure_translatable(draft.id(), &new.answers)?;
        let record = self.records.insert(new).await?;
        record_to_session(record)
    }

    /// Overwrites the record `id` with the fields of `session`.
    ///
    /// Returns `Ok(None)` when no such record exists.
    pub async fn update(&self, id: &SessionId, session: &Session) -> Result<Option<Session>, StorageError> {
        let user_id = self.require_user().await?;
        let patch = session_to_patch(session);
        if let Some(answers) = &patch.answers {
            ensure_translatable(id, answers)?;
        }
        match self.records.update(&user_id, id, patch).await? {
            Some(record) => Ok(Some(record_to_session(record)?)),
            None => Ok(None),
        }
    }

    /// Deletes the record `id`; a missing record is not an error.
    pub async fn delete(&self, id: &SessionId) -> Result<(), StorageError> {
        let user_id = self.require_user().await?;
        self.records.delete(&user_id, id).await
    }

    /// Delivers the refreshed session list to `callback` after every change
    /// to the signed-in user's records.
    pub async fn subscribe_to_changes(&self, callback: SessionsCallback) -> Result<Subscription, StorageError> {
        let user_id = self.require_user().await?;
        let mut changes = self.records.watch(&user_id).await?;
        let records = Arc::clone(&self.records);

        let task = tokio::spawn(async move {
            while let Some(notice) = changes.next().await {
                tracing::debug!(session_id = %notice.record_id, kind = ?notice.kind, "Session change received");
                match list_sessions(records.as_ref(), &user_id).await {
                    Ok(sessions) => callback(sessions),
                    Err(e) => tracing::warn!("Failed to refresh sessions after change: {}", e),
                }
            }
            tracing::debug!(user_id = %user_id, "Session change feed closed");
        });

        Ok(Subscription::from_task(task))
    }

    async fn require_user(&self) -> Result<UserId, StorageError> {
        match self.identity.current_user().await? {
            Some(user) => Ok(user.id),
            None => Err(StorageError::Unauthenticated),
        }
    }
}

#[async_trait]
impl SessionBackend for RemoteSessionAdapter {
    fn kind(&self) -> BackendKind {
        BackendKind::Remote
    }

    async fn load_all(&self) -> Result<Vec<Session>, StorageError> {
        self.list().await
    }

    async fn get(&self, id: &SessionId) -> Result<Option<Session>, StorageError> {
        RemoteSessionAdapter::get(self, id).await
    }

    /// Updates sessions that already have a remote record and creates the
    /// rest. Updating a record that no longer exists returns the input.
    async fn save(&self, session: &Session) -> Result<Session, StorageError> {
        match session.origin() {
            SessionOrigin::Remote => Ok(self
                .update(session.id(), session)
                .await?
                .unwrap_or_else(|| session.clone())),
            SessionOrigin::Local => self.create(session).await,
        }
    }

    async fn delete(&self, id: &SessionId) -> Result<(), StorageError> {
        RemoteSessionAdapter::delete(self, id).await
    }

    async fn subscribe(&self, callback: SessionsCallback) -> Result<Subscription, StorageError> {
        self.subscribe_to_changes(callback).await
    }
}

async fn list_sessions(records: &dyn RemoteSessionRecords, user_id: &UserId) -> Result<Vec<Session>, StorageError> {
    let mut sessions: Vec<Session> = records
        .list(user_id)
        .await?
        .into_iter()
        .filter_map(|record| match record_to_session(record) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!("Skipping remote session record: {}", e);
                None
            }
        })
        .collect();
    sessions.sort_by(|a, b| b.updated_at().cmp(a.updated_at()));
    Ok(sessions)
}

// ─────────────────────────────────────────────────────────────────────────────
// Translation
// ─────────────────────────────────────────────────────────────────────────────

/// Translates a record into a remote-origin session.
///
/// # Errors
///
/// - `InvalidRecord` for an unknown phase or an unusable question id
pub fn record_to_session(record: SessionRecord) -> Result<Session, StorageError> {
    let current_phase: PhaseId = record
        .current_phase
        .parse()
        .map_err(|_| StorageError::invalid_record(record.id, format!("unknown phase '{}'", record.current_phase)))?;

    let mut answers = BTreeMap::new();
    for (question, value) in record.answers {
        let question_id = QuestionId::new(question)
            .map_err(|e| StorageError::invalid_record(record.id, e.to_string()))?;
        answers.insert(question_id, Answer::from_text(value, Some(record.updated_at)));
    }

    Ok(Session::reconstitute(
        record.id,
        record.title,
        record.summary,
        current_phase,
        answers,
        record.created_at,
        record.updated_at,
        SessionOrigin::Remote,
    ))
}

/// Checks that every answer key of a projection reads back as a question id.
fn ensure_translatable(id: &SessionId, answers: &BTreeMap<String, String>) -> Result<(), StorageError> {
    for question in answers.keys() {
        QuestionId::new(question.as_str()).map_err(|e| StorageError::invalid_record(id, e.to_string()))?;
    }
    Ok(())
}

fn flat_answers(session: &Session) -> BTreeMap<String, String> {
    session
        .answers()
        .iter()
        .map(|(id, answer)| (id.as_str().to_string(), answer.value().to_string()))
        .collect()
}

pub fn session_to_new_record(user_id: &UserId, session: &Session) -> NewSessionRecord {
    NewSessionRecord {
        user_id: user_id.clone(),
        title: session.title().to_string(),
        summary: session.summary().map(str::to_string),
        current_phase: session.current_phase().as_str().to_string(),
        answers: flat_answers(session),
    }
}

pub fn session_to_patch(session: &Session) -> SessionRecordPatch {
    SessionRecordPatch {
        title: Some(session.title().to_string()),
        summary: Some(session.summary().map(str::to_string)),
        current_phase: Some(session.current_phase().as_str().to_string()),
        answers: Some(flat_answers(session)),
    }
}
