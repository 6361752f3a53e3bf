//! HybridSessionStore - routes every session operation to a backend.
//!
//! Each call probes the identity provider, asks the injected resolver which
//! backend to use, and runs the call there. Remote calls are bounded by a
//! timeout; any remote failure falls back to local storage for that call
//! only. The next call tries the remote again.
//!
//! Sessions are never migrated between backends. A session created while
//! signed out stays on the device after the user signs in.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use super::backend_resolver::{default_resolver, BackendResolver};
use super::store_error::{StoreError, StoreOperation};
use crate::domain::foundation::{IdentityState, QuestionId, SessionId};
use crate::domain::methodology::{Methodology, Progress};
use crate::domain::output::{self, OutputBundle, SessionExport};
use crate::domain::session::{AnswerInput, Session, SessionError};
use crate::ports::{BackendKind, IdentityProvider, SessionBackend, SessionsCallback, StorageError, Subscription};

/// Default bound on a single remote call.
pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_millis(5000);

/// Session store that prefers the remote backend and falls back to local.
pub struct HybridSessionStore {
    local: Arc<dyn SessionBackend>,
    remote: Option<Arc<dyn SessionBackend>>,
    identity: Arc<dyn IdentityProvider>,
    resolver: BackendResolver,
    methodology: Arc<Methodology>,
    remote_timeout: Duration,
    /// Local read-modify-write cycles run one at a time.
    local_writes: Mutex<()>,
}

impl HybridSessionStore {
    /// Creates a store with no remote backend; every call is served locally.
    pub fn new(local: Arc<dyn SessionBackend>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            local,
            remote: None,
            identity,
            resolver: default_resolver(),
            methodology: Arc::new(Methodology::builtin().clone()),
            remote_timeout: DEFAULT_REMOTE_TIMEOUT,
            local_writes: Mutex::new(()),
        }
    }

    pub fn with_remote(mut self, remote: Arc<dyn SessionBackend>) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn with_resolver(mut self, resolver: BackendResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_methodology(mut self, methodology: Arc<Methodology>) -> Self {
        self.methodology = methodology;
        self
    }

    pub fn with_remote_timeout(mut self, timeout: Duration) -> Self {
        self.remote_timeout = timeout;
        self
    }

    pub fn methodology(&self) -> &Methodology {
        &self.methodology
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// All sessions visible to the current identity.
    pub async fn load_all(&self) -> Result<Vec<Session>, StoreError> {
        self.with_fallback(StoreOperation::Load, |backend| backend.load_all())
            .await
    }

    pub async fn get_session(&self, id: &SessionId) -> Result<Option<Session>, StoreError> {
        self.with_fallback(StoreOperation::Get, |backend| backend.get(id))
            .await
    }

    /// Persists `session` and returns the stored form.
    ///
    /// Remote-origin sessions update their record (a missing record leaves
    /// the input unchanged); all others create a record and come back with
    /// the server id and origin `remote`. Locally the session is upserted.
    pub async fn save_session(&self, session: &Session) -> Result<Session, StoreError> {
        self.with_fallback(StoreOperation::Save, |backend| backend.save(session))
            .await
    }

    /// Creates and saves a session in the `clarify` phase with no answers.
    pub async fn create_new_session(&self, title: impl Into<String>) -> Result<Session, StoreError> {
        let session = Session::new(title)?;
        self.save_session(&session).await
    }

    /// Deletes a session; a missing id is not an error.
    pub async fn delete_session(&self, id: &SessionId) -> Result<(), StoreError> {
        self.with_fallback(StoreOperation::Delete, |backend| backend.delete(id))
            .await
    }

    /// Validates an answer against the methodology, applies it and saves.
    pub async fn record_answer(
        &self,
        session: &Session,
        question_id: &str,
        value: impl Into<String>,
    ) -> Result<Session, StoreError> {
        self.record_answer_with(session, question_id, AnswerInput::text(value))
            .await
    }

    /// Same as [`record_answer`](Self::record_answer) with confidence and note.
    pub async fn record_answer_with(
        &self,
        session: &Session,
        question_id: &str,
        input: AnswerInput,
    ) -> Result<Session, StoreError> {
        self.methodology.validate_answer(question_id, &input.value)?;
        let question_id = QuestionId::new(question_id).map_err(SessionError::from)?;
        self.save_session(&session.set_answer_with(question_id, input))
            .await
    }

    /// Moves the session to `phase` and saves it.
    pub async fn change_phase(&self, session: &Session, phase: &str) -> Result<Session, StoreError> {
        let next = session.set_phase(phase)?;
        self.save_session(&next).await
    }

    /// Registers `callback` for pushed session lists.
    ///
    /// Only the remote backend pushes changes. Returns `None` when the call
    /// resolves locally or the subscription cannot be opened.
    pub async fn subscribe_to_changes(&self, callback: SessionsCallback) -> Option<Subscription> {
        let remote = self.remote_for_call().await?;
        match self.bounded(remote.subscribe(callback)).await {
            Ok(subscription) => Some(subscription),
            Err(e) => {
                tracing::warn!("Change feed unavailable: {}", e);
                None
            }
        }
    }

    /// Exports every visible session as one JSON document.
    pub async fn export_sessions(&self) -> Result<SessionExport, StoreError> {
        let sessions = self.load_all().await?;
        let export = output::export_sessions(&sessions)?;
        tracing::info!(
            sessions = export.info().session_count,
            bytes = export.info().file_size,
            "Exported sessions"
        );
        Ok(export)
    }

    /// Renders markdown, JSON and AI prompt for `session`.
    pub fn generate_outputs(&self, session: &Session) -> Result<OutputBundle, StoreError> {
        Ok(output::generate_outputs(session, &self.methodology)?)
    }

    pub fn progress(&self, session: &Session) -> Progress {
        Progress::of(&self.methodology, session)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Routing
    // ─────────────────────────────────────────────────────────────────────────

    /// Runs `call` on the resolved backend, falling back to local storage
    /// when the remote fails or times out.
    async fn with_fallback<'a, T, F, Fut>(&'a self, operation: StoreOperation, call: F) -> Result<T, StoreError>
    where
        F: Fn(&'a dyn SessionBackend) -> Fut,
        Fut: Future<Output = Result<T, StorageError>>,
    {
        let mut remote_error = None;
        if let Some(remote) = self.remote_for_call().await {
            match self.bounded(call(remote)).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    tracing::warn!(%operation, error = %e, "Remote storage failed, falling back to local");
                    remote_error = Some(e);
                }
            }
        }

        let _guard = self.local_writes.lock().await;
        call(self.local.as_ref())
            .await
            .map_err(|local| StoreError::unavailable(operation, remote_error, local))
    }

    /// Returns the remote backend when this call should go there.
    async fn remote_for_call(&self) -> Option<&dyn SessionBackend> {
        let remote: &dyn SessionBackend = self.remote.as_deref()?;
        let identity = match self.identity.current_user().await {
            Ok(user) => IdentityState::from(user),
            Err(e) => {
                tracing::warn!("Identity probe failed, treating as anonymous: {}", e);
                IdentityState::Anonymous
            }
        };
        let kind = (self.resolver)(&identity);
        tracing::debug!(backend = %kind, authenticated = identity.is_authenticated(), "Resolved session backend");
        match kind {
            BackendKind::Remote => Some(remote),
            BackendKind::Local => None,
        }
    }

    async fn bounded<T>(&self, call: impl Future<Output = Result<T, StorageError>>) -> Result<T, StorageError> {
        tokio::time::timeout(self.remote_timeout, call)
            .await
            .unwrap_or_else(|_| Err(StorageError::Timeout(self.remote_timeout.as_millis() as u64)))
    }
}
