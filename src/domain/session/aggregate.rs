//! Session aggregate entity.
//!
//! A session is one user's run through the four-phase questionnaire. All
//! mutations are pure: they return a new snapshot and leave `self`
//! untouched, so a caller can hold the previous state while a save is in
//! flight.
//!
//! # Origin
//!
//! Every session records where it is authoritative (`local` or `remote`).
//! The hybrid store uses the tag to decide between creating and updating a
//! remote record.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use super::{Answer, AnswerInput, SessionError};
use crate::domain::foundation::{PhaseId, QuestionId, SessionId, Timestamp};

/// Maximum length for session title, in characters.
pub const MAX_TITLE_LENGTH: usize = 500;

/// Format version written on every session.
pub const SESSION_FORMAT_VERSION: &str = "1.0.0";

/// Name of the implementation that created a session.
pub const SESSION_IMPLEMENTATION: &str = env!("CARGO_PKG_NAME");

/// Where a session record is authoritative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionOrigin {
    /// Only known to this device.
    #[default]
    Local,
    /// Backed by a remote record with a server-assigned id.
    Remote,
}

/// Session aggregate.
///
/// # Invariants
///
/// - `id` is globally unique
/// - `title` is 1-500 characters, non-blank
/// - `current_phase` is one of the 4 defined phases
/// - at most one answer per question
/// - `updated_at >= created_at`, and every mutation moves `updated_at`
///   strictly forward
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    id: SessionId,

    title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    summary: Option<String>,

    current_phase: PhaseId,

    /// Ordered by question id so every rendering is byte-stable.
    #[serde(default, deserialize_with = "deserialize_answers")]
    answers: BTreeMap<QuestionId, Answer>,

    created_at: Timestamp,

    updated_at: Timestamp,

    #[serde(default = "default_version")]
    version: String,

    #[serde(default = "default_implementation")]
    implementation: String,

    #[serde(default)]
    origin: SessionOrigin,
}

fn default_version() -> String {
    SESSION_FORMAT_VERSION.to_string()
}

fn default_implementation() -> String {
    SESSION_IMPLEMENTATION.to_string()
}

/// Reads the answer map, dropping entries whose key is not a valid
/// question id. Such answers can never be rendered or stored remotely.
fn deserialize_answers<'de, D>(deserializer: D) -> Result<BTreeMap<QuestionId, Answer>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, Answer>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(key, answer)| QuestionId::new(key).ok().map(|id| (id, answer)))
        .collect())
}

impl Session {
    /// Create a new local session in the `clarify` phase with no answers.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if title is blank or too long
    pub fn new(title: impl Into<String>) -> Result<Self, SessionError> {
        let title = title.into();
        Self::validate_title(&title)?;

        let now = Timestamp::now();
        Ok(Self {
            id: SessionId::new(),
            title,
            summary: None,
            current_phase: PhaseId::Clarify,
            answers: BTreeMap::new(),
            created_at: now,
            updated_at: now,
            version: default_version(),
            implementation: default_implementation(),
            origin: SessionOrigin::Local,
        })
    }

    /// Reconstitute a session from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: SessionId,
        title: String,
        summary: Option<String>,
        current_phase: PhaseId,
        answers: BTreeMap<QuestionId, Answer>,
        created_at: Timestamp,
        updated_at: Timestamp,
        origin: SessionOrigin,
    ) -> Self {
        Self {
            id,
            title,
            summary,
            current_phase,
            answers,
            created_at,
            updated_at,
            version: default_version(),
            implementation: default_implementation(),
            origin,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn current_phase(&self) -> PhaseId {
        self.current_phase
    }

    /// Returns the full question → answer mapping.
    pub fn answers(&self) -> &BTreeMap<QuestionId, Answer> {
        &self.answers
    }

    pub fn answer(&self, question_id: &str) -> Option<&Answer> {
        self.answers.get(question_id)
    }

    /// Returns the answer text for a question, if answered.
    pub fn answer_value(&self, question_id: &str) -> Option<&str> {
        self.answer(question_id).map(Answer::value)
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn implementation(&self) -> &str {
        &self.implementation
    }

    pub fn origin(&self) -> SessionOrigin {
        self.origin
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations (pure)
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns a snapshot with `value` as the answer to `question_id`,
    /// replacing any previous answer.
    pub fn set_answer(&self, question_id: QuestionId, value: impl Into<String>) -> Session {
        self.set_answer_with(question_id, AnswerInput::text(value))
    }

    /// Same as [`Session::set_answer`] with confidence and note.
    pub fn set_answer_with(&self, question_id: QuestionId, input: AnswerInput) -> Session {
        let mut next = self.touched();
        let answered_at = next.updated_at;
        next.answers.insert(question_id, Answer::new(input, answered_at));
        next
    }

    /// Returns a snapshot without an answer for `question_id`.
    pub fn clear_answer(&self, question_id: &str) -> Session {
        let mut next = self.touched();
        next.answers.remove(question_id);
        next
    }

    /// Returns a snapshot pointing at `phase`.
    ///
    /// # Errors
    ///
    /// - `InvalidPhase` if `phase` is not one of the 4 phase ids
    pub fn set_phase(&self, phase: &str) -> Result<Session, SessionError> {
        let phase: PhaseId = phase.parse()?;
        Ok(self.with_phase(phase))
    }

    /// Typed form of [`Session::set_phase`].
    pub fn with_phase(&self, phase: PhaseId) -> Session {
        let mut next = self.touched();
        next.current_phase = phase;
        next
    }

    /// Returns a renamed snapshot.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if title is blank or too long
    pub fn rename(&self, title: impl Into<String>) -> Result<Session, SessionError> {
        let title = title.into();
        Self::validate_title(&title)?;
        let mut next = self.touched();
        next.title = title;
        Ok(next)
    }

    pub fn with_summary(&self, summary: Option<String>) -> Session {
        let mut next = self.touched();
        next.summary = summary;
        next
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn touched(&self) -> Session {
        let mut next = self.clone();
        next.updated_at = Timestamp::now_after(&self.updated_at);
        next
    }

    fn validate_title(title: &str) -> Result<(), SessionError> {
        if title.trim().is_empty() {
            return Err(SessionError::validation("title", "Title cannot be empty"));
        }
        if title.chars().count() > MAX_TITLE_LENGTH {
            return Err(SessionError::validation(
                "title",
                format!("Title cannot exceed {} characters", MAX_TITLE_LENGTH),
            ));
        }
        Ok(())
    }
}
