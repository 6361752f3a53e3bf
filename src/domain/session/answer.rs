//! Answer value object.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Confidence, Timestamp};

/// A user's answer to one question.
///
/// Stored answers come in two shapes: the current object form and a bare
/// string written by older clients. Both deserialize into `Answer`; the
/// bare form carries no confidence, note or timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredAnswer", rename_all = "camelCase")]
pub struct Answer {
    value: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    confidence: Option<Confidence>,

    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    answered_at: Option<Timestamp>,
}

/// Caller-supplied content of an answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerInput {
    pub value: String,
    pub confidence: Option<Confidence>,
    pub note: Option<String>,
}

impl AnswerInput {
    /// Plain text answer without confidence or note.
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

impl Answer {
    /// Records an answer given at `answered_at`.
    pub fn new(input: AnswerInput, answered_at: Timestamp) -> Self {
        Self {
            value: input.value,
            confidence: input.confidence,
            note: input.note,
            answered_at: Some(answered_at),
        }
    }

    /// Builds an answer from bare text, as stored by flat answer mappings.
    pub fn from_text(value: impl Into<String>, answered_at: Option<Timestamp>) -> Self {
        Self {
            value: value.into(),
            confidence: None,
            note: None,
            answered_at,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn confidence(&self) -> Option<Confidence> {
        self.confidence
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// When the answer was written; `None` for answers imported from
    /// legacy flat records.
    pub fn answered_at(&self) -> Option<&Timestamp> {
        self.answered_at.as_ref()
    }

    /// Returns true if the value is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredAnswer {
    Text(String),
    Detailed(DetailedAnswer),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetailedAnswer {
    value: String,
    #[serde(default)]
    confidence: Option<Confidence>,
    #[serde(default)]
    note: Option<String>,
    #[serde(default)]
    answered_at: Option<Timestamp>,
}

impl From<StoredAnswer> for Answer {
    fn from(stored: StoredAnswer) -> Self {
        match stored {
            StoredAnswer::Text(value) => Answer::from_text(value, None),
            StoredAnswer::Detailed(d) => Answer {
                value: d.value,
                confidence: d.confidence,
                note: d.note,
                answered_at: d.answered_at,
            },
        }
    }
}
