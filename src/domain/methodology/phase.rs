//! Phase and Question definitions.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{PhaseId, QuestionId};

/// Upper bound on answer length when a definition does not set one.
pub const DEFAULT_MAX_ANSWER_LENGTH: usize = 5000;

/// One prompt within a phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,

    /// Prompt shown to the user.
    pub text: String,

    /// Guidance shown in an empty input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    /// Instruction handed to an AI assistant helping with this question.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_prompt: Option<String>,

    #[serde(default)]
    pub required: bool,

    /// Minimum character count for the answer to count as complete.
    #[serde(default)]
    pub min_length: usize,

    /// Maximum character count accepted.
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

fn default_max_length() -> usize {
    DEFAULT_MAX_ANSWER_LENGTH
}

impl Question {
    /// Returns true when `value` is long enough to count as an answer.
    pub fn is_satisfied_by(&self, value: &str) -> bool {
        let trimmed = value.trim();
        !trimmed.is_empty() && trimmed.chars().count() >= self.min_length
    }

    /// Returns true when `value` fits under the length cap.
    pub fn accepts_length(&self, value: &str) -> bool {
        value.chars().count() <= self.max_length
    }
}

/// One of the four fixed methodology stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub id: PhaseId,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Phase {
    /// Looks up a question of this phase by id.
    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id.as_str() == question_id)
    }

    /// Heading used by rendered documents (`Clarify Phase`).
    pub fn heading(&self) -> String {
        format!("{} Phase", self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(min: usize, max: usize) -> Question {
        Question {
            id: QuestionId::new("problem").unwrap(),
            text: "What problem?".to_string(),
            placeholder: None,
            ai_prompt: None,
            required: true,
            min_length: min,
            max_length: max,
        }
    }

    #[test]
    fn satisfaction_requires_min_length_of_trimmed_text() {
        let q = question(5, 100);
        assert!(!q.is_satisfied_by("   "));
        assert!(!q.is_satisfied_by("  abc  "));
        assert!(q.is_satisfied_by("abcde"));
    }

    #[test]
    fn length_cap_counts_characters() {
        let q = question(0, 3);
        assert!(q.accepts_length("äöü"));
        assert!(!q.accepts_length("abcd"));
    }

    #[test]
    fn deserializes_with_defaults() {
        let q: Question =
            serde_json::from_str(r#"{ "id": "scope", "text": "What is the scope?" }"#).unwrap();
        assert!(!q.required);
        assert_eq!(q.min_length, 0);
        assert_eq!(q.max_length, DEFAULT_MAX_ANSWER_LENGTH);
    }

    #[test]
    fn heading_appends_phase() {
        let phase = Phase {
            id: PhaseId::Clarify,
            title: "Clarify".to_string(),
            description: String::new(),
            questions: vec![],
        };
        assert_eq!(phase.heading(), "Clarify Phase");
    }
}
