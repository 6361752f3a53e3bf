//! Methodology definition and its load-time validation.

use std::collections::HashSet;

use serde::Deserialize;
use thiserror::Error;

use super::{builtin, Phase, Question};
use crate::domain::foundation::{PhaseId, QuestionId, QuestionIdScheme};
use crate::domain::session::SessionError;

/// Raw, unvalidated methodology as read from a definition file.
#[derive(Debug, Clone, Deserialize)]
pub struct MethodologyDefinition {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    pub phases: Vec<Phase>,
}

fn default_name() -> String {
    "CORE Framework".to_string()
}

fn default_version() -> String {
    "1.0.0".to_string()
}

/// Errors raised when a methodology definition is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MethodologyError {
    #[error("Failed to parse methodology definition: {0}")]
    Parse(String),

    #[error("Methodology must define exactly 4 phases, found {0}")]
    WrongPhaseCount(usize),

    #[error("Phase at position {position} must be '{expected}', found '{found}'")]
    PhaseOutOfOrder {
        position: usize,
        expected: PhaseId,
        found: PhaseId,
    },

    #[error("Question id '{0}' is defined more than once")]
    DuplicateQuestion(QuestionId),

    #[error("Question id '{0}' follows no known naming scheme")]
    UnrecognizedIdScheme(QuestionId),

    #[error("Question id '{conflicting}' uses a different naming scheme than '{first}'")]
    MixedIdSchemes {
        first: QuestionId,
        conflicting: QuestionId,
    },

    #[error("Question '{question}' has min_length {min} greater than max_length {max}")]
    InvalidLengthBounds {
        question: QuestionId,
        min: usize,
        max: usize,
    },

    #[error("Question '{0}' has no prompt text")]
    EmptyQuestionText(QuestionId),
}

/// Validated, immutable four-phase methodology.
///
/// # Invariants
///
/// - exactly 4 phases, in `PhaseId::all()` order
/// - question ids unique across phases and all following one scheme
/// - `min_length <= max_length` for every question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Methodology {
    name: String,
    version: String,
    phases: Vec<Phase>,
    id_scheme: Option<QuestionIdScheme>,
}

impl Methodology {
    /// Validates a raw definition.
    pub fn new(definition: MethodologyDefinition) -> Result<Self, MethodologyError> {
        let MethodologyDefinition {
            name,
            version,
            phases,
        } = definition;

        if phases.len() != PhaseId::all().len() {
            return Err(MethodologyError::WrongPhaseCount(phases.len()));
        }
        for (position, (phase, expected)) in phases.iter().zip(PhaseId::all()).enumerate() {
            if phase.id != *expected {
                return Err(MethodologyError::PhaseOutOfOrder {
                    position,
                    expected: *expected,
                    found: phase.id,
                });
            }
        }

        let mut seen = HashSet::new();
        let mut scheme: Option<(QuestionIdScheme, &QuestionId)> = None;
        for question in phases.iter().flat_map(|p| p.questions.iter()) {
            if !seen.insert(question.id.as_str()) {
                return Err(MethodologyError::DuplicateQuestion(question.id.clone()));
            }
            if question.text.trim().is_empty() {
                return Err(MethodologyError::EmptyQuestionText(question.id.clone()));
            }
            if question.min_length > question.max_length {
                return Err(MethodologyError::InvalidLengthBounds {
                    question: question.id.clone(),
                    min: question.min_length,
                    max: question.max_length,
                });
            }

            let this = question
                .id
                .scheme()
                .ok_or_else(|| MethodologyError::UnrecognizedIdScheme(question.id.clone()))?;
            match scheme {
                None => scheme = Some((this, &question.id)),
                Some((first, first_id)) if first != this => {
                    return Err(MethodologyError::MixedIdSchemes {
                        first: first_id.clone(),
                        conflicting: question.id.clone(),
                    });
                }
                Some(_) => {}
            }
        }
        let id_scheme = scheme.map(|(s, _)| s);

        Ok(Self {
            name,
            version,
            phases,
            id_scheme,
        })
    }

    /// Parses and validates a JSON definition.
    pub fn from_json(raw: &str) -> Result<Self, MethodologyError> {
        let definition: MethodologyDefinition =
            serde_json::from_str(raw).map_err(|e| MethodologyError::Parse(e.to_string()))?;
        Self::new(definition)
    }

    /// Parses and validates a YAML definition.
    pub fn from_yaml(raw: &str) -> Result<Self, MethodologyError> {
        let definition: MethodologyDefinition =
            serde_yaml::from_str(raw).map_err(|e| MethodologyError::Parse(e.to_string()))?;
        Self::new(definition)
    }

    /// The built-in 15-question CORE methodology.
    pub fn builtin() -> &'static Methodology {
        &builtin::BUILTIN
    }

    /// Assembles the built-in set; its validity is covered by tests.
    pub(super) fn from_trusted(name: &str, version: &str, phases: Vec<Phase>) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            phases,
            id_scheme: Some(QuestionIdScheme::SnakeCase),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Phases in canonical order.
    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn phase(&self, id: PhaseId) -> &Phase {
        &self.phases[id.order_index()]
    }

    /// Naming scheme of the question ids; `None` when there are no questions.
    pub fn id_scheme(&self) -> Option<QuestionIdScheme> {
        self.id_scheme
    }

    /// All questions in phase order.
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.phases.iter().flat_map(|p| p.questions.iter())
    }

    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions().find(|q| q.id.as_str() == question_id)
    }

    /// Returns the phase that owns `question_id`.
    pub fn phase_of(&self, question_id: &str) -> Option<&Phase> {
        self.phases
            .iter()
            .find(|p| p.question(question_id).is_some())
    }

    /// Checks an answer against the question it targets.
    ///
    /// # Errors
    ///
    /// - `UnknownQuestion` if the id is not defined
    /// - `ValidationFailed` if the answer exceeds the question's length cap
    pub fn validate_answer(&self, question_id: &str, value: &str) -> Result<&Question, SessionError> {
        let question = self
            .question(question_id)
            .ok_or_else(|| SessionError::unknown_question(question_id))?;
        if !question.accepts_length(value) {
            return Err(SessionError::validation(
                question_id,
                format!("Answer cannot exceed {} characters", question.max_length),
            ));
        }
        Ok(question)
    }
}
