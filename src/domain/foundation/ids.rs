//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Unique identifier for a planning session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Creates a new random SessionId (UUID v4).
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a SessionId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// User identifier issued by the external identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a new UserId, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::empty_field("user_id"));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Naming scheme followed by a set of question identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionIdScheme {
    /// `<uppercase letter>-<2 digits>`, e.g. `C-01`.
    Coded,
    /// Lowercase words joined by underscores, e.g. `target_users`.
    SnakeCase,
}

/// Identifier of a question within the methodology.
///
/// Orders and borrows like its string form, so answer maps keyed by
/// `QuestionId` can be queried with a plain `&str`. Deserializing applies
/// the same checks as [`QuestionId::new`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QuestionId(String);

impl QuestionId {
    /// Creates a QuestionId, rejecting empty ids and ids containing whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::empty_field("question_id"));
        }
        if id.chars().any(char::is_whitespace) {
            return Err(ValidationError::invalid_format(
                "question_id",
                "must not contain whitespace",
            ));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Detects which naming scheme this identifier follows, if any.
    pub fn scheme(&self) -> Option<QuestionIdScheme> {
        let bytes = self.0.as_bytes();
        if bytes.len() == 4
            && bytes[0].is_ascii_uppercase()
            && bytes[1] == b'-'
            && bytes[2].is_ascii_digit()
            && bytes[3].is_ascii_digit()
        {
            return Some(QuestionIdScheme::Coded);
        }

        let snake = !self.0.starts_with('_')
            && !self.0.ends_with('_')
            && !self.0.contains("__")
            && self.0.starts_with(|c: char| c.is_ascii_lowercase())
            && self
                .0
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
        snake.then_some(QuestionIdScheme::SnakeCase)
    }
}

impl Borrow<str> for QuestionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for QuestionId {
    type Error = ValidationError;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl From<QuestionId> for String {
    fn from(id: QuestionId) -> Self {
        id.0
    }
}

impl FromStr for QuestionId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_ids_are_unique() {
        let a = SessionId::new();
        let b = SessionId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn session_id_is_uuid_v4() {
        let id = SessionId::new();
        assert_eq!(id.as_uuid().get_version_num(), 4);
    }

    #[test]
    fn session_id_parses_from_display() {
        let id = SessionId::new();
        let parsed: SessionId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn user_id_rejects_empty() {
        assert!(UserId::new("").is_err());
        assert_eq!(UserId::new("user-1").unwrap().as_str(), "user-1");
    }

    #[test]
    fn question_id_rejects_empty_and_whitespace() {
        assert!(QuestionId::new("").is_err());
        assert!(QuestionId::new("target users").is_err());
    }

    #[test]
    fn question_id_deserialization_validates() {
        let id: QuestionId = serde_json::from_str("\"target_users\"").unwrap();
        assert_eq!(id.as_str(), "target_users");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"target_users\"");
        assert!(serde_json::from_str::<QuestionId>("\"target users\"").is_err());
        assert!(serde_json::from_str::<QuestionId>("\"\"").is_err());
    }

    #[test]
    fn question_id_detects_coded_scheme() {
        let id = QuestionId::new("C-01").unwrap();
        assert_eq!(id.scheme(), Some(QuestionIdScheme::Coded));
    }

    #[test]
    fn question_id_detects_snake_case_scheme() {
        let id = QuestionId::new("target_users").unwrap();
        assert_eq!(id.scheme(), Some(QuestionIdScheme::SnakeCase));
        let id = QuestionId::new("problem").unwrap();
        assert_eq!(id.scheme(), Some(QuestionIdScheme::SnakeCase));
    }

    #[test]
    fn question_id_without_scheme() {
        assert_eq!(QuestionId::new("Target-Users").unwrap().scheme(), None);
        assert_eq!(QuestionId::new("c-1").unwrap().scheme(), None);
        assert_eq!(QuestionId::new("_private").unwrap().scheme(), None);
    }

    #[test]
    fn question_id_borrows_as_str() {
        use std::collections::BTreeMap;
        let mut map = BTreeMap::new();
        map.insert(QuestionId::new("problem").unwrap(), 1);
        assert_eq!(map.get("problem"), Some(&1));
    }
}
