//! Confidence value object (1 to 5 scale).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// How sure the user is about an answer: 1 (guess) to 5 (certain).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Confidence(u8);

impl Confidence {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Creates a Confidence, returning error if out of range.
    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ValidationError::out_of_range(
                "confidence",
                Self::MIN as i64,
                Self::MAX as i64,
                value as i64,
            ))
        }
    }

    /// Returns the numeric value.
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Confidence {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Confidence> for u8 {
    fn from(confidence: Confidence) -> Self {
        confidence.0
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/5", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_one_through_five() {
        for value in 1..=5 {
            assert_eq!(Confidence::new(value).unwrap().value(), value);
        }
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(Confidence::new(0).is_err());
        assert!(Confidence::new(6).is_err());
    }

    #[test]
    fn deserialization_enforces_range() {
        assert!(serde_json::from_str::<Confidence>("3").is_ok());
        assert!(serde_json::from_str::<Confidence>("9").is_err());
    }

    #[test]
    fn displays_out_of_five() {
        assert_eq!(Confidence::new(4).unwrap().to_string(), "4/5");
    }
}
