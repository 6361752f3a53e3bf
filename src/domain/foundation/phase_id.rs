//! PhaseId enum representing the 4 CORE phases.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The 4 CORE phases, in methodology order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PhaseId {
    #[default]
    Clarify,
    Organize,
    Refine,
    Equip,
}

/// A phase identifier outside the fixed set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown phase '{0}'; expected one of clarify, organize, refine, equip")]
pub struct UnknownPhase(pub String);

impl PhaseId {
    /// Returns all phases in canonical order.
    pub fn all() -> &'static [PhaseId] {
        &[
            PhaseId::Clarify,
            PhaseId::Organize,
            PhaseId::Refine,
            PhaseId::Equip,
        ]
    }

    /// Returns the 0-based index of this phase in the canonical order.
    pub fn order_index(&self) -> usize {
        match self {
            PhaseId::Clarify => 0,
            PhaseId::Organize => 1,
            PhaseId::Refine => 2,
            PhaseId::Equip => 3,
        }
    }

    /// Returns the next phase in order, if any.
    pub fn next(&self) -> Option<PhaseId> {
        Self::all().get(self.order_index() + 1).copied()
    }

    /// Returns the previous phase in order, if any.
    pub fn previous(&self) -> Option<PhaseId> {
        let idx = self.order_index();
        if idx == 0 {
            None
        } else {
            Self::all().get(idx - 1).copied()
        }
    }

    /// Returns the wire identifier (`clarify`, `organize`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseId::Clarify => "clarify",
            PhaseId::Organize => "organize",
            PhaseId::Refine => "refine",
            PhaseId::Equip => "equip",
        }
    }
}

impl fmt::Display for PhaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PhaseId {
    type Err = UnknownPhase;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|phase| phase.as_str() == s)
            .ok_or_else(|| UnknownPhase(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_returns_phases_in_order() {
        let all = PhaseId::all();
        assert_eq!(
            all,
            &[PhaseId::Clarify, PhaseId::Organize, PhaseId::Refine, PhaseId::Equip]
        );
        for (idx, phase) in all.iter().enumerate() {
            assert_eq!(phase.order_index(), idx);
        }
    }

    #[test]
    fn next_and_previous_walk_the_sequence() {
        assert_eq!(PhaseId::Clarify.next(), Some(PhaseId::Organize));
        assert_eq!(PhaseId::Equip.next(), None);
        assert_eq!(PhaseId::Clarify.previous(), None);
        assert_eq!(PhaseId::Equip.previous(), Some(PhaseId::Refine));
    }

    #[test]
    fn parses_wire_identifiers() {
        assert_eq!("organize".parse::<PhaseId>().unwrap(), PhaseId::Organize);
        assert_eq!(
            "Organize".parse::<PhaseId>(),
            Err(UnknownPhase("Organize".to_string()))
        );
        assert!("launch".parse::<PhaseId>().is_err());
    }

    #[test]
    fn serializes_as_snake_case() {
        assert_eq!(serde_json::to_string(&PhaseId::Equip).unwrap(), "\"equip\"");
        let back: PhaseId = serde_json::from_str("\"refine\"").unwrap();
        assert_eq!(back, PhaseId::Refine);
    }

    #[test]
    fn default_is_clarify() {
        assert_eq!(PhaseId::default(), PhaseId::Clarify);
    }
}
