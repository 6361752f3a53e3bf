//! Completion tracking of a session against a methodology.

use super::Methodology;
use crate::domain::foundation::PhaseId;
use crate::domain::session::Session;

/// Completion counts for one phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseProgress {
    pub phase: PhaseId,
    pub answered: usize,
    pub total: usize,
    pub required_answered: usize,
    pub required_total: usize,
}

impl PhaseProgress {
    /// Every required question of the phase has a satisfying answer.
    pub fn is_complete(&self) -> bool {
        self.required_answered == self.required_total
    }
}

/// Completion counts for a whole session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub phases: Vec<PhaseProgress>,
}

impl Progress {
    /// Counts the answers of `session` that satisfy their question.
    pub fn of(methodology: &Methodology, session: &Session) -> Self {
        let phases = methodology
            .phases()
            .iter()
            .map(|phase| {
                let mut progress = PhaseProgress {
                    phase: phase.id,
                    answered: 0,
                    total: phase.questions.len(),
                    required_answered: 0,
                    required_total: 0,
                };
                for question in &phase.questions {
                    let satisfied = session
                        .answer_value(question.id.as_str())
                        .is_some_and(|value| question.is_satisfied_by(value));
                    if satisfied {
                        progress.answered += 1;
                    }
                    if question.required {
                        progress.required_total += 1;
                        if satisfied {
                            progress.required_answered += 1;
                        }
                    }
                }
                progress
            })
            .collect();
        Self { phases }
    }

    pub fn phase(&self, phase: PhaseId) -> Option<&PhaseProgress> {
        self.phases.iter().find(|p| p.phase == phase)
    }

    pub fn answered(&self) -> usize {
        self.phases.iter().map(|p| p.answered).sum()
    }

    pub fn total(&self) -> usize {
        self.phases.iter().map(|p| p.total).sum()
    }

    /// Share of questions answered, 0 to 100.
    pub fn percent(&self) -> u8 {
        match self.total() {
            0 => 100,
            total => ((self.answered() * 100) / total) as u8,
        }
    }

    /// Every phase is complete.
    pub fn is_complete(&self) -> bool {
        self.phases.iter().all(PhaseProgress::is_complete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::QuestionId;

    fn qid(id: &str) -> QuestionId {
        QuestionId::new(id).unwrap()
    }

    #[test]
    fn empty_session_has_no_progress() {
        let progress = Progress::of(Methodology::builtin(), &Session::new("Demo").unwrap());
        assert_eq!(progress.answered(), 0);
        assert_eq!(progress.total(), 15);
        assert_eq!(progress.percent(), 0);
        assert!(!progress.is_complete());
    }

    #[test]
    fn counts_required_and_optional_answers() {
        let session = Session::new("Demo")
            .unwrap()
            .set_answer(qid("core_features"), "Editor")
            .set_answer(qid("nice_to_have"), "Themes")
            .set_answer(qid("user_journey"), "   ");

        let progress = Progress::of(Methodology::builtin(), &session);
        let organize = progress.phase(PhaseId::Organize).unwrap();
        assert_eq!(organize.answered, 2);
        assert_eq!(organize.required_total, 2);
        assert_eq!(organize.required_answered, 1);
        assert!(!organize.is_complete());
    }

    #[test]
    fn phase_complete_once_required_answered() {
        let session = Session::new("Demo")
            .unwrap()
            .set_answer(qid("timeline"), "Q3")
            .set_answer(qid("resources"), "Two devs")
            .set_answer(qid("next_steps"), "Prototype");

        let progress = Progress::of(Methodology::builtin(), &session);
        assert!(progress.phase(PhaseId::Equip).unwrap().is_complete());
        assert!(!progress.phase(PhaseId::Clarify).unwrap().is_complete());
        assert_eq!(progress.percent(), 20);
    }

    #[test]
    fn answers_to_unknown_questions_are_ignored() {
        let session = Session::new("Demo").unwrap().set_answer(qid("C-01"), "x");
        assert_eq!(Progress::of(Methodology::builtin(), &session).answered(), 0);
    }
}
