//! JSON rendering of a session.
//!
//! The document has the same shape as a local storage record, so a
//! rendered session can be parsed back into an identical value.

use thiserror::Error;

use crate::domain::session::Session;

/// Errors raised while rendering or parsing output documents.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize output: {0}")]
    Serialization(String),

    #[error("Failed to parse session document: {0}")]
    Parse(String),
}

/// Renders the session as pretty-printed JSON.
pub fn render_json(session: &Session) -> Result<String, OutputError> {
    serde_json::to_string_pretty(session).map_err(|e| OutputError::Serialization(e.to_string()))
}

/// Parses a document produced by [`render_json`].
pub fn parse_session_json(raw: &str) -> Result<Session, OutputError> {
    serde_json::from_str(raw).map_err(|e| OutputError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Confidence, PhaseId, QuestionId};
    use crate::domain::session::AnswerInput;
    use proptest::prelude::*;

    fn qid(id: &str) -> QuestionId {
        QuestionId::new(id).unwrap()
    }

    #[test]
    fn rich_session_round_trips() {
        let session = Session::new("Demo")
            .unwrap()
            .with_summary(Some("Short pitch".to_string()))
            .set_answer_with(
                qid("problem"),
                AnswerInput::text("Planning is slow")
                    .with_confidence(Confidence::new(3).unwrap())
                    .with_note("needs data"),
            )
            .with_phase(PhaseId::Refine);

        let json = render_json(&session).unwrap();
        assert_eq!(parse_session_json(&json).unwrap(), session);
    }

    #[test]
    fn document_is_pretty_printed_camel_case() {
        let json = render_json(&Session::new("Demo").unwrap()).unwrap();
        assert!(json.starts_with("{\n  \"id\": "));
        assert!(json.contains("\"currentPhase\": \"clarify\""));
    }

    #[test]
    fn rejects_malformed_documents() {
        assert!(matches!(
            parse_session_json("{\"title\": 1}"),
            Err(OutputError::Parse(_))
        ));
    }

    proptest! {
        #[test]
        fn parse_inverts_render(
            title in "[a-zA-Z0-9 #\n\"\\\\]{1,60}",
            phase in 0usize..4,
            answers in proptest::collection::btree_map("[a-z][a-z_]{0,10}", ".{0,40}", 0..6),
            summary in proptest::option::of(".{0,40}"),
        ) {
            prop_assume!(!title.trim().is_empty());
            let mut session = Session::new(title).unwrap()
                .with_phase(PhaseId::all()[phase])
                .with_summary(summary);
            for (id, value) in answers {
                session = session.set_answer(QuestionId::new(id).unwrap(), value);
            }

            let json = render_json(&session).unwrap();
            prop_assert_eq!(parse_session_json(&json).unwrap(), session);
        }
    }
}
