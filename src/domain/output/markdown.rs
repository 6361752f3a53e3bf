//! Markdown document rendering.
//!
//! Layout:
//!
//! ```text
//! # {title}
//!
//! {summary}
//!
//! ## Clarify Phase
//!
//! *{phase description}*
//!
//! **{question text}**: {answer | Not answered}
//! ```
//!
//! Every phase section is emitted, answered or not. User text is escaped
//! line by line so it can never open a heading of its own.

use std::borrow::Cow;

use crate::domain::methodology::{Methodology, Phase};
use crate::domain::session::Session;

/// Marker shown for a question without a (non-blank) answer.
pub const NOT_ANSWERED: &str = "Not answered";

/// Renders the session as a Markdown document.
pub fn render_markdown(session: &Session, methodology: &Methodology) -> String {
    let mut doc = format!("# {}\n\n", escape_inline(session.title()));

    if let Some(summary) = session.summary().filter(|s| !s.trim().is_empty()) {
        doc.push_str(&escape_block(summary));
        doc.push_str("\n\n");
    }

    for phase in methodology.phases() {
        doc.push_str(&render_phase(session, phase));
    }

    // Exactly one trailing newline.
    let trimmed = doc.trim_end_matches('\n').len();
    doc.truncate(trimmed);
    doc.push('\n');
    doc
}

fn render_phase(session: &Session, phase: &Phase) -> String {
    let mut section = format!("## {}\n\n", phase.heading());

    if !phase.description.trim().is_empty() {
        section.push_str(&format!("*{}*\n\n", escape_inline(&phase.description)));
    }

    for question in &phase.questions {
        let answer = answer_text(session, question.id.as_str());
        section.push_str(&format!(
            "**{}**: {}\n\n",
            escape_inline(&question.text),
            escape_block(answer)
        ));
    }

    section
}

/// Answer value for a question, or the [`NOT_ANSWERED`] marker.
pub(super) fn answer_text<'a>(session: &'a Session, question_id: &str) -> &'a str {
    session
        .answer(question_id)
        .filter(|a| !a.is_blank())
        .map(|a| a.value())
        .unwrap_or(NOT_ANSWERED)
}

/// Escapes text that must stay on one line (titles, labels).
pub(super) fn escape_inline(text: &str) -> String {
    normalize_line_endings(text)
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Escapes multi-line user text so no line reads as a heading.
fn escape_block(text: &str) -> String {
    normalize_line_endings(text)
        .lines()
        .map(escape_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Rewrites `\r\n` and lone `\r` as `\n`; all three end a Markdown line.
fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

fn escape_line(line: &str) -> Cow<'_, str> {
    let content = line.trim_start();
    let indent = &line[..line.len() - content.len()];
    if content.starts_with('#') || is_setext_underline(content) {
        Cow::Owned(format!("{}\\{}", indent, content))
    } else {
        Cow::Borrowed(line)
    }
}

/// A line of only `=` or only `-` turns the line above it into a heading.
fn is_setext_underline(line: &str) -> bool {
    let line = line.trim_end();
    !line.is_empty() && (line.chars().all(|c| c == '=') || line.chars().all(|c| c == '-'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::QuestionId;
    use proptest::prelude::*;

    fn qid(id: &str) -> QuestionId {
        QuestionId::new(id).unwrap()
    }

    fn second_level_headings(doc: &str) -> Vec<&str> {
        doc.split(['\n', '\r']).filter(|l| l.starts_with("## ")).collect()
    }

    #[test]
    fn empty_session_has_all_four_phases() {
        let doc = render_markdown(&Session::new("Demo").unwrap(), Methodology::builtin());

        assert!(doc.starts_with("# Demo\n\n## Clarify Phase\n"));
        assert_eq!(
            second_level_headings(&doc),
            vec![
                "## Clarify Phase",
                "## Organize Phase",
                "## Refine Phase",
                "## Equip Phase"
            ]
        );
        assert!(doc.contains("**What specific problem does this project solve?**: Not answered\n"));
        assert!(doc.ends_with("Not answered\n"));
    }

    #[test]
    fn renders_answers_under_their_question() {
        let answer = "X".repeat(60);
        let session = Session::new("Demo")
            .unwrap()
            .set_answer(qid("problem"), answer.clone())
            .with_phase(crate::domain::foundation::PhaseId::Organize);

        let doc = render_markdown(&session, Methodology::builtin());
        let clarify = doc.split("## Organize Phase").next().unwrap();
        assert!(clarify.contains(&format!(
            "**What specific problem does this project solve?**: {}",
            answer
        )));
    }

    #[test]
    fn renders_phase_description_in_italics() {
        let doc = render_markdown(&Session::new("Demo").unwrap(), Methodology::builtin());
        assert!(doc.contains("*Define the core purpose and scope of your project*"));
    }

    #[test]
    fn renders_summary_after_title() {
        let session = Session::new("Demo")
            .unwrap()
            .with_summary(Some("A planning tool".to_string()));
        let doc = render_markdown(&session, Methodology::builtin());
        assert!(doc.starts_with("# Demo\n\nA planning tool\n\n## Clarify Phase"));
    }

    #[test]
    fn blank_answer_renders_as_not_answered() {
        let session = Session::new("Demo").unwrap().set_answer(qid("scope"), "  ");
        let doc = render_markdown(&session, Methodology::builtin());
        assert!(doc.contains("**What is the project scope?**: Not answered"));
    }

    #[test]
    fn heading_like_answers_are_escaped() {
        let session = Session::new("Demo")
            .unwrap()
            .set_answer(qid("problem"), "intro\n## Fake Phase\n  # also\nunderlined\n---");
        let doc = render_markdown(&session, Methodology::builtin());

        assert_eq!(second_level_headings(&doc).len(), 4);
        assert!(doc.contains("\\## Fake Phase"));
        assert!(doc.contains("  \\# also"));
        assert!(doc.contains("\\---"));
    }

    #[test]
    fn multi_line_title_stays_on_heading_line() {
        let session = Session::new("Demo\n## Injected").unwrap();
        let doc = render_markdown(&session, Methodology::builtin());
        assert!(doc.starts_with("# Demo ## Injected\n"));
        assert_eq!(second_level_headings(&doc).len(), 4);
    }

    #[test]
    fn carriage_returns_end_lines_too() {
        let session = Session::new("Demo\r## Injected title")
            .unwrap()
            .set_answer(qid("problem"), "intro\r## Injected answer\r\n---");
        let doc = render_markdown(&session, Methodology::builtin());

        assert!(!doc.contains('\r'));
        assert!(doc.starts_with("# Demo ## Injected title\n"));
        assert!(doc.contains("intro\n\\## Injected answer\n\\---"));
        let headings = doc.split(['\n', '\r']).filter(|l| l.starts_with("## ")).count();
        assert_eq!(headings, 4);
    }

    #[test]
    fn answers_outside_methodology_are_not_rendered() {
        let session = Session::new("Demo").unwrap().set_answer(qid("C-01"), "orphan");
        let doc = render_markdown(&session, Methodology::builtin());
        assert!(!doc.contains("orphan"));
    }

    #[test]
    fn output_is_deterministic() {
        let session = Session::new("Demo")
            .unwrap()
            .set_answer(qid("risks"), "Scope creep")
            .set_answer(qid("problem"), "Slow planning");
        let a = render_markdown(&session, Methodology::builtin());
        let b = render_markdown(&session.clone(), Methodology::builtin());
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn always_exactly_four_phase_headings(
            title in ".{0,20}(\r|\n|\r\n)?.{1,20}",
            answers in proptest::collection::vec((0usize..15, "(#|## |-|=|[a-z ]|\n|\r){0,30}"), 0..8),
        ) {
            prop_assume!(!title.trim().is_empty());
            let builtin = Methodology::builtin();
            let ids: Vec<QuestionId> = builtin.questions().map(|q| q.id.clone()).collect();

            let mut session = Session::new(title).unwrap();
            for (index, value) in answers {
                session = session.set_answer(ids[index].clone(), value);
            }

            let doc = render_markdown(&session, builtin);
            prop_assert_eq!(
                second_level_headings(&doc),
                vec!["## Clarify Phase", "## Organize Phase", "## Refine Phase", "## Equip Phase"]
            );
        }
    }
}
