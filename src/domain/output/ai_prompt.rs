//! AI-ready implementation prompt.

use super::markdown::{answer_text, escape_inline};
use crate::domain::foundation::PhaseId;
use crate::domain::methodology::Methodology;
use crate::domain::session::Session;

const PREAMBLE: &str = "You are an expert project manager and technical architect. \
Based on the following project analysis, create a comprehensive implementation plan.";

/// Deliverables requested at the end of every prompt, in order.
pub const DELIVERABLES: [&str; 6] = [
    "Technical architecture recommendations",
    "Implementation roadmap with milestones",
    "Risk mitigation strategies",
    "Technology stack suggestions",
    "Resource allocation plan",
    "Success metrics and KPIs",
];

/// Renders the prompt handed to an AI assistant.
///
/// The first three lines are fixed: role preamble, `PROJECT:` and
/// `ANALYSIS:`. The title is folded onto one line the same way the
/// Markdown heading is. The Clarify answers follow verbatim, one item per
/// question.
pub fn render_ai_prompt(session: &Session, methodology: &Methodology) -> String {
    let mut prompt = String::new();
    prompt.push_str(PREAMBLE);
    prompt.push('\n');
    prompt.push_str(&format!("PROJECT: {}\n", escape_inline(session.title())));
    prompt.push_str("ANALYSIS:\n");

    for question in &methodology.phase(PhaseId::Clarify).questions {
        prompt.push_str(&format!(
            "- {}: {}\n",
            question.text,
            answer_text(session, question.id.as_str())
        ));
    }

    prompt.push_str("\nPlease provide:\n");
    for (index, deliverable) in DELIVERABLES.iter().enumerate() {
        prompt.push_str(&format!("{}. {}\n", index + 1, deliverable));
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::QuestionId;

    fn qid(id: &str) -> QuestionId {
        QuestionId::new(id).unwrap()
    }

    #[test]
    fn fixed_header_lines() {
        let session = Session::new("Launch Planner").unwrap();
        let prompt = render_ai_prompt(&session, Methodology::builtin());
        let lines: Vec<&str> = prompt.lines().collect();

        assert!(lines[0].contains("expert project manager"));
        assert_eq!(lines[1], "PROJECT: Launch Planner");
        assert_eq!(lines[2], "ANALYSIS:");
    }

    #[test]
    fn multi_line_title_keeps_header_layout() {
        let session = Session::new("Demo\nPlan\rB").unwrap();
        let prompt = render_ai_prompt(&session, Methodology::builtin());
        let lines: Vec<&str> = prompt.lines().collect();

        assert_eq!(lines[1], "PROJECT: Demo Plan B");
        assert_eq!(lines[2], "ANALYSIS:");

        let markdown = crate::domain::output::render_markdown(&session, Methodology::builtin());
        assert!(markdown.starts_with("# Demo Plan B\n"));
    }

    #[test]
    fn embeds_clarify_answers_verbatim() {
        let session = Session::new("Demo")
            .unwrap()
            .set_answer(qid("problem"), "Planning takes weeks")
            .set_answer(qid("target_users"), "Indie founders")
            .set_answer(qid("core_features"), "Not part of the analysis");
        let prompt = render_ai_prompt(&session, Methodology::builtin());

        assert!(prompt.contains("- What specific problem does this project solve?: Planning takes weeks\n"));
        assert!(prompt.contains("- Who are your target users?: Indie founders\n"));
        assert!(prompt.contains("- How will you measure success?: Not answered\n"));
        assert!(!prompt.contains("Not part of the analysis"));
    }

    #[test]
    fn requests_all_deliverables() {
        let prompt = render_ai_prompt(&Session::new("Demo").unwrap(), Methodology::builtin());
        let lower = prompt.to_lowercase();
        assert!(prompt.contains("\nPlease provide:\n"));
        for deliverable in [
            "technical architecture",
            "implementation roadmap",
            "risk mitigation",
            "technology stack",
            "resource allocation",
            "success metrics",
        ] {
            assert!(lower.contains(deliverable), "missing {}", deliverable);
        }
        assert!(prompt.ends_with("6. Success metrics and KPIs\n"));
    }
}
