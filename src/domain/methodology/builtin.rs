//! Built-in CORE methodology: 4 phases, 15 snake_case questions.

use once_cell::sync::Lazy;

use super::{Methodology, Phase, Question, DEFAULT_MAX_ANSWER_LENGTH};
use crate::domain::foundation::{PhaseId, QuestionId};

pub(super) static BUILTIN: Lazy<Methodology> = Lazy::new(|| {
    Methodology::from_trusted(
        "CORE Framework",
        "1.0.0",
        vec![
            phase(
                PhaseId::Clarify,
                "Clarify",
                "Define the core purpose and scope of your project",
                vec![
                    question(
                        "problem",
                        "What specific problem does this project solve?",
                        "Describe the pain point or opportunity...",
                        "Help me clarify the core problem this project solves. Ask probing questions about the target users, their current pain points, and why existing solutions aren't adequate.",
                        true,
                    ),
                    question(
                        "target_users",
                        "Who are your target users?",
                        "Define your primary audience...",
                        "Help me identify distinct user types and their specific needs.",
                        true,
                    ),
                    question(
                        "success_metrics",
                        "How will you measure success?",
                        "Define key metrics and goals...",
                        "Help me define specific, measurable success criteria. Challenge vague statements and push for concrete metrics.",
                        true,
                    ),
                    question(
                        "scope",
                        "What is the project scope?",
                        "Define boundaries and limitations...",
                        "Help me define clear scope boundaries, including what is explicitly excluded.",
                        true,
                    ),
                ],
            ),
            phase(
                PhaseId::Organize,
                "Organize",
                "Structure your requirements and priorities",
                vec![
                    question(
                        "core_features",
                        "What are the core features (MVP)?",
                        "List essential functionality...",
                        "Help me identify and prioritize the essential features. Challenge me to justify each one.",
                        true,
                    ),
                    question(
                        "nice_to_have",
                        "What are nice-to-have features?",
                        "List additional features for later...",
                        "Help me separate must-haves from features that can wait.",
                        false,
                    ),
                    question(
                        "user_journey",
                        "Describe the main user journey",
                        "Walk through the primary user flow...",
                        "Help me map out the complete user journey and its friction points.",
                        true,
                    ),
                    question(
                        "technical_requirements",
                        "What are the technical requirements?",
                        "Platform, performance, integration needs...",
                        "Help me pin down platform, performance and integration requirements.",
                        false,
                    ),
                ],
            ),
            phase(
                PhaseId::Refine,
                "Refine",
                "Analyze risks and constraints",
                vec![
                    question(
                        "constraints",
                        "What are your main constraints?",
                        "Time, budget, technical limitations...",
                        "Help me realistically assess my constraints on time, budget, and team capacity.",
                        true,
                    ),
                    question(
                        "risks",
                        "What are the biggest risks?",
                        "Technical, market, resource risks...",
                        "Help me identify technical and market risks and how they could derail the project.",
                        true,
                    ),
                    question(
                        "assumptions",
                        "What assumptions are you making?",
                        "List key assumptions to validate...",
                        "Help me surface my riskiest assumptions and how to test them cheaply.",
                        false,
                    ),
                    question(
                        "dependencies",
                        "What external dependencies exist?",
                        "Third-party services, team members, resources...",
                        "Help me list external dependencies and what happens if one fails.",
                        false,
                    ),
                ],
            ),
            phase(
                PhaseId::Equip,
                "Equip",
                "Generate implementation roadmap",
                vec![
                    question(
                        "timeline",
                        "What is your target timeline?",
                        "Milestones and deadlines...",
                        "Help me turn my goals into a realistic timeline with milestones.",
                        true,
                    ),
                    question(
                        "resources",
                        "What resources do you need?",
                        "Team, tools, budget requirements...",
                        "Help me estimate the team, tools and budget this plan needs.",
                        true,
                    ),
                    question(
                        "next_steps",
                        "What are the immediate next steps?",
                        "First 3-5 actions to take...",
                        "Help me choose the first concrete actions to take this week.",
                        true,
                    ),
                ],
            ),
        ],
    )
});

fn phase(id: PhaseId, title: &str, description: &str, questions: Vec<Question>) -> Phase {
    Phase {
        id,
        title: title.to_string(),
        description: description.to_string(),
        questions,
    }
}

fn question(id: &str, text: &str, placeholder: &str, ai_prompt: &str, required: bool) -> Question {
    Question {
        id: QuestionId::new(id).expect("built-in question ids are valid"),
        text: text.to_string(),
        placeholder: Some(placeholder.to_string()),
        ai_prompt: Some(ai_prompt.to_string()),
        required,
        min_length: 0,
        max_length: DEFAULT_MAX_ANSWER_LENGTH,
    }
}
