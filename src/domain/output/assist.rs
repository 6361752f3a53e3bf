//! Per-question assistant prompts.
//!
//! Each phase gives the assistant a different role: consultant while
//! clarifying, product manager while organizing, risk analyst while
//! refining and architect while equipping.

use serde::Serialize;

use crate::domain::foundation::PhaseId;
use crate::domain::methodology::Question;

/// System and user messages for an assistant call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssistPrompt {
    pub system: String,
    pub user: String,
}

struct PhaseRole {
    system: &'static str,
    guidance: &'static str,
}

fn role_for(phase: PhaseId) -> PhaseRole {
    match phase {
        PhaseId::Clarify => PhaseRole {
            system: "You are an expert project planning consultant helping users clarify their project vision. Ask probing questions to help them think deeper about their project's purpose, users, and scope. Be encouraging but challenge vague statements.",
            guidance: "Help me think deeper about this question. Ask follow-up questions to help me be more specific and comprehensive in my answer.",
        },
        PhaseId::Organize => PhaseRole {
            system: "You are an expert product manager helping users organize their project requirements. Focus on prioritization, feature definition, and user needs. Help them distinguish between must-haves and nice-to-haves.",
            guidance: "Help me organize and prioritize my thoughts on this question. Challenge me to be more specific about priorities and trade-offs.",
        },
        PhaseId::Refine => PhaseRole {
            system: "You are an expert risk analyst and project consultant helping users identify and plan for potential challenges. Focus on realistic assessment of risks, constraints, and validation strategies.",
            guidance: "Help me think critically about potential risks and challenges. Ask probing questions about what could go wrong and how to validate assumptions.",
        },
        PhaseId::Equip => PhaseRole {
            system: "You are an expert technical architect helping users create implementation plans. Focus on practical next steps, technical decisions, and actionable recommendations.",
            guidance: "Help me create a practical implementation plan based on my project analysis. Focus on specific, actionable next steps.",
        },
    }
}

/// Builds the assistant prompt for one question.
///
/// A blank `current_answer` renders as `Not answered yet`. The question's
/// own assist text, when defined, follows the phase guidance.
pub fn assist_prompt(phase: PhaseId, question: &Question, current_answer: Option<&str>) -> AssistPrompt {
    let role = role_for(phase);
    let answer = current_answer
        .filter(|a| !a.trim().is_empty())
        .unwrap_or("Not answered yet");

    let mut user = format!(
        "Question: {}\n\nCurrent answer: {}\n\n{}",
        question.text, answer, role.guidance
    );
    if let Some(extra) = question.ai_prompt.as_deref().filter(|p| !p.trim().is_empty()) {
        user.push_str("\n\n");
        user.push_str(extra);
    }
    user.push_str(
        "\n\nPlease provide specific follow-up questions or suggestions to help me improve my answer. \
Keep your response concise and actionable.",
    );

    AssistPrompt {
        system: role.system.to_string(),
        user,
    }
}
