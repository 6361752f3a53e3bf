//! Output generator.
//!
//! Pure, deterministic renderings of a session snapshot. Nothing here
//! touches persistence: callers pass the session they hold and the
//! methodology it was answered against.

mod ai_prompt;
mod assist;
mod export;
mod json;
mod markdown;

pub use ai_prompt::{render_ai_prompt, DELIVERABLES};
pub use assist::{assist_prompt, AssistPrompt};
pub use export::{export_sessions, ExportInfo, SessionExport};
pub use json::{parse_session_json, render_json, OutputError};
pub use markdown::{render_markdown, NOT_ANSWERED};

use crate::domain::methodology::Methodology;
use crate::domain::session::Session;

/// The three derived renderings of one session. Never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputBundle {
    pub markdown: String,
    pub json: String,
    pub ai_prompt: String,
}

/// Renders every output format for `session`.
pub fn generate_outputs(session: &Session, methodology: &Methodology) -> Result<OutputBundle, OutputError> {
    Ok(OutputBundle {
        markdown: render_markdown(session, methodology),
        json: render_json(session)?,
        ai_prompt: render_ai_prompt(session, methodology),
    })
}
