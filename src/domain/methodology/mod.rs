//! Methodology module.
//!
//! The immutable four-phase questionnaire the user works through. A
//! deployment either uses the built-in 15-question set or loads its own
//! definition (JSON or YAML); either way the definition is validated once
//! and then only read.

mod builtin;
mod definition;
mod phase;
mod progress;

pub use definition::{Methodology, MethodologyDefinition, MethodologyError};
pub use phase::{Phase, Question, DEFAULT_MAX_ANSWER_LENGTH};
pub use progress::{PhaseProgress, Progress};
