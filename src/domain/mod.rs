//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, enums, errors)
//! - `methodology` - The four-phase questionnaire definition
//! - `session` - Session aggregate, answers and reconciliation
//! - `output` - Markdown, JSON and AI prompt renderings

pub mod foundation;
pub mod methodology;
pub mod output;
pub mod session;
