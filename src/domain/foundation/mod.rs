//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the CORE domain.

mod auth;
mod confidence;
mod errors;
mod ids;
mod phase_id;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser, IdentityState};
pub use confidence::Confidence;
pub use errors::{ErrorCode, ValidationError};
pub use ids::{QuestionId, QuestionIdScheme, SessionId, UserId};
pub use phase_id::{PhaseId, UnknownPhase};
pub use timestamp::Timestamp;
