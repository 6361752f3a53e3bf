//! Session domain module.
//!
//! Holds the answer store: one user's questionnaire run with its phase
//! pointer, answers and timestamps. Sessions are created explicitly,
//! mutated through pure snapshot-returning operations, and destroyed only by
//! an explicit delete through the hybrid store.

mod aggregate;
mod answer;
mod errors;
mod reconcile;

pub use aggregate::{Session, SessionOrigin, MAX_TITLE_LENGTH, SESSION_FORMAT_VERSION, SESSION_IMPLEMENTATION};
pub use answer::{Answer, AnswerInput};
pub use errors::SessionError;
pub use reconcile::{reconcile, reconcile_all};
