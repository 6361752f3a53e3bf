//! Last-write-wins reconciliation of pushed session lists.
//!
//! A change-feed delivery is advisory: a caller may hold a local edit that
//! has not reached the remote yet. These helpers keep whichever copy of a
//! session has the later `updated_at`.

use super::Session;

/// Picks the newer of two copies of the same session.
///
/// Ties keep `incoming`, since the remote copy is authoritative.
pub fn reconcile<'a>(current: &'a Session, incoming: &'a Session) -> &'a Session {
    if current.updated_at().is_after(incoming.updated_at()) {
        current
    } else {
        incoming
    }
}

/// Merges a pushed list with the caller's current list.
///
/// The result follows the order of `incoming`. Sessions present only in
/// `current` are dropped: the pushed list is the full remote state.
pub fn reconcile_all(current: &[Session], incoming: Vec<Session>) -> Vec<Session> {
    incoming
        .into_iter()
        .map(|pushed| match current.iter().find(|s| s.id() == pushed.id()) {
            Some(local) if local.updated_at().is_after(pushed.updated_at()) => local.clone(),
            _ => pushed,
        })
        .collect()
}
