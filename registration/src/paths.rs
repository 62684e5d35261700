//! Persisted key-space layout.
//!
//! ```text
//! events/{eventId}                 -> Event
//! registrations/{userId}/{eventId} -> Registration
//! eventBans/{userId}/{eventId}     -> EventBan
//! users/{userId}                   -> Profile (+ banned, bannedAt)
//! ```
//!
//! Each service owns one subtree, so there are no cross-entity write
//! conflicts between them.

use crate::state::{EventId, UserId};
use gatepass_store::DocPath;

/// Root of the event catalog.
#[must_use]
pub fn events() -> DocPath {
    DocPath::new(["events"])
}

/// One event record.
#[must_use]
pub fn event(id: &EventId) -> DocPath {
    events().child(id.as_str())
}

/// Root of all registrations, keyed user-first.
#[must_use]
pub fn registrations() -> DocPath {
    DocPath::new(["registrations"])
}

/// All registrations held by one user.
#[must_use]
pub fn user_registrations(user: &UserId) -> DocPath {
    registrations().child(user.as_str())
}

/// One registration, keyed by the `(user, event)` pair.
#[must_use]
pub fn registration(user: &UserId, event: &EventId) -> DocPath {
    user_registrations(user).child(event.as_str())
}

/// Root of all user profiles.
#[must_use]
pub fn users() -> DocPath {
    DocPath::new(["users"])
}

/// One user profile.
#[must_use]
pub fn user(id: &UserId) -> DocPath {
    users().child(id.as_str())
}

/// All event bans recorded against one user.
#[must_use]
pub fn event_bans(user: &UserId) -> DocPath {
    DocPath::new(["eventBans"]).child(user.as_str())
}

/// One event ban, keyed by the `(user, event)` pair.
#[must_use]
pub fn event_ban(user: &UserId, event: &EventId) -> DocPath {
    event_bans(user).child(event.as_str())
}
