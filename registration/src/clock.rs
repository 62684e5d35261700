//! Clock abstraction.
//!
//! Every timestamp the services stamp (`registeredAt`, `bannedAt`,
//! `attendedAt`, `updatedAt`) comes through a [`Clock`], so tests run on
//! deterministic time.

use chrono::{DateTime, Utc};

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// The current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
