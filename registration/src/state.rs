//! Identifiers and tagged state types.
//!
//! The persisted layout stores booleans (`active`, `banned`); this module
//! models them as tagged enums so illegal states are unrepresentable in
//! domain code, converting at the serialization boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════
// ID Types
// ═══════════════════════════════════════════════════════════════════════

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps an externally produced identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// The identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }
    };
}

string_id! {
    /// Identifier of a user, as issued by the external identity provider.
    UserId
}

string_id! {
    /// Identifier of an event — a store-generated push id.
    EventId
}

string_id! {
    /// Synthesized payment reference (`TXN...`).
    PaymentId
}

// ═══════════════════════════════════════════════════════════════════════
// Tagged States
// ═══════════════════════════════════════════════════════════════════════

/// Whether an event accepts registrations.
///
/// Persisted as the `active` boolean; an absent flag means [`Active`].
///
/// [`Active`]: EventStatus::Active
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EventStatus {
    /// Orderable.
    #[default]
    Active,
    /// Not orderable — deactivated manually or by reaching capacity.
    Inactive,
}

impl EventStatus {
    /// `true` for [`EventStatus::Active`].
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    /// Converts the persisted flag.
    #[must_use]
    pub const fn from_flag(active: bool) -> Self {
        if active { Self::Active } else { Self::Inactive }
    }
}

/// Serde adapter mapping [`EventStatus`] onto the persisted `active` bool.
pub(crate) mod active_flag {
    use super::EventStatus;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(status: &EventStatus, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_bool(status.is_active())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<EventStatus, D::Error> {
        bool::deserialize(de).map(EventStatus::from_flag)
    }
}

/// Ban state of a user, at either global or event scope.
///
/// Absence of the underlying record means [`NotBanned`]; only bans are
/// represented in the store.
///
/// [`NotBanned`]: BanState::NotBanned
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BanState {
    /// No ban in effect.
    NotBanned,
    /// Banned, with the moment it was imposed when recorded.
    Banned {
        /// When the ban was imposed.
        at: Option<DateTime<Utc>>,
    },
}

impl BanState {
    /// `true` if a ban is in effect.
    #[must_use]
    pub const fn is_banned(self) -> bool {
        matches!(self, Self::Banned { .. })
    }

    /// When the ban was imposed, if banned and recorded.
    #[must_use]
    pub const fn banned_at(self) -> Option<DateTime<Utc>> {
        match self {
            Self::Banned { at } => at,
            Self::NotBanned => None,
        }
    }
}

/// Lifecycle status of a registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    /// Written by the admission protocol.
    Registered,
    /// Payment confirmed out of band; counted by the event statistics.
    Confirmed,
}

/// Account role.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular attendee.
    #[default]
    User,
    /// Administrator: may manage events, bans and attendance.
    Admin,
}
