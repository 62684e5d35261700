//! Persisted records and their input/patch companions.
//!
//! Field names follow the persisted layout (camelCase JSON), so every type
//! here round-trips through the document store unchanged. Input types
//! (`*Draft`, `New*`) omit the fields the services stamp themselves; patch
//! types carry only the fields being changed.

use crate::state::{EventId, EventStatus, PaymentId, RegistrationStatus, Role, UserId, active_flag};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

// ═══════════════════════════════════════════════════════════════════════
// Events
// ═══════════════════════════════════════════════════════════════════════

/// A catalog event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Store-generated identifier, duplicated inside the record.
    pub id: EventId,
    /// Display title.
    pub title: String,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Category label used for shop filtering.
    #[serde(default)]
    pub category: String,
    /// Ticket price in whole currency units.
    pub price: u32,
    /// Display duration, e.g. `"2 Days"`.
    #[serde(default)]
    pub duration: String,
    /// Prize description.
    #[serde(default)]
    pub prize: String,
    /// Banner image URL.
    #[serde(default)]
    pub image: String,
    /// Emoji icon.
    #[serde(default)]
    pub icon: String,
    /// Capacity cap; absent or zero means unlimited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tickets: Option<u32>,
    /// Whether the event is orderable.
    #[serde(rename = "active", default, with = "active_flag")]
    pub status: EventStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Effective capacity: `None` means unlimited (absent or zero cap).
    #[must_use]
    pub const fn capacity(&self) -> Option<u32> {
        match self.max_tickets {
            Some(0) | None => None,
            Some(max) => Some(max),
        }
    }

    /// `true` if the event accepts registrations.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// `true` if `count` registrations meet or exceed the capacity cap.
    ///
    /// Unlimited events are never full.
    #[must_use]
    pub fn is_full(&self, count: u32) -> bool {
        self.capacity().is_some_and(|max| count >= max)
    }
}

/// Input for creating an event; the catalog stamps id, status and
/// timestamps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    /// Display title.
    pub title: String,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Category label.
    #[serde(default)]
    pub category: String,
    /// Ticket price in whole currency units.
    pub price: u32,
    /// Display duration.
    #[serde(default)]
    pub duration: String,
    /// Prize description.
    #[serde(default)]
    pub prize: String,
    /// Banner image URL.
    #[serde(default)]
    pub image: String,
    /// Emoji icon.
    #[serde(default)]
    pub icon: String,
    /// Capacity cap; `None` or zero means unlimited.
    #[serde(default)]
    pub max_tickets: Option<u32>,
}

/// Partial event update; only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPatch {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New category.
    pub category: Option<String>,
    /// New price.
    pub price: Option<u32>,
    /// New duration.
    pub duration: Option<String>,
    /// New prize description.
    pub prize: Option<String>,
    /// New image URL.
    pub image: Option<String>,
    /// New icon.
    pub icon: Option<String>,
    /// New capacity cap.
    pub max_tickets: Option<u32>,
}

impl EventPatch {
    /// Converts the patch into store merge fields (camelCase keys).
    #[must_use]
    pub fn into_fields(self) -> Map<String, Value> {
        let mut fields = Map::new();
        let mut put = |key: &str, value: Option<Value>| {
            if let Some(value) = value {
                fields.insert(key.to_string(), value);
            }
        };
        put("title", self.title.map(Value::from));
        put("description", self.description.map(Value::from));
        put("category", self.category.map(Value::from));
        put("price", self.price.map(|p| json!(p)));
        put("duration", self.duration.map(Value::from));
        put("prize", self.prize.map(Value::from));
        put("image", self.image.map(Value::from));
        put("icon", self.icon.map(Value::from));
        put("maxTickets", self.max_tickets.map(|m| json!(m)));
        fields
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Registrations
// ═══════════════════════════════════════════════════════════════════════

/// A registration of one user for one event.
///
/// Keyed by the `(user, event)` pair in the store, which is what makes
/// registrations unique per pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// The event registered for.
    pub event_id: EventId,
    /// Event title at registration time.
    pub event_name: String,
    /// Event date (`YYYY-MM-DD`).
    #[serde(default)]
    pub event_date: String,
    /// Event time, if scheduled.
    #[serde(default)]
    pub event_time: String,
    /// Venue, if assigned.
    #[serde(default)]
    pub venue: String,
    /// Synthesized payment reference.
    pub payment_id: PaymentId,
    /// Amount paid, in whole currency units.
    pub amount: u32,
    /// Ticket quantity (always 1 under the one-ticket-per-event rule).
    pub quantity: u32,
    /// When the registration was admitted.
    pub registered_at: DateTime<Utc>,
    /// Lifecycle status.
    pub status: RegistrationStatus,
    /// Whether the user attended.
    #[serde(default)]
    pub attended: bool,
    /// When attendance was marked, if attended.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attended_at: Option<DateTime<Utc>>,
    /// Last mutation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Input for the admission protocol; the ledger stamps `registered_at`,
/// `status` and the attendance fields.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationDetails {
    /// The event registered for.
    pub event_id: EventId,
    /// Event title.
    pub event_name: String,
    /// Event date (`YYYY-MM-DD`).
    pub event_date: String,
    /// Event time.
    pub event_time: String,
    /// Venue.
    pub venue: String,
    /// Payment reference.
    pub payment_id: PaymentId,
    /// Amount paid.
    pub amount: u32,
    /// Ticket quantity.
    pub quantity: u32,
}

// ═══════════════════════════════════════════════════════════════════════
// Bans
// ═══════════════════════════════════════════════════════════════════════

/// A per-event ban record.
///
/// Stored only while the ban is in effect; unbanning deletes the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventBan {
    /// Always `true` in stored records.
    pub banned: bool,
    /// When the ban was imposed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banned_at: Option<DateTime<Utc>>,
    /// The event the ban applies to.
    pub event_id: EventId,
}

impl EventBan {
    /// The ban state this record represents.
    #[must_use]
    pub const fn state(&self) -> crate::state::BanState {
        if self.banned {
            crate::state::BanState::Banned {
                at: self.banned_at,
            }
        } else {
            crate::state::BanState::NotBanned
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Profiles
// ═══════════════════════════════════════════════════════════════════════

/// Placeholder the profile editor writes for unset fields.
const NOT_SPECIFIED: &str = "Not specified";

/// A user profile, including the global ban overlay.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Contact email.
    #[serde(default)]
    pub email: String,
    /// College or organization.
    #[serde(default)]
    pub college: String,
    /// Phone number.
    #[serde(default)]
    pub phone: String,
    /// Account role.
    #[serde(default)]
    pub role: Role,
    /// Global ban flag; blocks all account functionality when set.
    #[serde(default)]
    pub banned: bool,
    /// When the global ban was imposed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banned_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last mutation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Profile {
    /// The global ban state recorded on this profile.
    #[must_use]
    pub const fn ban_state(&self) -> crate::state::BanState {
        if self.banned {
            crate::state::BanState::Banned {
                at: self.banned_at,
            }
        } else {
            crate::state::BanState::NotBanned
        }
    }

    /// `true` for administrators.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// `true` once name, college and phone carry real values.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        let filled = |field: &str| !field.trim().is_empty() && field != NOT_SPECIFIED;
        !self.name.trim().is_empty() && filled(&self.college) && filled(&self.phone)
    }
}

/// Input for creating a profile; the directory stamps timestamps and
/// defaults the role and ban fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewProfile {
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// College or organization.
    pub college: String,
    /// Phone number.
    pub phone: String,
}

/// Partial profile update; only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfilePatch {
    /// New display name.
    pub name: Option<String>,
    /// New contact email.
    pub email: Option<String>,
    /// New college.
    pub college: Option<String>,
    /// New phone number.
    pub phone: Option<String>,
}

impl ProfilePatch {
    /// Converts the patch into store merge fields.
    #[must_use]
    pub fn into_fields(self) -> Map<String, Value> {
        let mut fields = Map::new();
        let mut put = |key: &str, value: Option<String>| {
            if let Some(value) = value {
                fields.insert(key.to_string(), Value::from(value));
            }
        };
        put("name", self.name);
        put("email", self.email);
        put("college", self.college);
        put("phone", self.phone);
        fields
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Query Results
// ═══════════════════════════════════════════════════════════════════════

/// A registration joined with its holder's profile, for admin rosters.
#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    /// The registered user.
    pub user_id: UserId,
    /// The registration record.
    pub registration: Registration,
    /// The user's profile; defaulted if none is stored.
    pub profile: Profile,
}

/// A registration with its holder, for attendance rosters.
#[derive(Debug, Clone, PartialEq)]
pub struct Attendee {
    /// The registered user.
    pub user_id: UserId,
    /// The registration record.
    pub registration: Registration,
}

/// One row of the admin user overview.
#[derive(Debug, Clone, PartialEq)]
pub struct UserOverview {
    /// The user.
    pub user_id: UserId,
    /// Their profile.
    pub profile: Profile,
    /// Their registrations, joined with event titles.
    pub registered_events: Vec<RegisteredEventSummary>,
}

/// A registration summarized for the user overview.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredEventSummary {
    /// The event.
    pub event_id: EventId,
    /// Its current title.
    pub event_title: String,
    /// Its current category.
    pub event_category: String,
    /// When the user registered.
    pub registered_at: DateTime<Utc>,
    /// Registration status.
    pub status: RegistrationStatus,
    /// Whether the user attended.
    pub attended: bool,
}

/// Aggregate catalog statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStats {
    /// Number of events in the catalog.
    pub total_events: u32,
    /// Number of currently active events.
    pub active_events: u32,
    /// Registrations across all users and events.
    pub total_registrations: u32,
    /// Registrations with confirmed payment.
    pub confirmed_payments: u32,
}

/// Attendance statistics for one event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceStats {
    /// Registrations for the event.
    pub total_registered: u32,
    /// How many attended.
    pub attended: u32,
    /// How many did not.
    pub not_attended: u32,
    /// Attendance rate as a rounded percentage.
    pub attendance_rate: u32,
}

impl AttendanceStats {
    /// Computes stats from raw counts; the rate rounds half up.
    #[must_use]
    pub const fn from_counts(total_registered: u32, attended: u32) -> Self {
        let attendance_rate = if total_registered == 0 {
            0
        } else {
            (attended * 100 + total_registered / 2) / total_registered
        };
        Self {
            total_registered,
            attended,
            not_attended: total_registered - attended,
            attendance_rate,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::state::BanState;

    #[test]
    fn zero_capacity_means_unlimited() {
        let mut event = sample_event();
        event.max_tickets = Some(0);
        assert_eq!(event.capacity(), None);
        assert!(!event.is_full(u32::MAX));
    }

    #[test]
    fn is_full_at_and_over_cap() {
        let mut event = sample_event();
        event.max_tickets = Some(2);
        assert!(!event.is_full(1));
        assert!(event.is_full(2));
        assert!(event.is_full(3));
    }

    #[test]
    fn event_round_trips_with_active_flag() {
        let mut event = sample_event();
        event.status = EventStatus::Inactive;
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["active"], false);

        let back: Event = serde_json::from_value(value).unwrap();
        assert_eq!(back.status, EventStatus::Inactive);
    }

    #[test]
    fn event_without_active_flag_is_active() {
        let event: Event = serde_json::from_value(serde_json::json!({
            "id": "e1",
            "title": "Code Clash",
            "price": 249,
            "createdAt": "2026-01-01T00:00:00Z",
            "updatedAt": "2026-01-01T00:00:00Z",
        }))
        .unwrap();
        assert!(event.is_active());
        assert_eq!(event.capacity(), None);
    }

    #[test]
    fn patch_serializes_only_set_fields() {
        let patch = EventPatch {
            title: Some("New title".to_string()),
            max_tickets: Some(25),
            ..EventPatch::default()
        };
        let fields = patch.into_fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["title"], "New title");
        assert_eq!(fields["maxTickets"], 25);
    }

    #[test]
    fn profile_completeness_rejects_placeholders() {
        let mut profile = Profile {
            name: "Ada".to_string(),
            college: "Not specified".to_string(),
            phone: "1234567890".to_string(),
            ..Profile::default()
        };
        assert!(!profile.is_complete());

        profile.college = "Analytical Engine Institute".to_string();
        assert!(profile.is_complete());
    }

    #[test]
    fn profile_ban_state() {
        let profile = Profile {
            banned: true,
            ..Profile::default()
        };
        assert_eq!(profile.ban_state(), BanState::Banned { at: None });
    }

    #[test]
    fn attendance_stats_round_half_up() {
        let stats = AttendanceStats::from_counts(10, 6);
        assert_eq!(stats.not_attended, 4);
        assert_eq!(stats.attendance_rate, 60);

        assert_eq!(AttendanceStats::from_counts(8, 1).attendance_rate, 13);
        assert_eq!(AttendanceStats::from_counts(3, 1).attendance_rate, 33);
        assert_eq!(AttendanceStats::from_counts(0, 0).attendance_rate, 0);
    }

    fn sample_event() -> Event {
        Event {
            id: EventId::new("e1"),
            title: "Code Clash".to_string(),
            description: String::new(),
            category: "Technology".to_string(),
            price: 249,
            duration: "1 Day".to_string(),
            prize: String::new(),
            image: String::new(),
            icon: "💻".to_string(),
            max_tickets: None,
            status: EventStatus::Active,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }
}
