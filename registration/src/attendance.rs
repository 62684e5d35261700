//! Attendance tracker.
//!
//! Owns the attended/not-attended state on registrations, singly and in
//! bulk. Bulk marking runs item by item and reports an aggregate outcome;
//! the ban-aware variant excludes users with an active event ban before
//! touching anything, matching the admin surface's policy.

use crate::bans::BanRegistry;
use crate::batch::BatchOutcome;
use crate::clock::Clock;
use crate::environment::RegistrationEnvironment;
use crate::error::{RegistrationError, Result};
use crate::paths;
use crate::records::{AttendanceStats, Attendee, Registration};
use crate::state::{EventId, UserId};
use gatepass_store::DocumentStore;
use serde_json::{Map, Value, json};
use std::collections::HashMap;

/// One item of a bulk attendance change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceMark {
    /// The user to mark.
    pub user_id: UserId,
    /// The event attended (or not).
    pub event_id: EventId,
    /// The new attendance state.
    pub attended: bool,
}

/// Attendance service over the registration records.
#[derive(Debug, Clone)]
pub struct AttendanceTracker<S, C>
where
    S: DocumentStore + Clone,
    C: Clock + Clone,
{
    env: RegistrationEnvironment<S, C>,
}

impl<S, C> AttendanceTracker<S, C>
where
    S: DocumentStore + Clone,
    C: Clock + Clone,
{
    /// Creates the service.
    #[must_use]
    pub const fn new(env: RegistrationEnvironment<S, C>) -> Self {
        Self { env }
    }

    /// Marks one user's attendance for one event.
    ///
    /// Sets `attendedAt` to now when marking attended, clears it when
    /// marking not attended.
    ///
    /// # Errors
    ///
    /// - [`RegistrationError::NotRegistered`] if no registration exists for
    ///   the pair — attendance never materializes registrations.
    /// - [`RegistrationError::StoreUnavailable`] on store failure.
    pub async fn mark(&self, user_id: &UserId, event_id: &EventId, attended: bool) -> Result<()> {
        let path = paths::registration(user_id, event_id);
        if self.env.store.get(&path).await?.is_none() {
            return Err(RegistrationError::NotRegistered {
                user_id: user_id.clone(),
                event_id: event_id.clone(),
            });
        }

        let now = self.env.clock.now();
        let mut fields = Map::new();
        fields.insert("attended".to_string(), json!(attended));
        fields.insert(
            "attendedAt".to_string(),
            if attended {
                serde_json::to_value(now)?
            } else {
                Value::Null
            },
        );
        fields.insert("updatedAt".to_string(), serde_json::to_value(now)?);
        self.env.store.update(&path, fields).await?;
        Ok(())
    }

    /// Applies a list of attendance marks, one at a time.
    ///
    /// Per-item failures are collected, not fatal; the batch always runs to
    /// the end.
    pub async fn mark_many(&self, marks: &[AttendanceMark]) -> BatchOutcome<AttendanceMark> {
        let mut outcome = BatchOutcome::new();
        for mark in marks {
            let result = self.mark(&mark.user_id, &mark.event_id, mark.attended).await;
            if let Err(error) = &result {
                tracing::warn!(
                    user = %mark.user_id,
                    event = %mark.event_id,
                    %error,
                    "bulk attendance item failed"
                );
            }
            outcome.record(mark.clone(), result);
        }
        outcome
    }

    /// Marks attendance for a selection of users, excluding anyone with an
    /// active event ban.
    ///
    /// When the whole selection is banned nothing is written and the
    /// returned outcome is empty.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::StoreUnavailable`] if the eligibility
    /// filter cannot be computed.
    pub async fn mark_selected(
        &self,
        bans: &BanRegistry<S, C>,
        event_id: &EventId,
        user_ids: &[UserId],
        attended: bool,
    ) -> Result<BatchOutcome<AttendanceMark>> {
        let eligible = bans.eligible_for_event(user_ids, event_id).await?;
        if eligible.len() < user_ids.len() {
            tracing::info!(
                event = %event_id,
                excluded = user_ids.len() - eligible.len(),
                "banned users excluded from bulk attendance"
            );
        }
        if eligible.is_empty() {
            return Ok(BatchOutcome::new());
        }

        let marks: Vec<AttendanceMark> = eligible
            .into_iter()
            .map(|user_id| AttendanceMark {
                user_id,
                event_id: event_id.clone(),
                attended,
            })
            .collect();
        Ok(self.mark_many(&marks).await)
    }

    /// Every registration for one event, with its holder.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::StoreUnavailable`] on store failure.
    pub async fn event_attendees(&self, event_id: &EventId) -> Result<Vec<Attendee>> {
        let all: HashMap<UserId, HashMap<EventId, Registration>> = self
            .env
            .store
            .get_typed(&paths::registrations())
            .await?
            .unwrap_or_default();

        let mut attendees = Vec::new();
        for (user_id, mut registrations) in all {
            if let Some(registration) = registrations.remove(event_id) {
                attendees.push(Attendee {
                    user_id,
                    registration,
                });
            }
        }
        Ok(attendees)
    }

    /// Attendance statistics for one event.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::StoreUnavailable`] on store failure.
    pub async fn stats(&self, event_id: &EventId) -> Result<AttendanceStats> {
        let attendees = self.event_attendees(event_id).await?;
        let total = u32::try_from(attendees.len()).unwrap_or(u32::MAX);
        let attended = u32::try_from(
            attendees
                .iter()
                .filter(|a| a.registration.attended)
                .count(),
        )
        .unwrap_or(u32::MAX);
        Ok(AttendanceStats::from_counts(total, attended))
    }
}
