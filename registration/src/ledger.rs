//! Registration ledger.
//!
//! Owns the `(user, event)` → registration mapping and the admission
//! protocol: capacity check, registration write, automatic deactivation of
//! events that reach their cap.
//!
//! ## Admission and the capacity race
//!
//! The store offers no compare-and-swap, so "admit if under capacity" is a
//! read-count-then-write sequence. Within one process the ledger serializes
//! admissions per event through an async mutex, which makes the sequential
//! capacity invariant hard: registrations issued one at a time never exceed
//! the cap, and the admission that fills the last seat deactivates the
//! event. Across independent sessions sharing the store no such guard
//! exists — two sessions can both pass the pre-check for the last seat and
//! oversubscribe by one. That gap is a property of the store interface,
//! not of this implementation; see DESIGN.md.

use crate::clock::Clock;
use crate::environment::RegistrationEnvironment;
use crate::error::{RegistrationError, Result};
use crate::paths;
use crate::records::{Event, EventStats, Participant, Profile, Registration, RegistrationDetails};
use crate::state::{EventId, RegistrationStatus, UserId};
use gatepass_store::DocumentStore;
use serde_json::{Map, json};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

/// Per-event admission locks.
///
/// Handed out lazily; clones of the ledger share the same map so every
/// in-process admission for an event goes through one queue.
#[derive(Debug, Default)]
struct AdmissionLocks {
    locks: Mutex<HashMap<EventId, Arc<tokio::sync::Mutex<()>>>>,
}

impl AdmissionLocks {
    fn for_event(&self, event_id: &EventId) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = match self.locks.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        Arc::clone(
            locks
                .entry(event_id.clone())
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(()))),
        )
    }
}

/// Ledger service over the `registrations/*` subtree.
#[derive(Debug, Clone)]
pub struct RegistrationLedger<S, C>
where
    S: DocumentStore + Clone,
    C: Clock + Clone,
{
    env: RegistrationEnvironment<S, C>,
    admission: Arc<AdmissionLocks>,
}

impl<S, C> RegistrationLedger<S, C>
where
    S: DocumentStore + Clone,
    C: Clock + Clone,
{
    /// Creates the service.
    #[must_use]
    pub fn new(env: RegistrationEnvironment<S, C>) -> Self {
        Self {
            env,
            admission: Arc::new(AdmissionLocks::default()),
        }
    }

    /// The environment this ledger operates on.
    #[must_use]
    pub const fn environment(&self) -> &RegistrationEnvironment<S, C> {
        &self.env
    }

    /// Admits a registration for `(user, event)`.
    ///
    /// Re-reads the event, counts current registrations, and rejects if the
    /// event is at capacity or inactive. On admission the registration is
    /// written **unconditionally at the pair key** — re-registering
    /// overwrites the prior record rather than conflicting, so a user holds
    /// at most one registration per event by construction. Afterwards the
    /// count is re-checked and a newly full event is deactivated; a failure
    /// of that follow-up is logged, never surfaced, because the admission
    /// itself already happened.
    ///
    /// # Errors
    ///
    /// - [`RegistrationError::EventNotFound`] if the event does not exist.
    /// - [`RegistrationError::CapacityExceeded`] if the cap is reached.
    /// - [`RegistrationError::EventInactive`] if the event is deactivated.
    /// - [`RegistrationError::StoreUnavailable`] on store failure.
    pub async fn register_for_event(
        &self,
        user_id: &UserId,
        event_id: &EventId,
        details: RegistrationDetails,
    ) -> Result<()> {
        let queue = self.admission.for_event(event_id);
        let _admission = queue.lock().await;

        let event: Event = self
            .env
            .store
            .get_typed(&paths::event(event_id))
            .await?
            .ok_or_else(|| RegistrationError::EventNotFound {
                event_id: event_id.clone(),
            })?;

        if let Some(max) = event.capacity() {
            let count = self.count_registrations(event_id).await?;
            if count >= max {
                return Err(RegistrationError::CapacityExceeded {
                    event_id: event_id.clone(),
                });
            }
        }
        if !event.is_active() {
            return Err(RegistrationError::EventInactive {
                event_id: event_id.clone(),
            });
        }

        let registration = Registration {
            event_id: details.event_id,
            event_name: details.event_name,
            event_date: details.event_date,
            event_time: details.event_time,
            venue: details.venue,
            payment_id: details.payment_id,
            amount: details.amount,
            quantity: details.quantity,
            registered_at: self.env.clock.now(),
            status: RegistrationStatus::Registered,
            attended: false,
            attended_at: None,
            updated_at: None,
        };
        self.env
            .store
            .set_typed(&paths::registration(user_id, event_id), &registration)
            .await?;
        tracing::debug!(user = %user_id, event = %event_id, "registration admitted");

        if let Err(error) = self.deactivate_if_full(event_id).await {
            tracing::warn!(
                event = %event_id,
                %error,
                "post-admission capacity check failed; event left active"
            );
        }
        Ok(())
    }

    /// All registrations held by one user, keyed by event.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::StoreUnavailable`] on store failure.
    pub async fn user_registrations(
        &self,
        user_id: &UserId,
    ) -> Result<HashMap<EventId, Registration>> {
        Ok(self
            .env
            .store
            .get_typed(&paths::user_registrations(user_id))
            .await?
            .unwrap_or_default())
    }

    /// Roster of one event: every registration joined with the holder's
    /// profile (defaulted when none is stored).
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::StoreUnavailable`] on store failure.
    pub async fn event_participants(&self, event_id: &EventId) -> Result<Vec<Participant>> {
        let mut participants = Vec::new();
        for (user_id, mut registrations) in self.all_registrations().await? {
            if let Some(registration) = registrations.remove(event_id) {
                let profile: Profile = self
                    .env
                    .store
                    .get_typed(&paths::user(&user_id))
                    .await?
                    .unwrap_or_default();
                participants.push(Participant {
                    user_id,
                    registration,
                    profile,
                });
            }
        }
        Ok(participants)
    }

    /// Number of registrations held against one event.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::StoreUnavailable`] on store failure.
    pub async fn count_registrations(&self, event_id: &EventId) -> Result<u32> {
        let count = self
            .all_registrations()
            .await?
            .values()
            .filter(|registrations| registrations.contains_key(event_id))
            .count();
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    /// Registration counts for several events in one scan, for shop
    /// occupancy displays.
    ///
    /// Events with no registrations map to zero.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::StoreUnavailable`] on store failure.
    pub async fn participant_counts(
        &self,
        event_ids: &[EventId],
    ) -> Result<HashMap<EventId, u32>> {
        let all = self.all_registrations().await?;
        let mut counts: HashMap<EventId, u32> =
            event_ids.iter().map(|id| (id.clone(), 0)).collect();
        for registrations in all.values() {
            for event_id in registrations.keys() {
                if let Some(count) = counts.get_mut(event_id) {
                    *count += 1;
                }
            }
        }
        Ok(counts)
    }

    /// Aggregate statistics across the catalog and every user's
    /// registrations.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::StoreUnavailable`] on store failure.
    pub async fn event_stats(&self) -> Result<EventStats> {
        let events: BTreeMap<String, Event> = self
            .env
            .store
            .get_typed(&paths::events())
            .await?
            .unwrap_or_default();
        let all = self.all_registrations().await?;

        let mut stats = EventStats {
            total_events: u32::try_from(events.len()).unwrap_or(u32::MAX),
            active_events: u32::try_from(events.values().filter(|e| e.is_active()).count())
                .unwrap_or(u32::MAX),
            total_registrations: 0,
            confirmed_payments: 0,
        };
        for registrations in all.values() {
            for registration in registrations.values() {
                stats.total_registrations += 1;
                if registration.status == RegistrationStatus::Confirmed {
                    stats.confirmed_payments += 1;
                }
            }
        }
        Ok(stats)
    }

    /// Full scan of the `registrations/*` subtree.
    async fn all_registrations(&self) -> Result<HashMap<UserId, HashMap<EventId, Registration>>> {
        Ok(self
            .env
            .store
            .get_typed(&paths::registrations())
            .await?
            .unwrap_or_default())
    }

    /// Deactivates the event if the post-admission count reached the cap.
    async fn deactivate_if_full(&self, event_id: &EventId) -> Result<()> {
        let stored: Option<Event> = self.env.store.get_typed(&paths::event(event_id)).await?;
        let Some(event) = stored else {
            return Ok(());
        };
        let Some(max) = event.capacity() else {
            return Ok(());
        };

        let count = self.count_registrations(event_id).await?;
        if count >= max {
            let mut fields = Map::new();
            fields.insert("active".to_string(), json!(false));
            fields.insert(
                "updatedAt".to_string(),
                serde_json::to_value(self.env.clock.now())?,
            );
            self.env.store.update(&paths::event(event_id), fields).await?;
            tracing::info!(
                event = %event_id,
                count,
                max,
                "event automatically deactivated at capacity"
            );
        }
        Ok(())
    }
}
