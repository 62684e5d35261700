//! Event catalog.
//!
//! Admin-facing event management: create, read, update, toggle. Events are
//! never deleted — deactivation is the terminal state for an event that
//! should no longer sell.

use crate::clock::Clock;
use crate::environment::RegistrationEnvironment;
use crate::error::{RegistrationError, Result};
use crate::paths;
use crate::records::{Event, EventDraft, EventPatch};
use crate::state::{EventId, EventStatus};
use gatepass_store::DocumentStore;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

/// Catalog service over the `events/*` subtree.
#[derive(Debug, Clone)]
pub struct EventCatalog<S, C>
where
    S: DocumentStore + Clone,
    C: Clock + Clone,
{
    env: RegistrationEnvironment<S, C>,
}

impl<S, C> EventCatalog<S, C>
where
    S: DocumentStore + Clone,
    C: Clock + Clone,
{
    /// Creates the service.
    #[must_use]
    pub const fn new(env: RegistrationEnvironment<S, C>) -> Self {
        Self { env }
    }

    /// Creates an event from a draft and returns its new id.
    ///
    /// The event starts [`EventStatus::Active`] with both timestamps set
    /// to now.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::StoreUnavailable`] on store failure.
    pub async fn create(&self, draft: EventDraft) -> Result<EventId> {
        let key = self.env.store.generate_id(&paths::events()).await?;
        let id = EventId::new(key);
        let now = self.env.clock.now();
        let event = Event {
            id: id.clone(),
            title: draft.title,
            description: draft.description,
            category: draft.category,
            price: draft.price,
            duration: draft.duration,
            prize: draft.prize,
            image: draft.image,
            icon: draft.icon,
            max_tickets: draft.max_tickets,
            status: EventStatus::Active,
            created_at: now,
            updated_at: now,
        };
        self.env.store.set_typed(&paths::event(&id), &event).await?;
        tracing::debug!(event = %id, title = %event.title, "event created");
        Ok(id)
    }

    /// Reads one event.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::StoreUnavailable`] on store failure.
    pub async fn event(&self, id: &EventId) -> Result<Option<Event>> {
        Ok(self.env.store.get_typed(&paths::event(id)).await?)
    }

    /// Lists the whole catalog in creation order, inactive events included.
    ///
    /// Push ids sort chronologically, so key order is creation order.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::StoreUnavailable`] on store failure.
    pub async fn all_events(&self) -> Result<Vec<Event>> {
        let events: BTreeMap<String, Event> = self
            .env
            .store
            .get_typed(&paths::events())
            .await?
            .unwrap_or_default();
        Ok(events.into_values().collect())
    }

    /// Merges a partial update into an event and stamps `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::EventNotFound`] if the event does not
    /// exist, or [`RegistrationError::StoreUnavailable`] on store failure.
    pub async fn update(&self, id: &EventId, patch: EventPatch) -> Result<()> {
        self.require_exists(id).await?;
        let mut fields = patch.into_fields();
        fields.insert(
            "updatedAt".to_string(),
            serde_json::to_value(self.env.clock.now())?,
        );
        self.env.store.update(&paths::event(id), fields).await?;
        Ok(())
    }

    /// Activates or deactivates an event.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::EventNotFound`] if the event does not
    /// exist, or [`RegistrationError::StoreUnavailable`] on store failure.
    pub async fn set_status(&self, id: &EventId, status: EventStatus) -> Result<()> {
        self.require_exists(id).await?;
        let mut fields = Map::new();
        fields.insert("active".to_string(), json!(status.is_active()));
        fields.insert(
            "updatedAt".to_string(),
            serde_json::to_value(self.env.clock.now())?,
        );
        self.env.store.update(&paths::event(id), fields).await?;
        tracing::info!(event = %id, active = status.is_active(), "event status toggled");
        Ok(())
    }

    async fn require_exists(&self, id: &EventId) -> Result<()> {
        let stored: Option<Value> = self.env.store.get(&paths::event(id)).await?;
        if stored.is_none() {
            return Err(RegistrationError::EventNotFound {
                event_id: id.clone(),
            });
        }
        Ok(())
    }
}
