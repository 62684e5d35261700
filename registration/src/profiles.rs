//! Profile directory.
//!
//! User profiles, role management and the admin overview. Profiles carry
//! the global-ban overlay but the overlay itself is written by
//! [`crate::BanRegistry`]; this service never touches the ban fields.

use crate::clock::Clock;
use crate::environment::RegistrationEnvironment;
use crate::error::Result;
use crate::paths;
use crate::records::{Event, NewProfile, Profile, ProfilePatch, Registration, RegisteredEventSummary, UserOverview};
use crate::state::{EventId, Role, UserId};
use gatepass_store::DocumentStore;
use serde_json::Map;
use std::collections::HashMap;

/// Profile service over the `users/*` subtree.
#[derive(Debug, Clone)]
pub struct ProfileDirectory<S, C>
where
    S: DocumentStore + Clone,
    C: Clock + Clone,
{
    env: RegistrationEnvironment<S, C>,
}

impl<S, C> ProfileDirectory<S, C>
where
    S: DocumentStore + Clone,
    C: Clock + Clone,
{
    /// Creates the service.
    #[must_use]
    pub const fn new(env: RegistrationEnvironment<S, C>) -> Self {
        Self { env }
    }

    /// Writes a fresh profile for a user, stamping both timestamps.
    ///
    /// Overwrites any existing profile, ban overlay included — this is the
    /// sign-up path, not an edit.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegistrationError::StoreUnavailable`] on store
    /// failure.
    pub async fn save(&self, user_id: &UserId, new: NewProfile) -> Result<()> {
        let now = self.env.clock.now();
        let profile = Profile {
            name: new.name,
            email: new.email,
            college: new.college,
            phone: new.phone,
            role: Role::User,
            banned: false,
            banned_at: None,
            created_at: Some(now),
            updated_at: Some(now),
        };
        self.env.store.set_typed(&paths::user(user_id), &profile).await?;
        Ok(())
    }

    /// Reads one profile.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegistrationError::StoreUnavailable`] on store
    /// failure.
    pub async fn profile(&self, user_id: &UserId) -> Result<Option<Profile>> {
        Ok(self.env.store.get_typed(&paths::user(user_id)).await?)
    }

    /// Merges a partial profile update and stamps `updatedAt`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegistrationError::StoreUnavailable`] on store
    /// failure.
    pub async fn update(&self, user_id: &UserId, patch: ProfilePatch) -> Result<()> {
        let mut fields = patch.into_fields();
        fields.insert(
            "updatedAt".to_string(),
            serde_json::to_value(self.env.clock.now())?,
        );
        self.env.store.update(&paths::user(user_id), fields).await?;
        Ok(())
    }

    /// Grants or revokes the admin role.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegistrationError::StoreUnavailable`] on store
    /// failure.
    pub async fn set_role(&self, user_id: &UserId, role: Role) -> Result<()> {
        let mut fields = Map::new();
        fields.insert("role".to_string(), serde_json::to_value(role)?);
        fields.insert(
            "updatedAt".to_string(),
            serde_json::to_value(self.env.clock.now())?,
        );
        self.env.store.update(&paths::user(user_id), fields).await?;
        tracing::info!(user = %user_id, ?role, "role updated");
        Ok(())
    }

    /// Every user with their profile and registrations joined against
    /// current event titles, for the admin panel.
    ///
    /// Registrations for events no longer in the catalog are omitted from
    /// the summary, matching the join the admin panel performs.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegistrationError::StoreUnavailable`] on store
    /// failure.
    pub async fn overview(&self) -> Result<Vec<UserOverview>> {
        let profiles: HashMap<UserId, Profile> = self
            .env
            .store
            .get_typed(&paths::users())
            .await?
            .unwrap_or_default();
        let registrations: HashMap<UserId, HashMap<EventId, Registration>> = self
            .env
            .store
            .get_typed(&paths::registrations())
            .await?
            .unwrap_or_default();
        let events: HashMap<EventId, Event> = self
            .env
            .store
            .get_typed(&paths::events())
            .await?
            .unwrap_or_default();

        let mut rows: Vec<UserOverview> = profiles
            .into_iter()
            .map(|(user_id, profile)| {
                let mut registered_events: Vec<RegisteredEventSummary> = registrations
                    .get(&user_id)
                    .into_iter()
                    .flatten()
                    .filter_map(|(event_id, registration)| {
                        events.get(event_id).map(|event| RegisteredEventSummary {
                            event_id: event_id.clone(),
                            event_title: event.title.clone(),
                            event_category: event.category.clone(),
                            registered_at: registration.registered_at,
                            status: registration.status,
                            attended: registration.attended,
                        })
                    })
                    .collect();
                registered_events.sort_by_key(|summary| summary.registered_at);
                UserOverview {
                    user_id,
                    profile,
                    registered_events,
                }
            })
            .collect();
        rows.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        Ok(rows)
    }
}
