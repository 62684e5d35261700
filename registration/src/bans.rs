//! Ban registry.
//!
//! Two independent scopes: global bans live as an overlay on the user
//! profile (`users/{u}`: `banned`, `bannedAt`), event bans as standalone
//! records at `eventBans/{u}/{e}`. The representations differ on purpose —
//! a global unban clears the flag in place, an event unban deletes the
//! record entirely, so absence always means "not banned".

use crate::batch::BatchOutcome;
use crate::clock::Clock;
use crate::environment::RegistrationEnvironment;
use crate::error::Result;
use crate::paths;
use crate::records::{EventBan, Profile};
use crate::state::{BanState, EventId, UserId};
use gatepass_store::DocumentStore;
use serde_json::{Map, Value, json};
use std::collections::HashMap;

/// Which bulk ban actions a selection of users admits.
///
/// The admin surface only offers bulk ban/unban when the selection is
/// homogeneous: all-unbanned selections may be banned, all-banned
/// selections may be unbanned, mixed selections admit neither.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkBanActions {
    /// Every selected user is unbanned, so a bulk ban is offered.
    pub can_ban: bool,
    /// Every selected user is banned, so a bulk unban is offered.
    pub can_unban: bool,
}

impl BulkBanActions {
    /// Derives the available actions from counts of each state.
    #[must_use]
    pub const fn from_counts(banned: usize, unbanned: usize) -> Self {
        Self {
            can_ban: unbanned > 0 && banned == 0,
            can_unban: banned > 0 && unbanned == 0,
        }
    }

    /// Assesses an already-loaded selection of ban states.
    pub fn assess<'a>(states: impl IntoIterator<Item = &'a BanState>) -> Self {
        let mut banned = 0usize;
        let mut unbanned = 0usize;
        for state in states {
            if state.is_banned() {
                banned += 1;
            } else {
                unbanned += 1;
            }
        }
        Self::from_counts(banned, unbanned)
    }
}

/// Ban service over the `users/*` overlay and the `eventBans/*` subtree.
#[derive(Debug, Clone)]
pub struct BanRegistry<S, C>
where
    S: DocumentStore + Clone,
    C: Clock + Clone,
{
    env: RegistrationEnvironment<S, C>,
}

impl<S, C> BanRegistry<S, C>
where
    S: DocumentStore + Clone,
    C: Clock + Clone,
{
    /// Creates the service.
    #[must_use]
    pub const fn new(env: RegistrationEnvironment<S, C>) -> Self {
        Self { env }
    }

    /// Sets or clears the global ban on a user.
    ///
    /// Banning stamps `bannedAt`; unbanning clears it (the field is
    /// deleted, not set to a sentinel).
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegistrationError::StoreUnavailable`] on store
    /// failure.
    pub async fn ban_user(&self, user_id: &UserId, banned: bool) -> Result<()> {
        let now = self.env.clock.now();
        let mut fields = Map::new();
        fields.insert("banned".to_string(), json!(banned));
        fields.insert(
            "bannedAt".to_string(),
            if banned {
                serde_json::to_value(now)?
            } else {
                Value::Null
            },
        );
        fields.insert("updatedAt".to_string(), serde_json::to_value(now)?);
        self.env.store.update(&paths::user(user_id), fields).await?;
        tracing::info!(user = %user_id, banned, "global ban updated");
        Ok(())
    }

    /// Applies a global ban or unban to several users, one at a time.
    ///
    /// A failure mid-batch does not roll back the users already processed;
    /// the outcome reports exactly which users ended up in which state.
    pub async fn ban_many(&self, user_ids: &[UserId], banned: bool) -> BatchOutcome<UserId> {
        let mut outcome = BatchOutcome::new();
        for user_id in user_ids {
            let result = self.ban_user(user_id, banned).await;
            if let Err(error) = &result {
                tracing::warn!(user = %user_id, %error, "bulk ban item failed");
            }
            outcome.record(user_id.clone(), result);
        }
        outcome
    }

    /// The global ban state recorded on a user's profile.
    ///
    /// Users without a profile are not banned.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegistrationError::StoreUnavailable`] on store
    /// failure.
    pub async fn global_ban_status(&self, user_id: &UserId) -> Result<BanState> {
        let profile: Option<Profile> = self.env.store.get_typed(&paths::user(user_id)).await?;
        Ok(profile.map_or(BanState::NotBanned, |p| p.ban_state()))
    }

    /// Bans or unbans a user for one specific event.
    ///
    /// Banning writes an [`EventBan`] record; unbanning deletes it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegistrationError::StoreUnavailable`] on store
    /// failure.
    pub async fn ban_from_event(
        &self,
        user_id: &UserId,
        event_id: &EventId,
        banned: bool,
    ) -> Result<()> {
        let path = paths::event_ban(user_id, event_id);
        if banned {
            let ban = EventBan {
                banned: true,
                banned_at: Some(self.env.clock.now()),
                event_id: event_id.clone(),
            };
            self.env.store.set_typed(&path, &ban).await?;
        } else {
            self.env.store.remove(&path).await?;
        }
        tracing::info!(user = %user_id, event = %event_id, banned, "event ban updated");
        Ok(())
    }

    /// The ban state of a user for one event; absent record means not
    /// banned.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegistrationError::StoreUnavailable`] on store
    /// failure.
    pub async fn event_ban_status(&self, user_id: &UserId, event_id: &EventId) -> Result<BanState> {
        let ban: Option<EventBan> = self
            .env
            .store
            .get_typed(&paths::event_ban(user_id, event_id))
            .await?;
        Ok(ban.map_or(BanState::NotBanned, |b| b.state()))
    }

    /// Every event ban recorded against a user, keyed by event.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegistrationError::StoreUnavailable`] on store
    /// failure.
    pub async fn event_bans(&self, user_id: &UserId) -> Result<HashMap<EventId, EventBan>> {
        Ok(self
            .env
            .store
            .get_typed(&paths::event_bans(user_id))
            .await?
            .unwrap_or_default())
    }

    /// Assesses which bulk actions a selection admits for one event,
    /// querying each selected user's event-ban state.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegistrationError::StoreUnavailable`] if any state
    /// query fails — a partially known selection must not enable either
    /// action.
    pub async fn assess_event_selection(
        &self,
        user_ids: &[UserId],
        event_id: &EventId,
    ) -> Result<BulkBanActions> {
        let mut banned = 0usize;
        let mut unbanned = 0usize;
        for user_id in user_ids {
            if self.event_ban_status(user_id, event_id).await?.is_banned() {
                banned += 1;
            } else {
                unbanned += 1;
            }
        }
        Ok(BulkBanActions::from_counts(banned, unbanned))
    }

    /// Filters a selection down to the users without an active event ban,
    /// preserving order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegistrationError::StoreUnavailable`] if any state
    /// query fails.
    pub async fn eligible_for_event(
        &self,
        user_ids: &[UserId],
        event_id: &EventId,
    ) -> Result<Vec<UserId>> {
        let mut eligible = Vec::with_capacity(user_ids.len());
        for user_id in user_ids {
            if !self.event_ban_status(user_id, event_id).await?.is_banned() {
                eligible.push(user_id.clone());
            }
        }
        Ok(eligible)
    }
}
