//! The cart: an explicit, client-side state machine.
//!
//! The cart is transient UI state — it is never persisted. Each item moves
//! through `absent → in_cart → {registered | failed (retained)}`, and every
//! transition is an explicit method on [`Cart`], so there is no ambient
//! mutable state for render code to reach into.
//!
//! Every event holds at most one ticket: adding an event already in the
//! cart is a no-op, not an increment.

use crate::records::{Event, Registration};
use crate::state::EventId;
use std::collections::HashMap;

/// One event held in the cart, always with quantity 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    /// The event.
    pub event_id: EventId,
    /// Event title, for display and failure messages.
    pub title: String,
    /// Ticket price in whole currency units.
    pub price: u32,
    /// Category label.
    pub category: String,
    /// Emoji icon.
    pub icon: String,
    /// Ticket quantity; always 1 under the one-ticket-per-event rule.
    pub quantity: u32,
}

impl CartItem {
    /// Captures the cart-relevant fields of an event.
    #[must_use]
    pub fn from_event(event: &Event) -> Self {
        Self {
            event_id: event.id.clone(),
            title: event.title.clone(),
            price: event.price,
            category: event.category.clone(),
            icon: event.icon.clone(),
            quantity: 1,
        }
    }
}

/// What a [`Cart::toggle`] call did — the UI reacts to the gating variants
/// instead of mutating anything itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartChange {
    /// Caller is not signed in; membership unchanged, prompt for login.
    LoginRequired,
    /// Caller already holds a registration for the event; unchanged.
    AlreadyRegistered,
    /// The event is deactivated; unchanged.
    EventInactive,
    /// The event is at capacity; unchanged, show the capacity notice.
    CapacityFull,
    /// The event was added with quantity 1.
    Added,
    /// The event was removed.
    Removed,
}

impl CartChange {
    /// `true` when the toggle actually changed cart membership.
    #[must_use]
    pub const fn changed_membership(self) -> bool {
        matches!(self, Self::Added | Self::Removed)
    }
}

/// Ordered set of cart items, keyed by event id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// The items, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Number of distinct events in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// `true` when the cart holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `true` if the event is in the cart.
    #[must_use]
    pub fn contains(&self, event_id: &EventId) -> bool {
        self.items.iter().any(|item| &item.event_id == event_id)
    }

    /// Flips an event's membership, subject to the shop gating rules.
    ///
    /// The gating checks run in the same order the shop applies them:
    /// authentication, existing registration, event status, occupancy.
    /// Any gate leaving the cart unchanged reports why, so the UI can
    /// surface the right notice.
    pub fn toggle(
        &mut self,
        event: &Event,
        authenticated: bool,
        registrations: &HashMap<EventId, Registration>,
        participant_counts: &HashMap<EventId, u32>,
    ) -> CartChange {
        if !authenticated {
            return CartChange::LoginRequired;
        }
        if registrations.contains_key(&event.id) {
            return CartChange::AlreadyRegistered;
        }
        if !event.is_active() {
            return CartChange::EventInactive;
        }
        let count = participant_counts.get(&event.id).copied().unwrap_or(0);
        if event.is_full(count) {
            return CartChange::CapacityFull;
        }

        if self.remove(&event.id) {
            CartChange::Removed
        } else {
            self.items.push(CartItem::from_event(event));
            CartChange::Added
        }
    }

    /// Adds an event directly; `false` if it was already present (no-op).
    pub fn add(&mut self, event: &Event) -> bool {
        if self.contains(&event.id) {
            return false;
        }
        self.items.push(CartItem::from_event(event));
        true
    }

    /// Removes an event; `false` if it was not present.
    pub fn remove(&mut self, event_id: &EventId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.event_id != event_id);
        self.items.len() < before
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Keeps only the items whose event is in `failed`, in their original
    /// order — the post-checkout reconciliation step.
    pub fn retain_failed(&mut self, failed: &[EventId]) {
        self.items.retain(|item| failed.contains(&item.event_id));
    }

    /// Sum of item prices times quantities.
    #[must_use]
    pub fn total_price(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.price) * u64::from(item.quantity))
            .sum()
    }

    /// Total ticket count.
    #[must_use]
    pub fn total_tickets(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}
