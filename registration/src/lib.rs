//! # Gatepass Registration
//!
//! The registration core of Gatepass: users browse a catalog of events, add
//! tickets to a cart, and check out; administrators manage events,
//! attendance and bans. Everything persists to a path-addressed document
//! store (see `gatepass-store`); this crate owns the invariants on top of
//! it.
//!
//! ## Services
//!
//! - [`EventCatalog`]: event creation, updates and activation toggles.
//! - [`RegistrationLedger`]: the admission protocol — capacity checks,
//!   registration writes, automatic deactivation of full events.
//! - [`BanRegistry`]: global and per-event bans, with the homogeneous
//!   bulk-selection policy.
//! - [`AttendanceTracker`]: attended/not-attended state, singly and in
//!   ban-aware bulk.
//! - [`ProfileDirectory`]: user profiles, roles and the admin overview.
//! - [`Cart`] / [`CheckoutOrchestrator`]: the client-side cart state
//!   machine and the sequential per-item checkout loop.
//!
//! ## Key spaces
//!
//! Each service owns a disjoint subtree of the store (`events/*`,
//! `registrations/*`, `eventBans/*`, `users/*`), so the only cross-session
//! write contention is capacity admission itself — see
//! [`RegistrationLedger::register_for_event`] for how far that can be
//! closed from this side of the store.

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod attendance;
pub mod bans;
pub mod batch;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod clock;
pub mod environment;
pub mod error;
pub mod ledger;
pub mod paths;
pub mod profiles;
pub mod records;
pub mod state;

pub use attendance::{AttendanceMark, AttendanceTracker};
pub use bans::{BanRegistry, BulkBanActions};
pub use batch::{BatchFailure, BatchOutcome};
pub use cart::{Cart, CartChange, CartItem};
pub use catalog::EventCatalog;
pub use checkout::{CheckoutOrchestrator, CheckoutOutcome, CheckoutReport, FailedCheckout};
pub use clock::{Clock, SystemClock};
pub use environment::RegistrationEnvironment;
pub use error::{RegistrationError, Result};
pub use ledger::RegistrationLedger;
pub use profiles::ProfileDirectory;
pub use records::{
    AttendanceStats, Attendee, Event, EventBan, EventDraft, EventPatch, EventStats, NewProfile,
    Participant, Profile, ProfilePatch, RegisteredEventSummary, Registration, RegistrationDetails,
    UserOverview,
};
pub use state::{BanState, EventId, EventStatus, PaymentId, RegistrationStatus, Role, UserId};
