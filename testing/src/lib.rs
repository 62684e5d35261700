//! # Gatepass Testing
//!
//! Test fixtures and helpers for the Gatepass registration core.
//!
//! This crate provides:
//! - A deterministic [`FixedClock`]
//! - [`TestEnv`]: an in-memory store plus fixed clock, with seeding helpers
//! - [`EventBuilder`] and the sample catalog
//!
//! ## Example
//!
//! ```ignore
//! use gatepass_testing::{EventBuilder, TestEnv};
//!
//! #[tokio::test]
//! async fn registers_once() {
//!     let env = TestEnv::new();
//!     let event = env.seed_event(EventBuilder::new("Code Clash").max_tickets(2)).await?;
//!     let ledger = env.ledger();
//!     // ...
//! }
//! ```

use chrono::{DateTime, Utc};
use gatepass_registration::clock::Clock;
use gatepass_registration::{
    AttendanceTracker, BanRegistry, CheckoutOrchestrator, Event, EventCatalog, EventId,
    EventStatus, NewProfile, PaymentId, ProfileDirectory, Registration, RegistrationEnvironment,
    RegistrationLedger, RegistrationStatus, Result, UserId, paths,
};
use gatepass_store::{DocumentStore, MemoryStore};

/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests.
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use gatepass_testing::mocks::FixedClock;
    /// use gatepass_registration::clock::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone, Copy)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time.
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2026-01-01 00:00:00 UTC).
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

pub use mocks::{FixedClock, test_clock};

/// An in-memory store and a fixed clock, bundled with service constructors
/// and seeding helpers.
#[derive(Debug, Clone)]
pub struct TestEnv {
    /// The shared in-memory store.
    pub store: MemoryStore,
    /// The fixed clock.
    pub clock: FixedClock,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    /// Creates a fresh empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: MemoryStore::new(),
            clock: test_clock(),
        }
    }

    /// The environment bundle for constructing services directly.
    #[must_use]
    pub fn environment(&self) -> RegistrationEnvironment<MemoryStore, FixedClock> {
        RegistrationEnvironment::new(self.store.clone(), self.clock)
    }

    /// An event catalog over this environment.
    #[must_use]
    pub fn catalog(&self) -> EventCatalog<MemoryStore, FixedClock> {
        EventCatalog::new(self.environment())
    }

    /// A registration ledger over this environment.
    #[must_use]
    pub fn ledger(&self) -> RegistrationLedger<MemoryStore, FixedClock> {
        RegistrationLedger::new(self.environment())
    }

    /// A ban registry over this environment.
    #[must_use]
    pub fn bans(&self) -> BanRegistry<MemoryStore, FixedClock> {
        BanRegistry::new(self.environment())
    }

    /// An attendance tracker over this environment.
    #[must_use]
    pub fn attendance(&self) -> AttendanceTracker<MemoryStore, FixedClock> {
        AttendanceTracker::new(self.environment())
    }

    /// A profile directory over this environment.
    #[must_use]
    pub fn profiles(&self) -> ProfileDirectory<MemoryStore, FixedClock> {
        ProfileDirectory::new(self.environment())
    }

    /// A checkout orchestrator over a fresh ledger.
    #[must_use]
    pub fn checkout(&self) -> CheckoutOrchestrator<MemoryStore, FixedClock> {
        CheckoutOrchestrator::new(self.ledger())
    }

    /// Writes an event built from `builder` and returns it.
    ///
    /// Unlike the catalog's create path this writes the record directly,
    /// so builders can seed inactive events too.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub async fn seed_event(&self, builder: EventBuilder) -> Result<Event> {
        let key = self.store.generate_id(&paths::events()).await?;
        let event = builder.build(EventId::new(key), self.clock.now());
        self.store.set_typed(&paths::event(&event.id), &event).await?;
        Ok(event)
    }

    /// Writes a registration record directly, bypassing admission.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub async fn seed_registration(
        &self,
        user_id: &UserId,
        event: &Event,
        attended: bool,
    ) -> Result<()> {
        let now = self.clock.now();
        let registration = Registration {
            event_id: event.id.clone(),
            event_name: event.title.clone(),
            event_date: now.format("%Y-%m-%d").to_string(),
            event_time: "TBD".to_string(),
            venue: "TBD".to_string(),
            payment_id: PaymentId::new(format!("TXNTEST{}", user_id.as_str())),
            amount: event.price,
            quantity: 1,
            registered_at: now,
            status: RegistrationStatus::Registered,
            attended,
            attended_at: attended.then_some(now),
            updated_at: None,
        };
        self.store
            .set_typed(&paths::registration(user_id, &event.id), &registration)
            .await?;
        Ok(())
    }

    /// Writes a minimal complete profile for a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub async fn seed_profile(&self, user_id: &UserId, name: &str) -> Result<()> {
        self.profiles()
            .save(
                user_id,
                NewProfile {
                    name: name.to_string(),
                    email: format!("{name}@example.test").to_lowercase(),
                    college: "Analytical Engine Institute".to_string(),
                    phone: "9876543210".to_string(),
                },
            )
            .await
    }
}

/// Mints a unique user id, standing in for the identity provider.
#[must_use]
pub fn user_id() -> UserId {
    UserId::new(uuid::Uuid::new_v4().simple().to_string())
}

/// Builder for seeding events with test-relevant knobs.
#[derive(Debug, Clone)]
pub struct EventBuilder {
    title: String,
    description: String,
    category: String,
    price: u32,
    duration: String,
    prize: String,
    image: String,
    icon: String,
    max_tickets: Option<u32>,
    status: EventStatus,
}

impl EventBuilder {
    /// Starts a builder with sensible defaults and the given title.
    #[must_use]
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            description: "A test event".to_string(),
            category: "Technology".to_string(),
            price: 249,
            duration: "1 Day".to_string(),
            prize: "Bragging rights".to_string(),
            image: String::new(),
            icon: "🎟️".to_string(),
            max_tickets: None,
            status: EventStatus::Active,
        }
    }

    /// Sets the ticket price.
    #[must_use]
    pub const fn price(mut self, price: u32) -> Self {
        self.price = price;
        self
    }

    /// Sets the category label.
    #[must_use]
    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_string();
        self
    }

    /// Caps the capacity.
    #[must_use]
    pub const fn max_tickets(mut self, max: u32) -> Self {
        self.max_tickets = Some(max);
        self
    }

    /// Seeds the event deactivated.
    #[must_use]
    pub const fn inactive(mut self) -> Self {
        self.status = EventStatus::Inactive;
        self
    }

    /// Materializes the event record.
    #[must_use]
    pub fn build(self, id: EventId, now: DateTime<Utc>) -> Event {
        Event {
            id,
            title: self.title,
            description: self.description,
            category: self.category,
            price: self.price,
            duration: self.duration,
            prize: self.prize,
            image: self.image,
            icon: self.icon,
            max_tickets: self.max_tickets,
            status: self.status,
            created_at: now,
            updated_at: now,
        }
    }
}

/// The sample catalog used when seeding a fresh deployment.
#[must_use]
pub fn sample_events() -> Vec<gatepass_registration::EventDraft> {
    use gatepass_registration::EventDraft;
    vec![
        EventDraft {
            title: "Shark Tank: The Pitch Battle".to_string(),
            description: "Pitch your visionary ideas to industry titans and secure the mentorship to make them a reality.".to_string(),
            icon: "🦈".to_string(),
            price: 299,
            category: "Business".to_string(),
            duration: "2 Days".to_string(),
            prize: "Seed Funding & Mentorship".to_string(),
            image: String::new(),
            max_tickets: Some(50),
        },
        EventDraft {
            title: "Digital Arena: Gaming Showdown".to_string(),
            description: "Compete in high-stakes tournaments across popular esports titles.".to_string(),
            icon: "🎮".to_string(),
            price: 199,
            category: "Gaming".to_string(),
            duration: "3 Days".to_string(),
            prize: "₹50,000 Prize Pool".to_string(),
            image: String::new(),
            max_tickets: Some(100),
        },
        EventDraft {
            title: "Code Clash".to_string(),
            description: "A classic competitive programming battle. Solve complex algorithmic problems.".to_string(),
            icon: "💻".to_string(),
            price: 249,
            category: "Technology".to_string(),
            duration: "1 Day".to_string(),
            prize: "₹30,000 & Internships".to_string(),
            image: String::new(),
            max_tickets: Some(75),
        },
        EventDraft {
            title: "Design Duel".to_string(),
            description: "Showcase your graphic design prowess in a fast-paced creative challenge.".to_string(),
            icon: "🎨".to_string(),
            price: 179,
            category: "Design".to_string(),
            duration: "1 Day".to_string(),
            prize: "₹20,000 & Wacom Tablet".to_string(),
            image: String::new(),
            max_tickets: Some(40),
        },
        EventDraft {
            title: "Data Detectives".to_string(),
            description: "Analyze complex datasets to uncover hidden insights and present your findings.".to_string(),
            icon: "🔍".to_string(),
            price: 229,
            category: "Analytics".to_string(),
            duration: "2 Days".to_string(),
            prize: "₹25,000 & Analytics Course".to_string(),
            image: String::new(),
            max_tickets: Some(35),
        },
        EventDraft {
            title: "Story Weavers".to_string(),
            description: "Craft compelling narratives in our creative writing and storytelling competition.".to_string(),
            icon: "✍️".to_string(),
            price: 149,
            category: "Creative".to_string(),
            duration: "1 Day".to_string(),
            prize: "Kindle & Publishing Opportunity".to_string(),
            image: String::new(),
            max_tickets: Some(60),
        },
        EventDraft {
            title: "Hunt Safari".to_string(),
            description: "Embark on a campus-wide digital treasure hunt that will test your wits and teamwork.".to_string(),
            icon: "🗺️".to_string(),
            price: 99,
            category: "Adventure".to_string(),
            duration: "1 Day".to_string(),
            prize: "₹15,000 & Goodies".to_string(),
            image: String::new(),
            max_tickets: Some(80),
        },
    ]
}

/// Initializes a fmt tracing subscriber honoring `RUST_LOG`; safe to call
/// from every test.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_is_deterministic() {
        let clock = test_clock();
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn user_ids_are_unique() {
        assert_ne!(user_id(), user_id());
    }

    #[test]
    fn sample_catalog_has_seven_events() {
        assert_eq!(sample_events().len(), 7);
    }

    #[tokio::test]
    async fn seed_event_honors_builder_knobs() {
        let env = TestEnv::new();
        let event = env
            .seed_event(EventBuilder::new("Design Duel").max_tickets(40).inactive())
            .await
            .unwrap();
        assert_eq!(event.capacity(), Some(40));
        assert!(!event.is_active());
    }
}
