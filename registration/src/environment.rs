//! Registration environment.
//!
//! All external dependencies of the services are injected through this
//! bundle, generic over the concrete store and clock so tests swap in the
//! in-memory store and a fixed clock without dynamic dispatch.

use crate::clock::Clock;
use gatepass_store::DocumentStore;

/// Injected dependencies for the registration services.
#[derive(Debug, Clone)]
pub struct RegistrationEnvironment<S, C>
where
    S: DocumentStore + Clone,
    C: Clock + Clone,
{
    /// The document store holding all persistent state.
    pub store: S,
    /// Source of timestamps.
    pub clock: C,
}

impl<S, C> RegistrationEnvironment<S, C>
where
    S: DocumentStore + Clone,
    C: Clock + Clone,
{
    /// Creates a new environment.
    #[must_use]
    pub const fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }
}
