//! Checkout orchestrator.
//!
//! Drains the cart through the ledger **strictly sequentially** — one
//! admission completes before the next begins. Keeping the loop sequential
//! is what keeps the failure accounting exact: after the loop, the cart
//! holds precisely the items whose admission did not succeed, ready for
//! retry. Parallelizing would mean reconciling interleaved partial
//! failures for no user-visible gain.

use crate::cart::{Cart, CartItem};
use crate::clock::Clock;
use crate::error::RegistrationError;
use crate::ledger::RegistrationLedger;
use crate::records::RegistrationDetails;
use crate::state::{EventId, PaymentId, UserId};
use chrono::{DateTime, Utc};
use gatepass_store::DocumentStore;
use rand::Rng;

/// One cart item whose admission failed, with the reason.
#[derive(Debug)]
pub struct FailedCheckout {
    /// The item left in the cart for retry.
    pub item: CartItem,
    /// Why admission failed.
    pub error: RegistrationError,
}

/// Overall shape of a checkout run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// The cart was empty; nothing was attempted.
    EmptyCart,
    /// Every item was admitted; the cart is now empty.
    AllSucceeded,
    /// Some items were admitted; the failed ones remain in the cart.
    PartialFailure,
    /// No item was admitted; the cart is unchanged.
    AllFailed,
}

/// Result of draining a cart.
#[derive(Debug)]
pub struct CheckoutReport {
    /// Items admitted, in cart order.
    pub succeeded: Vec<CartItem>,
    /// Items that failed, in cart order, with reasons.
    pub failed: Vec<FailedCheckout>,
    /// Overall shape of the run.
    pub outcome: CheckoutOutcome,
}

impl CheckoutReport {
    /// Itemized failure lines (`title: reason`) for the checkout notice.
    #[must_use]
    pub fn failure_summary(&self) -> String {
        self.failed
            .iter()
            .map(|f| format!("{}: {}", f.item.title, f.error))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Orchestrates checkout over a shared ledger.
///
/// Built from a ledger clone so every admission — interactive or checkout —
/// funnels through the same per-event admission queue.
#[derive(Debug, Clone)]
pub struct CheckoutOrchestrator<S, C>
where
    S: DocumentStore + Clone,
    C: Clock + Clone,
{
    ledger: RegistrationLedger<S, C>,
}

impl<S, C> CheckoutOrchestrator<S, C>
where
    S: DocumentStore + Clone,
    C: Clock + Clone,
{
    /// Creates the orchestrator.
    #[must_use]
    pub const fn new(ledger: RegistrationLedger<S, C>) -> Self {
        Self { ledger }
    }

    /// Drains the cart for `user_id`, one admission at a time, then
    /// reconciles the cart to exactly the failed items.
    ///
    /// An unauthenticated checkout (`user_id` is `None`) admits nothing and
    /// leaves the cart intact — every item is reported failed with
    /// [`RegistrationError::NotAuthenticated`].
    pub async fn checkout(&self, user_id: Option<&UserId>, cart: &mut Cart) -> CheckoutReport {
        if cart.is_empty() {
            return CheckoutReport {
                succeeded: Vec::new(),
                failed: Vec::new(),
                outcome: CheckoutOutcome::EmptyCart,
            };
        }

        let Some(user_id) = user_id else {
            let failed = cart
                .items()
                .iter()
                .map(|item| FailedCheckout {
                    item: item.clone(),
                    error: RegistrationError::NotAuthenticated,
                })
                .collect();
            return CheckoutReport {
                succeeded: Vec::new(),
                failed,
                outcome: CheckoutOutcome::AllFailed,
            };
        };

        let mut succeeded = Vec::new();
        let mut failed: Vec<FailedCheckout> = Vec::new();

        for item in cart.items().to_vec() {
            let details = self.registration_details(&item);
            match self
                .ledger
                .register_for_event(user_id, &item.event_id, details)
                .await
            {
                Ok(()) => {
                    tracing::debug!(user = %user_id, event = %item.event_id, "checkout item admitted");
                    succeeded.push(item);
                },
                Err(error) => {
                    tracing::warn!(
                        user = %user_id,
                        event = %item.event_id,
                        %error,
                        "checkout item failed"
                    );
                    failed.push(FailedCheckout { item, error });
                },
            }
        }

        if failed.is_empty() {
            cart.clear();
        } else {
            let failed_ids: Vec<EventId> =
                failed.iter().map(|f| f.item.event_id.clone()).collect();
            cart.retain_failed(&failed_ids);
        }

        let outcome = match (succeeded.is_empty(), failed.is_empty()) {
            (_, true) => CheckoutOutcome::AllSucceeded,
            (true, false) => CheckoutOutcome::AllFailed,
            (false, false) => CheckoutOutcome::PartialFailure,
        };
        CheckoutReport {
            succeeded,
            failed,
            outcome,
        }
    }

    /// Synthesizes the registration record for one cart item.
    ///
    /// Date, time and venue are placeholders until event scheduling is
    /// stored on the event itself.
    fn registration_details(&self, item: &CartItem) -> RegistrationDetails {
        let now = self.ledger.environment().clock.now();
        RegistrationDetails {
            event_id: item.event_id.clone(),
            event_name: item.title.clone(),
            event_date: now.format("%Y-%m-%d").to_string(),
            event_time: "TBD".to_string(),
            venue: "TBD".to_string(),
            payment_id: PaymentId::new(payment_reference(now)),
            amount: item.price,
            quantity: item.quantity,
        }
    }
}

/// Payment reference: `TXN` + millisecond timestamp + 5 random uppercase
/// alphanumerics.
fn payment_reference(now: DateTime<Utc>) -> String {
    const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..5)
        .map(|_| char::from(ALPHABET[rng.gen_range(0..ALPHABET.len())]))
        .collect();
    format!("TXN{}{suffix}", now.timestamp_millis())
}
