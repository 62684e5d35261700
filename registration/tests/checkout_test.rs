//! Checkout orchestration tests.
//!
//! The contract under test: after a checkout, the cart holds exactly the
//! items whose admission did not succeed.
//!
//! Run with: `cargo test --test checkout_test`

#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use gatepass_registration::{
    Cart, CheckoutOutcome, EventStatus, RegistrationError, paths,
};
use gatepass_store::DocumentStore;
use gatepass_testing::{EventBuilder, TestEnv, user_id};
use std::collections::HashMap;

#[tokio::test]
async fn all_items_admitted_clears_the_cart() {
    let env = TestEnv::new();
    let first = env.seed_event(EventBuilder::new("First").price(100)).await.unwrap();
    let second = env.seed_event(EventBuilder::new("Second").price(200)).await.unwrap();
    let user = user_id();

    let mut cart = Cart::new();
    cart.add(&first);
    cart.add(&second);
    assert_eq!(cart.total_price(), 300);

    let report = env.checkout().checkout(Some(&user), &mut cart).await;

    assert_eq!(report.outcome, CheckoutOutcome::AllSucceeded);
    assert_eq!(report.succeeded.len(), 2);
    assert!(report.failed.is_empty());
    assert!(cart.is_empty());

    let registrations = env.ledger().user_registrations(&user).await.unwrap();
    assert_eq!(registrations.len(), 2);
    let stored = &registrations[&first.id];
    assert!(stored.payment_id.as_str().starts_with("TXN"));
    assert_eq!(stored.quantity, 1);
    assert_eq!(stored.amount, 100);
    assert!(!stored.attended);
}

#[tokio::test]
async fn failed_item_is_exactly_what_remains_in_the_cart() {
    let env = TestEnv::new();
    let first = env.seed_event(EventBuilder::new("First")).await.unwrap();
    let second = env.seed_event(EventBuilder::new("Second")).await.unwrap();
    let third = env.seed_event(EventBuilder::new("Third")).await.unwrap();
    let user = user_id();

    let mut cart = Cart::new();
    cart.add(&first);
    cart.add(&second);
    cart.add(&third);

    // The second event is deactivated after it entered the cart, so its
    // admission fails mid-loop while its neighbors succeed.
    env.catalog()
        .set_status(&second.id, EventStatus::Inactive)
        .await
        .unwrap();

    let report = env.checkout().checkout(Some(&user), &mut cart).await;

    assert_eq!(report.outcome, CheckoutOutcome::PartialFailure);
    assert_eq!(report.succeeded.len(), 2);
    assert_eq!(report.failed.len(), 1);
    assert!(matches!(
        report.failed[0].error,
        RegistrationError::EventInactive { .. }
    ));

    assert_eq!(cart.len(), 1);
    assert_eq!(cart.items()[0].event_id, second.id);
    assert!(report.failure_summary().contains("Second"));

    let registrations = env.ledger().user_registrations(&user).await.unwrap();
    assert!(registrations.contains_key(&first.id));
    assert!(registrations.contains_key(&third.id));
    assert!(!registrations.contains_key(&second.id));
}

#[tokio::test]
async fn capacity_taken_mid_loop_leaves_item_retryable() {
    let env = TestEnv::new();
    let contested = env
        .seed_event(EventBuilder::new("Contested").max_tickets(1))
        .await
        .unwrap();
    let open = env.seed_event(EventBuilder::new("Open")).await.unwrap();

    let buyer = user_id();
    let mut cart = Cart::new();
    cart.add(&contested);
    cart.add(&open);

    // Another session takes the last seat before this checkout runs.
    let rival = user_id();
    let mut rival_cart = Cart::new();
    rival_cart.add(&contested);
    let rival_report = env.checkout().checkout(Some(&rival), &mut rival_cart).await;
    assert_eq!(rival_report.outcome, CheckoutOutcome::AllSucceeded);

    let report = env.checkout().checkout(Some(&buyer), &mut cart).await;

    assert_eq!(report.outcome, CheckoutOutcome::PartialFailure);
    assert!(matches!(
        report.failed[0].error,
        RegistrationError::CapacityExceeded { .. }
    ));
    assert_eq!(cart.len(), 1);
    assert_eq!(cart.items()[0].event_id, contested.id);
}

#[tokio::test]
async fn all_failures_keep_the_whole_cart() {
    let env = TestEnv::new();
    let first = env.seed_event(EventBuilder::new("First").inactive()).await.unwrap();
    let second = env.seed_event(EventBuilder::new("Second").inactive()).await.unwrap();
    let user = user_id();

    // Items entered the cart before deactivation; seed them directly.
    let mut cart = Cart::new();
    let mut active_first = first.clone();
    active_first.status = EventStatus::Active;
    let mut active_second = second.clone();
    active_second.status = EventStatus::Active;
    cart.add(&active_first);
    cart.add(&active_second);

    let report = env.checkout().checkout(Some(&user), &mut cart).await;

    assert_eq!(report.outcome, CheckoutOutcome::AllFailed);
    assert_eq!(report.failed.len(), 2);
    assert_eq!(cart.len(), 2);
    assert!(env.ledger().user_registrations(&user).await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_cart_is_a_noop() {
    let env = TestEnv::new();
    let mut cart = Cart::new();
    let report = env.checkout().checkout(Some(&user_id()), &mut cart).await;
    assert_eq!(report.outcome, CheckoutOutcome::EmptyCart);
    assert!(report.succeeded.is_empty());
    assert!(report.failed.is_empty());
}

#[tokio::test]
async fn unauthenticated_checkout_admits_nothing_and_keeps_the_cart() {
    let env = TestEnv::new();
    let event = env.seed_event(EventBuilder::new("First")).await.unwrap();
    let mut cart = Cart::new();
    cart.add(&event);

    let report = env.checkout().checkout(None, &mut cart).await;

    assert_eq!(report.outcome, CheckoutOutcome::AllFailed);
    assert!(matches!(
        report.failed[0].error,
        RegistrationError::NotAuthenticated
    ));
    assert_eq!(cart.len(), 1);

    // Nothing was written anywhere under registrations.
    assert!(env
        .store
        .get(&paths::registrations())
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn checkout_respects_shop_gating_before_it_even_starts() {
    // A deactivated event never enters the cart through toggle, so checkout
    // never sees it — the gating and the ledger agree.
    let env = TestEnv::new();
    let inactive = env.seed_event(EventBuilder::new("Gone").inactive()).await.unwrap();
    let mut cart = Cart::new();

    let change = cart.toggle(&inactive, true, &HashMap::new(), &HashMap::new());
    assert!(!change.changed_membership());
    assert!(cart.is_empty());
}
