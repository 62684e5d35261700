//! Event catalog and profile directory tests.
//!
//! Run with: `cargo test --test catalog_profile_test`

#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use gatepass_registration::{
    EventDraft, EventPatch, EventStatus, ProfilePatch, RegistrationError, Role,
};
use gatepass_testing::{EventBuilder, TestEnv, sample_events, user_id};

#[tokio::test]
async fn created_events_start_active_with_store_generated_ids() {
    let env = TestEnv::new();
    let catalog = env.catalog();

    let id = catalog
        .create(EventDraft {
            title: "Code Clash".to_string(),
            price: 249,
            max_tickets: Some(75),
            ..EventDraft::default()
        })
        .await
        .unwrap();

    let event = catalog.event(&id).await.unwrap().unwrap();
    assert_eq!(event.id, id);
    assert!(event.is_active());
    assert_eq!(event.capacity(), Some(75));
    assert_eq!(event.created_at, event.updated_at);
}

#[tokio::test]
async fn catalog_lists_in_creation_order_including_inactive() {
    let env = TestEnv::new();
    let catalog = env.catalog();

    for draft in sample_events() {
        catalog.create(draft).await.unwrap();
    }
    let third = catalog.all_events().await.unwrap()[2].id.clone();
    catalog.set_status(&third, EventStatus::Inactive).await.unwrap();

    let events = catalog.all_events().await.unwrap();
    assert_eq!(events.len(), 7);
    assert_eq!(events[0].title, "Shark Tank: The Pitch Battle");
    assert_eq!(events[6].title, "Hunt Safari");
    assert!(!events[2].is_active(), "inactive events stay listed");
}

#[tokio::test]
async fn update_merges_only_patched_fields() {
    let env = TestEnv::new();
    let event = env
        .seed_event(EventBuilder::new("Design Duel").price(179))
        .await
        .unwrap();
    let catalog = env.catalog();

    catalog
        .update(
            &event.id,
            EventPatch {
                price: Some(199),
                max_tickets: Some(45),
                ..EventPatch::default()
            },
        )
        .await
        .unwrap();

    let updated = catalog.event(&event.id).await.unwrap().unwrap();
    assert_eq!(updated.price, 199);
    assert_eq!(updated.capacity(), Some(45));
    assert_eq!(updated.title, "Design Duel");
    assert!(updated.updated_at > updated.created_at || updated.updated_at == updated.created_at);
}

#[tokio::test]
async fn updating_missing_event_is_rejected() {
    let env = TestEnv::new();
    let catalog = env.catalog();
    let ghost = gatepass_registration::EventId::new("missing");

    let result = catalog.update(&ghost, EventPatch::default()).await;
    assert!(matches!(
        result,
        Err(RegistrationError::EventNotFound { .. })
    ));

    let result = catalog.set_status(&ghost, EventStatus::Inactive).await;
    assert!(matches!(
        result,
        Err(RegistrationError::EventNotFound { .. })
    ));
}

#[tokio::test]
async fn manual_toggle_flips_orderability() {
    let env = TestEnv::new();
    let event = env.seed_event(EventBuilder::new("Hunt Safari")).await.unwrap();
    let catalog = env.catalog();

    catalog.set_status(&event.id, EventStatus::Inactive).await.unwrap();
    assert!(!catalog.event(&event.id).await.unwrap().unwrap().is_active());

    catalog.set_status(&event.id, EventStatus::Active).await.unwrap();
    assert!(catalog.event(&event.id).await.unwrap().unwrap().is_active());
}

#[tokio::test]
async fn profile_roundtrip_and_patch() {
    let env = TestEnv::new();
    let profiles = env.profiles();
    let user = user_id();

    env.seed_profile(&user, "Ada").await.unwrap();
    let profile = profiles.profile(&user).await.unwrap().unwrap();
    assert_eq!(profile.name, "Ada");
    assert_eq!(profile.role, Role::User);
    assert!(profile.is_complete());

    profiles
        .update(
            &user,
            ProfilePatch {
                phone: Some("Not specified".to_string()),
                ..ProfilePatch::default()
            },
        )
        .await
        .unwrap();
    let profile = profiles.profile(&user).await.unwrap().unwrap();
    assert!(
        !profile.is_complete(),
        "placeholder phone leaves the profile incomplete"
    );
    assert_eq!(profile.name, "Ada", "unpatched fields survive the merge");
}

#[tokio::test]
async fn roles_can_be_granted_and_revoked() {
    let env = TestEnv::new();
    let profiles = env.profiles();
    let user = user_id();
    env.seed_profile(&user, "Grace").await.unwrap();

    profiles.set_role(&user, Role::Admin).await.unwrap();
    assert!(profiles.profile(&user).await.unwrap().unwrap().is_admin());

    profiles.set_role(&user, Role::User).await.unwrap();
    assert!(!profiles.profile(&user).await.unwrap().unwrap().is_admin());
}

#[tokio::test]
async fn overview_joins_registrations_with_event_titles() {
    let env = TestEnv::new();
    let event = env.seed_event(EventBuilder::new("Code Clash").category("Technology")).await.unwrap();
    let profiles = env.profiles();

    let registered = user_id();
    let idle = user_id();
    env.seed_profile(&registered, "Ada").await.unwrap();
    env.seed_profile(&idle, "Grace").await.unwrap();
    env.seed_registration(&registered, &event, true).await.unwrap();

    let overview = profiles.overview().await.unwrap();
    assert_eq!(overview.len(), 2);

    let ada = overview.iter().find(|row| row.user_id == registered).unwrap();
    assert_eq!(ada.registered_events.len(), 1);
    assert_eq!(ada.registered_events[0].event_title, "Code Clash");
    assert_eq!(ada.registered_events[0].event_category, "Technology");
    assert!(ada.registered_events[0].attended);

    let grace = overview.iter().find(|row| row.user_id == idle).unwrap();
    assert!(grace.registered_events.is_empty());
}
