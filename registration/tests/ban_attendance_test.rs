//! Ban registry and attendance tracker tests.
//!
//! Covers ban/unban symmetry at both scopes, the non-atomic bulk ban, the
//! homogeneous-selection policy, ban-aware bulk attendance and the stats
//! arithmetic.
//!
//! Run with: `cargo test --test ban_attendance_test`

#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use gatepass_registration::{
    BanState, RegistrationError, UserId, paths,
};
use gatepass_store::DocumentStore;
use gatepass_testing::{EventBuilder, TestEnv, user_id};

#[tokio::test]
async fn event_ban_roundtrip_removes_the_record() {
    let env = TestEnv::new();
    let event = env.seed_event(EventBuilder::new("Gated")).await.unwrap();
    let bans = env.bans();
    let user = user_id();

    bans.ban_from_event(&user, &event.id, true).await.unwrap();
    let state = bans.event_ban_status(&user, &event.id).await.unwrap();
    assert!(state.is_banned());
    assert!(state.banned_at().is_some());

    bans.ban_from_event(&user, &event.id, false).await.unwrap();
    assert_eq!(
        bans.event_ban_status(&user, &event.id).await.unwrap(),
        BanState::NotBanned
    );

    // Unbanning deletes the record outright; absence is the unbanned state.
    assert!(env
        .store
        .get(&paths::event_ban(&user, &event.id))
        .await
        .unwrap()
        .is_none());
    assert!(bans.event_bans(&user).await.unwrap().is_empty());
}

#[tokio::test]
async fn global_ban_stamps_and_clears_the_timestamp() {
    let env = TestEnv::new();
    let bans = env.bans();
    let user = user_id();
    env.seed_profile(&user, "Ada").await.unwrap();

    bans.ban_user(&user, true).await.unwrap();
    let profile = env.profiles().profile(&user).await.unwrap().unwrap();
    assert!(profile.banned);
    assert!(profile.banned_at.is_some());
    assert!(bans.global_ban_status(&user).await.unwrap().is_banned());

    bans.ban_user(&user, false).await.unwrap();
    let profile = env.profiles().profile(&user).await.unwrap().unwrap();
    assert!(!profile.banned);
    assert!(profile.banned_at.is_none(), "unban must clear bannedAt");
    assert_eq!(
        bans.global_ban_status(&user).await.unwrap(),
        BanState::NotBanned
    );
}

#[tokio::test]
async fn global_and_event_bans_are_independent() {
    let env = TestEnv::new();
    let event = env.seed_event(EventBuilder::new("Gated")).await.unwrap();
    let other = env.seed_event(EventBuilder::new("Open")).await.unwrap();
    let bans = env.bans();
    let user = user_id();

    bans.ban_from_event(&user, &event.id, true).await.unwrap();

    assert!(bans.event_ban_status(&user, &event.id).await.unwrap().is_banned());
    assert!(!bans.event_ban_status(&user, &other.id).await.unwrap().is_banned());
    assert!(!bans.global_ban_status(&user).await.unwrap().is_banned());
}

#[tokio::test]
async fn bulk_ban_continues_past_failures_without_rollback() {
    let env = TestEnv::new();
    let bans = env.bans();
    let good_before = user_id();
    // A key the store rejects, so the middle item fails.
    let invalid = UserId::new("not.a.valid.key");
    let good_after = user_id();

    let outcome = bans
        .ban_many(&[good_before.clone(), invalid.clone(), good_after.clone()], true)
        .await;

    assert!(!outcome.is_success());
    assert_eq!(outcome.total(), 3);
    assert_eq!(outcome.succeeded, vec![good_before.clone(), good_after.clone()]);
    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.failed[0].item, invalid);

    // Users before and after the failure both ended up banned.
    assert!(bans.global_ban_status(&good_before).await.unwrap().is_banned());
    assert!(bans.global_ban_status(&good_after).await.unwrap().is_banned());
}

#[tokio::test]
async fn event_selection_policy_requires_homogeneity() {
    let env = TestEnv::new();
    let event = env.seed_event(EventBuilder::new("Gated")).await.unwrap();
    let bans = env.bans();
    let users: Vec<UserId> = (0..3).map(|_| user_id()).collect();

    let actions = bans.assess_event_selection(&users, &event.id).await.unwrap();
    assert!(actions.can_ban);
    assert!(!actions.can_unban);

    bans.ban_from_event(&users[0], &event.id, true).await.unwrap();
    let actions = bans.assess_event_selection(&users, &event.id).await.unwrap();
    assert!(!actions.can_ban, "mixed selection must not offer ban");
    assert!(!actions.can_unban, "mixed selection must not offer unban");

    for user in &users[1..] {
        bans.ban_from_event(user, &event.id, true).await.unwrap();
    }
    let actions = bans.assess_event_selection(&users, &event.id).await.unwrap();
    assert!(!actions.can_ban);
    assert!(actions.can_unban);
}

#[tokio::test]
async fn bulk_attendance_excludes_event_banned_users() {
    let env = TestEnv::new();
    let event = env.seed_event(EventBuilder::new("Main Stage")).await.unwrap();
    let bans = env.bans();
    let tracker = env.attendance();

    let users: Vec<UserId> = (0..5).map(|_| user_id()).collect();
    for user in &users {
        env.seed_registration(user, &event, false).await.unwrap();
    }
    for banned in &users[..2] {
        bans.ban_from_event(banned, &event.id, true).await.unwrap();
    }

    let outcome = tracker
        .mark_selected(&bans, &event.id, &users, true)
        .await
        .unwrap();

    assert!(outcome.is_success());
    assert_eq!(outcome.total(), 3, "exactly the non-banned users are marked");

    let attendees = tracker.event_attendees(&event.id).await.unwrap();
    for attendee in attendees {
        let banned = users[..2].contains(&attendee.user_id);
        assert_eq!(attendee.registration.attended, !banned);
        assert_eq!(attendee.registration.attended_at.is_some(), !banned);
    }
}

#[tokio::test]
async fn fully_banned_selection_is_a_noop() {
    let env = TestEnv::new();
    let event = env.seed_event(EventBuilder::new("Main Stage")).await.unwrap();
    let bans = env.bans();
    let tracker = env.attendance();

    let user = user_id();
    env.seed_registration(&user, &event, false).await.unwrap();
    bans.ban_from_event(&user, &event.id, true).await.unwrap();

    let outcome = tracker
        .mark_selected(&bans, &event.id, std::slice::from_ref(&user), true)
        .await
        .unwrap();

    assert_eq!(outcome.total(), 0);
    let attendees = tracker.event_attendees(&event.id).await.unwrap();
    assert!(!attendees[0].registration.attended);
}

#[tokio::test]
async fn marking_unregistered_user_fails_without_materializing() {
    let env = TestEnv::new();
    let event = env.seed_event(EventBuilder::new("Main Stage")).await.unwrap();
    let tracker = env.attendance();
    let user = user_id();

    let result = tracker.mark(&user, &event.id, true).await;
    assert!(matches!(
        result,
        Err(RegistrationError::NotRegistered { .. })
    ));
    // Attendance must never create a registration out of thin air.
    assert!(env
        .store
        .get(&paths::registration(&user, &event.id))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn unmarking_clears_attended_at() {
    let env = TestEnv::new();
    let event = env.seed_event(EventBuilder::new("Main Stage")).await.unwrap();
    let tracker = env.attendance();
    let user = user_id();
    env.seed_registration(&user, &event, false).await.unwrap();

    tracker.mark(&user, &event.id, true).await.unwrap();
    tracker.mark(&user, &event.id, false).await.unwrap();

    let registrations = env.ledger().user_registrations(&user).await.unwrap();
    let registration = &registrations[&event.id];
    assert!(!registration.attended);
    assert!(registration.attended_at.is_none());
}

#[tokio::test]
async fn bulk_attendance_reports_partial_failure_and_finishes_the_batch() {
    let env = TestEnv::new();
    let event = env.seed_event(EventBuilder::new("Main Stage")).await.unwrap();
    let tracker = env.attendance();

    let registered = user_id();
    let unregistered = user_id();
    let also_registered = user_id();
    env.seed_registration(&registered, &event, false).await.unwrap();
    env.seed_registration(&also_registered, &event, false).await.unwrap();

    let marks: Vec<_> = [&registered, &unregistered, &also_registered]
        .into_iter()
        .map(|user| gatepass_registration::AttendanceMark {
            user_id: user.clone(),
            event_id: event.id.clone(),
            attended: true,
        })
        .collect();
    let outcome = tracker.mark_many(&marks).await;

    assert!(!outcome.is_success());
    assert_eq!(outcome.succeeded.len(), 2);
    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.failed[0].item.user_id, unregistered);
    assert!(matches!(
        outcome.into_result(),
        Err(RegistrationError::PartialBatchFailure { failed: 1, total: 3 })
    ));
}

#[tokio::test]
async fn attendance_stats_round_to_whole_percent() {
    let env = TestEnv::new();
    let event = env.seed_event(EventBuilder::new("Main Stage")).await.unwrap();
    let tracker = env.attendance();

    for index in 0..10 {
        let user = user_id();
        env.seed_registration(&user, &event, index < 6).await.unwrap();
    }

    let stats = tracker.stats(&event.id).await.unwrap();
    assert_eq!(stats.total_registered, 10);
    assert_eq!(stats.attended, 6);
    assert_eq!(stats.not_attended, 4);
    assert_eq!(stats.attendance_rate, 60);
}
