//! Follow ledger integration tests over the in-memory store.

use terracotta_core::{ArtisanId, UserId};
use terracotta_integration_tests::{buyer, seller};
use terracotta_market::db::{FollowStore, MemoryStore, RepositoryError};
use terracotta_market::services::{FollowError, FollowLedger};

#[tokio::test]
async fn follow_creates_edge_and_increments_counter() {
    let store = MemoryStore::new();
    store.insert_artisan(ArtisanId::new(7), "Clay & Co");
    let alice = buyer(1, "Alice");

    let ledger = FollowLedger::new(&store);
    let state = ledger.follow(&alice, ArtisanId::new(7)).await.unwrap();

    assert!(state.following);
    assert_eq!(state.followers, 1);
    assert_eq!(store.edge_count(ArtisanId::new(7)), 1);
}

#[tokio::test]
async fn double_follow_is_idempotent() {
    let store = MemoryStore::new();
    store.insert_artisan(ArtisanId::new(7), "Clay & Co");
    let alice = buyer(1, "Alice");

    let ledger = FollowLedger::new(&store);
    ledger.follow(&alice, ArtisanId::new(7)).await.unwrap();
    let state = ledger.follow(&alice, ArtisanId::new(7)).await.unwrap();

    // Neither the edge nor the counter moves on the repeat.
    assert!(state.following);
    assert_eq!(state.followers, 1);
    assert_eq!(store.edge_count(ArtisanId::new(7)), 1);
}

#[tokio::test]
async fn distinct_followers_each_count_once() {
    let store = MemoryStore::new();
    store.insert_artisan(ArtisanId::new(7), "Clay & Co");

    let ledger = FollowLedger::new(&store);
    ledger.follow(&buyer(1, "Alice"), ArtisanId::new(7)).await.unwrap();
    let state = ledger.follow(&buyer(2, "Bob"), ArtisanId::new(7)).await.unwrap();

    assert_eq!(state.followers, 2);
}

#[tokio::test]
async fn self_follow_is_rejected() {
    let store = MemoryStore::new();
    store.insert_artisan(ArtisanId::new(7), "Clay & Co");
    let potter = seller(3, "Pat", 7);

    let ledger = FollowLedger::new(&store);
    let err = ledger.follow(&potter, ArtisanId::new(7)).await.unwrap_err();

    assert!(matches!(err, FollowError::SelfFollow));
    assert_eq!(store.edge_count(ArtisanId::new(7)), 0);
}

#[tokio::test]
async fn seller_can_follow_other_artisans() {
    let store = MemoryStore::new();
    store.insert_artisan(ArtisanId::new(7), "Clay & Co");
    store.insert_artisan(ArtisanId::new(8), "Glaze House");
    let potter = seller(3, "Pat", 7);

    let ledger = FollowLedger::new(&store);
    let state = ledger.follow(&potter, ArtisanId::new(8)).await.unwrap();

    assert_eq!(state.followers, 1);
}

#[tokio::test]
async fn following_a_missing_artisan_fails() {
    let store = MemoryStore::new();
    let alice = buyer(1, "Alice");

    let ledger = FollowLedger::new(&store);
    let err = ledger.follow(&alice, ArtisanId::new(404)).await.unwrap_err();

    assert!(matches!(err, FollowError::ArtisanNotFound(_)));
}

#[tokio::test]
async fn failed_follow_writes_no_edge() {
    let store = MemoryStore::new();

    // Straight to the store, bypassing the ledger's existence pre-check.
    let err = store
        .follow(UserId::new(1), ArtisanId::new(7))
        .await
        .unwrap_err();

    assert!(matches!(err, RepositoryError::NotFound));
    assert_eq!(store.edge_count(ArtisanId::new(7)), 0);

    // The artisan appearing later starts from a consistent state: the first
    // successful follow moves both the edge and the counter.
    store.insert_artisan(ArtisanId::new(7), "Clay & Co");
    let state = store
        .follow(UserId::new(1), ArtisanId::new(7))
        .await
        .unwrap();
    assert_eq!(state.followers, 1);
    assert_eq!(store.edge_count(ArtisanId::new(7)), 1);
}

#[tokio::test]
async fn is_following_tracks_edge_membership() {
    let store = MemoryStore::new();
    store.insert_artisan(ArtisanId::new(7), "Clay & Co");
    let alice = buyer(1, "Alice");

    assert!(!store.is_following(alice.id, ArtisanId::new(7)).await.unwrap());

    let ledger = FollowLedger::new(&store);
    ledger.follow(&alice, ArtisanId::new(7)).await.unwrap();
    assert!(store.is_following(alice.id, ArtisanId::new(7)).await.unwrap());

    // Only this viewer's edge counts.
    assert!(!store.is_following(UserId::new(2), ArtisanId::new(7)).await.unwrap());

    ledger.unfollow(&alice, ArtisanId::new(7)).await.unwrap();
    assert!(!store.is_following(alice.id, ArtisanId::new(7)).await.unwrap());
}

#[tokio::test]
async fn unfollow_removes_edge_and_decrements_counter() {
    let store = MemoryStore::new();
    store.insert_artisan(ArtisanId::new(7), "Clay & Co");
    let alice = buyer(1, "Alice");

    let ledger = FollowLedger::new(&store);
    ledger.follow(&alice, ArtisanId::new(7)).await.unwrap();
    let state = ledger.unfollow(&alice, ArtisanId::new(7)).await.unwrap();

    assert!(!state.following);
    assert_eq!(state.followers, 0);
    assert_eq!(store.edge_count(ArtisanId::new(7)), 0);
}

#[tokio::test]
async fn unfollow_without_edge_never_goes_negative() {
    let store = MemoryStore::new();
    store.insert_artisan(ArtisanId::new(7), "Clay & Co");
    let alice = buyer(1, "Alice");

    let ledger = FollowLedger::new(&store);
    let state = ledger.unfollow(&alice, ArtisanId::new(7)).await.unwrap();

    assert!(!state.following);
    assert_eq!(state.followers, 0);

    // The real count is untouched.
    let artisan = store.get_artisan(ArtisanId::new(7)).await.unwrap().unwrap();
    assert_eq!(artisan.followers, 0);
}

#[tokio::test]
async fn unfollow_tolerates_missing_artisan_record() {
    let store = MemoryStore::new();
    store.insert_artisan(ArtisanId::new(7), "Clay & Co");
    let alice = buyer(1, "Alice");

    let ledger = FollowLedger::new(&store);
    ledger.follow(&alice, ArtisanId::new(7)).await.unwrap();

    // The artisan disappears; the user can still clean up their side.
    store.remove_artisan(ArtisanId::new(7));
    let state = ledger.unfollow(&alice, ArtisanId::new(7)).await.unwrap();

    assert!(!state.following);
    assert_eq!(store.edge_count(ArtisanId::new(7)), 0);
}

#[tokio::test]
async fn counters_are_independent_per_artisan() {
    let store = MemoryStore::new();
    store.insert_artisan(ArtisanId::new(7), "Clay & Co");
    store.insert_artisan(ArtisanId::new(8), "Glaze House");
    let alice = buyer(1, "Alice");

    let ledger = FollowLedger::new(&store);
    ledger.follow(&alice, ArtisanId::new(7)).await.unwrap();

    let other = store.get_artisan(ArtisanId::new(8)).await.unwrap().unwrap();
    assert_eq!(other.followers, 0);
}
