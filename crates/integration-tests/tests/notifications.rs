//! Notification feed integration tests over the in-memory store.

use terracotta_core::{ArtisanId, NotificationId, NotificationKind};
use terracotta_market::db::{MemoryStore, NotificationStore, RepositoryError};
use terracotta_market::models::NewNotification;

fn note(artisan: i32, title: &str) -> NewNotification {
    NewNotification {
        artisan_id: ArtisanId::new(artisan),
        kind: NotificationKind::NewMessage,
        title: title.to_string(),
        body: format!("{title} body"),
        sender: Some("Alice".to_string()),
        link: None,
    }
}

#[tokio::test]
async fn new_notifications_start_unread() {
    let store = MemoryStore::new();

    let created = store.create(note(7, "Hello")).await.unwrap();

    assert!(!created.read);
    assert_eq!(created.title, "Hello");
}

#[tokio::test]
async fn feed_is_scoped_to_the_artisan() {
    let store = MemoryStore::new();
    store.create(note(7, "For seven")).await.unwrap();
    store.create(note(8, "For eight")).await.unwrap();

    let inbox = store.list_by_artisan(ArtisanId::new(7)).await.unwrap();

    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].title, "For seven");
}

#[tokio::test]
async fn set_read_flips_one_flag_both_ways() {
    let store = MemoryStore::new();
    let created = store.create(note(7, "Hello")).await.unwrap();

    store.set_read(created.id, true).await.unwrap();
    let inbox = store.list_by_artisan(ArtisanId::new(7)).await.unwrap();
    assert!(inbox[0].read);

    store.set_read(created.id, false).await.unwrap();
    let inbox = store.list_by_artisan(ArtisanId::new(7)).await.unwrap();
    assert!(!inbox[0].read);
}

#[tokio::test]
async fn set_read_on_missing_notification_is_not_found() {
    let store = MemoryStore::new();

    let err = store
        .set_read(NotificationId::generate(), true)
        .await
        .unwrap_err();

    assert!(matches!(err, RepositoryError::NotFound));
}

#[tokio::test]
async fn mark_all_read_leaves_no_unread_entries() {
    let store = MemoryStore::new();
    store.create(note(7, "One")).await.unwrap();
    store.create(note(7, "Two")).await.unwrap();
    let already_read = store.create(note(7, "Three")).await.unwrap();
    store.set_read(already_read.id, true).await.unwrap();
    store.create(note(8, "Elsewhere")).await.unwrap();

    let flipped = store.mark_all_read(ArtisanId::new(7)).await.unwrap();

    // Only the two unread entries count as flipped.
    assert_eq!(flipped, 2);
    let inbox = store.list_by_artisan(ArtisanId::new(7)).await.unwrap();
    assert!(inbox.iter().all(|n| n.read));

    // The other artisan's inbox is untouched.
    let other = store.list_by_artisan(ArtisanId::new(8)).await.unwrap();
    assert!(!other[0].read);
}

#[tokio::test]
async fn clear_all_empties_only_this_inbox() {
    let store = MemoryStore::new();
    store.create(note(7, "One")).await.unwrap();
    store.create(note(7, "Two")).await.unwrap();
    store.create(note(8, "Elsewhere")).await.unwrap();

    let removed = store.clear_all(ArtisanId::new(7)).await.unwrap();

    assert_eq!(removed, 2);
    assert!(store.list_by_artisan(ArtisanId::new(7)).await.unwrap().is_empty());
    assert_eq!(store.list_by_artisan(ArtisanId::new(8)).await.unwrap().len(), 1);
}

#[tokio::test]
async fn bulk_operations_on_empty_inbox_affect_nothing() {
    let store = MemoryStore::new();

    assert_eq!(store.mark_all_read(ArtisanId::new(7)).await.unwrap(), 0);
    assert_eq!(store.clear_all(ArtisanId::new(7)).await.unwrap(), 0);
}
