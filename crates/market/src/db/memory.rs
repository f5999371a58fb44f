//! In-memory store implementing every storage trait.
//!
//! Backs the test suite (and local experimentation) with the same atomicity
//! semantics as the `PostgreSQL` implementations: the whole mutation happens
//! under one lock, so partially-applied writes are never observable.
//!
//! `fail_orders_for` lets tests inject a per-seller write failure to
//! exercise the checkout transactor's partial-failure accounting.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use terracotta_core::{ArtisanId, NotificationId, OrderId, OrderStatus, UserId};

use super::follows::{FollowState, FollowStore};
use super::notifications::NotificationStore;
use super::orders::OrderStore;
use super::RepositoryError;
use crate::models::{Artisan, NewNotification, NewOrder, Notification, Order};

#[derive(Default)]
struct Inner {
    artisans: BTreeMap<ArtisanId, Artisan>,
    follows: BTreeSet<(UserId, ArtisanId)>,
    orders: Vec<Order>,
    notifications: Vec<Notification>,
    failing_sellers: BTreeSet<ArtisanId>,
}

/// Shared in-memory store.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register an artisan with a zero follower count.
    pub fn insert_artisan(&self, id: ArtisanId, name: &str) {
        self.lock().artisans.insert(
            id,
            Artisan {
                id,
                name: name.to_string(),
                followers: 0,
            },
        );
    }

    /// Remove an artisan record, leaving any follow edges behind.
    ///
    /// Used to exercise the unfollow path that tolerates a missing artisan.
    pub fn remove_artisan(&self, id: ArtisanId) {
        self.lock().artisans.remove(&id);
    }

    /// Make order writes for this seller fail with a storage error.
    pub fn fail_orders_for(&self, seller_id: ArtisanId) {
        self.lock().failing_sellers.insert(seller_id);
    }

    /// Snapshot of all persisted orders, in creation order.
    #[must_use]
    pub fn orders(&self) -> Vec<Order> {
        self.lock().orders.clone()
    }

    /// Number of follow edges pointing at an artisan.
    #[must_use]
    pub fn edge_count(&self, artisan_id: ArtisanId) -> usize {
        self.lock()
            .follows
            .iter()
            .filter(|(_, a)| *a == artisan_id)
            .count()
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn create_order_with_notification(
        &self,
        order: NewOrder,
        notification: NewNotification,
    ) -> Result<(), RepositoryError> {
        let mut inner = self.lock();

        if inner.failing_sellers.contains(&order.seller_id) {
            // Simulated storage failure: neither write is applied.
            return Err(RepositoryError::Database(sqlx::Error::PoolClosed));
        }

        let now = Utc::now();
        inner.orders.push(Order {
            id: order.id,
            buyer_id: order.buyer_id,
            seller_id: order.seller_id,
            lines: order.lines,
            total_amount: order.total_amount,
            status: OrderStatus::Pending,
            shipping_address: order.shipping_address,
            created_at: now,
        });
        inner.notifications.push(Notification {
            id: NotificationId::generate(),
            artisan_id: notification.artisan_id,
            kind: notification.kind,
            title: notification.title,
            body: notification.body,
            sender: notification.sender,
            link: notification.link,
            read: false,
            created_at: now,
        });

        Ok(())
    }

    async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        Ok(self.lock().orders.iter().find(|o| o.id == id).cloned())
    }

    async fn list_for_buyer(&self, buyer_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        Ok(self
            .lock()
            .orders
            .iter()
            .rev()
            .filter(|o| o.buyer_id == buyer_id)
            .cloned()
            .collect())
    }

    async fn list_for_seller(&self, seller_id: ArtisanId) -> Result<Vec<Order>, RepositoryError> {
        Ok(self
            .lock()
            .orders
            .iter()
            .rev()
            .filter(|o| o.seller_id == seller_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl FollowStore for MemoryStore {
    async fn get_artisan(&self, id: ArtisanId) -> Result<Option<Artisan>, RepositoryError> {
        Ok(self.lock().artisans.get(&id).cloned())
    }

    async fn is_following(
        &self,
        user_id: UserId,
        artisan_id: ArtisanId,
    ) -> Result<bool, RepositoryError> {
        Ok(self.lock().follows.contains(&(user_id, artisan_id)))
    }

    async fn follow(
        &self,
        user_id: UserId,
        artisan_id: ArtisanId,
    ) -> Result<FollowState, RepositoryError> {
        let mut inner = self.lock();
        let inner = &mut *inner;

        // Existence is checked before the edge write, so a failed follow
        // leaves nothing behind.
        let Some(artisan) = inner.artisans.get_mut(&artisan_id) else {
            return Err(RepositoryError::NotFound);
        };
        let inserted = inner.follows.insert((user_id, artisan_id));
        if inserted {
            artisan.followers += 1;
        }

        Ok(FollowState {
            following: true,
            followers: artisan.followers,
        })
    }

    async fn unfollow(
        &self,
        user_id: UserId,
        artisan_id: ArtisanId,
    ) -> Result<FollowState, RepositoryError> {
        let mut inner = self.lock();

        let removed = inner.follows.remove(&(user_id, artisan_id));
        let followers = match inner.artisans.get_mut(&artisan_id) {
            Some(artisan) => {
                if removed {
                    artisan.followers = artisan.followers.saturating_sub(1);
                }
                artisan.followers
            }
            None => {
                tracing::warn!(%artisan_id, "unfollow: artisan record missing, edge removed");
                0
            }
        };

        Ok(FollowState {
            following: false,
            followers,
        })
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn create(
        &self,
        notification: NewNotification,
    ) -> Result<Notification, RepositoryError> {
        let created = Notification {
            id: NotificationId::generate(),
            artisan_id: notification.artisan_id,
            kind: notification.kind,
            title: notification.title,
            body: notification.body,
            sender: notification.sender,
            link: notification.link,
            read: false,
            created_at: Utc::now(),
        };
        self.lock().notifications.push(created.clone());
        Ok(created)
    }

    async fn list_by_artisan(
        &self,
        artisan_id: ArtisanId,
    ) -> Result<Vec<Notification>, RepositoryError> {
        Ok(self
            .lock()
            .notifications
            .iter()
            .rev()
            .filter(|n| n.artisan_id == artisan_id)
            .cloned()
            .collect())
    }

    async fn set_read(&self, id: NotificationId, read: bool) -> Result<(), RepositoryError> {
        let mut inner = self.lock();
        let Some(notification) = inner.notifications.iter_mut().find(|n| n.id == id) else {
            return Err(RepositoryError::NotFound);
        };
        notification.read = read;
        Ok(())
    }

    async fn mark_all_read(&self, artisan_id: ArtisanId) -> Result<u64, RepositoryError> {
        let mut inner = self.lock();
        let mut flipped = 0;
        for notification in inner
            .notifications
            .iter_mut()
            .filter(|n| n.artisan_id == artisan_id && !n.read)
        {
            notification.read = true;
            flipped += 1;
        }
        Ok(flipped)
    }

    async fn clear_all(&self, artisan_id: ArtisanId) -> Result<u64, RepositoryError> {
        let mut inner = self.lock();
        let before = inner.notifications.len();
        inner.notifications.retain(|n| n.artisan_id != artisan_id);
        Ok((before - inner.notifications.len()) as u64)
    }
}
