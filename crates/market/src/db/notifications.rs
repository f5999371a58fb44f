//! Notification feed repository.
//!
//! Append-only per-artisan inbox. Bulk operations are single statements, so
//! the all-or-nothing contract comes directly from the database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use terracotta_core::{ArtisanId, NotificationId, NotificationKind};

use super::RepositoryError;
use crate::models::{NewNotification, Notification};

/// Storage contract for the notification feed.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Append a notification. No dedup.
    async fn create(&self, notification: NewNotification)
    -> Result<Notification, RepositoryError>;

    /// All notifications for an artisan, most recent first.
    async fn list_by_artisan(
        &self,
        artisan_id: ArtisanId,
    ) -> Result<Vec<Notification>, RepositoryError>;

    /// Set the read flag on one notification. Idempotent.
    async fn set_read(&self, id: NotificationId, read: bool) -> Result<(), RepositoryError>;

    /// Mark every notification for an artisan read. Returns how many flipped.
    async fn mark_all_read(&self, artisan_id: ArtisanId) -> Result<u64, RepositoryError>;

    /// Delete every notification for an artisan. Returns how many were removed.
    async fn clear_all(&self, artisan_id: ArtisanId) -> Result<u64, RepositoryError>;
}

/// `PostgreSQL`-backed notification store.
#[derive(Clone)]
pub struct PgNotificationStore {
    pool: PgPool,
}

impl PgNotificationStore {
    /// Create a new notification store over a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Raw notification row; converted to the domain type after decoding.
#[derive(sqlx::FromRow)]
struct NotificationRow {
    id: Uuid,
    artisan_id: i32,
    kind: String,
    title: String,
    body: String,
    sender: Option<String>,
    link: Option<String>,
    read: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = RepositoryError;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        let kind = NotificationKind::parse(&row.kind).ok_or_else(|| {
            RepositoryError::DataCorruption(format!("unknown notification kind: {}", row.kind))
        })?;

        Ok(Self {
            id: NotificationId::new(row.id),
            artisan_id: ArtisanId::new(row.artisan_id),
            kind,
            title: row.title,
            body: row.body,
            sender: row.sender,
            link: row.link,
            read: row.read,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl NotificationStore for PgNotificationStore {
    async fn create(
        &self,
        notification: NewNotification,
    ) -> Result<Notification, RepositoryError> {
        let row: NotificationRow = sqlx::query_as(
            r"
            INSERT INTO market.notifications
                (id, artisan_id, kind, title, body, sender, link)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, artisan_id, kind, title, body, sender, link, read, created_at
            ",
        )
        .bind(NotificationId::generate().as_uuid())
        .bind(notification.artisan_id.as_i32())
        .bind(notification.kind.as_str())
        .bind(&notification.title)
        .bind(&notification.body)
        .bind(notification.sender.as_deref())
        .bind(notification.link.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Notification::try_from(row)
    }

    async fn list_by_artisan(
        &self,
        artisan_id: ArtisanId,
    ) -> Result<Vec<Notification>, RepositoryError> {
        let rows: Vec<NotificationRow> = sqlx::query_as(
            r"
            SELECT id, artisan_id, kind, title, body, sender, link, read, created_at
            FROM market.notifications
            WHERE artisan_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(artisan_id.as_i32())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Notification::try_from).collect()
    }

    async fn set_read(&self, id: NotificationId, read: bool) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE market.notifications SET read = $1 WHERE id = $2")
            .bind(read)
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn mark_all_read(&self, artisan_id: ArtisanId) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            "UPDATE market.notifications SET read = TRUE WHERE artisan_id = $1 AND read = FALSE",
        )
        .bind(artisan_id.as_i32())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn clear_all(&self, artisan_id: ArtisanId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM market.notifications WHERE artisan_id = $1")
            .bind(artisan_id.as_i32())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
