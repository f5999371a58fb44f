//! Follow ledger repository.
//!
//! The `artisans.followers` counter is denormalized over `market.follows`.
//! Every edge write and its counter update happen in one transaction, and
//! the counter is only incremented when an edge row was actually inserted,
//! so repeated follows stay idempotent.

use async_trait::async_trait;
use serde::Serialize;
use sqlx::PgPool;

use terracotta_core::{ArtisanId, UserId};

use super::RepositoryError;
use crate::models::Artisan;

/// Confirmed follow state, reported only after the transaction commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FollowState {
    /// Whether the user now follows the artisan.
    pub following: bool,
    /// The artisan's confirmed follower count.
    pub followers: u32,
}

/// Storage contract for the follow ledger.
#[async_trait]
pub trait FollowStore: Send + Sync {
    /// Fetch an artisan profile.
    async fn get_artisan(&self, id: ArtisanId) -> Result<Option<Artisan>, RepositoryError>;

    /// Whether the user currently follows the artisan.
    async fn is_following(
        &self,
        user_id: UserId,
        artisan_id: ArtisanId,
    ) -> Result<bool, RepositoryError>;

    /// Add a follow edge, incrementing the counter only if the edge was new.
    ///
    /// Atomic: either both the edge and the counter change, or neither does.
    async fn follow(
        &self,
        user_id: UserId,
        artisan_id: ArtisanId,
    ) -> Result<FollowState, RepositoryError>;

    /// Remove a follow edge, decrementing the counter (clamped at zero) only
    /// if an edge was removed. Tolerates a missing artisan record: the edge
    /// is still cleaned up.
    async fn unfollow(
        &self,
        user_id: UserId,
        artisan_id: ArtisanId,
    ) -> Result<FollowState, RepositoryError>;
}

#[async_trait]
impl<S: FollowStore + ?Sized> FollowStore for &S {
    async fn get_artisan(&self, id: ArtisanId) -> Result<Option<Artisan>, RepositoryError> {
        (**self).get_artisan(id).await
    }

    async fn is_following(
        &self,
        user_id: UserId,
        artisan_id: ArtisanId,
    ) -> Result<bool, RepositoryError> {
        (**self).is_following(user_id, artisan_id).await
    }

    async fn follow(
        &self,
        user_id: UserId,
        artisan_id: ArtisanId,
    ) -> Result<FollowState, RepositoryError> {
        (**self).follow(user_id, artisan_id).await
    }

    async fn unfollow(
        &self,
        user_id: UserId,
        artisan_id: ArtisanId,
    ) -> Result<FollowState, RepositoryError> {
        (**self).unfollow(user_id, artisan_id).await
    }
}

/// `PostgreSQL`-backed follow store.
#[derive(Clone)]
pub struct PgFollowStore {
    pool: PgPool,
}

impl PgFollowStore {
    /// Create a new follow store over a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn followers_from_row(count: i32) -> u32 {
    u32::try_from(count).unwrap_or(0)
}

#[async_trait]
impl FollowStore for PgFollowStore {
    async fn get_artisan(&self, id: ArtisanId) -> Result<Option<Artisan>, RepositoryError> {
        let row: Option<(i32, String, i32)> =
            sqlx::query_as("SELECT id, name, followers FROM market.artisans WHERE id = $1")
                .bind(id.as_i32())
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(id, name, followers)| Artisan {
            id: ArtisanId::new(id),
            name,
            followers: followers_from_row(followers),
        }))
    }

    async fn is_following(
        &self,
        user_id: UserId,
        artisan_id: ArtisanId,
    ) -> Result<bool, RepositoryError> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM market.follows WHERE user_id = $1 AND artisan_id = $2)",
        )
        .bind(user_id.as_i32())
        .bind(artisan_id.as_i32())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn follow(
        &self,
        user_id: UserId,
        artisan_id: ArtisanId,
    ) -> Result<FollowState, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // ON CONFLICT keeps the double-follow case a no-op for the edge; the
        // counter moves only when a row was actually inserted.
        let inserted = sqlx::query(
            r"
            INSERT INTO market.follows (user_id, artisan_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, artisan_id) DO NOTHING
            ",
        )
        .bind(user_id.as_i32())
        .bind(artisan_id.as_i32())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let followers = if inserted > 0 {
            let row: Option<(i32,)> = sqlx::query_as(
                "UPDATE market.artisans SET followers = followers + 1 WHERE id = $1 RETURNING followers",
            )
            .bind(artisan_id.as_i32())
            .fetch_optional(&mut *tx)
            .await?;
            row.ok_or(RepositoryError::NotFound)?.0
        } else {
            let row: Option<(i32,)> =
                sqlx::query_as("SELECT followers FROM market.artisans WHERE id = $1")
                    .bind(artisan_id.as_i32())
                    .fetch_optional(&mut *tx)
                    .await?;
            row.ok_or(RepositoryError::NotFound)?.0
        };

        tx.commit().await?;

        Ok(FollowState {
            following: true,
            followers: followers_from_row(followers),
        })
    }

    async fn unfollow(
        &self,
        user_id: UserId,
        artisan_id: ArtisanId,
    ) -> Result<FollowState, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query(
            "DELETE FROM market.follows WHERE user_id = $1 AND artisan_id = $2",
        )
        .bind(user_id.as_i32())
        .bind(artisan_id.as_i32())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let followers = if removed > 0 {
            let row: Option<(i32,)> = sqlx::query_as(
                r"
                UPDATE market.artisans
                SET followers = GREATEST(followers - 1, 0)
                WHERE id = $1
                RETURNING followers
                ",
            )
            .bind(artisan_id.as_i32())
            .fetch_optional(&mut *tx)
            .await?;
            match row {
                Some((followers,)) => followers,
                None => {
                    // Artisan record gone; the user's side is still cleaned up.
                    tracing::warn!(%artisan_id, "unfollow: artisan record missing, edge removed");
                    0
                }
            }
        } else {
            let row: Option<(i32,)> =
                sqlx::query_as("SELECT followers FROM market.artisans WHERE id = $1")
                    .bind(artisan_id.as_i32())
                    .fetch_optional(&mut *tx)
                    .await?;
            row.map_or(0, |(followers,)| followers)
        };

        tx.commit().await?;

        Ok(FollowState {
            following: false,
            followers: followers_from_row(followers),
        })
    }
}
