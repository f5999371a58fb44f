//! Artisan profile and follow routes.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::instrument;

use terracotta_core::ArtisanId;

use crate::db::{FollowState, FollowStore, PgFollowStore};
use crate::error::{AppError, Result};
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::services::FollowLedger;
use crate::state::AppState;

/// Artisan profile as shown to a (possibly anonymous) viewer.
#[derive(Debug, Serialize)]
pub struct ArtisanProfile {
    pub id: ArtisanId,
    pub name: String,
    pub followers: u32,
    /// Whether the viewer follows this artisan; always false when anonymous.
    pub following: bool,
}

/// Artisan profile (name, confirmed follower count, viewer follow state).
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(viewer): OptionalAuth,
    Path(id): Path<i32>,
) -> Result<Json<ArtisanProfile>> {
    let store = PgFollowStore::new(state.pool().clone());
    let artisan_id = ArtisanId::new(id);
    let artisan = store
        .get_artisan(artisan_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("artisan {id}")))?;

    let following = match viewer {
        Some(user) => store.is_following(user.id, artisan_id).await?,
        None => false,
    };

    Ok(Json(ArtisanProfile {
        id: artisan.id,
        name: artisan.name,
        followers: artisan.followers,
        following,
    }))
}

/// Follow an artisan. Idempotent; reports the confirmed follower count.
#[instrument(skip(state))]
pub async fn follow(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i32>,
) -> Result<Json<FollowState>> {
    let ledger = FollowLedger::new(PgFollowStore::new(state.pool().clone()));
    let followed = ledger.follow(&user, ArtisanId::new(id)).await?;
    Ok(Json(followed))
}

/// Unfollow an artisan. The counter never goes negative.
#[instrument(skip(state))]
pub async fn unfollow(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i32>,
) -> Result<Json<FollowState>> {
    let ledger = FollowLedger::new(PgFollowStore::new(state.pool().clone()));
    let unfollowed = ledger.unfollow(&user, ArtisanId::new(id)).await?;
    Ok(Json(unfollowed))
}
