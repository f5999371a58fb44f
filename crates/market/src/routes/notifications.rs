//! Notification inbox routes (seller-facing).

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use terracotta_core::{ArtisanId, NotificationId};

use crate::db::{NotificationStore, PgNotificationStore, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{CurrentUser, Notification};
use crate::state::AppState;

fn artisan_of(user: &CurrentUser) -> Result<ArtisanId> {
    user.artisan_id
        .ok_or_else(|| AppError::InvalidRequest("you do not have an artisan profile".to_string()))
}

/// Set-read request body.
#[derive(Debug, Deserialize)]
pub struct SetReadRequest {
    pub read: bool,
}

/// Bulk operation result.
#[derive(Debug, Serialize)]
pub struct BulkResult {
    pub affected: u64,
}

/// The artisan's inbox, most recent first.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Notification>>> {
    let artisan_id = artisan_of(&user)?;
    let store = PgNotificationStore::new(state.pool().clone());
    Ok(Json(store.list_by_artisan(artisan_id).await?))
}

/// Flip the read flag on one notification. Idempotent.
#[instrument(skip(state))]
pub async fn set_read(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<Uuid>,
    Json(request): Json<SetReadRequest>,
) -> Result<Json<BulkResult>> {
    artisan_of(&user)?;
    let store = PgNotificationStore::new(state.pool().clone());
    match store.set_read(NotificationId::new(id), request.read).await {
        Ok(()) => Ok(Json(BulkResult { affected: 1 })),
        Err(RepositoryError::NotFound) => Err(AppError::NotFound(format!("notification {id}"))),
        Err(e) => Err(e.into()),
    }
}

/// Mark every notification read, all-or-nothing.
#[instrument(skip(state))]
pub async fn read_all(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<BulkResult>> {
    let artisan_id = artisan_of(&user)?;
    let store = PgNotificationStore::new(state.pool().clone());
    let affected = store.mark_all_read(artisan_id).await?;
    Ok(Json(BulkResult { affected }))
}

/// Delete every notification, all-or-nothing.
#[instrument(skip(state))]
pub async fn clear(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<BulkResult>> {
    let artisan_id = artisan_of(&user)?;
    let store = PgNotificationStore::new(state.pool().clone());
    let affected = store.clear_all(artisan_id).await?;
    Ok(Json(BulkResult { affected }))
}
