//! Order listing routes.
//!
//! Reads go straight to the durable store, so a successful checkout is
//! visible on the next request - there is no cache to invalidate.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;
use uuid::Uuid;

use terracotta_core::OrderId;

use crate::db::{OrderStore, PgOrderStore};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{CurrentUser, Order};
use crate::state::AppState;

fn artisan_of(user: &CurrentUser) -> Result<terracotta_core::ArtisanId> {
    user.artisan_id
        .ok_or_else(|| AppError::InvalidRequest("you do not have an artisan profile".to_string()))
}

/// The buyer's order history, most recent first.
#[instrument(skip(state))]
pub async fn mine(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Order>>> {
    let store = PgOrderStore::new(state.pool().clone());
    Ok(Json(store.list_for_buyer(user.id).await?))
}

/// Orders received by the seller, most recent first.
#[instrument(skip(state))]
pub async fn sold(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Order>>> {
    let artisan_id = artisan_of(&user)?;
    let store = PgOrderStore::new(state.pool().clone());
    Ok(Json(store.list_for_seller(artisan_id).await?))
}

/// One order, visible only to its buyer or seller.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>> {
    let store = PgOrderStore::new(state.pool().clone());
    let order = store
        .get(OrderId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    let is_buyer = order.buyer_id == user.id;
    let is_seller = user.artisan_id == Some(order.seller_id);
    if !is_buyer && !is_seller {
        // Don't reveal that the order exists
        return Err(AppError::NotFound(format!("order {id}")));
    }

    Ok(Json(order))
}
