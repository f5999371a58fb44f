//! Checkout route handler.

use axum::{Json, extract::State};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::db::PgOrderStore;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::services::cart as cart_session;
use crate::services::{CheckoutReceipt, CheckoutTransactor};
use crate::state::AppState;

/// Checkout request body.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub shipping_address: String,
}

/// Run the checkout transactor over the session's cart.
///
/// The cart is cleared only on full success; on partial failure the
/// response reports how many seller orders were created so the buyer is
/// not misled about what was recorded.
#[instrument(skip(state, session, request))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<CheckoutReceipt>> {
    let shipping_address = request.shipping_address.trim();
    if shipping_address.is_empty() {
        return Err(AppError::InvalidRequest(
            "shipping address is required".to_string(),
        ));
    }

    let mut cart = cart_session::load(&session).await;

    let transactor = CheckoutTransactor::new(PgOrderStore::new(state.pool().clone()));
    let receipt = transactor.checkout(&user, &cart, shipping_address).await?;

    // Orders are durable at this point. A failed session write must not turn
    // the response into an error, but the stale cart is a duplicate risk, so
    // it is logged loudly.
    cart.clear();
    if let Err(e) = cart_session::save(&session, &cart).await {
        tracing::error!("failed to clear cart after checkout: {e}");
    }

    Ok(Json(receipt))
}
