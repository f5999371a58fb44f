//! Cart route handlers.
//!
//! The cart is session-scoped; every mutation persists the cart back into
//! the session before the response is produced. A failed persist is reported
//! to the caller while the in-memory mutation stands (last-write-wins).

use axum::Json;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use terracotta_core::ProductId;

use crate::error::{AppError, Result};
use crate::models::{Cart, CartLine, ProductSnapshot};
use crate::services::cart as cart_session;

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub image: Option<String>,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id,
            name: line.name.clone(),
            quantity: line.quantity,
            price: line.unit_price.display(),
            line_price: format!(
                "{}{:.2}",
                line.unit_price.currency_code.symbol(),
                line.line_total()
            ),
            image: line.image.clone(),
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        let currency = cart
            .lines()
            .first()
            .map_or("$", |l| l.unit_price.currency_code.symbol());
        Self {
            items: cart.lines().iter().map(CartItemView::from).collect(),
            subtotal: format!("{currency}{:.2}", cart.total()),
            item_count: cart.count(),
        }
    }
}

/// Add to cart request.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    /// Catalog snapshot of the product being added.
    pub product: ProductSnapshot,
    pub quantity: Option<u32>,
}

/// Update quantity request.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Remove line request.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartRequest {
    pub product_id: ProductId,
}

/// Cart count badge value.
#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: u32,
}

/// Display the cart.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Json<CartView> {
    let cart = cart_session::load(&session).await;
    Json(CartView::from(&cart))
}

/// Add an item to the cart.
///
/// A stock rejection leaves the cart unchanged and explains the limit.
#[instrument(skip(session, request))]
pub async fn add(
    session: Session,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartView>> {
    let mut cart = cart_session::load(&session).await;
    cart.add_item(&request.product, request.quantity.unwrap_or(1))?;
    cart_session::save(&session, &cart).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Set the quantity of a cart line. Quantity zero removes the line.
#[instrument(skip(session))]
pub async fn update(
    session: Session,
    Json(request): Json<UpdateCartRequest>,
) -> Result<Json<CartView>> {
    let mut cart = cart_session::load(&session).await;
    cart.update_quantity(request.product_id, request.quantity)?;
    cart_session::save(&session, &cart).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Remove a line from the cart.
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Json(request): Json<RemoveFromCartRequest>,
) -> Result<Json<CartView>> {
    let mut cart = cart_session::load(&session).await;
    if !cart.remove_item(request.product_id) {
        return Err(AppError::NotFound(format!(
            "product {} is not in the cart",
            request.product_id
        )));
    }
    cart_session::save(&session, &cart).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Json<CartView>> {
    let mut cart = cart_session::load(&session).await;
    cart.clear();
    cart_session::save(&session, &cart).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Cart count badge.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Json<CartCount> {
    let cart = cart_session::load(&session).await;
    Json(CartCount { count: cart.count() })
}
