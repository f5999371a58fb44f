//! Checkout transactor: converts a cart into one order per seller.
//!
//! Each (seller, order, notification) unit is atomic at the storage layer;
//! across sellers there is deliberately no global transaction, because
//! sellers are independent. A failure partway through is therefore reported
//! as a partial result naming exactly which orders were created, never
//! papered over as all-or-nothing.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::instrument;

use terracotta_core::{ArtisanId, NotificationKind, OrderId, ProductId};

use crate::db::{OrderStore, RepositoryError};
use crate::models::{Cart, CartLine, CurrentUser, NewNotification, NewOrder, OrderLine};

/// Successful checkout result.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CheckoutReceipt {
    /// IDs of every created order, in seller order.
    pub order_ids: Vec<OrderId>,
    /// Human-readable confirmation.
    pub message: String,
}

/// Checkout failures.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart had no lines.
    #[error("cart is empty")]
    EmptyCart,

    /// A line is missing its seller; nothing was written.
    #[error("line item '{name}' ({product_id}) is missing a seller")]
    MissingSeller { product_id: ProductId, name: String },

    /// Storage failed before any order was created. Safe to retry whole.
    #[error("checkout failed: {0}")]
    Store(#[from] RepositoryError),

    /// Some seller orders were created, some were not. Not safely retryable
    /// as a whole; the caller must reconcile.
    #[error("{} of {} seller orders were created", created.len(), created.len() + failed_sellers)]
    Partial {
        /// Orders that did commit (with their notifications).
        created: Vec<OrderId>,
        /// Number of seller buckets that did not.
        failed_sellers: usize,
        /// The first storage error encountered.
        source: RepositoryError,
    },
}

/// The checkout transactor.
///
/// Stateless apart from its store handle; construct one per request.
pub struct CheckoutTransactor<S> {
    store: S,
}

impl<S: OrderStore> CheckoutTransactor<S> {
    /// Create a transactor over an order store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Convert the cart into one pending order per distinct seller.
    ///
    /// Preconditions are checked before any write: the cart must be
    /// non-empty and every line must carry a seller. (Authentication is the
    /// caller's precondition; an unauthenticated request never reaches this
    /// method.) The cart itself is not mutated - the caller clears it only
    /// on full success.
    ///
    /// Calling this twice with the same cart creates two independent sets of
    /// orders; duplicate submission is the caller's responsibility to
    /// prevent.
    ///
    /// # Errors
    ///
    /// See [`CheckoutError`].
    #[instrument(skip(self, cart), fields(buyer = %buyer.id, lines = cart.lines().len()))]
    pub async fn checkout(
        &self,
        buyer: &CurrentUser,
        cart: &Cart,
        shipping_address: &str,
    ) -> Result<CheckoutReceipt, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let buckets = partition_by_seller(cart)?;
        let total_sellers = buckets.len();
        let mut created: Vec<OrderId> = Vec::with_capacity(total_sellers);

        for (seller_id, lines) in buckets {
            let order = build_order(buyer, seller_id, &lines, shipping_address);
            let order_id = order.id;
            let notification = order_notification(buyer, &order);

            match self
                .store
                .create_order_with_notification(order, notification)
                .await
            {
                Ok(()) => created.push(order_id),
                Err(e) => {
                    tracing::error!(%seller_id, error = %e, "order write failed during checkout");
                    if created.is_empty() {
                        return Err(CheckoutError::Store(e));
                    }
                    return Err(CheckoutError::Partial {
                        failed_sellers: total_sellers - created.len(),
                        created,
                        source: e,
                    });
                }
            }
        }

        let message = if created.len() == 1 {
            "Your order has been placed".to_string()
        } else {
            format!("Your {} orders have been placed", created.len())
        };

        Ok(CheckoutReceipt {
            order_ids: created,
            message,
        })
    }
}

/// Group cart lines by seller, rejecting any line without one.
///
/// `BTreeMap` keeps the seller iteration order deterministic.
fn partition_by_seller(
    cart: &Cart,
) -> Result<BTreeMap<ArtisanId, Vec<&CartLine>>, CheckoutError> {
    let mut buckets: BTreeMap<ArtisanId, Vec<&CartLine>> = BTreeMap::new();
    for line in cart.lines() {
        let Some(seller_id) = line.seller_id else {
            return Err(CheckoutError::MissingSeller {
                product_id: line.product_id,
                name: line.name.clone(),
            });
        };
        buckets.entry(seller_id).or_default().push(line);
    }
    Ok(buckets)
}

/// Capture one seller's lines into an order with a fixed total.
fn build_order(
    buyer: &CurrentUser,
    seller_id: ArtisanId,
    lines: &[&CartLine],
    shipping_address: &str,
) -> NewOrder {
    let order_lines: Vec<OrderLine> = lines
        .iter()
        .map(|line| OrderLine {
            product_id: line.product_id,
            name: line.name.clone(),
            quantity: line.quantity,
            unit_price_at_purchase: line.unit_price,
            image: line.image.clone(),
        })
        .collect();

    let total_amount: Decimal = order_lines.iter().map(OrderLine::line_total).sum();

    NewOrder {
        id: OrderId::generate(),
        buyer_id: buyer.id,
        seller_id,
        lines: order_lines,
        total_amount,
        shipping_address: shipping_address.to_string(),
    }
}

/// The "new order" inbox entry for the seller.
fn order_notification(buyer: &CurrentUser, order: &NewOrder) -> NewNotification {
    let item_count: u32 = order.lines.iter().map(|l| l.quantity).sum();
    NewNotification {
        artisan_id: order.seller_id,
        kind: NotificationKind::NewOrder,
        title: "New order".to_string(),
        body: format!("{item_count} item(s) ordered by {}", buyer.name),
        sender: Some(buyer.name.clone()),
        link: Some(format!("/orders/{}", order.id)),
    }
}
