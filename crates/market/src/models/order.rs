//! Order domain types.
//!
//! An order is the persisted result of one (checkout, seller) pair. Its
//! total is fixed at creation time from the cart's captured prices and is
//! never recomputed from the catalog.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use terracotta_core::{ArtisanId, OrderId, OrderStatus, Price, ProductId, UserId};

/// A captured order line item.
///
/// `unit_price_at_purchase` is the price the buyer saw; later catalog price
/// changes do not affect it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub unit_price_at_purchase: Price,
    pub image: Option<String>,
}

impl OrderLine {
    /// Total for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price_at_purchase.line_total(self.quantity)
    }
}

/// A persisted order (domain type).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub buyer_id: UserId,
    pub seller_id: ArtisanId,
    pub lines: Vec<OrderLine>,
    /// Fixed at creation; equals the sum of line totals.
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub shipping_address: String,
    pub created_at: DateTime<Utc>,
}

/// Parameters for persisting a new order.
///
/// The ID is generated by the checkout transactor so the caller can report
/// it even when a later seller bucket fails.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub id: OrderId,
    pub buyer_id: UserId,
    pub seller_id: ArtisanId,
    pub lines: Vec<OrderLine>,
    pub total_amount: Decimal,
    pub shipping_address: String,
}
