//! Cart domain types and stock-aware mutation rules.
//!
//! The cart is owned by a single browsing session. It is serialized into the
//! session record after every mutation, so it survives reloads but is never
//! shared across devices. All mutation rules live here, on the plain domain
//! type, so they can be tested without a running server.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use terracotta_core::{ArtisanId, Price, ProductId};

/// Catalog snapshot consumed when adding a product to the cart.
///
/// Captured at add-to-cart time; prices are never recomputed from the
/// catalog after capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSnapshot {
    /// Catalog product ID.
    pub id: ProductId,
    /// Product display name.
    pub name: String,
    /// Unit price at the time of capture.
    pub unit_price: Price,
    /// Known stock bound, if the catalog reported one.
    pub stock: Option<u32>,
    /// Selling artisan. Checkout requires this to be present.
    pub seller_id: Option<ArtisanId>,
    /// Primary product image URL.
    pub image: Option<String>,
}

/// One buyer-selected product + quantity awaiting checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Price,
    pub quantity: u32,
    pub seller_id: Option<ArtisanId>,
    /// Stock bound snapshotted at add time; `quantity <= stock` whenever known.
    pub stock: Option<u32>,
    pub image: Option<String>,
}

impl CartLine {
    /// Total for this line (unit price x quantity).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price.line_total(self.quantity)
    }
}

/// Cart mutation rejections.
///
/// These are recoverable by design: the cart is left exactly as it was and
/// the caller renders the reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// Requested quantity was zero on add (removal goes through
    /// `update_quantity` or `remove_item`).
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// Unit price must be strictly positive.
    #[error("{name} has no valid price")]
    InvalidUnitPrice { name: String },

    /// Merging the requested quantity into an existing line would exceed the
    /// known stock bound.
    #[error("only {stock} of {name} in stock ({in_cart} already in your cart)")]
    StockExceeded {
        name: String,
        stock: u32,
        in_cart: u32,
    },

    /// A brand-new line was requested with more than the known stock bound.
    #[error("only {stock} of {name} in stock")]
    NewLineStockExceeded { name: String, stock: u32 },

    /// The referenced line is not in the cart.
    #[error("product {product_id} is not in the cart")]
    UnknownProduct { product_id: ProductId },
}

/// Ordered collection of cart lines, unique by product ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Current lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Look up a line by product ID.
    #[must_use]
    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    /// Add `quantity` units of a product, merging with any existing line.
    ///
    /// If a known stock bound would be exceeded, the operation is rejected
    /// whole (no partial add) and the existing line is left unchanged. The
    /// error distinguishes merging into an existing line from a new line so
    /// the caller can explain the limit.
    ///
    /// # Errors
    ///
    /// Returns `CartError` on invalid quantity/price or a stock rejection.
    pub fn add_item(&mut self, product: &ProductSnapshot, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }
        if !product.unit_price.is_positive() {
            return Err(CartError::InvalidUnitPrice {
                name: product.name.clone(),
            });
        }

        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product.id) {
            let merged = line.quantity.saturating_add(quantity);
            if let Some(stock) = line.stock
                && merged > stock
            {
                return Err(CartError::StockExceeded {
                    name: line.name.clone(),
                    stock,
                    in_cart: line.quantity,
                });
            }
            line.quantity = merged;
            return Ok(());
        }

        if let Some(stock) = product.stock
            && quantity > stock
        {
            return Err(CartError::NewLineStockExceeded {
                name: product.name.clone(),
                stock,
            });
        }

        self.lines.push(CartLine {
            product_id: product.id,
            name: product.name.clone(),
            unit_price: product.unit_price,
            quantity,
            seller_id: product.seller_id,
            stock: product.stock,
            image: product.image.clone(),
        });
        Ok(())
    }

    /// Set the quantity of an existing line.
    ///
    /// A quantity of zero removes the line (a policy choice, not an error).
    /// Exceeding a known stock bound is rejected, the same policy as
    /// `add_item`.
    ///
    /// # Errors
    ///
    /// Returns `CartError::UnknownProduct` if the line does not exist, or a
    /// stock rejection.
    pub fn update_quantity(
        &mut self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), CartError> {
        if quantity == 0 {
            if !self.remove_item(product_id) {
                return Err(CartError::UnknownProduct { product_id });
            }
            return Ok(());
        }

        let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) else {
            return Err(CartError::UnknownProduct { product_id });
        };

        if let Some(stock) = line.stock
            && quantity > stock
        {
            return Err(CartError::StockExceeded {
                name: line.name.clone(),
                stock,
                in_cart: line.quantity,
            });
        }

        line.quantity = quantity;
        Ok(())
    }

    /// Remove a line. Returns whether a line was removed.
    pub fn remove_item(&mut self, product_id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);
        self.lines.len() != before
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of unit price x quantity over all lines.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terracotta_core::CurrencyCode;

    fn snapshot(id: i32, name: &str, price_cents: i64, stock: Option<u32>) -> ProductSnapshot {
        ProductSnapshot {
            id: ProductId::new(id),
            name: name.to_string(),
            unit_price: Price::new(Decimal::new(price_cents, 2), CurrencyCode::USD),
            stock,
            seller_id: Some(ArtisanId::new(1)),
            image: None,
        }
    }

    #[test]
    fn test_add_merges_existing_line() {
        let mut cart = Cart::new();
        let mug = snapshot(1, "Mug", 1000, None);
        cart.add_item(&mug, 2).expect("add");
        cart.add_item(&mug, 3).expect("add again");

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.count(), 5);
        assert_eq!(cart.total(), Decimal::new(5000, 2));
    }

    #[test]
    fn test_add_rejects_beyond_stock_and_leaves_line_unchanged() {
        let mut cart = Cart::new();
        let vase = snapshot(1, "Vase", 2500, Some(3));
        cart.add_item(&vase, 2).expect("add");

        let err = cart.add_item(&vase, 2).expect_err("should exceed stock");
        assert_eq!(
            err,
            CartError::StockExceeded {
                name: "Vase".to_string(),
                stock: 3,
                in_cart: 2,
            }
        );
        // Line remains at qty 2, not 4
        assert_eq!(cart.line(ProductId::new(1)).map(|l| l.quantity), Some(2));
    }

    #[test]
    fn test_add_new_line_beyond_stock_distinct_reason() {
        let mut cart = Cart::new();
        let bowl = snapshot(2, "Bowl", 1500, Some(1));
        let err = cart.add_item(&bowl, 2).expect_err("should reject");
        assert_eq!(
            err,
            CartError::NewLineStockExceeded {
                name: "Bowl".to_string(),
                stock: 1,
            }
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_to_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add_item(&snapshot(1, "Mug", 1000, None), 2).expect("add");
        cart.update_quantity(ProductId::new(1), 0).expect("update");
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_beyond_stock_rejected() {
        let mut cart = Cart::new();
        cart.add_item(&snapshot(1, "Mug", 1000, Some(5)), 2)
            .expect("add");
        let err = cart
            .update_quantity(ProductId::new(1), 9)
            .expect_err("should reject");
        assert!(matches!(err, CartError::StockExceeded { stock: 5, .. }));
        assert_eq!(cart.count(), 2);
    }

    #[test]
    fn test_update_unknown_product() {
        let mut cart = Cart::new();
        let err = cart
            .update_quantity(ProductId::new(9), 1)
            .expect_err("missing line");
        assert!(matches!(err, CartError::UnknownProduct { .. }));
    }

    #[test]
    fn test_zero_quantity_add_rejected() {
        let mut cart = Cart::new();
        let err = cart
            .add_item(&snapshot(1, "Mug", 1000, None), 0)
            .expect_err("zero qty");
        assert_eq!(err, CartError::InvalidQuantity);
    }

    #[test]
    fn test_non_positive_price_rejected() {
        let mut cart = Cart::new();
        let free = snapshot(1, "Freebie", 0, None);
        let err = cart.add_item(&free, 1).expect_err("zero price");
        assert!(matches!(err, CartError::InvalidUnitPrice { .. }));
    }

    #[test]
    fn test_count_and_total_invariants_across_operations() {
        let mut cart = Cart::new();
        cart.add_item(&snapshot(1, "Mug", 1000, None), 2).expect("add");
        cart.add_item(&snapshot(2, "Bowl", 3000, None), 1).expect("add");

        assert_eq!(cart.count(), 3);
        assert_eq!(cart.total(), Decimal::new(5000, 2));

        cart.update_quantity(ProductId::new(1), 1).expect("update");
        assert_eq!(cart.count(), 2);
        assert_eq!(cart.total(), Decimal::new(4000, 2));

        cart.remove_item(ProductId::new(2));
        assert_eq!(cart.count(), 1);
        assert_eq!(cart.total(), Decimal::new(1000, 2));

        cart.clear();
        assert_eq!(cart.count(), 0);
        assert_eq!(cart.total(), Decimal::ZERO);
    }
}
