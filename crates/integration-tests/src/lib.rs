//! Integration tests for Terracotta.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p terracotta-integration-tests
//! ```
//!
//! These tests drive the marketplace services end to end over the in-memory
//! store, which carries the same atomicity semantics as the Postgres
//! implementations. Database-backed tests require a live Postgres and live
//! elsewhere.
//!
//! The helpers here build the fixtures every scenario needs: catalog
//! snapshots, buyers, and sellers.

#![cfg_attr(not(test), forbid(unsafe_code))]

use rust_decimal::Decimal;

use terracotta_core::{ArtisanId, CurrencyCode, Price, ProductId, UserId};
use terracotta_market::models::{CurrentUser, ProductSnapshot};

/// A catalog snapshot with a known seller and stock bound.
#[must_use]
pub fn product(id: i32, name: &str, price_cents: i64, seller: i32, stock: u32) -> ProductSnapshot {
    ProductSnapshot {
        id: ProductId::new(id),
        name: name.to_string(),
        unit_price: Price::new(Decimal::new(price_cents, 2), CurrencyCode::USD),
        stock: Some(stock),
        seller_id: Some(ArtisanId::new(seller)),
        image: None,
    }
}

/// A catalog snapshot with no seller attached.
#[must_use]
pub fn orphan_product(id: i32, name: &str, price_cents: i64) -> ProductSnapshot {
    ProductSnapshot {
        id: ProductId::new(id),
        name: name.to_string(),
        unit_price: Price::new(Decimal::new(price_cents, 2), CurrencyCode::USD),
        stock: None,
        seller_id: None,
        image: None,
    }
}

/// A plain buyer with no artisan profile.
#[must_use]
pub fn buyer(id: i32, name: &str) -> CurrentUser {
    CurrentUser {
        id: UserId::new(id),
        name: name.to_string(),
        artisan_id: None,
    }
}

/// A user who also sells as the given artisan.
#[must_use]
pub fn seller(id: i32, name: &str, artisan: i32) -> CurrentUser {
    CurrentUser {
        id: UserId::new(id),
        name: name.to_string(),
        artisan_id: Some(ArtisanId::new(artisan)),
    }
}
