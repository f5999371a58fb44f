//! Database operations for the marketplace `PostgreSQL` store.
//!
//! # Database: `terracotta_market`
//!
//! ## Tables
//!
//! - `users` - Buyer identities (auth itself is external)
//! - `artisans` - Seller profiles with the denormalized `followers` counter
//! - `follows` - Follow edges (user, artisan), unique per pair
//! - `orders` - One row per (checkout, seller), line items as jsonb
//! - `notifications` - Per-artisan inbox
//! - `tower_sessions` - Session storage (cart + identity)
//!
//! # Store traits
//!
//! Each aggregate is accessed through a trait ([`OrderStore`],
//! [`FollowStore`], [`NotificationStore`]) with a `PostgreSQL` implementation
//! here and an in-memory implementation in [`memory`] used by tests. The
//! atomicity contracts live behind these traits: an order and its seller
//! notification commit together, and a follow edge always commits in the
//! same transaction as the counter it feeds.
//!
//! Queries are runtime-checked (`sqlx::query` / `query_as`) rather than the
//! compile-time macros, so the workspace builds without a live database.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/market/migrations/` and run via:
//! ```bash
//! cargo run -p terracotta-cli -- migrate
//! ```

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub mod follows;
pub mod memory;
pub mod notifications;
pub mod orders;

pub use follows::{FollowState, FollowStore, PgFollowStore};
pub use memory::MemoryStore;
pub use notifications::{NotificationStore, PgNotificationStore};
pub use orders::{OrderStore, PgOrderStore};

/// Errors from repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
