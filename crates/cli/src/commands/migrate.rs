//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! terra migrate
//! ```
//!
//! # Environment Variables
//!
//! - `MARKET_DATABASE_URL` - `PostgreSQL` connection string
//!
//! Migration files live in `crates/market/migrations/` and are embedded
//! into the binary at compile time.

use sqlx::PgPool;

/// Errors raised while running migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run marketplace database migrations.
pub async fn market() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("MARKET_DATABASE_URL")
        .map_err(|_| MigrationError::MissingEnvVar("MARKET_DATABASE_URL"))?;

    tracing::info!("Connecting to marketplace database...");
    let pool = PgPool::connect(&database_url).await?;

    tracing::info!("Running marketplace migrations...");
    sqlx::migrate!("../market/migrations").run(&pool).await?;

    tracing::info!("Marketplace migrations complete!");
    Ok(())
}
