//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::MarketConfig;
use crate::services::ReviewAssistant;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; provides access to the database pool,
/// configuration, and the optional review assistant.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: MarketConfig,
    pool: PgPool,
    reviews: Option<ReviewAssistant>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The review assistant is constructed only when an Anthropic API key
    /// is configured.
    #[must_use]
    pub fn new(config: MarketConfig, pool: PgPool) -> Self {
        let reviews = config.anthropic.as_ref().map(ReviewAssistant::new);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                reviews,
            }),
        }
    }

    /// Get a reference to the marketplace configuration.
    #[must_use]
    pub fn config(&self) -> &MarketConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get the review assistant, if configured.
    #[must_use]
    pub fn reviews(&self) -> Option<&ReviewAssistant> {
        self.inner.reviews.as_ref()
    }
}
