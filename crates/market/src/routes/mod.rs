//! HTTP route handlers for the marketplace gateway.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness check
//! GET  /health/ready                - Readiness check (pings Postgres)
//!
//! # Cart (session-scoped)
//! GET  /cart                        - Cart contents
//! POST /cart/add                    - Add a product (merges by product id)
//! POST /cart/update                 - Set a line's quantity (0 removes)
//! POST /cart/remove                 - Remove a line
//! POST /cart/clear                  - Empty the cart
//! GET  /cart/count                  - Total item count
//!
//! # Checkout and orders
//! POST /checkout                    - Create per-seller orders from the cart
//! GET  /orders                      - Buyer's order history
//! GET  /orders/sold                 - Seller's received orders
//! GET  /orders/{id}                 - One order (buyer or seller only)
//!
//! # Artisans
//! GET  /artisans/{id}               - Profile with follower count + viewer follow state
//! POST /artisans/{id}/follow        - Follow (idempotent)
//! POST /artisans/{id}/unfollow      - Unfollow (counter floors at zero)
//!
//! # Notifications (seller inbox)
//! GET  /notifications               - Inbox, newest first
//! POST /notifications/{id}/read     - Set one read flag
//! POST /notifications/read-all      - Mark everything read
//! POST /notifications/clear         - Delete everything
//!
//! # Reviews
//! POST /reviews/suggest             - AI-drafted review text
//!
//! # Session
//! POST /session/login               - Bind a verified profile to the session
//! POST /session/logout              - Drop the session
//! ```

pub mod artisans;
pub mod cart;
pub mod checkout;
pub mod notifications;
pub mod orders;
pub mod reviews;
pub mod session;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::mine))
        .route("/sold", get(orders::sold))
        .route("/{id}", get(orders::show))
}

/// Create the artisan routes router.
pub fn artisan_routes() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(artisans::show))
        .route("/{id}/follow", post(artisans::follow))
        .route("/{id}/unfollow", post(artisans::unfollow))
}

/// Create the notification routes router.
pub fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(notifications::list))
        .route("/{id}/read", post(notifications::set_read))
        .route("/read-all", post(notifications::read_all))
        .route("/clear", post(notifications::clear))
}

/// Create the session routes router.
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(session::login))
        .route("/logout", post(session::logout))
}

/// Create all routes for the marketplace.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout
        .route("/checkout", post(checkout::create))
        // Order routes
        .nest("/orders", order_routes())
        // Artisan routes
        .nest("/artisans", artisan_routes())
        // Notification routes
        .nest("/notifications", notification_routes())
        // Review suggestions
        .route("/reviews/suggest", post(reviews::suggest))
        // Session routes
        .nest("/session", session_routes())
}
