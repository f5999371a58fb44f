//! Session persistence for the cart.
//!
//! The cart lives in the session record. Every route mutation saves the
//! whole cart back before responding; a save failure is reported to the
//! caller, while the in-memory mutation stands (last-write-wins - the next
//! successful save persists the full state).

use tower_sessions::Session;

use crate::models::{Cart, session_keys};

/// Load the session's cart, treating a missing or unreadable cart as empty.
pub async fn load(session: &Session) -> Cart {
    match session.get::<Cart>(session_keys::CART).await {
        Ok(Some(cart)) => cart,
        Ok(None) => Cart::new(),
        Err(e) => {
            tracing::warn!("failed to read cart from session, starting empty: {e}");
            Cart::new()
        }
    }
}

/// Persist the cart into the session.
///
/// # Errors
///
/// Returns the session-store error; the caller reports it as a persistence
/// failure without rolling back the in-memory cart.
pub async fn save(
    session: &Session,
    cart: &Cart,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CART, cart).await
}
