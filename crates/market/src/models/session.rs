//! Session-related types.
//!
//! Types stored in the session: the authenticated identity and the cart.

use serde::{Deserialize, Serialize};

use terracotta_core::{ArtisanId, UserId};

/// Session-stored user identity.
///
/// Authentication is delegated to an external provider; the core only sees
/// this opaque identity once the session carries it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// Display name (used in notification bodies).
    pub name: String,
    /// The artisan this user sells as, if any.
    pub artisan_id: Option<ArtisanId>,
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the serialized cart.
    pub const CART: &str = "cart";
}
