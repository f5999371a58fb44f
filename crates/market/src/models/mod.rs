//! Domain types for the marketplace.
//!
//! These types are separate from database row representations; the `db`
//! layer converts between the two.

pub mod artisan;
pub mod cart;
pub mod notification;
pub mod order;
pub mod session;

pub use artisan::Artisan;
pub use cart::{Cart, CartError, CartLine, ProductSnapshot};
pub use notification::{NewNotification, Notification};
pub use order::{NewOrder, Order, OrderLine};
pub use session::CurrentUser;
pub use session::keys as session_keys;
