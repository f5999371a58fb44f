//! Domain services.
//!
//! - [`checkout`] - the checkout transactor (cart -> per-seller orders)
//! - [`follow`] - the follow ledger (validation over the transactional store)
//! - [`cart`] - session persistence for the cart
//! - [`reviews`] - the optional AI review assistant

pub mod cart;
pub mod checkout;
pub mod follow;
pub mod reviews;

pub use checkout::{CheckoutError, CheckoutReceipt, CheckoutTransactor};
pub use follow::{FollowError, FollowLedger};
pub use reviews::{ReviewAssistant, ReviewError, ReviewPrompt};
