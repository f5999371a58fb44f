//! Cart-to-checkout flow tests: stock rules applied through a full session.

use rust_decimal::Decimal;

use terracotta_integration_tests::{buyer, product};
use terracotta_market::db::MemoryStore;
use terracotta_market::models::{Cart, CartError};
use terracotta_market::services::CheckoutTransactor;

#[tokio::test]
async fn browse_fill_cart_and_check_out() {
    let store = MemoryStore::new();
    let alice = buyer(1, "Alice");
    let mug = product(100, "Mug", 12_50, 1, 4);

    let mut cart = Cart::new();
    cart.add_item(&mug, 2).unwrap();
    // Same product again merges into the existing line.
    cart.add_item(&mug, 1).unwrap();
    assert_eq!(cart.count(), 3);
    assert_eq!(cart.total(), Decimal::new(37_50, 2));

    // A fourth would hit the stock bound of 4, a fifth would not.
    assert!(matches!(
        cart.add_item(&mug, 2),
        Err(CartError::StockExceeded { stock: 4, in_cart: 3, .. })
    ));
    cart.add_item(&mug, 1).unwrap();

    // Rejected adds leave the cart exactly as it was.
    assert_eq!(cart.count(), 4);

    let transactor = CheckoutTransactor::new(&store);
    let receipt = transactor.checkout(&alice, &cart, "12 Kiln Lane").await.unwrap();
    assert_eq!(receipt.order_ids.len(), 1);
    assert_eq!(store.orders()[0].total_amount, Decimal::new(50_00, 2));
}

#[test]
fn update_and_remove_reshape_the_cart() {
    let alice_cart = &mut Cart::new();
    let mug = product(100, "Mug", 12_50, 1, 10);
    let vase = product(200, "Vase", 30_00, 2, 5);

    alice_cart.add_item(&mug, 2).unwrap();
    alice_cart.add_item(&vase, 1).unwrap();

    alice_cart.update_quantity(mug.id, 5).unwrap();
    assert_eq!(alice_cart.line(mug.id).unwrap().quantity, 5);

    // Setting a quantity to zero removes the line.
    alice_cart.update_quantity(vase.id, 0).unwrap();
    assert!(alice_cart.line(vase.id).is_none());

    assert!(alice_cart.remove_item(mug.id));
    assert!(alice_cart.is_empty());

    // Removing again reports that nothing was there.
    assert!(!alice_cart.remove_item(mug.id));
}

#[test]
fn cart_survives_a_session_round_trip() {
    // The session layer stores the cart as JSON; a deserialized cart must
    // behave identically, stock bounds included.
    let mug = product(100, "Mug", 12_50, 1, 3);

    let mut cart = Cart::new();
    cart.add_item(&mug, 2).unwrap();

    let encoded = serde_json::to_string(&cart).unwrap();
    let mut restored: Cart = serde_json::from_str(&encoded).unwrap();

    assert_eq!(restored.count(), 2);
    assert!(matches!(
        restored.add_item(&mug, 2),
        Err(CartError::StockExceeded { .. })
    ));
    restored.add_item(&mug, 1).unwrap();
    assert_eq!(restored.total(), Decimal::new(37_50, 2));
}
