//! Checkout transactor integration tests over the in-memory store.
//!
//! These cover the per-seller partition, the atomic order+notification
//! write, and the partial-failure accounting.

use rust_decimal::Decimal;

use terracotta_core::ArtisanId;
use terracotta_integration_tests::{buyer, orphan_product, product};
use terracotta_market::db::{MemoryStore, NotificationStore, OrderStore};
use terracotta_market::models::Cart;
use terracotta_market::services::{CheckoutError, CheckoutTransactor};

#[tokio::test]
async fn checkout_splits_cart_into_one_order_per_seller() {
    let store = MemoryStore::new();
    let alice = buyer(1, "Alice");

    // Two sellers: 2 x $10.00 from seller 1, 1 x $30.00 from seller 2.
    let mut cart = Cart::new();
    cart.add_item(&product(100, "Mug", 10_00, 1, 10), 2).unwrap();
    cart.add_item(&product(200, "Vase", 30_00, 2, 5), 1).unwrap();

    let transactor = CheckoutTransactor::new(&store);
    let receipt = transactor.checkout(&alice, &cart, "12 Kiln Lane").await.unwrap();

    assert_eq!(receipt.order_ids.len(), 2);
    assert_eq!(receipt.message, "Your 2 orders have been placed");

    let orders = store.orders();
    assert_eq!(orders.len(), 2);

    let for_seller_1 = orders.iter().find(|o| o.seller_id == ArtisanId::new(1)).unwrap();
    let for_seller_2 = orders.iter().find(|o| o.seller_id == ArtisanId::new(2)).unwrap();
    assert_eq!(for_seller_1.total_amount, Decimal::new(20_00, 2));
    assert_eq!(for_seller_2.total_amount, Decimal::new(30_00, 2));
    assert_eq!(for_seller_1.lines.len(), 1);
    assert_eq!(for_seller_1.shipping_address, "12 Kiln Lane");
}

#[tokio::test]
async fn checkout_notifies_each_seller_exactly_once() {
    let store = MemoryStore::new();
    let alice = buyer(1, "Alice");

    let mut cart = Cart::new();
    cart.add_item(&product(100, "Mug", 10_00, 1, 10), 2).unwrap();
    cart.add_item(&product(101, "Plate", 12_00, 1, 10), 1).unwrap();
    cart.add_item(&product(200, "Vase", 30_00, 2, 5), 1).unwrap();

    let transactor = CheckoutTransactor::new(&store);
    transactor.checkout(&alice, &cart, "12 Kiln Lane").await.unwrap();

    // Seller 1 had two lines but gets a single notification covering them.
    let inbox_1 = store.list_by_artisan(ArtisanId::new(1)).await.unwrap();
    let inbox_2 = store.list_by_artisan(ArtisanId::new(2)).await.unwrap();
    assert_eq!(inbox_1.len(), 1);
    assert_eq!(inbox_2.len(), 1);

    let note = &inbox_1[0];
    assert!(!note.read);
    assert_eq!(note.body, "3 item(s) ordered by Alice");
    assert_eq!(note.sender.as_deref(), Some("Alice"));
    assert!(note.link.as_deref().unwrap().starts_with("/orders/"));
}

#[tokio::test]
async fn checkout_captures_prices_from_the_cart() {
    let store = MemoryStore::new();
    let alice = buyer(1, "Alice");

    let mut cart = Cart::new();
    cart.add_item(&product(100, "Mug", 10_00, 1, 10), 3).unwrap();

    let transactor = CheckoutTransactor::new(&store);
    transactor.checkout(&alice, &cart, "12 Kiln Lane").await.unwrap();

    let orders = store.orders();
    let line = &orders[0].lines[0];
    assert_eq!(line.unit_price_at_purchase.amount, Decimal::new(10_00, 2));
    assert_eq!(line.quantity, 3);
}

#[tokio::test]
async fn empty_cart_is_rejected_before_any_write() {
    let store = MemoryStore::new();
    let alice = buyer(1, "Alice");

    let transactor = CheckoutTransactor::new(&store);
    let err = transactor
        .checkout(&alice, &Cart::new(), "12 Kiln Lane")
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::EmptyCart));
    assert!(store.orders().is_empty());
}

#[tokio::test]
async fn missing_seller_rejects_the_whole_checkout() {
    let store = MemoryStore::new();
    let alice = buyer(1, "Alice");

    let mut cart = Cart::new();
    cart.add_item(&product(100, "Mug", 10_00, 1, 10), 1).unwrap();
    cart.add_item(&orphan_product(999, "Mystery Box", 5_00), 1).unwrap();

    let transactor = CheckoutTransactor::new(&store);
    let err = transactor.checkout(&alice, &cart, "12 Kiln Lane").await.unwrap_err();

    // Nothing is written, not even for the seller that was resolvable.
    assert!(matches!(err, CheckoutError::MissingSeller { .. }));
    assert!(store.orders().is_empty());
}

#[tokio::test]
async fn partial_failure_reports_created_orders() {
    let store = MemoryStore::new();
    let alice = buyer(1, "Alice");

    // Seller 2's bucket will fail at the storage layer; seller 1's commits.
    store.fail_orders_for(ArtisanId::new(2));

    let mut cart = Cart::new();
    cart.add_item(&product(100, "Mug", 10_00, 1, 10), 1).unwrap();
    cart.add_item(&product(200, "Vase", 30_00, 2, 5), 1).unwrap();

    let transactor = CheckoutTransactor::new(&store);
    let err = transactor.checkout(&alice, &cart, "12 Kiln Lane").await.unwrap_err();

    match err {
        CheckoutError::Partial {
            created,
            failed_sellers,
            ..
        } => {
            assert_eq!(created.len(), 1);
            assert_eq!(failed_sellers, 1);
        }
        other => panic!("expected Partial, got {other:?}"),
    }

    // Seller 1's order and notification both landed; seller 2 got neither.
    assert_eq!(store.orders().len(), 1);
    assert_eq!(store.orders()[0].seller_id, ArtisanId::new(1));
    assert_eq!(store.list_by_artisan(ArtisanId::new(1)).await.unwrap().len(), 1);
    assert!(store.list_by_artisan(ArtisanId::new(2)).await.unwrap().is_empty());
}

#[tokio::test]
async fn failure_on_first_seller_is_fully_retryable() {
    let store = MemoryStore::new();
    let alice = buyer(1, "Alice");

    store.fail_orders_for(ArtisanId::new(1));

    let mut cart = Cart::new();
    cart.add_item(&product(100, "Mug", 10_00, 1, 10), 1).unwrap();

    let transactor = CheckoutTransactor::new(&store);
    let err = transactor.checkout(&alice, &cart, "12 Kiln Lane").await.unwrap_err();

    // No order committed, so this is a plain storage error, not a partial.
    assert!(matches!(err, CheckoutError::Store(_)));
    assert!(store.orders().is_empty());
}

#[tokio::test]
async fn repeated_checkout_is_not_deduplicated() {
    let store = MemoryStore::new();
    let alice = buyer(1, "Alice");

    let mut cart = Cart::new();
    cart.add_item(&product(100, "Mug", 10_00, 1, 10), 1).unwrap();

    let transactor = CheckoutTransactor::new(&store);
    let first = transactor.checkout(&alice, &cart, "12 Kiln Lane").await.unwrap();
    let second = transactor.checkout(&alice, &cart, "12 Kiln Lane").await.unwrap();

    assert_ne!(first.order_ids[0], second.order_ids[0]);
    assert_eq!(store.orders().len(), 2);
}

#[tokio::test]
async fn buyer_and_seller_order_listings_agree() {
    let store = MemoryStore::new();
    let alice = buyer(1, "Alice");

    let mut cart = Cart::new();
    cart.add_item(&product(100, "Mug", 10_00, 1, 10), 1).unwrap();

    let transactor = CheckoutTransactor::new(&store);
    let receipt = transactor.checkout(&alice, &cart, "12 Kiln Lane").await.unwrap();

    let mine = store.list_for_buyer(alice.id).await.unwrap();
    let sold = store.list_for_seller(ArtisanId::new(1)).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(sold.len(), 1);
    assert_eq!(mine[0].id, receipt.order_ids[0]);
    assert_eq!(sold[0].id, receipt.order_ids[0]);

    let fetched = store.get(receipt.order_ids[0]).await.unwrap().unwrap();
    assert_eq!(fetched.buyer_id, alice.id);
}
