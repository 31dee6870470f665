//! Integration tests for the order lifecycle.
//!
//! These tests verify status transitions through the orders store, both the
//! checked `advance_order_status` and the unchecked `update_order_status`.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use mma_shop_core::{OrderStatus, UserId};
use mma_shop_store::StoreError;
use mma_shop_store::kv::MemoryStore;
use mma_shop_store::models::{NewOrder, Order, OrderProduct};
use mma_shop_store::stores::OrdersStore;
use rust_decimal_macros::dec;

async fn store_with_order() -> (OrdersStore, Order) {
    let store = OrdersStore::load(Arc::new(MemoryStore::new())).await.unwrap();
    let product = mma_shop_integration_tests::product(1);
    let order = store
        .create_order(NewOrder {
            user_id: UserId::from("u1"),
            products: vec![OrderProduct {
                id: product.id,
                name: product.name,
                image: product.image,
                price: product.price,
                quantity: 1,
            }],
            total_amount: dec!(505000),
            delivery_address: None,
        })
        .await
        .unwrap();
    (store, order)
}

// =============================================================================
// Status Value Tests
// =============================================================================

#[test]
fn test_status_names_round_trip() {
    for status in OrderStatus::ALL {
        assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
    }
    assert!("shipped".parse::<OrderStatus>().is_err());
}

#[test]
fn test_terminal_statuses() {
    assert!(!OrderStatus::Pending.is_terminal());
    assert!(!OrderStatus::Processing.is_terminal());
    assert!(OrderStatus::Delivered.is_terminal());
    assert!(OrderStatus::Cancelled.is_terminal());
}

// =============================================================================
// State Transition Tests
// =============================================================================

/// Valid transitions:
/// Pending -> Processing -> Delivered
/// Pending -> Processing -> Cancelled
/// Pending -> Cancelled
#[tokio::test]
async fn test_valid_paths() {
    let paths: [&[OrderStatus]; 3] = [
        &[OrderStatus::Processing, OrderStatus::Delivered],
        &[OrderStatus::Processing, OrderStatus::Cancelled],
        &[OrderStatus::Cancelled],
    ];

    for path in paths {
        let (store, order) = store_with_order().await;
        let id = order.order_id.as_str();
        for &next in path {
            let updated = store.advance_order_status(id, next).await.unwrap();
            assert_eq!(updated.status, next);
        }
    }
}

/// Invalid transitions are rejected and leave the order as it was.
#[tokio::test]
async fn test_invalid_transitions_are_rejected() {
    let invalid = [
        (OrderStatus::Delivered, OrderStatus::Pending),
        (OrderStatus::Cancelled, OrderStatus::Processing),
        (OrderStatus::Delivered, OrderStatus::Cancelled),
        (OrderStatus::Pending, OrderStatus::Delivered),
        (OrderStatus::Processing, OrderStatus::Pending),
    ];

    for (from, to) in invalid {
        let (store, order) = store_with_order().await;
        let id = order.order_id.as_str();
        store.update_order_status(id, from).await.unwrap();

        let err = store.advance_order_status(id, to).await.unwrap_err();
        assert!(
            matches!(err, StoreError::InvalidTransition { from: f, to: t } if f == from && t == to),
            "{from} -> {to} should be rejected"
        );
        assert_eq!(store.get_order_by_id(id).await.unwrap().status, from);
    }
}

#[tokio::test]
async fn test_unchecked_update_allows_any_status() {
    let (store, order) = store_with_order().await;
    let id = order.order_id.as_str();

    store
        .update_order_status(id, OrderStatus::Delivered)
        .await
        .unwrap();
    store
        .update_order_status(id, OrderStatus::Pending)
        .await
        .unwrap();

    let stored = store.get_order_by_id(id).await.unwrap();
    assert_eq!(stored.status, OrderStatus::Pending);
    assert_eq!(stored.total_amount, order.total_amount);
}

#[tokio::test]
async fn test_unknown_order() {
    let (store, _) = store_with_order().await;
    assert!(
        !store
            .update_order_status("000001", OrderStatus::Processing)
            .await
            .unwrap()
    );
    assert!(matches!(
        store
            .advance_order_status("000001", OrderStatus::Processing)
            .await,
        Err(StoreError::OrderNotFound(_))
    ));
}
