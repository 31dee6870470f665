//! Integration tests for the cart-to-order flow.
//!
//! These tests drive `ShopState` over real backends and reopen it between
//! steps to check that every store comes back exactly as it was written.

#![allow(clippy::unwrap_used)]

use mma_shop_core::{Email, OrderStatus, Phone, ProductId, UserId};
use mma_shop_integration_tests::product;
use mma_shop_store::checkout::{CartSelection, CheckoutRequest, ShippingOption, find_voucher};
use mma_shop_store::models::{CartLineItem, FavoriteEntry, UserProfile};
use mma_shop_store::{ShopConfig, ShopState, StorageBackend};
use rust_decimal_macros::dec;
use tempfile::TempDir;

fn lan() -> UserProfile {
    UserProfile {
        id: UserId::from("u1"),
        name: "Nguyen Thi Lan".to_string(),
        email: Email::parse("lan@example.vn").unwrap(),
        phone: Phone::parse("+84912345678").unwrap(),
        dob: "2000-01-01".to_string(),
        address: "12 Le Loi, Hue".to_string(),
        avatar: None,
    }
}

fn file_config(dir: &TempDir) -> ShopConfig {
    ShopConfig {
        storage: StorageBackend::File {
            dir: dir.path().to_path_buf(),
        },
        ..ShopConfig::default()
    }
}

fn sqlite_config(dir: &TempDir) -> ShopConfig {
    ShopConfig {
        storage: StorageBackend::Sqlite {
            url: format!("sqlite://{}", dir.path().join("shop.db").display()),
        },
        ..ShopConfig::default()
    }
}

/// Sign in, fill the cart, check out two of three lines.
async fn shop_and_check_out(state: &ShopState) -> mma_shop_store::checkout::CheckoutReceipt {
    let user = lan();
    let user_id = user.id.clone();
    state.session().set_user(Some(user)).await.unwrap();

    let cart = state.cart();
    cart.add_to_cart(CartLineItem::from_product(&product(1), user_id.clone(), 2))
        .await
        .unwrap();
    cart.add_to_cart(CartLineItem::from_product(&product(2), user_id.clone(), 1))
        .await
        .unwrap();
    cart.add_to_cart(CartLineItem::from_product(&product(3), user_id.clone(), 1))
        .await
        .unwrap();

    let lines = cart.user_cart(&user_id).await;
    let mut selection = CartSelection::from_cart(&lines);
    selection.toggle(ProductId::new(3));

    let request = CheckoutRequest {
        user_id,
        items: selection.selected_items(&lines),
        shipping: ShippingOption::Standard,
        voucher: find_voucher("FREESHIP"),
        delivery_address: state.session().current().await.unwrap().delivery_address(),
    };
    state.checkout().place_order(request).await.unwrap()
}

#[tokio::test]
async fn test_checkout_survives_restart_with_file_backend() {
    let dir = TempDir::new().unwrap();
    let receipt = {
        let state = ShopState::open(&file_config(&dir)).await.unwrap();
        shop_and_check_out(&state).await
    };

    assert_eq!(receipt.totals.subtotal, dec!(1300000));
    assert_eq!(receipt.totals.total, dec!(1305000));
    assert_eq!(receipt.order.status, OrderStatus::Pending);
    assert_eq!(
        receipt.order.delivery_address.as_deref(),
        Some("12 Le Loi, Hue")
    );

    let reopened = ShopState::open(&file_config(&dir)).await.unwrap();
    let user_id = UserId::from("u1");

    assert_eq!(reopened.session().user_id().await, Some(user_id.clone()));
    let cart = reopened.cart().user_cart(&user_id).await;
    assert_eq!(cart.len(), 1);
    assert_eq!(cart[0].product_id, ProductId::new(3));
    assert_eq!(
        reopened.orders().get_user_orders(&user_id).await,
        vec![receipt.order]
    );
}

#[tokio::test]
async fn test_checkout_survives_restart_with_sqlite_backend() {
    let dir = TempDir::new().unwrap();
    let receipt = {
        let state = ShopState::open(&sqlite_config(&dir)).await.unwrap();
        shop_and_check_out(&state).await
    };

    let reopened = ShopState::open(&sqlite_config(&dir)).await.unwrap();
    let order = reopened
        .orders()
        .get_order_by_id(receipt.order.order_id.as_str())
        .await
        .unwrap();
    assert_eq!(order, receipt.order);
    assert_eq!(reopened.orders().total_revenue().await, dec!(1305000));
}

#[tokio::test]
async fn test_files_use_collection_layout() {
    let dir = TempDir::new().unwrap();
    {
        let state = ShopState::open(&file_config(&dir)).await.unwrap();
        shop_and_check_out(&state).await;
    }

    let cart: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("cart.json")).unwrap())
            .unwrap();
    assert_eq!(cart[0]["id"], 3);
    assert_eq!(cart[0]["userId"], "u1");

    let orders: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("orders.json")).unwrap())
            .unwrap();
    assert_eq!(orders[0]["status"], "pending");
    assert_eq!(orders[0]["products"].as_array().unwrap().len(), 2);

    let user: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("userData.json")).unwrap())
            .unwrap();
    assert_eq!(user["_id"], "u1");
}

#[tokio::test]
async fn test_favorites_and_logout_persist() {
    let dir = TempDir::new().unwrap();
    {
        let state = ShopState::open(&file_config(&dir)).await.unwrap();
        state.session().set_user(Some(lan())).await.unwrap();
        state
            .favorites()
            .add_to_favorites(FavoriteEntry::from_product(&product(2), UserId::from("u1")))
            .await
            .unwrap();
        state.session().logout().await.unwrap();
    }

    let reopened = ShopState::open(&file_config(&dir)).await.unwrap();
    assert!(reopened.session().current().await.is_none());
    assert!(
        reopened
            .favorites()
            .is_favorite_for(ProductId::new(2), &UserId::from("u1"))
            .await
    );
    assert!(!dir.path().join("userData.json").exists());
}

#[tokio::test]
async fn test_out_of_stock_line_keeps_one_unit() {
    let state = ShopState::open(&ShopConfig {
        storage: StorageBackend::Memory,
        ..ShopConfig::default()
    })
    .await
    .unwrap();
    let user_id = UserId::from("u1");
    let line = CartLineItem::from_product(&product(3), user_id.clone(), 4);
    state.cart().add_to_cart(line).await.unwrap();

    let stored = state.cart().user_cart(&user_id).await;
    assert_eq!(stored[0].quantity, 1);
    assert!(!stored[0].can_increment());
    assert_eq!(
        state
            .cart()
            .increment_quantity(ProductId::new(3), &user_id)
            .await
            .unwrap(),
        Some(1)
    );
}
