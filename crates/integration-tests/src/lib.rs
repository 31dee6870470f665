//! Integration tests for the MMA shop.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p mma-shop-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `checkout_flow` - Cart to order over the file and SQLite backends,
//!   including a restart between steps
//! - `order_status` - Order lifecycle transitions through the orders store
//!
//! Shared fixtures live here so each test file builds the same catalog.

use mma_shop_core::ProductId;
use mma_shop_store::models::Product;
use rust_decimal_macros::dec;

/// A small perfume catalog.
#[must_use]
pub fn catalog() -> Vec<Product> {
    vec![
        Product {
            id: ProductId::new(1),
            name: "Dior Sauvage EDT 100ml".to_string(),
            image: "https://cdn.example.vn/sauvage.jpg".to_string(),
            price: dec!(500000),
            stock: 5,
        },
        Product {
            id: ProductId::new(2),
            name: "Chanel Bleu EDP 50ml".to_string(),
            image: "https://cdn.example.vn/bleu.jpg".to_string(),
            price: dec!(300000),
            stock: 2,
        },
        Product {
            id: ProductId::new(3),
            name: "Versace Eros EDT 30ml".to_string(),
            image: "https://cdn.example.vn/eros.jpg".to_string(),
            price: dec!(150000),
            stock: 0,
        },
    ]
}

/// The product with `id` from [`catalog`].
///
/// # Panics
///
/// Panics if `id` is not in the catalog.
#[must_use]
pub fn product(id: i32) -> Product {
    catalog()
        .into_iter()
        .find(|p| p.id == ProductId::new(id))
        .unwrap_or_else(|| panic!("no product {id} in the test catalog"))
}
