//! Favorite entries.

use mma_shop_core::{ProductId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Product;

/// A product a user marked as favorite, with the fields shown in the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteEntry {
    #[serde(rename = "id")]
    pub product_id: ProductId,
    pub user_id: UserId,
    pub name: String,
    pub image: String,
    pub price: Decimal,
}

impl FavoriteEntry {
    /// Snapshot `product` as a favorite of `user_id`.
    #[must_use]
    pub fn from_product(product: &Product, user_id: UserId) -> Self {
        Self {
            product_id: product.id,
            user_id,
            name: product.name.clone(),
            image: product.image.clone(),
            price: product.price,
        }
    }

    #[must_use]
    pub fn matches(&self, product_id: ProductId, user_id: &UserId) -> bool {
        self.product_id == product_id && &self.user_id == user_id
    }
}
