//! Catalog product as supplied by the product service.

use mma_shop_core::{Price, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Read-only catalog entry. The shop never writes products back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Image URL.
    pub image: String,
    /// Unit price in đồng.
    pub price: Decimal,
    /// Units available.
    pub stock: u32,
}

impl Product {
    /// Unit price as a displayable [`Price`].
    #[must_use]
    pub const fn unit_price(&self) -> Price {
        Price::vnd(self.price)
    }
}
