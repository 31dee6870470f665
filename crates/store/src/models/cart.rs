//! Cart line items.

use mma_shop_core::{Price, ProductId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Product;

/// One row of a user's cart: a quantity of a single product.
///
/// The UI keeps `1 <= quantity <= stock` by disabling its controls at the
/// bounds; the cart store itself stores whatever quantity it is given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    /// Catalog product this line refers to.
    #[serde(rename = "id")]
    pub product_id: ProductId,
    /// Owner of the line.
    pub user_id: UserId,
    /// Product name at add time.
    pub name: String,
    /// Product image at add time.
    pub image: String,
    /// Unit price at add time.
    pub price: Decimal,
    /// Stock at add time; the upper quantity bound.
    pub stock: u32,
    /// Units in the cart.
    pub quantity: u32,
}

impl CartLineItem {
    /// Snapshot `product` into a new line for `user_id`.
    ///
    /// `quantity` is clamped into `[1, stock]`.
    #[must_use]
    pub fn from_product(product: &Product, user_id: UserId, quantity: u32) -> Self {
        let mut line = Self {
            product_id: product.id,
            user_id,
            name: product.name.clone(),
            image: product.image.clone(),
            price: product.price,
            stock: product.stock,
            quantity,
        };
        line.quantity = line.clamp_quantity(quantity);
        line
    }

    /// Whether this line belongs to `user_id` and refers to `product_id`.
    #[must_use]
    pub fn matches(&self, product_id: ProductId, user_id: &UserId) -> bool {
        self.product_id == product_id && &self.user_id == user_id
    }

    /// `quantity` clamped into the range the quantity controls allow.
    ///
    /// A line with zero stock still keeps one unit.
    #[must_use]
    pub fn clamp_quantity(&self, quantity: u32) -> u32 {
        quantity.clamp(1, self.stock.max(1))
    }

    /// Whether the "+" control is enabled.
    #[must_use]
    pub const fn can_increment(&self) -> bool {
        self.quantity < self.stock
    }

    /// Whether the "-" control is enabled.
    #[must_use]
    pub const fn can_decrement(&self) -> bool {
        self.quantity > 1
    }

    /// Unit price as a displayable [`Price`].
    #[must_use]
    pub const fn unit_price(&self) -> Price {
        Price::vnd(self.price)
    }

    /// `price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}
