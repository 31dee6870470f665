//! Placed orders.

use core::fmt;

use chrono::{DateTime, Local, TimeZone, Utc};
use mma_shop_core::{OrderStatus, Price, ProductId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::CartLineItem;

/// Six-digit order number shown to the customer (`100000`..=`999999`).
///
/// Display numbers are drawn at random and are only unique within one order
/// history; [`Order::uuid`] is the globally unique identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Smallest number handed out.
    pub const MIN: u32 = 100_000;
    /// Largest number handed out.
    pub const MAX: u32 = 999_999;

    /// Build an order number from a drawn value.
    ///
    /// Returns `None` if `n` is not six digits.
    #[must_use]
    pub fn from_u32(n: u32) -> Option<Self> {
        (Self::MIN..=Self::MAX)
            .contains(&n)
            .then(|| Self(n.to_string()))
    }

    /// Returns the number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A purchased line, copied from the cart at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderProduct {
    pub id: ProductId,
    pub name: String,
    pub image: String,
    pub price: Decimal,
    pub quantity: u32,
}

impl From<&CartLineItem> for OrderProduct {
    fn from(line: &CartLineItem) -> Self {
        Self {
            id: line.product_id,
            name: line.name.clone(),
            image: line.image.clone(),
            price: line.price,
            quantity: line.quantity,
        }
    }
}

/// Everything needed to record an order; the store assigns identity.
#[derive(Debug, Clone)]
pub struct NewOrder {
    /// Buyer.
    pub user_id: UserId,
    /// Purchased lines.
    pub products: Vec<OrderProduct>,
    /// Amount charged.
    pub total_amount: Decimal,
    /// Shipping address from the buyer's profile.
    pub delivery_address: Option<String>,
}

/// A placed order.
///
/// `products` and `total_amount` are fixed at creation; the order store only
/// ever changes `status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique identity.
    pub uuid: Uuid,
    /// Customer-facing number.
    pub order_id: OrderNumber,
    /// Creation time.
    pub placed_at: DateTime<Utc>,
    /// Amount charged.
    pub total_amount: Decimal,
    /// Fulfillment status.
    pub status: OrderStatus,
    /// Purchased lines in checkout order.
    pub products: Vec<OrderProduct>,
    /// Buyer.
    pub user_id: UserId,
    /// Shipping address, if the buyer had one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<String>,
}

impl Order {
    /// Create a pending order placed now.
    #[must_use]
    pub fn new(order_id: OrderNumber, draft: NewOrder) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            order_id,
            placed_at: Utc::now(),
            total_amount: draft.total_amount,
            status: OrderStatus::Pending,
            products: draft.products,
            user_id: draft.user_id,
            delivery_address: draft.delivery_address,
        }
    }

    /// Placement date as shown in the order history (`d/m/yyyy`), in the
    /// device's local time zone.
    #[must_use]
    pub fn order_date(&self) -> String {
        self.order_date_in(&Local)
    }

    /// Placement date (`d/m/yyyy`) as seen in `tz`.
    #[must_use]
    pub fn order_date_in<Tz>(&self, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        self.placed_at
            .with_timezone(tz)
            .format("%-d/%-m/%Y")
            .to_string()
    }

    /// Total as a displayable [`Price`].
    #[must_use]
    pub const fn total(&self) -> Price {
        Price::vnd(self.total_amount)
    }

    /// Number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.products
            .iter()
            .fold(0u32, |n, p| n.saturating_add(p.quantity))
    }
}
