//! Checkout: shipping options, vouchers and the order total.
//!
//! ```text
//! total = Σ price × quantity + shipping fee − voucher discount
//! ```
//!
//! Every amount is whole VND computed with [`Decimal`], so no rounding ever
//! happens. The total is clamped at zero when a voucher exceeds the rest of
//! the order.
//!
//! [`CartSelection`] tracks which cart lines the buyer ticked, and
//! [`Checkout`] turns a selection into an order.

use core::fmt;
use core::str::FromStr;

use mma_shop_core::{Price, ProductId, UserId, VoucherId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use thiserror::Error;

use crate::error::StoreError;
use crate::models::CartLineItem;

pub mod saga;
pub mod selection;

pub use saga::{Checkout, CheckoutReceipt, CheckoutRequest};
pub use selection::CartSelection;

/// Delivery speed, each with a flat fee.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ShippingOption {
    /// 20 000 VND.
    #[default]
    Standard,
    /// 35 000 VND.
    Express,
    /// 50 000 VND.
    SuperExpress,
}

impl ShippingOption {
    /// All options in display order.
    pub const ALL: [Self; 3] = [Self::Standard, Self::Express, Self::SuperExpress];

    /// Numeric id used by the checkout screen.
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::Standard => 1,
            Self::Express => 2,
            Self::SuperExpress => 3,
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Express => "Express",
            Self::SuperExpress => "Super Express",
        }
    }

    /// Command-line slug.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Express => "express",
            Self::SuperExpress => "super-express",
        }
    }

    /// Flat shipping fee.
    #[must_use]
    pub const fn fee(self) -> Decimal {
        match self {
            Self::Standard => dec!(20000),
            Self::Express => dec!(35000),
            Self::SuperExpress => dec!(50000),
        }
    }
}

impl fmt::Display for ShippingOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShippingOption {
    type Err = CheckoutError;

    /// Accepts the slug (`super-express`) or the numeric id (`3`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|o| o.slug() == wanted || o.id().to_string() == wanted)
            .ok_or_else(|| CheckoutError::UnknownShipping(s.to_owned()))
    }
}

/// A flat-amount discount code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Voucher {
    pub id: VoucherId,
    pub code: &'static str,
    pub value: Decimal,
    pub description: &'static str,
}

/// Every voucher the shop accepts. Each applies unconditionally.
pub static VOUCHERS: [Voucher; 3] = [
    Voucher {
        id: VoucherId::new(1),
        code: "DISCOUNT10",
        value: dec!(10000),
        description: "10.000 ₫ off your order",
    },
    Voucher {
        id: VoucherId::new(2),
        code: "SALE20",
        value: dec!(20000),
        description: "20.000 ₫ off your order",
    },
    Voucher {
        id: VoucherId::new(3),
        code: "FREESHIP",
        value: dec!(15000),
        description: "15.000 ₫ off shipping",
    },
];

/// Look up a voucher by code, ignoring case and surrounding whitespace.
#[must_use]
pub fn find_voucher(code: &str) -> Option<&'static Voucher> {
    let code = code.trim();
    VOUCHERS.iter().find(|v| v.code.eq_ignore_ascii_case(code))
}

/// Like [`find_voucher`], but an unknown code is an error.
///
/// # Errors
///
/// Returns `CheckoutError::UnknownVoucher` if no voucher has this code.
pub fn parse_voucher(code: &str) -> Result<&'static Voucher, CheckoutError> {
    find_voucher(code).ok_or_else(|| CheckoutError::UnknownVoucher(code.to_owned()))
}

/// Breakdown of an order total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutTotal {
    /// Σ price × quantity over the selected lines.
    pub subtotal: Decimal,
    /// Fee of the chosen shipping option.
    pub shipping_fee: Decimal,
    /// Voucher value, zero without a voucher.
    pub discount: Decimal,
    /// Amount to charge, never negative.
    pub total: Decimal,
}

impl CheckoutTotal {
    /// Total as a displayable [`Price`].
    #[must_use]
    pub const fn total_price(&self) -> Price {
        Price::vnd(self.total)
    }
}

/// Compute the order total for the selected lines.
#[must_use]
pub fn calculate_total(
    items: &[CartLineItem],
    shipping: ShippingOption,
    voucher: Option<&Voucher>,
) -> CheckoutTotal {
    let subtotal: Decimal = items.iter().map(CartLineItem::line_total).sum();
    let shipping_fee = shipping.fee();
    let discount = voucher.map_or(Decimal::ZERO, |v| v.value);
    let total = (subtotal + shipping_fee - discount).max(Decimal::ZERO);

    CheckoutTotal {
        subtotal,
        shipping_fee,
        discount,
        total,
    }
}

/// Checkout failure.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// No cart line is selected.
    #[error("no items selected for checkout")]
    EmptySelection,

    /// A selected line has a quantity below one.
    #[error("invalid quantity {quantity} for product {product_id}")]
    InvalidQuantity {
        product_id: ProductId,
        quantity: u32,
    },

    /// A selected line belongs to another user.
    #[error("product {product_id} in the selection belongs to user {owner}")]
    ForeignItem { product_id: ProductId, owner: UserId },

    /// None of the selected lines are in the cart any more.
    #[error("the selected items are no longer in the cart")]
    StaleSelection,

    /// No voucher has this code.
    #[error("unknown voucher: {0}")]
    UnknownVoucher(String),

    /// No shipping option has this name.
    #[error("unknown shipping option: {0}")]
    UnknownShipping(String),

    /// Reserving the cart lines failed; nothing changed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Recording the order failed; the cart lines were put back.
    #[error("order could not be recorded: {source}")]
    OrderFailed {
        #[source]
        source: StoreError,
    },

    /// Recording the order failed and the cart lines could not be put back.
    #[error("order could not be recorded ({order_error}) and the cart could not be restored ({restore_error})")]
    CompensationFailed {
        order_error: StoreError,
        #[source]
        restore_error: StoreError,
    },
}
