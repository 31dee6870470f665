//! Order placement.
//!
//! Placing an order touches two collections, so it runs as a small saga:
//!
//! 1. validate the request (no state touched)
//! 2. remove the purchased lines from the cart
//! 3. record an order built from exactly the lines removed in step 2
//!
//! If step 3 fails, the lines removed in step 2 are put back.

use mma_shop_core::UserId;
use tracing::{error, info, instrument, warn};

use super::{CheckoutError, CheckoutTotal, ShippingOption, Voucher, calculate_total};
use crate::models::{CartLineItem, NewOrder, Order, OrderProduct};
use crate::stores::{CartStore, OrdersStore};

/// What the buyer confirmed on the checkout screen.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub user_id: UserId,
    /// Selected cart lines, as displayed.
    pub items: Vec<CartLineItem>,
    pub shipping: ShippingOption,
    pub voucher: Option<&'static Voucher>,
    /// Address from the buyer's profile.
    pub delivery_address: Option<String>,
}

impl CheckoutRequest {
    /// Reject requests that must not reach the stores.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptySelection`, `CheckoutError::InvalidQuantity`
    /// or `CheckoutError::ForeignItem`.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        if self.items.is_empty() {
            return Err(CheckoutError::EmptySelection);
        }
        for item in &self.items {
            if item.quantity < 1 {
                return Err(CheckoutError::InvalidQuantity {
                    product_id: item.product_id,
                    quantity: item.quantity,
                });
            }
            if item.user_id != self.user_id {
                return Err(CheckoutError::ForeignItem {
                    product_id: item.product_id,
                    owner: item.user_id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Total for the lines as displayed. The placed order is charged for
    /// the lines actually taken from the cart.
    #[must_use]
    pub fn totals(&self) -> CheckoutTotal {
        calculate_total(&self.items, self.shipping, self.voucher)
    }
}

/// A placed order with the breakdown it was charged at.
#[derive(Debug, Clone)]
pub struct CheckoutReceipt {
    pub order: Order,
    pub totals: CheckoutTotal,
}

/// Places orders against a cart and an order history.
pub struct Checkout<'a> {
    cart: &'a CartStore,
    orders: &'a OrdersStore,
}

impl<'a> Checkout<'a> {
    #[must_use]
    pub const fn new(cart: &'a CartStore, orders: &'a OrdersStore) -> Self {
        Self { cart, orders }
    }

    /// Turn `request` into a pending order and take its lines out of the cart.
    ///
    /// # Errors
    ///
    /// - Validation errors and `CheckoutError::StaleSelection` leave every
    ///   store untouched.
    /// - `CheckoutError::Store` if the cart could not be updated; nothing
    ///   changed.
    /// - `CheckoutError::OrderFailed` if the order could not be recorded; the
    ///   cart lines were restored.
    /// - `CheckoutError::CompensationFailed` if, in addition, the cart could
    ///   not be restored.
    #[instrument(skip_all, fields(user_id = %request.user_id, items = request.items.len()))]
    pub async fn place_order(&self, request: CheckoutRequest) -> Result<CheckoutReceipt, CheckoutError> {
        request.validate()?;

        let removed = self.cart.remove_selected_items(&request.items).await?;
        if removed.is_empty() {
            warn!("Selected items were no longer in the cart");
            return Err(CheckoutError::StaleSelection);
        }

        // Duplicate lines for a selected product are all removed, so they are
        // all charged.
        let totals = calculate_total(&removed, request.shipping, request.voucher);
        let draft = NewOrder {
            user_id: request.user_id,
            products: removed.iter().map(OrderProduct::from).collect(),
            total_amount: totals.total,
            delivery_address: request.delivery_address,
        };

        match self.orders.create_order(draft).await {
            Ok(order) => {
                info!(order_id = %order.order_id, total = %totals.total, "Checkout complete");
                Ok(CheckoutReceipt { order, totals })
            }
            Err(order_error) => {
                warn!(error = %order_error, "Order failed, restoring cart");
                match self.cart.restore_items(removed).await {
                    Ok(()) => Err(CheckoutError::OrderFailed {
                        source: order_error,
                    }),
                    Err(restore_error) => {
                        error!(error = %restore_error, "Cart restore failed");
                        Err(CheckoutError::CompensationFailed {
                            order_error,
                            restore_error,
                        })
                    }
                }
            }
        }
    }
}
