//! Which cart lines the buyer has ticked for checkout.

use std::collections::BTreeMap;

use mma_shop_core::ProductId;
use rust_decimal::Decimal;

use super::CheckoutError;
use crate::models::CartLineItem;

/// Check state per product in one user's cart.
///
/// A fresh selection has every line checked. Lines sharing a product id are
/// checked and unchecked together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartSelection {
    checked: BTreeMap<ProductId, bool>,
}

impl CartSelection {
    /// Select every line of `cart`.
    #[must_use]
    pub fn from_cart(cart: &[CartLineItem]) -> Self {
        Self {
            checked: cart.iter().map(|line| (line.product_id, true)).collect(),
        }
    }

    /// Follow changes to the cart: new lines start checked, removed lines are
    /// forgotten, existing lines keep their state.
    pub fn refresh(&mut self, cart: &[CartLineItem]) {
        let previous = std::mem::take(&mut self.checked);
        self.checked = cart
            .iter()
            .map(|line| {
                let state = previous.get(&line.product_id).copied().unwrap_or(true);
                (line.product_id, state)
            })
            .collect();
    }

    /// Flip one product and return its new state.
    pub fn toggle(&mut self, product_id: ProductId) -> bool {
        let state = self.checked.entry(product_id).or_insert(false);
        *state = !*state;
        *state
    }

    #[must_use]
    pub fn is_checked(&self, product_id: ProductId) -> bool {
        self.checked.get(&product_id).copied().unwrap_or(false)
    }

    /// Whether every known line is checked. False for an empty cart.
    #[must_use]
    pub fn all_checked(&self) -> bool {
        !self.checked.is_empty() && self.checked.values().all(|c| *c)
    }

    /// Check everything, or uncheck everything if all lines already are.
    pub fn toggle_all(&mut self) {
        let state = !self.all_checked();
        for checked in self.checked.values_mut() {
            *checked = state;
        }
    }

    /// Checked lines of `cart`, in cart order.
    #[must_use]
    pub fn selected_items(&self, cart: &[CartLineItem]) -> Vec<CartLineItem> {
        cart.iter()
            .filter(|line| self.is_checked(line.product_id))
            .cloned()
            .collect()
    }

    /// Σ price × quantity over the checked lines of `cart`.
    #[must_use]
    pub fn subtotal(&self, cart: &[CartLineItem]) -> Decimal {
        cart.iter()
            .filter(|line| self.is_checked(line.product_id))
            .map(CartLineItem::line_total)
            .sum()
    }

    /// # Errors
    ///
    /// Returns `CheckoutError::EmptySelection` if nothing is checked.
    pub fn ensure_not_empty(&self) -> Result<(), CheckoutError> {
        if self.checked.values().any(|c| *c) {
            Ok(())
        } else {
            Err(CheckoutError::EmptySelection)
        }
    }
}
