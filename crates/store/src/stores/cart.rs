//! Cart store.
//!
//! Holds the line items of every user on the device under the `cart` key.
//! Readers filter by user themselves via [`CartStore::user_cart`].
//!
//! The unscoped operations keep the behavior existing clients rely on:
//! `add_to_cart` appends even when the same product is already in the user's
//! cart, and `remove_from_cart` / `update_quantity` touch that product for
//! every user. User-scoped variants exist alongside them and keep every
//! quantity within `1..=stock`.

use mma_shop_core::{ProductId, UserId};
use tracing::{info, instrument};

use crate::collection::PersistedCollection;
use crate::error::Result;
use crate::kv::{SharedStore, keys};
use crate::models::CartLineItem;

/// Write-through store of cart line items.
pub struct CartStore {
    items: PersistedCollection<CartLineItem>,
}

impl CartStore {
    /// Load the cart from storage.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Persistence` if the backend read fails, or
    /// `StoreError::DataCorruption` if the stored cart cannot be decoded.
    pub async fn load(kv: SharedStore) -> Result<Self> {
        Ok(Self {
            items: PersistedCollection::load(kv, keys::CART).await?,
        })
    }

    /// Every line item, across all users.
    pub async fn cart(&self) -> Vec<CartLineItem> {
        self.items.snapshot().await
    }

    /// Line items owned by `user_id`, in insertion order.
    pub async fn user_cart(&self, user_id: &UserId) -> Vec<CartLineItem> {
        self.items
            .read(|items| {
                items
                    .iter()
                    .filter(|item| &item.user_id == user_id)
                    .cloned()
                    .collect()
            })
            .await
    }

    /// Append `item` to the cart.
    ///
    /// No merge with an existing line for the same product and user is
    /// performed; use [`Self::merge_into_cart`] for that.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Persistence` if the write fails; the cart is then
    /// unchanged.
    #[instrument(skip(self, item), fields(product_id = %item.product_id, user_id = %item.user_id))]
    pub async fn add_to_cart(&self, item: CartLineItem) -> Result<()> {
        self.items
            .mutate(|items| {
                items.push(item);
                Ok(())
            })
            .await?;
        info!("Added line to cart");
        Ok(())
    }

    /// Add `item`'s quantity to the user's existing line for that product,
    /// clamped to the line's stock, or append `item` if there is none.
    ///
    /// Returns the resulting quantity.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Persistence` if the write fails.
    #[instrument(skip(self, item), fields(product_id = %item.product_id, user_id = %item.user_id))]
    pub async fn merge_into_cart(&self, item: CartLineItem) -> Result<u32> {
        self.items
            .mutate(|items| {
                let existing = items
                    .iter_mut()
                    .find(|line| line.matches(item.product_id, &item.user_id));
                if let Some(existing) = existing {
                    let merged = existing.quantity.saturating_add(item.quantity);
                    existing.quantity = existing.clamp_quantity(merged);
                    return Ok(existing.quantity);
                }
                let quantity = item.quantity;
                items.push(item);
                Ok(quantity)
            })
            .await
    }

    /// Set the quantity of every line for `product_id`.
    ///
    /// The value is stored as given; bounds are the caller's concern.
    /// Returns the number of lines updated.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Persistence` if the write fails.
    #[instrument(skip(self))]
    pub async fn update_quantity(&self, product_id: ProductId, quantity: u32) -> Result<usize> {
        self.items
            .mutate(|items| {
                let mut updated = 0;
                for line in items.iter_mut().filter(|line| line.product_id == product_id) {
                    line.quantity = quantity;
                    updated += 1;
                }
                Ok(updated)
            })
            .await
    }

    /// Set the quantity of the user's lines for `product_id`, clamped to
    /// `1..=stock`.
    ///
    /// Returns the stored quantity of the first matching line, or `None` if
    /// the user has no such line.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Persistence` if the write fails.
    #[instrument(skip(self))]
    pub async fn set_quantity_for_user(
        &self,
        product_id: ProductId,
        user_id: &UserId,
        quantity: u32,
    ) -> Result<Option<u32>> {
        self.items
            .mutate(|items| {
                let mut stored = None;
                for line in items
                    .iter_mut()
                    .filter(|line| line.matches(product_id, user_id))
                {
                    line.quantity = line.clamp_quantity(quantity);
                    stored.get_or_insert(line.quantity);
                }
                Ok(stored)
            })
            .await
    }

    /// Raise the user's line for `product_id` by one unless it is at stock.
    ///
    /// Returns the quantity after the call, or `None` if there is no such line.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Persistence` if the write fails.
    pub async fn increment_quantity(
        &self,
        product_id: ProductId,
        user_id: &UserId,
    ) -> Result<Option<u32>> {
        self.step_quantity(product_id, user_id, true).await
    }

    /// Lower the user's line for `product_id` by one unless it is at one.
    ///
    /// Returns the quantity after the call, or `None` if there is no such line.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Persistence` if the write fails.
    pub async fn decrement_quantity(
        &self,
        product_id: ProductId,
        user_id: &UserId,
    ) -> Result<Option<u32>> {
        self.step_quantity(product_id, user_id, false).await
    }

    async fn step_quantity(
        &self,
        product_id: ProductId,
        user_id: &UserId,
        up: bool,
    ) -> Result<Option<u32>> {
        self.items
            .mutate(|items| {
                let Some(line) = items
                    .iter_mut()
                    .find(|line| line.matches(product_id, user_id))
                else {
                    return Ok(None);
                };
                if up && line.can_increment() {
                    line.quantity += 1;
                } else if !up && line.can_decrement() {
                    line.quantity -= 1;
                }
                Ok(Some(line.quantity))
            })
            .await
    }

    /// Remove every line for `product_id`, whichever user owns it.
    ///
    /// Returns the number of lines removed; removing a missing product is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Persistence` if the write fails.
    #[instrument(skip(self))]
    pub async fn remove_from_cart(&self, product_id: ProductId) -> Result<usize> {
        self.remove_where(|line| line.product_id == product_id).await
    }

    /// Remove `user_id`'s lines for `product_id` only.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Persistence` if the write fails.
    #[instrument(skip(self))]
    pub async fn remove_for_user(&self, product_id: ProductId, user_id: &UserId) -> Result<usize> {
        self.remove_where(|line| line.matches(product_id, user_id))
            .await
    }

    /// Remove the lines matching the given items by product and user, and
    /// return the removed lines as they were stored.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Persistence` if the write fails; nothing is
    /// removed in that case.
    #[instrument(skip(self, selected), fields(count = selected.len()))]
    pub async fn remove_selected_items(
        &self,
        selected: &[CartLineItem],
    ) -> Result<Vec<CartLineItem>> {
        self.items
            .mutate(|items| {
                let (removed, kept): (Vec<_>, Vec<_>) =
                    items.drain(..).partition(|line| {
                        selected
                            .iter()
                            .any(|s| line.matches(s.product_id, &s.user_id))
                    });
                *items = kept;
                Ok(removed)
            })
            .await
    }

    /// Append previously removed lines back to the cart.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Persistence` if the write fails.
    #[instrument(skip(self, lines), fields(count = lines.len()))]
    pub async fn restore_items(&self, lines: Vec<CartLineItem>) -> Result<()> {
        self.items
            .mutate(|items| {
                items.extend(lines);
                Ok(())
            })
            .await
    }

    async fn remove_where(&self, pred: impl Fn(&CartLineItem) -> bool) -> Result<usize> {
        self.items
            .mutate(|items| {
                let before = items.len();
                items.retain(|line| !pred(line));
                Ok(before - items.len())
            })
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::error::StoreError;
    use crate::kv::MemoryStore;
    use crate::test_support::FailingStore;

    fn line(product: i32, user: &str, price: Decimal, stock: u32, quantity: u32) -> CartLineItem {
        CartLineItem {
            product_id: ProductId::new(product),
            user_id: UserId::from(user),
            name: format!("Perfume {product}"),
            image: format!("https://img.example/{product}.png"),
            price,
            stock,
            quantity,
        }
    }

    async fn empty_cart() -> CartStore {
        CartStore::load(Arc::new(MemoryStore::new())).await.unwrap()
    }

    #[tokio::test]
    async fn test_distinct_adds_are_not_merged() {
        let cart = empty_cart().await;
        let adds = [(1, "u1"), (2, "u1"), (1, "u2"), (3, "u2")];
        for (product, user) in adds {
            cart.add_to_cart(line(product, user, dec!(100000), 5, 1))
                .await
                .unwrap();
        }
        assert_eq!(cart.cart().await.len(), adds.len());
    }

    #[tokio::test]
    async fn test_repeat_add_duplicates_line() {
        // Known quirk: a second add of the same product/user appends.
        let cart = empty_cart().await;
        cart.add_to_cart(line(1, "u1", dec!(100000), 5, 1))
            .await
            .unwrap();
        cart.add_to_cart(line(1, "u1", dec!(100000), 5, 2))
            .await
            .unwrap();
        assert_eq!(cart.user_cart(&UserId::from("u1")).await.len(), 2);
    }

    #[tokio::test]
    async fn test_merge_into_cart_sums_and_clamps() {
        let cart = empty_cart().await;
        assert_eq!(
            cart.merge_into_cart(line(1, "u1", dec!(100000), 5, 2))
                .await
                .unwrap(),
            2
        );
        assert_eq!(
            cart.merge_into_cart(line(1, "u1", dec!(100000), 5, 2))
                .await
                .unwrap(),
            4
        );
        assert_eq!(
            cart.merge_into_cart(line(1, "u1", dec!(100000), 5, 9))
                .await
                .unwrap(),
            5
        );
        assert_eq!(cart.cart().await.len(), 1);
    }

    #[tokio::test]
    async fn test_update_quantity_does_not_clamp() {
        let cart = empty_cart().await;
        cart.add_to_cart(line(1, "u1", dec!(100000), 3, 1))
            .await
            .unwrap();

        assert_eq!(cart.update_quantity(ProductId::new(1), 10).await.unwrap(), 1);
        assert_eq!(cart.cart().await[0].quantity, 10);
        assert_eq!(cart.update_quantity(ProductId::new(99), 2).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_set_quantity_for_user_clamps_and_is_scoped() {
        let cart = empty_cart().await;
        let user = UserId::from("u1");
        cart.add_to_cart(line(1, "u1", dec!(100000), 3, 1))
            .await
            .unwrap();
        cart.add_to_cart(line(1, "u2", dec!(100000), 3, 2))
            .await
            .unwrap();

        assert_eq!(
            cart.set_quantity_for_user(ProductId::new(1), &user, 10)
                .await
                .unwrap(),
            Some(3)
        );
        assert_eq!(
            cart.set_quantity_for_user(ProductId::new(1), &user, 0)
                .await
                .unwrap(),
            Some(1)
        );
        assert_eq!(
            cart.set_quantity_for_user(ProductId::new(9), &user, 2)
                .await
                .unwrap(),
            None
        );
        assert_eq!(cart.user_cart(&UserId::from("u2")).await[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_step_quantity_stops_at_bounds() {
        let cart = empty_cart().await;
        let user = UserId::from("u1");
        cart.add_to_cart(line(1, "u1", dec!(100000), 2, 1))
            .await
            .unwrap();

        assert_eq!(cart.decrement_quantity(ProductId::new(1), &user).await.unwrap(), Some(1));
        assert_eq!(cart.increment_quantity(ProductId::new(1), &user).await.unwrap(), Some(2));
        assert_eq!(cart.increment_quantity(ProductId::new(1), &user).await.unwrap(), Some(2));
        assert_eq!(cart.decrement_quantity(ProductId::new(1), &user).await.unwrap(), Some(1));
        assert_eq!(
            cart.increment_quantity(ProductId::new(1), &UserId::from("u2"))
                .await
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_remove_from_cart_twice_is_safe() {
        let cart = empty_cart().await;
        cart.add_to_cart(line(1, "u1", dec!(100000), 5, 1))
            .await
            .unwrap();

        assert_eq!(cart.remove_from_cart(ProductId::new(1)).await.unwrap(), 1);
        assert_eq!(cart.remove_from_cart(ProductId::new(1)).await.unwrap(), 0);
        assert!(cart.cart().await.is_empty());
    }

    #[tokio::test]
    async fn test_remove_from_cart_crosses_users() {
        // Known defect kept for compatibility: every user's line is removed.
        let cart = empty_cart().await;
        cart.add_to_cart(line(1, "u1", dec!(100000), 5, 1))
            .await
            .unwrap();
        cart.add_to_cart(line(1, "u2", dec!(100000), 5, 1))
            .await
            .unwrap();

        assert_eq!(cart.remove_from_cart(ProductId::new(1)).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_remove_for_user_is_scoped() {
        let cart = empty_cart().await;
        cart.add_to_cart(line(1, "u1", dec!(100000), 5, 1))
            .await
            .unwrap();
        cart.add_to_cart(line(1, "u2", dec!(100000), 5, 1))
            .await
            .unwrap();

        let removed = cart
            .remove_for_user(ProductId::new(1), &UserId::from("u1"))
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert_eq!(cart.user_cart(&UserId::from("u2")).await.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_selected_items_returns_removed_lines() {
        let cart = empty_cart().await;
        let a = line(1, "u1", dec!(500000), 5, 2);
        let b = line(2, "u1", dec!(300000), 5, 1);
        let other_user = line(1, "u2", dec!(500000), 5, 1);
        for item in [a.clone(), b.clone(), other_user.clone()] {
            cart.add_to_cart(item).await.unwrap();
        }

        let removed = cart.remove_selected_items(&[a.clone()]).await.unwrap();
        assert_eq!(removed, vec![a]);
        assert_eq!(cart.cart().await, vec![b, other_user]);
    }

    #[tokio::test]
    async fn test_cart_survives_reload() {
        let kv: SharedStore = Arc::new(MemoryStore::new());
        let cart = CartStore::load(kv.clone()).await.unwrap();
        cart.add_to_cart(line(1, "u1", dec!(500000), 5, 2))
            .await
            .unwrap();
        cart.add_to_cart(line(2, "u2", dec!(300000), 1, 1))
            .await
            .unwrap();

        let reloaded = CartStore::load(kv).await.unwrap();
        assert_eq!(reloaded.cart().await, cart.cart().await);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_cart_unchanged() {
        let kv = Arc::new(FailingStore::new());
        let cart = CartStore::load(kv.clone()).await.unwrap();
        kv.fail_writes(true);

        let err = cart
            .add_to_cart(line(1, "u1", dec!(100000), 5, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Persistence { key: "cart", .. }));
        assert!(cart.cart().await.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_are_all_persisted() {
        let kv: crate::kv::SharedStore = Arc::new(MemoryStore::new());
        let cart = Arc::new(CartStore::load(Arc::clone(&kv)).await.unwrap());

        let mut tasks = tokio::task::JoinSet::new();
        for product in 0..32 {
            let cart = Arc::clone(&cart);
            tasks.spawn(async move {
                cart.add_to_cart(line(product, "u1", dec!(100000), 5, 1))
                    .await
                    .unwrap();
            });
        }
        while let Some(joined) = tasks.join_next().await {
            joined.unwrap();
        }

        let reloaded = CartStore::load(kv).await.unwrap();
        let mut ids: Vec<i32> = reloaded
            .cart()
            .await
            .iter()
            .map(|line| line.product_id.as_i32())
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..32).collect::<Vec<_>>());
        assert_eq!(reloaded.cart().await.len(), cart.cart().await.len());
    }
}
