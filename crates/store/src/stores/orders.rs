//! Order history store.
//!
//! Orders are kept newest first. Apart from `status`, an order is never
//! modified after it is recorded, and orders are never deleted.

use mma_shop_core::{OrderStatus, UserId};
use rand::Rng;
use rust_decimal::Decimal;
use tracing::{info, instrument, warn};

use crate::collection::PersistedCollection;
use crate::error::{Result, StoreError};
use crate::kv::{SharedStore, keys};
use crate::models::{NewOrder, Order, OrderNumber};

/// Draws before giving up on finding a free order number.
const MAX_NUMBER_ATTEMPTS: usize = 32;

/// Write-through store of placed orders.
pub struct OrdersStore {
    orders: PersistedCollection<Order>,
}

impl OrdersStore {
    /// Load the order history from storage.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Persistence` or `StoreError::DataCorruption` if
    /// the stored history cannot be read.
    pub async fn load(kv: SharedStore) -> Result<Self> {
        Ok(Self {
            orders: PersistedCollection::load(kv, keys::ORDERS).await?,
        })
    }

    /// Every order, newest first.
    pub async fn orders(&self) -> Vec<Order> {
        self.orders.snapshot().await
    }

    /// Prepend an already-built order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateOrder` if an order with the same number
    /// or UUID is already recorded, or `StoreError::Persistence` if the write
    /// fails.
    #[instrument(skip(self, order), fields(order_id = %order.order_id))]
    pub async fn add_order(&self, order: Order) -> Result<()> {
        self.orders
            .mutate(|orders| {
                if orders
                    .iter()
                    .any(|o| o.order_id == order.order_id || o.uuid == order.uuid)
                {
                    warn!("Order already recorded");
                    return Err(StoreError::DuplicateOrder(order.order_id.as_str().to_owned()));
                }
                orders.insert(0, order);
                Ok(())
            })
            .await?;
        info!("Order recorded");
        Ok(())
    }

    /// Assign a fresh six-digit number to `draft` and record it as pending.
    ///
    /// The number is drawn at random and redrawn while it collides with an
    /// order already in the history.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::OrderNumberExhausted` if no free number was found,
    /// or `StoreError::Persistence` if the write fails.
    #[instrument(skip(self, draft), fields(user_id = %draft.user_id))]
    pub async fn create_order(&self, draft: NewOrder) -> Result<Order> {
        let order = self
            .orders
            .mutate(|orders| {
                let mut rng = rand::rng();
                let number = allocate_order_number(orders, || {
                    rng.random_range(OrderNumber::MIN..=OrderNumber::MAX)
                })?;
                let order = Order::new(number, draft);
                orders.insert(0, order.clone());
                Ok(order)
            })
            .await?;
        info!(order_id = %order.order_id, total = %order.total_amount, "Order created");
        Ok(order)
    }

    /// Set the status of the order numbered `order_id`, with no lifecycle
    /// check.
    ///
    /// Returns whether an order was found.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Persistence` if the write fails.
    #[instrument(skip(self))]
    pub async fn update_order_status(&self, order_id: &str, status: OrderStatus) -> Result<bool> {
        self.orders
            .mutate(|orders| {
                let Some(order) = orders.iter_mut().find(|o| o.order_id.as_str() == order_id)
                else {
                    return Ok(false);
                };
                order.status = status;
                Ok(true)
            })
            .await
    }

    /// Move the order numbered `order_id` to `status` if the lifecycle allows
    /// it, returning the updated order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::OrderNotFound`, `StoreError::InvalidTransition`,
    /// or `StoreError::Persistence` if the write fails.
    #[instrument(skip(self))]
    pub async fn advance_order_status(&self, order_id: &str, status: OrderStatus) -> Result<Order> {
        self.orders
            .mutate(|orders| {
                let order = orders
                    .iter_mut()
                    .find(|o| o.order_id.as_str() == order_id)
                    .ok_or_else(|| StoreError::OrderNotFound(order_id.to_owned()))?;
                if !order.status.can_transition_to(status) {
                    warn!(from = %order.status, to = %status, "Rejected status transition");
                    return Err(StoreError::InvalidTransition {
                        from: order.status,
                        to: status,
                    });
                }
                order.status = status;
                Ok(order.clone())
            })
            .await
    }

    /// The order numbered `order_id`, if any.
    pub async fn get_order_by_id(&self, order_id: &str) -> Option<Order> {
        self.orders
            .read(|orders| {
                orders
                    .iter()
                    .find(|o| o.order_id.as_str() == order_id)
                    .cloned()
            })
            .await
    }

    /// Orders placed by `user_id`, newest first.
    pub async fn get_user_orders(&self, user_id: &UserId) -> Vec<Order> {
        self.orders
            .read(|orders| {
                orders
                    .iter()
                    .filter(|o| &o.user_id == user_id)
                    .cloned()
                    .collect()
            })
            .await
    }

    /// Sum of `total_amount` over every recorded order.
    pub async fn total_revenue(&self) -> Decimal {
        self.orders
            .read(|orders| orders.iter().map(|o| o.total_amount).sum())
            .await
    }
}

/// Draw candidates until one is a valid order number not used in `existing`.
fn allocate_order_number(
    existing: &[Order],
    mut next_candidate: impl FnMut() -> u32,
) -> Result<OrderNumber> {
    for _ in 0..MAX_NUMBER_ATTEMPTS {
        let Some(number) = OrderNumber::from_u32(next_candidate()) else {
            continue;
        };
        if existing.iter().all(|o| o.order_id != number) {
            return Ok(number);
        }
    }
    Err(StoreError::OrderNumberExhausted {
        attempts: MAX_NUMBER_ATTEMPTS,
    })
}
