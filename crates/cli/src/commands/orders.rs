//! Order history commands.

use mma_shop_core::{OrderStatus, Price};
use mma_shop_store::ShopState;
use mma_shop_store::models::Order;

use super::{CommandError, signed_in};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

fn log_summary(order: &Order) {
    tracing::info!(
        "#{} {} {} - {} item(s), {}",
        order.order_id,
        order.order_date(),
        order.status,
        order.item_count(),
        order.total()
    );
}

/// Log the signed-in user's orders, or every order with `all`.
///
/// # Errors
///
/// Returns `CommandError::NotSignedIn` if `all` is false and nobody is
/// signed in.
pub async fn list(state: &ShopState, all: bool) -> Result<()> {
    let orders = if all {
        state.orders().orders().await
    } else {
        let user_id = signed_in(state).await?;
        state.orders().get_user_orders(&user_id).await
    };
    if orders.is_empty() {
        tracing::info!("No orders yet");
    }
    orders.iter().for_each(log_summary);
    Ok(())
}

/// Log one order with its lines.
///
/// # Errors
///
/// Returns `CommandError::OrderNotFound` if no order has this number.
pub async fn show(state: &ShopState, order_id: &str) -> Result<()> {
    let order = state
        .orders()
        .get_order_by_id(order_id)
        .await
        .ok_or_else(|| CommandError::OrderNotFound(order_id.to_owned()))?;

    log_summary(&order);
    for product in &order.products {
        tracing::info!(
            "  #{} {} - {} x{}",
            product.id,
            product.name,
            Price::vnd(product.price),
            product.quantity
        );
    }
    if let Some(address) = &order.delivery_address {
        tracing::info!("  Ship to: {address}");
    }
    Ok(())
}

/// Overwrite an order's status.
///
/// # Errors
///
/// Returns an error if no order has this number or it cannot be saved.
pub async fn set_status(state: &ShopState, order_id: &str, status: OrderStatus) -> Result<()> {
    if !state.orders().update_order_status(order_id, status).await? {
        return Err(CommandError::OrderNotFound(order_id.to_owned()).into());
    }
    tracing::info!("Order #{order_id} is now {status}");
    Ok(())
}

/// Move an order to `status` if its lifecycle allows it.
///
/// # Errors
///
/// Returns an error if no order has this number, the transition is not
/// allowed, or the order cannot be saved.
pub async fn advance(state: &ShopState, order_id: &str, status: OrderStatus) -> Result<()> {
    let order = state.orders().advance_order_status(order_id, status).await?;
    tracing::info!("Order #{} is now {}", order.order_id, order.status);
    Ok(())
}

/// Log the sum of every order total.
pub async fn revenue(state: &ShopState) {
    let orders = state.orders().orders().await.len();
    let total = state.orders().total_revenue().await;
    tracing::info!("Revenue: {} across {orders} order(s)", Price::vnd(total));
}
