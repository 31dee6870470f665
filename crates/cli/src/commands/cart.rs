//! Cart commands.

use mma_shop_core::{Price, ProductId};
use mma_shop_store::ShopState;
use mma_shop_store::checkout::CartSelection;
use mma_shop_store::models::{CartLineItem, Product};

use super::{CommandError, signed_in};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Put `quantity` units of `product` in the signed-in user's cart.
///
/// # Errors
///
/// Returns an error if nobody is signed in or the cart cannot be saved.
pub async fn add(state: &ShopState, product: &Product, quantity: u32, merge: bool) -> Result<()> {
    let user_id = signed_in(state).await?;
    let line = CartLineItem::from_product(product, user_id, quantity);

    if merge {
        let quantity = state.cart().merge_into_cart(line).await?;
        tracing::info!("{} now x{quantity}", product.name);
    } else {
        let quantity = line.quantity;
        state.cart().add_to_cart(line).await?;
        tracing::info!("Added {} x{quantity}", product.name);
    }
    Ok(())
}

/// Log the signed-in user's cart and its subtotal.
///
/// # Errors
///
/// Returns `CommandError::NotSignedIn` if nobody is signed in.
pub async fn list(state: &ShopState) -> Result<()> {
    let user_id = signed_in(state).await?;
    let cart = state.cart().user_cart(&user_id).await;

    if cart.is_empty() {
        tracing::info!("Your cart is empty");
        return Ok(());
    }
    for line in &cart {
        tracing::info!(
            "#{} {} - {} x{} = {} (stock {})",
            line.product_id,
            line.name,
            line.unit_price(),
            line.quantity,
            Price::vnd(line.line_total()),
            line.stock
        );
    }
    let selection = CartSelection::from_cart(&cart);
    tracing::info!("Subtotal: {}", Price::vnd(selection.subtotal(&cart)));
    Ok(())
}

/// Set the quantity of the signed-in user's line for `product_id`.
///
/// The quantity is clamped to `1..=stock`.
///
/// # Errors
///
/// Returns an error if nobody is signed in, the quantity is zero, the product
/// is not in the cart, or the cart cannot be saved.
pub async fn set_quantity(state: &ShopState, product_id: ProductId, quantity: u32) -> Result<()> {
    let user_id = signed_in(state).await?;
    if quantity == 0 {
        return Err(CommandError::InvalidArgument("quantity", "must be at least 1".to_string()).into());
    }
    let stored = state
        .cart()
        .set_quantity_for_user(product_id, &user_id, quantity)
        .await?
        .ok_or(CommandError::NotInCart(product_id))?;
    if stored < quantity {
        tracing::warn!("Only {stored} of product {product_id} in stock");
    }
    tracing::info!("Product {product_id} is now x{stored}");
    Ok(())
}

/// Add or remove one unit of the signed-in user's line for `product_id`.
///
/// # Errors
///
/// Returns an error if nobody is signed in, the product is not in the cart,
/// or the cart cannot be saved.
pub async fn step(state: &ShopState, product_id: ProductId, up: bool) -> Result<()> {
    let user_id = signed_in(state).await?;
    let quantity = if up {
        state.cart().increment_quantity(product_id, &user_id).await?
    } else {
        state.cart().decrement_quantity(product_id, &user_id).await?
    };
    let quantity = quantity.ok_or(CommandError::NotInCart(product_id))?;
    tracing::info!("Product {product_id} is now x{quantity}");
    Ok(())
}

/// Remove `product_id` from the signed-in user's cart, or from every cart.
///
/// # Errors
///
/// Returns an error if nobody is signed in or the cart cannot be saved.
pub async fn remove(state: &ShopState, product_id: ProductId, all_users: bool) -> Result<()> {
    let removed = if all_users {
        state.cart().remove_from_cart(product_id).await?
    } else {
        let user_id = signed_in(state).await?;
        state.cart().remove_for_user(product_id, &user_id).await?
    };
    tracing::info!("Removed {removed} line(s)");
    Ok(())
}
