//! Checkout command.

use mma_shop_core::{Price, ProductId};
use mma_shop_store::ShopState;
use mma_shop_store::checkout::{CartSelection, CheckoutRequest, ShippingOption, parse_voucher};

use super::{CommandError, signed_in};

/// Place an order for the selected lines of the signed-in user's cart.
///
/// An empty `products` list selects the whole cart.
///
/// # Errors
///
/// Returns an error if nobody is signed in, an option is unknown, the
/// selection is empty, or the order cannot be recorded.
pub async fn place_order(
    state: &ShopState,
    shipping: &str,
    voucher: Option<&str>,
    products: &[ProductId],
) -> Result<(), Box<dyn std::error::Error>> {
    let user_id = signed_in(state).await?;
    let shipping: ShippingOption = shipping.parse()?;
    let voucher = voucher.map(parse_voucher).transpose()?;

    let cart = state.cart().user_cart(&user_id).await;
    let mut selection = CartSelection::from_cart(&cart);
    if !products.is_empty() {
        selection.toggle_all();
        for &id in products {
            if !cart.iter().any(|line| line.product_id == id) {
                return Err(CommandError::NotInCart(id).into());
            }
            if !selection.is_checked(id) {
                selection.toggle(id);
            }
        }
    }
    selection.ensure_not_empty()?;

    let delivery_address = state
        .session()
        .current()
        .await
        .and_then(|user| user.delivery_address());
    if delivery_address.is_none() {
        tracing::warn!("No delivery address on file; the order will have none");
    }

    let request = CheckoutRequest {
        user_id,
        items: selection.selected_items(&cart),
        shipping,
        voucher,
        delivery_address,
    };
    let receipt = state.checkout().place_order(request).await?;

    let totals = receipt.totals;
    tracing::info!("Subtotal: {}", Price::vnd(totals.subtotal));
    tracing::info!("Shipping ({shipping}): {}", Price::vnd(totals.shipping_fee));
    if let Some(voucher) = voucher {
        tracing::info!("Voucher {}: -{}", voucher.code, Price::vnd(totals.discount));
    }
    tracing::info!("Total: {}", totals.total_price());
    tracing::info!(
        "Order #{} placed on {} ({})",
        receipt.order.order_id,
        receipt.order.order_date(),
        receipt.order.status
    );
    Ok(())
}
