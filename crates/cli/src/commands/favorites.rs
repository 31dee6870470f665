//! Favorites commands.

use mma_shop_core::{Price, ProductId};
use mma_shop_store::ShopState;
use mma_shop_store::models::{FavoriteEntry, Product};

use super::signed_in;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Favorite `product` for the signed-in user.
///
/// # Errors
///
/// Returns an error if nobody is signed in or favorites cannot be saved.
pub async fn add(state: &ShopState, product: &Product) -> Result<()> {
    let user_id = signed_in(state).await?;
    let entry = FavoriteEntry::from_product(product, user_id);
    if state.favorites().add_to_favorites(entry).await? {
        tracing::info!("Added {} to favorites", product.name);
    } else {
        tracing::info!("{} is already a favorite", product.name);
    }
    Ok(())
}

/// Unfavorite `product_id` for the signed-in user, or for every user.
///
/// # Errors
///
/// Returns an error if nobody is signed in or favorites cannot be saved.
pub async fn remove(state: &ShopState, product_id: ProductId, all_users: bool) -> Result<()> {
    let removed = if all_users {
        state.favorites().remove_from_favorites(product_id).await?
    } else {
        let user_id = signed_in(state).await?;
        state
            .favorites()
            .remove_for_user(product_id, &user_id)
            .await?
    };
    tracing::info!("Removed {removed} favorite(s)");
    Ok(())
}

/// Log the signed-in user's favorites.
///
/// # Errors
///
/// Returns `CommandError::NotSignedIn` if nobody is signed in.
pub async fn list(state: &ShopState) -> Result<()> {
    let user_id = signed_in(state).await?;
    let favorites = state.favorites().user_favorites(&user_id).await;
    if favorites.is_empty() {
        tracing::info!("No favorites yet");
    }
    for entry in favorites {
        tracing::info!("#{} {} - {}", entry.product_id, entry.name, Price::vnd(entry.price));
    }
    Ok(())
}
