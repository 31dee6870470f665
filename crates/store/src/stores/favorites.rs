//! Favorites store.
//!
//! Entries are unique per (product, user). Like the cart, the unscoped
//! `remove_from_favorites` and `is_favorite` look at every user's entries;
//! the `_for_user` variants are scoped.

use mma_shop_core::{ProductId, UserId};
use tracing::{info, instrument};

use crate::collection::PersistedCollection;
use crate::error::Result;
use crate::kv::{SharedStore, keys};
use crate::models::FavoriteEntry;

/// Write-through store of favorite entries.
pub struct FavoritesStore {
    entries: PersistedCollection<FavoriteEntry>,
}

impl FavoritesStore {
    /// Load favorites from storage.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Persistence` or `StoreError::DataCorruption` if
    /// the stored favorites cannot be read.
    pub async fn load(kv: SharedStore) -> Result<Self> {
        Ok(Self {
            entries: PersistedCollection::load(kv, keys::FAVORITES).await?,
        })
    }

    /// Every entry, across all users.
    pub async fn favorites(&self) -> Vec<FavoriteEntry> {
        self.entries.snapshot().await
    }

    /// Entries owned by `user_id`.
    pub async fn user_favorites(&self, user_id: &UserId) -> Vec<FavoriteEntry> {
        self.entries
            .read(|entries| {
                entries
                    .iter()
                    .filter(|e| &e.user_id == user_id)
                    .cloned()
                    .collect()
            })
            .await
    }

    /// Add `entry` unless the user already favorited that product.
    ///
    /// Returns whether an entry was added.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Persistence` if the write fails.
    #[instrument(skip(self, entry), fields(product_id = %entry.product_id, user_id = %entry.user_id))]
    pub async fn add_to_favorites(&self, entry: FavoriteEntry) -> Result<bool> {
        let added = self
            .entries
            .mutate(|entries| {
                if entries
                    .iter()
                    .any(|e| e.matches(entry.product_id, &entry.user_id))
                {
                    return Ok(false);
                }
                entries.push(entry);
                Ok(true)
            })
            .await?;
        if added {
            info!("Added favorite");
        }
        Ok(added)
    }

    /// Remove every entry for `product_id`, whichever user owns it.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Persistence` if the write fails.
    #[instrument(skip(self))]
    pub async fn remove_from_favorites(&self, product_id: ProductId) -> Result<usize> {
        self.remove_where(|e| e.product_id == product_id).await
    }

    /// Remove `user_id`'s entry for `product_id` only.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Persistence` if the write fails.
    #[instrument(skip(self))]
    pub async fn remove_for_user(&self, product_id: ProductId, user_id: &UserId) -> Result<usize> {
        self.remove_where(|e| e.matches(product_id, user_id)).await
    }

    /// Whether any user favorited `product_id`.
    pub async fn is_favorite(&self, product_id: ProductId) -> bool {
        self.entries
            .read(|entries| entries.iter().any(|e| e.product_id == product_id))
            .await
    }

    /// Whether `user_id` favorited `product_id`.
    pub async fn is_favorite_for(&self, product_id: ProductId, user_id: &UserId) -> bool {
        self.entries
            .read(|entries| entries.iter().any(|e| e.matches(product_id, user_id)))
            .await
    }

    /// Flip `entry`'s product in or out of its user's favorites.
    ///
    /// Returns whether the product is a favorite afterwards.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Persistence` if the write fails.
    #[instrument(skip(self, entry), fields(product_id = %entry.product_id))]
    pub async fn toggle_favorite(&self, entry: FavoriteEntry) -> Result<bool> {
        let now_favorite = self
            .entries
            .mutate(|entries| {
                let before = entries.len();
                entries.retain(|e| !e.matches(entry.product_id, &entry.user_id));
                if entries.len() < before {
                    return Ok(false);
                }
                entries.push(entry);
                Ok(true)
            })
            .await?;
        info!(now_favorite, "Toggled favorite");
        Ok(now_favorite)
    }

    async fn remove_where(&self, pred: impl Fn(&FavoriteEntry) -> bool) -> Result<usize> {
        self.entries
            .mutate(|entries| {
                let before = entries.len();
                entries.retain(|e| !pred(e));
                Ok(before - entries.len())
            })
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use rust_decimal_macros::dec;

    use super::*;
    use crate::kv::MemoryStore;

    fn entry(product: i32, user: &str) -> FavoriteEntry {
        FavoriteEntry {
            product_id: ProductId::new(product),
            user_id: UserId::from(user),
            name: format!("Perfume {product}"),
            image: String::new(),
            price: dec!(250000),
        }
    }

    async fn empty() -> FavoritesStore {
        FavoritesStore::load(Arc::new(MemoryStore::new()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_add_deduplicates_per_user() {
        let favorites = empty().await;
        assert!(favorites.add_to_favorites(entry(1, "u1")).await.unwrap());
        assert!(!favorites.add_to_favorites(entry(1, "u1")).await.unwrap());
        assert!(favorites.add_to_favorites(entry(1, "u2")).await.unwrap());
        assert_eq!(favorites.favorites().await.len(), 2);
    }

    #[tokio::test]
    async fn test_remove_from_favorites_crosses_users() {
        // Known defect kept for compatibility: every user's entry goes.
        let favorites = empty().await;
        favorites.add_to_favorites(entry(1, "u1")).await.unwrap();
        favorites.add_to_favorites(entry(1, "u2")).await.unwrap();
        favorites.add_to_favorites(entry(2, "u2")).await.unwrap();

        assert_eq!(
            favorites
                .remove_from_favorites(ProductId::new(1))
                .await
                .unwrap(),
            2
        );
        let left = favorites.favorites().await;
        assert_eq!(left, vec![entry(2, "u2")]);
    }

    #[tokio::test]
    async fn test_is_favorite_ignores_user() {
        let favorites = empty().await;
        favorites.add_to_favorites(entry(1, "u1")).await.unwrap();

        assert!(favorites.is_favorite(ProductId::new(1)).await);
        assert!(
            !favorites
                .is_favorite_for(ProductId::new(1), &UserId::from("u2"))
                .await
        );
    }

    #[tokio::test]
    async fn test_toggle_is_scoped() {
        let favorites = empty().await;
        favorites.add_to_favorites(entry(1, "u2")).await.unwrap();

        assert!(favorites.toggle_favorite(entry(1, "u1")).await.unwrap());
        assert!(!favorites.toggle_favorite(entry(1, "u1")).await.unwrap());
        assert_eq!(
            favorites.user_favorites(&UserId::from("u2")).await,
            vec![entry(1, "u2")]
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_toggles_settle() {
        let favorites = Arc::new(empty().await);
        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..16 {
            let favorites = Arc::clone(&favorites);
            tasks.spawn(async move { favorites.toggle_favorite(entry(1, "u1")).await.unwrap() });
        }
        let mut added = 0;
        while let Some(joined) = tasks.join_next().await {
            if joined.unwrap() {
                added += 1;
            }
        }

        // An even number of toggles, each applied atomically, cancels out.
        assert_eq!(added, 8);
        assert!(!favorites.is_favorite_for(ProductId::new(1), &UserId::from("u1")).await);
        assert!(favorites.favorites().await.is_empty());
    }
}
