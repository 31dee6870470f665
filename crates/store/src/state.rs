//! Application state shared by every front end.

use std::sync::Arc;

use crate::checkout::Checkout;
use crate::config::ShopConfig;
use crate::error::{StorageError, StoreError};
use crate::kv::{self, SharedStore};
use crate::stores::{CartStore, FavoritesStore, OrdersStore, SessionStore};

/// Error opening the application state.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("could not open storage: {0}")]
    Storage(#[from] StorageError),
    #[error("could not load stored data: {0}")]
    Store(#[from] StoreError),
}

/// The four stores, loaded once and shared.
///
/// This struct is cheaply cloneable via `Arc`; every clone sees the same
/// stores.
#[derive(Clone)]
pub struct ShopState {
    inner: Arc<ShopStateInner>,
}

struct ShopStateInner {
    kv: SharedStore,
    cart: CartStore,
    favorites: FavoritesStore,
    orders: OrdersStore,
    session: SessionStore,
}

impl ShopState {
    /// Open the configured backend and load every store from it.
    ///
    /// # Errors
    ///
    /// Returns `StartupError` if the backend cannot be opened or a stored
    /// collection cannot be read.
    pub async fn open(config: &ShopConfig) -> Result<Self, StartupError> {
        let kv = kv::open(&config.storage).await?;
        Ok(Self::load(kv).await?)
    }

    /// Load every store from an already-open backend.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if a stored collection cannot be read.
    pub async fn load(kv: SharedStore) -> Result<Self, StoreError> {
        let (cart, favorites, orders, session) = tokio::try_join!(
            CartStore::load(kv.clone()),
            FavoritesStore::load(kv.clone()),
            OrdersStore::load(kv.clone()),
            SessionStore::load(kv.clone()),
        )?;

        Ok(Self {
            inner: Arc::new(ShopStateInner {
                kv,
                cart,
                favorites,
                orders,
                session,
            }),
        })
    }

    /// Get a reference to the storage backend.
    #[must_use]
    pub fn kv(&self) -> &SharedStore {
        &self.inner.kv
    }

    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    #[must_use]
    pub fn favorites(&self) -> &FavoritesStore {
        &self.inner.favorites
    }

    #[must_use]
    pub fn orders(&self) -> &OrdersStore {
        &self.inner.orders
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// Order placement over this state's cart and order history.
    #[must_use]
    pub fn checkout(&self) -> Checkout<'_> {
        Checkout::new(&self.inner.cart, &self.inner.orders)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::StorageBackend;
    use crate::kv::{KeyValueStore, MemoryStore, keys};

    #[tokio::test]
    async fn test_clones_share_stores() {
        let state = ShopState::open(&ShopConfig {
            storage: StorageBackend::Memory,
            ..ShopConfig::default()
        })
        .await
        .unwrap();
        let other = state.clone();

        let line = crate::models::CartLineItem {
            product_id: mma_shop_core::ProductId::new(1),
            user_id: mma_shop_core::UserId::from("u1"),
            name: "Chanel No. 5".to_string(),
            image: String::new(),
            price: rust_decimal_macros::dec!(3500000),
            stock: 3,
            quantity: 1,
        };
        state.cart().add_to_cart(line).await.unwrap();
        assert_eq!(other.cart().cart().await.len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_collection_fails_load() {
        let kv = std::sync::Arc::new(MemoryStore::new());
        kv.set(keys::ORDERS, "[{").await.unwrap();

        let err = ShopState::load(kv).await.err().unwrap();
        assert!(matches!(err, StoreError::DataCorruption { key: "orders", .. }));
    }
}
