//! Durable string key-value storage.
//!
//! Every store keeps its whole collection as one JSON document under a fixed
//! key (see [`keys`]). Backends only need to move opaque strings around:
//!
//! - [`MemoryStore`] - process-local map, used by tests and `memory` mode
//! - [`FileStore`] - one file per key in a data directory
//! - [`SqliteStore`] - a single `kv` table in a SQLite database

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::StorageBackend;
use crate::error::StorageError;

pub mod file;
pub mod memory;
pub mod sqlite;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Storage keys, one per logical collection.
pub mod keys {
    /// Cart line items of every user.
    pub const CART: &str = "cart";
    /// Favorite entries of every user.
    pub const FAVORITES: &str = "favorites";
    /// Order history, newest first.
    pub const ORDERS: &str = "orders";
    /// Signed-in user profile.
    pub const USER_DATA: &str = "userData";

    /// Every key the shop writes.
    pub const ALL: [&str; 4] = [CART, FAVORITES, ORDERS, USER_DATA];
}

/// Asynchronous string-keyed storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Deleting a missing key succeeds.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Read several keys at once, in the order given.
    async fn multi_get(&self, keys: &[&str]) -> Result<Vec<(String, Option<String>)>, StorageError> {
        let mut values = Vec::with_capacity(keys.len());
        for key in keys {
            values.push(((*key).to_owned(), self.get(key).await?));
        }
        Ok(values)
    }

    /// Delete several keys at once.
    async fn multi_remove(&self, keys: &[&str]) -> Result<(), StorageError> {
        for key in keys {
            self.remove(key).await?;
        }
        Ok(())
    }
}

/// Shared handle to a storage backend.
pub type SharedStore = Arc<dyn KeyValueStore>;

/// Open the backend selected in configuration.
///
/// # Errors
///
/// Returns a [`StorageError`] if the data directory cannot be created or the
/// SQLite database cannot be opened.
pub async fn open(backend: &StorageBackend) -> Result<SharedStore, StorageError> {
    let store: SharedStore = match backend {
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
        StorageBackend::File { dir } => Arc::new(FileStore::open(dir).await?),
        StorageBackend::Sqlite { url } => Arc::new(SqliteStore::connect(url).await?),
    };
    tracing::info!(backend = backend.name(), "Storage backend opened");
    Ok(store)
}
