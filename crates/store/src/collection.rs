//! Write-through collection shared by the list-backed stores.
//!
//! A collection is a `Vec<T>` mirrored as one JSON array under a fixed key.
//! Mutations run against a copy; the copy is persisted and only then swapped
//! in, so memory and storage never disagree after a failed write. The write
//! lock is held across the persistence call, which serializes mutations: the
//! last mutation issued is always the last one written.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{debug, error};

use crate::error::{Result, StoreError};
use crate::kv::SharedStore;

pub(crate) struct PersistedCollection<T> {
    key: &'static str,
    kv: SharedStore,
    items: RwLock<Vec<T>>,
}

impl<T> PersistedCollection<T>
where
    T: Serialize + DeserializeOwned + Clone + PartialEq + Send + Sync,
{
    /// Hydrate from storage; a missing key is an empty collection.
    pub(crate) async fn load(kv: SharedStore, key: &'static str) -> Result<Self> {
        let stored = kv
            .get(key)
            .await
            .map_err(|source| StoreError::persistence(key, source))?;

        let items: Vec<T> = match stored {
            Some(json) => {
                serde_json::from_str(&json).map_err(|e| StoreError::DataCorruption {
                    key,
                    message: e.to_string(),
                })?
            }
            None => Vec::new(),
        };

        debug!(key, count = items.len(), "Collection loaded");
        Ok(Self {
            key,
            kv,
            items: RwLock::new(items),
        })
    }

    pub(crate) async fn snapshot(&self) -> Vec<T> {
        self.items.read().await.clone()
    }

    pub(crate) async fn read<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.items.read().await)
    }

    /// Apply `f` to a copy of the collection and write it through.
    ///
    /// Nothing is written when `f` fails or leaves the collection unchanged.
    pub(crate) async fn mutate<R>(&self, f: impl FnOnce(&mut Vec<T>) -> Result<R>) -> Result<R> {
        let mut guard = self.items.write().await;
        let mut next = guard.clone();
        let out = f(&mut next)?;

        if next == *guard {
            return Ok(out);
        }

        let json = serde_json::to_string(&next)?;
        if let Err(source) = self.kv.set(self.key, &json).await {
            error!(key = self.key, error = %source, "Failed to persist collection");
            return Err(StoreError::persistence(self.key, source));
        }

        *guard = next;
        debug!(key = self.key, count = guard.len(), "Collection persisted");
        Ok(out)
    }
}
