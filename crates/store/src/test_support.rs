//! Storage double that can be told to fail writes.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use crate::error::StorageError;
use crate::kv::{KeyValueStore, MemoryStore};

#[derive(Debug, Default)]
pub(crate) struct FailingStore {
    inner: MemoryStore,
    fail_all: AtomicBool,
    fail_key: Mutex<Option<String>>,
    write_budget: Mutex<Option<usize>>,
}

impl FailingStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Fail every subsequent `set`.
    pub(crate) fn fail_writes(&self, fail: bool) {
        self.fail_all.store(fail, Ordering::SeqCst);
    }

    /// Fail subsequent `set` calls for one key only.
    #[allow(clippy::unwrap_used)]
    pub(crate) fn fail_writes_to(&self, key: Option<&str>) {
        *self.fail_key.lock().unwrap() = key.map(str::to_owned);
    }

    /// Let `writes` more `set` calls through, then fail every one after.
    #[allow(clippy::unwrap_used)]
    pub(crate) fn fail_writes_after(&self, writes: usize) {
        *self.write_budget.lock().unwrap() = Some(writes);
    }

    #[allow(clippy::unwrap_used)]
    fn should_fail(&self, key: &str) -> bool {
        if self.fail_all.load(Ordering::SeqCst)
            || self.fail_key.lock().unwrap().as_deref() == Some(key)
        {
            return true;
        }
        match self.write_budget.lock().unwrap().as_mut() {
            Some(0) => true,
            Some(left) => {
                *left -= 1;
                false
            }
            None => false,
        }
    }
}

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.should_fail(key) {
            return Err(StorageError::Io(std::io::Error::other("disk full")));
        }
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key).await
    }
}
