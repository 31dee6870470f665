//! Error types for storage backends and the shop stores.
//!
//! Backends report [`StorageError`]; the stores wrap it in [`StoreError`]
//! together with the collection key that failed, so callers can decide
//! whether to retry, surface or ignore a failed write.

use mma_shop_core::OrderStatus;
use thiserror::Error;

/// Failure inside a key-value backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// SQLite operation failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Key cannot be stored by this backend.
    #[error("invalid key: {0}")]
    InvalidKey(String),
}

/// Store-level error type.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing key failed. In-memory state is unchanged.
    #[error("persistence error for {key}: {source}")]
    Persistence {
        /// Storage key of the collection.
        key: &'static str,
        /// Backend failure.
        #[source]
        source: StorageError,
    },

    /// A collection could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The stored JSON for a collection is not readable.
    #[error("data corruption in {key}: {message}")]
    DataCorruption {
        /// Storage key of the collection.
        key: &'static str,
        /// Decoder message.
        message: String,
    },

    /// No order carries the given display number.
    #[error("order not found: {0}")]
    OrderNotFound(String),

    /// An order with the same number or UUID is already recorded.
    #[error("order {0} already exists")]
    DuplicateOrder(String),

    /// The requested status change breaks the order lifecycle.
    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: OrderStatus,
        /// Requested status.
        to: OrderStatus,
    },

    /// Every drawn order number was already taken.
    #[error("could not allocate a unique order number after {attempts} attempts")]
    OrderNumberExhausted {
        /// Number of candidates tried.
        attempts: usize,
    },
}

impl StoreError {
    pub(crate) const fn persistence(key: &'static str, source: StorageError) -> Self {
        Self::Persistence { key, source }
    }
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
