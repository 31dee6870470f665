//! MMA Shop store library.
//!
//! Client-side persistence for the shop: the cart, favorites, order history
//! and signed-in session, each mirrored to a durable key-value backend, plus
//! the checkout total calculator and the order placement workflow.
//!
//! # Modules
//!
//! - [`kv`] - Key-value backends (memory, JSON files, SQLite)
//! - [`stores`] - Write-through stores, one per storage key
//! - [`checkout`] - Shipping, vouchers, totals, selection and order placement
//! - [`models`] - Persisted records
//! - [`config`] - Environment configuration
//! - [`state`] - [`ShopState`], the stores loaded together

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod checkout;
mod collection;
pub mod config;
pub mod error;
pub mod kv;
pub mod models;
pub mod state;
pub mod stores;

#[cfg(test)]
mod test_support;

pub use config::{ConfigError, ShopConfig, StorageBackend};
pub use error::{Result, StorageError, StoreError};
pub use state::{ShopState, StartupError};
