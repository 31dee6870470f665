//! MMA Shop Core - Shared types library.
//!
//! This crate provides the domain types used by every MMA shop component:
//! - `store` - Cart, favorites, orders and session stores plus checkout
//! - `cli` - Command-line front end driving the stores
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no storage
//! backends, no async runtime. This keeps it lightweight and usable anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, phones and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
