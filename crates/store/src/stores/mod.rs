//! Persistent client-side stores.
//!
//! Each store owns one collection and writes it through to a single storage
//! key on every mutation:
//!
//! - `cart` - [`CartStore`], line items of every user
//! - `favorites` - [`FavoritesStore`], favorite entries of every user
//! - `orders` - [`OrdersStore`], order history, newest first
//! - `userData` - [`SessionStore`], the signed-in profile
//!
//! Mutations return once the new state is durable. A failed write leaves the
//! in-memory state untouched and surfaces as
//! [`StoreError::Persistence`](crate::StoreError::Persistence).

pub mod cart;
pub mod favorites;
pub mod orders;
pub mod session;

pub use cart::CartStore;
pub use favorites::FavoritesStore;
pub use orders::OrdersStore;
pub use session::SessionStore;
