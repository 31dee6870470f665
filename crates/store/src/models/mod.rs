//! Domain models persisted by the stores.
//!
//! Cart lines and favorites copy the catalog fields they display when they
//! are created and never refresh them; a later catalog price change does not
//! reach existing entries. Orders copy their lines again at checkout.

pub mod cart;
pub mod favorite;
pub mod order;
pub mod product;
pub mod user;

pub use cart::CartLineItem;
pub use favorite::FavoriteEntry;
pub use order::{NewOrder, Order, OrderNumber, OrderProduct};
pub use product::Product;
pub use user::UserProfile;
