//! CLI command implementations.
//!
//! Commands log their output with `tracing::info!`; run with
//! `RUST_LOG=mma_cli=info` (the default) to see it.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod favorites;
pub mod orders;
pub mod session;

use mma_shop_core::UserId;
use mma_shop_store::ShopState;
use thiserror::Error;

/// Errors shared by the commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The command acts for a user but nobody is signed in.
    #[error("Not signed in. Run `mma-cli login` first")]
    NotSignedIn,

    /// An argument failed validation.
    #[error("Invalid {0}: {1}")]
    InvalidArgument(&'static str, String),

    /// A product id is not in the signed-in user's cart.
    #[error("Product {0} is not in your cart")]
    NotInCart(mma_shop_core::ProductId),

    /// No order has this number.
    #[error("Order not found: {0}")]
    OrderNotFound(String),
}

/// Id of the signed-in user.
pub(crate) async fn signed_in(state: &ShopState) -> Result<UserId, CommandError> {
    state
        .session()
        .user_id()
        .await
        .ok_or(CommandError::NotSignedIn)
}
