//! Sign in and out.

use mma_shop_core::{Email, Phone, UserId};
use mma_shop_store::models::UserProfile;
use mma_shop_store::{ShopState, StoreError};

use super::CommandError;

/// Profile fields given on the command line.
pub struct Login {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub dob: String,
    pub address: String,
}

impl TryFrom<Login> for UserProfile {
    type Error = CommandError;

    fn try_from(login: Login) -> Result<Self, Self::Error> {
        if login.id.trim().is_empty() {
            return Err(CommandError::InvalidArgument("id", "must not be empty".to_string()));
        }
        let email = Email::parse(&login.email)
            .map_err(|e| CommandError::InvalidArgument("email", e.to_string()))?;
        let phone = Phone::parse(&login.phone)
            .map_err(|e| CommandError::InvalidArgument("phone", e.to_string()))?;

        Ok(Self {
            id: UserId::new(login.id.trim()),
            name: login.name,
            email,
            phone,
            dob: login.dob,
            address: login.address,
            avatar: None,
        })
    }
}

/// Replace the session with `login`.
///
/// # Errors
///
/// Returns an error if a field is invalid or the session cannot be saved.
pub async fn login(state: &ShopState, login: Login) -> Result<(), Box<dyn std::error::Error>> {
    let profile = UserProfile::try_from(login)?;
    let name = profile.name.clone();
    state.session().set_user(Some(profile)).await?;
    tracing::info!("Signed in as {name}");
    Ok(())
}

/// End the session.
///
/// # Errors
///
/// Returns `StoreError` if the session key cannot be removed.
pub async fn logout(state: &ShopState) -> Result<(), StoreError> {
    state.session().logout().await?;
    tracing::info!("Signed out");
    Ok(())
}

/// Log the signed-in profile.
///
/// # Errors
///
/// Returns `CommandError::NotSignedIn` if nobody is signed in.
pub async fn whoami(state: &ShopState) -> Result<(), CommandError> {
    let user = state
        .session()
        .current()
        .await
        .ok_or(CommandError::NotSignedIn)?;
    tracing::info!(
        "{} <{}> {} ({})",
        user.name,
        user.email,
        user.phone,
        user.id
    );
    match user.delivery_address() {
        Some(address) => tracing::info!("Ships to: {address}"),
        None => tracing::info!("No delivery address on file"),
    }
    Ok(())
}
