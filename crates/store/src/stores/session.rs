//! Signed-in user session.
//!
//! The profile lives under its own key as a single JSON object. Signing out
//! removes the key.

use mma_shop_core::UserId;
use tokio::sync::RwLock;
use tracing::{error, info, instrument};

use crate::error::{Result, StoreError};
use crate::kv::{SharedStore, keys};
use crate::models::UserProfile;

/// Write-through holder of the current user profile.
pub struct SessionStore {
    kv: SharedStore,
    user: RwLock<Option<UserProfile>>,
}

impl SessionStore {
    /// Load the saved profile, if any.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Persistence` or `StoreError::DataCorruption` if
    /// the saved profile cannot be read.
    pub async fn load(kv: SharedStore) -> Result<Self> {
        let stored = kv
            .get(keys::USER_DATA)
            .await
            .map_err(|source| StoreError::persistence(keys::USER_DATA, source))?;

        let user = stored
            .map(|json| {
                serde_json::from_str::<UserProfile>(&json).map_err(|e| {
                    StoreError::DataCorruption {
                        key: keys::USER_DATA,
                        message: e.to_string(),
                    }
                })
            })
            .transpose()?;

        Ok(Self {
            kv,
            user: RwLock::new(user),
        })
    }

    /// The signed-in profile.
    pub async fn current(&self) -> Option<UserProfile> {
        self.user.read().await.clone()
    }

    /// Id of the signed-in user.
    pub async fn user_id(&self) -> Option<UserId> {
        self.user.read().await.as_ref().map(|u| u.id.clone())
    }

    /// Replace the session. `None` signs out.
    ///
    /// The address is trimmed before saving.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Persistence` if the write fails; the previous
    /// session is kept.
    #[instrument(skip_all, fields(user_id = user.as_ref().map(|u| u.id.as_str())))]
    pub async fn set_user(&self, user: Option<UserProfile>) -> Result<()> {
        let mut guard = self.user.write().await;

        let user = user.map(|mut profile| {
            profile.address = profile.address.trim().to_owned();
            profile
        });

        let written = match &user {
            Some(profile) => {
                let json = serde_json::to_string(profile)?;
                self.kv.set(keys::USER_DATA, &json).await
            }
            None => self.kv.remove(keys::USER_DATA).await,
        };
        if let Err(source) = written {
            error!(error = %source, "Failed to persist session");
            return Err(StoreError::persistence(keys::USER_DATA, source));
        }

        *guard = user;
        info!(signed_in = guard.is_some(), "Session updated");
        Ok(())
    }

    /// Sign out.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Persistence` if the key cannot be removed.
    pub async fn logout(&self) -> Result<()> {
        self.set_user(None).await
    }
}
