//! Current session and profile entries.
//!
//! The signed-in user's id, display email and a free-text profile field each
//! live under their own key, stored as raw UTF-8.

use crate::error::{HikeError, NotFound};
use crate::types::UserId;
use serde::{Deserialize, Serialize};
use std::future::Future;
use trailmate_core::{DocumentStore, StoreError};

/// Who is using the app right now
pub trait IdentityProvider: Send + Sync {
    /// The signed-in user, if any
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the lookup fails.
    fn current_user_id(&self) -> impl Future<Output = Result<Option<UserId>, StoreError>> + Send;

    /// The signed-in user's email, if known
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the lookup fails.
    fn current_user_email(&self) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;

    /// The signed-in user, or [`NotFound::NotSignedIn`]
    ///
    /// # Errors
    ///
    /// [`HikeError::NotFound`] when nobody is signed in, or a store failure.
    fn require_user(&self) -> impl Future<Output = Result<UserId, HikeError>> + Send {
        async move {
            let user = self.current_user_id().await?;
            user.ok_or(HikeError::NotFound(NotFound::NotSignedIn))
        }
    }
}

/// Storage keys of the session entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionKeys {
    /// Opaque user identifier
    pub user_id: String,
    /// Display email
    pub user_email: String,
    /// Free-text profile field
    pub lower_text: String,
}

impl Default for SessionKeys {
    fn default() -> Self {
        Self {
            user_id: "userId".to_string(),
            user_email: "userEmail".to_string(),
            lower_text: "userLowerText".to_string(),
        }
    }
}

/// Session and profile entries over a [`DocumentStore`]
pub struct SessionStore<D: DocumentStore> {
    documents: D,
    keys: SessionKeys,
}

impl<D: DocumentStore> SessionStore<D> {
    /// Creates a session store using `keys`
    #[must_use]
    pub const fn new(documents: D, keys: SessionKeys) -> Self {
        Self { documents, keys }
    }

    /// Record a signed-in user
    ///
    /// The email is written first and the user id last, so a failed sign-in
    /// never leaves a signed-in id without its email.
    ///
    /// # Errors
    ///
    /// Store failure.
    pub async fn sign_in(&self, user_id: &UserId, email: &str) -> Result<(), StoreError> {
        self.documents
            .set(&self.keys.user_email, email.as_bytes())
            .await?;
        self.documents
            .set(&self.keys.user_id, user_id.as_str().as_bytes())
            .await?;
        tracing::info!(%user_id, "Signed in");
        Ok(())
    }

    /// Forget the signed-in user; the profile text stays
    ///
    /// # Errors
    ///
    /// Store failure.
    pub async fn sign_out(&self) -> Result<(), StoreError> {
        self.documents.remove(&self.keys.user_id).await?;
        self.documents.remove(&self.keys.user_email).await?;
        tracing::info!("Signed out");
        Ok(())
    }

    /// The free-text profile field
    ///
    /// # Errors
    ///
    /// Store failure.
    pub async fn lower_text(&self) -> Result<Option<String>, StoreError> {
        self.read_text(&self.keys.lower_text).await
    }

    /// Save the editable profile fields
    ///
    /// # Errors
    ///
    /// Store failure.
    pub async fn save_profile(&self, email: &str, lower_text: &str) -> Result<(), StoreError> {
        self.documents
            .set(&self.keys.user_email, email.as_bytes())
            .await?;
        self.documents
            .set(&self.keys.lower_text, lower_text.as_bytes())
            .await?;
        Ok(())
    }

    async fn read_text(&self, key: &str) -> Result<Option<String>, StoreError> {
        let Some(bytes) = self.documents.get(key).await? else {
            return Ok(None);
        };
        match String::from_utf8(bytes) {
            Ok(text) if text.is_empty() => Ok(None),
            Ok(text) => Ok(Some(text)),
            Err(error) => {
                tracing::warn!(key, %error, "Session entry is not UTF-8, ignoring it");
                Ok(None)
            }
        }
    }
}

impl<D: DocumentStore> IdentityProvider for SessionStore<D> {
    async fn current_user_id(&self) -> Result<Option<UserId>, StoreError> {
        Ok(self.read_text(&self.keys.user_id).await?.map(UserId::new))
    }

    async fn current_user_email(&self) -> Result<Option<String>, StoreError> {
        self.read_text(&self.keys.user_email).await
    }
}
