//! Display names for avatar initials.

use crate::types::UserId;
use std::collections::HashMap;
use std::future::Future;
use thiserror::Error;

/// Directory lookup failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// No profile for this user
    #[error("User not found: {0}")]
    NotFound(UserId),

    /// The directory could not be reached
    #[error("Directory unavailable: {0}")]
    Unavailable(String),
}

/// Resolves user ids to display names
pub trait UserDirectory: Send + Sync {
    /// Display name of `user`
    ///
    /// # Errors
    ///
    /// [`DirectoryError::NotFound`] for unknown users.
    fn resolve_display_name(&self, user: &UserId) -> impl Future<Output = Result<String, DirectoryError>> + Send;
}

/// Profile fields used to build a display name
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserProfile {
    /// Chosen username
    pub username: Option<String>,
    /// Account email
    pub email: Option<String>,
}

/// `HashMap`-backed directory
#[derive(Clone, Debug, Default)]
pub struct InMemoryUserDirectory {
    profiles: HashMap<UserId, UserProfile>,
}

impl InMemoryUserDirectory {
    /// Create an empty directory
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a profile
    pub fn insert(&mut self, user: UserId, profile: UserProfile) {
        self.profiles.insert(user, profile);
    }

    /// Builder form of [`Self::insert`]
    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>, profile: UserProfile) -> Self {
        self.insert(UserId::new(user), profile);
        self
    }
}

impl UserDirectory for InMemoryUserDirectory {
    /// Username, else email, else the raw id
    async fn resolve_display_name(&self, user: &UserId) -> Result<String, DirectoryError> {
        let profile = self
            .profiles
            .get(user)
            .ok_or_else(|| DirectoryError::NotFound(user.clone()))?;
        let name = [&profile.username, &profile.email]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| user.to_string());
        Ok(name)
    }
}

/// First character of `text`, uppercased, or `?` when empty
fn initial_of(text: &str) -> String {
    text.trim()
        .chars()
        .next()
        .map_or_else(|| "?".to_string(), |c| c.to_uppercase().collect())
}

/// Avatar initial for `user`.
///
/// Lookup failures fall back to the raw id and are never returned.
pub async fn avatar_initial<U: UserDirectory>(directory: &U, user: &UserId) -> String {
    match directory.resolve_display_name(user).await {
        Ok(name) => initial_of(&name),
        Err(error) => {
            tracing::debug!(%user, %error, "Display name unavailable, using id");
            initial_of(user.as_str())
        }
    }
}

/// Avatar initials for several users, in order
pub async fn avatar_initials<U: UserDirectory>(directory: &U, users: &[UserId]) -> Vec<String> {
    let mut initials = Vec::with_capacity(users.len());
    for user in users {
        initials.push(avatar_initial(directory, user).await);
    }
    initials
}
