//! Document store trait and related types.
//!
//! A document store is the raw key-value persistence primitive everything
//! else is built on: `get(key) -> bytes|null`, `set(key, bytes)`,
//! `remove(key)`. It is blocking from the caller's point of view (every call
//! is a suspension point) and offers no multi-key transactions and no locking.
//!
//! # Implementations
//!
//! - `FileDocumentStore` (in `trailmate-filestore`): one file per key
//! - `InMemoryDocumentStore` (in `trailmate-testing`): fast, deterministic testing
//!
//! # Example
//!
//! ```ignore
//! use trailmate_core::document_store::{DocumentStore, StoreError};
//!
//! async fn example<D: DocumentStore>(store: &D) -> Result<(), StoreError> {
//!     store.set("greeting", b"hello").await?;
//!     assert_eq!(store.get("greeting").await?, Some(b"hello".to_vec()));
//!     store.remove("greeting").await?;
//!     Ok(())
//! }
//! ```

use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during document store operations.
///
/// A failed write must leave the previously stored document intact.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The storage backend rejected or failed the operation.
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// Filesystem or other I/O failure.
    #[error("I/O error: {0}")]
    Io(String),

    /// The document could not be serialized for writing.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type for document store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Single-key document persistence.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a store can be shared between the
/// repository and the session store.
pub trait DocumentStore: Send + Sync {
    /// Read the document stored under `key`.
    ///
    /// # Returns
    ///
    /// - `Some(bytes)` if found
    /// - `None` if the key is absent
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Vec<u8>>>> + Send;

    /// Replace the document stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails. The previous document must
    /// remain readable in that case.
    fn set(&self, key: &str, data: &[u8]) -> impl Future<Output = Result<()>> + Send;

    /// Remove the document stored under `key`. Removing an absent key is not
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn remove(&self, key: &str) -> impl Future<Output = Result<()>> + Send;

    /// Check if a document exists.
    ///
    /// Default implementation uses [`DocumentStore::get`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn exists(&self, key: &str) -> impl Future<Output = Result<bool>> + Send {
        async move { Ok(self.get(key).await?.is_some()) }
    }
}

impl<T> DocumentStore for Arc<T>
where
    T: DocumentStore,
{
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Vec<u8>>>> + Send {
        (**self).get(key)
    }

    fn set(&self, key: &str, data: &[u8]) -> impl Future<Output = Result<()>> + Send {
        (**self).set(key, data)
    }

    fn remove(&self, key: &str) -> impl Future<Output = Result<()>> + Send {
        (**self).remove(key)
    }
}
