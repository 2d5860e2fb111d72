//! In-memory document store for fast, deterministic testing.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Lock poisoning only happens after a test already panicked

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use trailmate_core::document_store::{DocumentStore, Result, StoreError};

/// `HashMap`-backed document store.
///
/// Clones share the same underlying map, so a test can keep a handle for
/// inspection while the repository owns another.
///
/// Writes can be made to fail with [`InMemoryDocumentStore::fail_writes`] to
/// exercise error paths; a failed write leaves the map untouched.
///
/// # Example
///
/// ```
/// use trailmate_testing::InMemoryDocumentStore;
/// use trailmate_core::DocumentStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = InMemoryDocumentStore::new();
/// store.set("hikes", b"[]").await?;
/// assert_eq!(store.get("hikes").await?, Some(b"[]".to_vec()));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryDocumentStore {
    data: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    fail_writes: Arc<AtomicBool>,
    writes: Arc<AtomicUsize>,
}

impl InMemoryDocumentStore {
    /// Create a new empty in-memory store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with one raw document
    #[must_use]
    pub fn with_document(key: &str, data: &[u8]) -> Self {
        let store = Self::new();
        store
            .data
            .write()
            .unwrap()
            .insert(key.to_string(), data.to_vec());
        store
    }

    /// Make every subsequent `set`/`remove` fail (or succeed again)
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful `set`/`remove` calls
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Raw bytes stored under `key`, bypassing the async API
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.data.read().unwrap().get(key).cloned()
    }

    /// Check if a key exists in the store
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.read().unwrap().contains_key(key)
    }

    /// Get the number of stored documents
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.read().unwrap().len()
    }

    /// Check if the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.read().unwrap().is_empty()
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected write failure".to_string()));
        }
        Ok(())
    }
}

impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.raw(key))
    }

    async fn set(&self, key: &str, data: &[u8]) -> Result<()> {
        self.check_writable()?;
        self.data
            .write()
            .unwrap()
            .insert(key.to_string(), data.to_vec());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.check_writable()?;
        self.data.write().unwrap().remove(key);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_remove() {
        let store = InMemoryDocumentStore::new();
        assert!(store.is_empty());

        store.set("a", b"1").await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), Some(b"1".to_vec()));
        assert_eq!(store.len(), 1);

        store.remove("a").await.unwrap();
        assert!(!store.contains_key("a"));
        assert_eq!(store.write_count(), 2);
    }

    #[tokio::test]
    async fn failed_write_keeps_previous_document() {
        let store = InMemoryDocumentStore::with_document("a", b"old");
        store.fail_writes(true);

        assert!(store.set("a", b"new").await.is_err());
        assert!(store.remove("a").await.is_err());
        assert_eq!(store.raw("a"), Some(b"old".to_vec()));
        assert_eq!(store.write_count(), 0);

        store.fail_writes(false);
        store.set("a", b"new").await.unwrap();
        assert_eq!(store.raw("a"), Some(b"new".to_vec()));
    }

    #[tokio::test]
    async fn clones_share_data() {
        let store = InMemoryDocumentStore::new();
        let handle = store.clone();
        store.set("k", b"v").await.unwrap();
        assert!(handle.contains_key("k"));
    }
}
