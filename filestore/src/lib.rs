//! File-backed document store for Trailmate.
//!
//! This crate provides a durable implementation of the `DocumentStore` trait
//! from `trailmate-core`. Each key is one file inside a data directory:
//!
//! - `get` reads the file (absent file → `None`)
//! - `set` writes a temporary sibling, syncs it, then renames it over the
//!   target, so readers see either the old or the new document, never a
//!   half-written one
//! - `remove` deletes the file (absent file is fine)
//!
//! # Example
//!
//! ```no_run
//! use trailmate_filestore::FileDocumentStore;
//! use trailmate_core::DocumentStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = FileDocumentStore::open("./trailmate-data").await?;
//! store.set("hikes", b"[]").await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::AsyncWriteExt;
use trailmate_core::document_store::{DocumentStore, Result, StoreError};

/// Document store keeping one file per key under a directory.
#[derive(Debug)]
pub struct FileDocumentStore {
    dir: PathBuf,
    temp_counter: AtomicU64,
}

impl FileDocumentStore {
    /// Open (creating if needed) a store rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be created.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        tracing::debug!(dir = %dir.display(), "Opened file document store");
        Ok(Self {
            dir,
            temp_counter: AtomicU64::new(0),
        })
    }

    /// Directory holding the documents
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    ///
    /// Keys are restricted to ASCII letters, digits, `-`, `_` and `.` (not
    /// leading) so a key can never escape the directory.
    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(StoreError::Backend(format!("invalid document key: {key:?}")));
        }
        Ok(self.dir.join(key))
    }

    fn temp_path_for(&self, key: &str) -> PathBuf {
        let n = self.temp_counter.fetch_add(1, Ordering::Relaxed);
        self.dir
            .join(format!(".{key}.{}.{n}.tmp", std::process::id()))
    }

    async fn write_temp(path: &Path, data: &[u8]) -> Result<()> {
        let mut file = tokio::fs::File::create(path).await?;
        file.write_all(data).await?;
        file.sync_all().await?;
        Ok(())
    }
}

impl DocumentStore for FileDocumentStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, data: &[u8]) -> Result<()> {
        let path = self.path_for(key)?;
        let temp = self.temp_path_for(key);

        let written = match Self::write_temp(&temp, data).await {
            Ok(()) => tokio::fs::rename(&temp, &path).await.map_err(StoreError::from),
            Err(e) => Err(e),
        };

        if let Err(error) = written {
            metrics::counter!("filestore.write_errors").increment(1);
            tracing::warn!(key, %error, "Document write failed, previous version kept");
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(error);
        }

        tracing::trace!(key, bytes = data.len(), "Document written");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
