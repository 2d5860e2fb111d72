//! # Trailmate Runtime
//!
//! Runtime that coordinates reducer execution against a [`DocumentStore`].
//!
//! The runtime never holds long-lived authority over the document. Every
//! [`Store::send`] is a self-contained cycle:
//!
//! ```text
//! get(key) ──► deserialize ──► reducer.reduce() ──► Effect
//!                                                    │
//!                     ┌──────────────┬───────────────┤
//!                     ▼              ▼               ▼
//!                   None          Persist          Remove
//!               (no write)    set(key, json)    remove(key)
//! ```
//!
//! Two sends issued back to back can interleave at the storage suspension
//! points. The later write wins at whole-document granularity; each write is
//! still the reducer applied to *some* valid prior document, so invariants
//! enforced by the reducer hold for whatever ends up stored.
//!
//! ## Example
//!
//! ```ignore
//! use trailmate_runtime::Store;
//!
//! let store = Store::new(documents, "hikes", HikeReducer::new(), environment);
//!
//! // Send an action (read-modify-write)
//! let hike = store.send(HikeAction::Join { hike_id, user_id }).await?;
//!
//! // Read the current document
//! let count = store.state(|hikes| hikes.len()).await?;
//! ```

use serde::Serialize;
use serde::de::DeserializeOwned;
use trailmate_core::{
    document_store::{DocumentStore, StoreError},
    effect::Effect,
    reducer::Reducer,
};

/// Metric names and descriptions
pub mod metrics;

/// Store runtime
///
/// Binds one storage key to a reducer and its environment.
///
/// # Type Parameters
///
/// - `D`: Document store backend
/// - `R`: Reducer implementation (business logic)
pub struct Store<D, R>
where
    R: Reducer,
{
    documents: D,
    key: String,
    reducer: R,
    environment: R::Environment,
}

impl<D, R> Store<D, R>
where
    D: DocumentStore,
    R: Reducer,
    R::State: Serialize + DeserializeOwned + Default,
    R::Error: From<StoreError>,
{
    /// Create a new store over `key` in `documents`
    ///
    /// # Arguments
    ///
    /// - `documents`: Storage backend
    /// - `key`: Key under which the whole document lives
    /// - `reducer`: The reducer implementation (business logic)
    /// - `environment`: Injected dependencies
    #[must_use]
    pub fn new(documents: D, key: impl Into<String>, reducer: R, environment: R::Environment) -> Self {
        Self {
            documents,
            key: key.into(),
            reducer,
            environment,
        }
    }

    /// Storage key of the document
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The storage backend
    #[must_use]
    pub const fn documents(&self) -> &D {
        &self.documents
    }

    /// The injected environment
    #[must_use]
    pub const fn environment(&self) -> &R::Environment {
        &self.environment
    }

    /// Read and deserialize the whole document.
    ///
    /// An absent key yields the default (empty) state. Content that does not
    /// deserialize is treated the same way: it is logged and replaced with the
    /// default, never surfaced as a failure.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend read fails.
    pub async fn load_all(&self) -> Result<R::State, StoreError> {
        let Some(bytes) = self.documents.get(&self.key).await? else {
            tracing::trace!(key = %self.key, "Document absent, using empty state");
            return Ok(R::State::default());
        };

        match serde_json::from_slice(&bytes) {
            Ok(state) => Ok(state),
            Err(error) => {
                metrics::counter!(metrics::LOADS_MALFORMED).increment(1);
                tracing::warn!(
                    key = %self.key,
                    %error,
                    bytes = bytes.len(),
                    "Stored document is malformed, treating as empty"
                );
                Ok(R::State::default())
            }
        }
    }

    /// Serialize and write the whole document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] if the state cannot be encoded,
    /// or the backend's error if the write fails.
    pub async fn save_all(&self, state: &R::State) -> Result<(), StoreError> {
        let bytes =
            serde_json::to_vec(state).map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.documents.set(&self.key, &bytes).await?;
        metrics::counter!(metrics::WRITES_TOTAL).increment(1);
        tracing::trace!(key = %self.key, bytes = bytes.len(), "Document written");
        Ok(())
    }

    /// Remove the document entirely.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    pub async fn clear(&self) -> Result<(), StoreError> {
        self.documents.remove(&self.key).await?;
        metrics::counter!(metrics::WRITES_TOTAL).increment(1);
        Ok(())
    }

    /// Read the current document via a closure
    ///
    /// ```ignore
    /// let count = store.state(|hikes| hikes.len()).await?;
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend read fails.
    pub async fn state<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&R::State) -> T,
    {
        let state = self.load_all().await?;
        Ok(f(&state))
    }

    /// Send an action through one read-modify-write cycle
    ///
    /// 1. Load the whole document
    /// 2. Run the reducer on it
    /// 3. Execute the returned effect
    ///
    /// A rejected action writes nothing.
    ///
    /// # Errors
    ///
    /// Returns the reducer's error when the action is rejected, or a
    /// [`StoreError`] (converted into `R::Error`) when storage fails.
    #[tracing::instrument(skip(self, action), fields(key = %self.key), name = "store_send")]
    pub async fn send(&self, action: R::Action) -> Result<R::Output, R::Error> {
        tracing::debug!("Processing action");
        metrics::counter!(metrics::COMMANDS_TOTAL).increment(1);

        let mut state = self.load_all().await?;

        let reduction = {
            let span = tracing::debug_span!("reducer_execution");
            let _enter = span.enter();

            let start = std::time::Instant::now();
            let result = self.reducer.reduce(&mut state, action, &self.environment);
            metrics::histogram!(metrics::REDUCER_DURATION).record(start.elapsed().as_secs_f64());
            result
        };

        let reduction = match reduction {
            Ok(reduction) => reduction,
            Err(error) => {
                metrics::counter!(metrics::COMMANDS_REJECTED).increment(1);
                tracing::debug!("Action rejected, nothing written");
                return Err(error);
            }
        };

        match reduction.effect {
            Effect::None => tracing::trace!("No-op, document left untouched"),
            Effect::Persist => self.save_all(&state).await?,
            Effect::Remove => self.clear().await?,
        }

        tracing::debug!(effect = ?reduction.effect, "Action processing completed");
        Ok(reduction.output)
    }
}
