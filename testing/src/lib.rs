//! # Trailmate Testing
//!
//! Testing utilities and helpers for Trailmate.
//!
//! This crate provides:
//! - Deterministic Environment implementations (`FixedClock`, `SequentialIdGenerator`)
//! - An in-memory [`DocumentStore`](trailmate_core::DocumentStore) with failure injection
//! - The [`ReducerTest`] Given-When-Then harness and assertion helpers
//!
//! ## Example
//!
//! ```ignore
//! use trailmate_testing::{InMemoryDocumentStore, test_clock};
//! use trailmate_runtime::Store;
//!
//! #[tokio::test]
//! async fn test_join_flow() {
//!     let store = Store::new(InMemoryDocumentStore::new(), "hikes", HikeReducer::new(), env());
//!     store.send(HikeAction::Join { hike_id, user_id }).await.unwrap();
//!
//!     let hikes = store.load_all().await.unwrap();
//!     assert_eq!(hikes[0].joined_users.len(), 1);
//! }
//! ```

use chrono::{DateTime, Utc};
use trailmate_core::environment::{Clock, IdGenerator};

/// In-memory document store
pub mod document_store;


/// Deterministic implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, IdGenerator, Utc};
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible. Its local
    /// frame is UTC.
    ///
    /// # Example
    ///
    /// ```
    /// use trailmate_testing::mocks::FixedClock;
    /// use trailmate_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// Predictable identifiers: `{prefix}-1`, `{prefix}-2`, ...
    #[derive(Debug)]
    pub struct SequentialIdGenerator {
        prefix: String,
        next: AtomicU64,
    }

    impl SequentialIdGenerator {
        /// Create a generator with the given prefix, starting at 1
        #[must_use]
        pub fn new(prefix: impl Into<String>) -> Self {
            Self {
                prefix: prefix.into(),
                next: AtomicU64::new(1),
            }
        }
    }

    impl Default for SequentialIdGenerator {
        fn default() -> Self {
            Self::new("id")
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn next_id(&self) -> String {
            let n = self.next.fetch_add(1, Ordering::Relaxed);
            format!("{}-{n}", self.prefix)
        }
    }

    /// Generator that always returns the same identifier (collision tests)
    #[derive(Debug, Clone)]
    pub struct ConstantIdGenerator(pub String);

    impl IdGenerator for ConstantIdGenerator {
        fn next_id(&self) -> String {
            self.0.clone()
        }
    }
}

/// Install a test `tracing` subscriber that honours `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use document_store::InMemoryDocumentStore;
pub use mocks::{ConstantIdGenerator, FixedClock, SequentialIdGenerator, test_clock};
pub use reducer_test::{ReducerTest, assertions};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
        assert_eq!(clock.today().to_string(), "2025-01-01");
    }

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIdGenerator::new("hike");
        assert_eq!(ids.next_id(), "hike-1");
        assert_eq!(ids.next_id(), "hike-2");
    }
}
