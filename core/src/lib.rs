//! # Trailmate Core
//!
//! Core traits and types shared by every Trailmate crate.
//!
//! The domain is modelled as a single shared document (the hike collection)
//! that is mutated through pure reducers. This crate holds the pieces that
//! make that possible without knowing anything about hikes:
//!
//! - **State**: The deserialized document a reducer operates on
//! - **Action**: All possible inputs to a reducer
//! - **Reducer**: Pure function `(State, Action, Environment) → Result<(Output, Effect), Error>`
//! - **Effect**: What the runtime must do with the document afterwards (nothing, persist, remove)
//! - **Environment**: Injected dependencies (clock, id generation)
//! - **`DocumentStore`**: The key-value persistence primitive
//!
//! ## Architecture Principles
//!
//! - Functional Core, Imperative Shell
//! - Whole-document read → reduce → write, no hidden I/O in reducers
//! - Dependency Injection via Environment
//!
//! ## Example
//!
//! ```ignore
//! use trailmate_core::{effect::Reduction, reducer::Reducer};
//!
//! impl Reducer for CounterReducer {
//!     type State = u64;
//!     type Action = CounterAction;
//!     type Environment = ();
//!     type Output = u64;
//!     type Error = CounterError;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut u64,
//!         action: CounterAction,
//!         _env: &(),
//!     ) -> Result<Reduction<u64>, CounterError> {
//!         *state += 1;
//!         Ok(Reduction::persist(*state))
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
pub use serde::{Deserialize, Serialize};

/// Key-value document persistence
pub mod document_store;

pub use document_store::{DocumentStore, StoreError};

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effect)`.
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Reduction;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The document this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    /// - `Output`: The value handed back to the caller on success
    /// - `Error`: Business-rule rejection type
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for HikeReducer {
    ///     type State = Vec<Hike>;
    ///     type Action = HikeAction;
    ///     type Environment = HikeEnvironment;
    ///     type Output = Option<Hike>;
    ///     type Error = HikeError;
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut Vec<Hike>,
    ///         action: HikeAction,
    ///         env: &HikeEnvironment,
    ///     ) -> Result<Reduction<Option<Hike>>, HikeError> {
    ///         match action {
    ///             HikeAction::ClearAll => {
    ///                 state.clear();
    ///                 Ok(Reduction::remove(None))
    ///             }
    ///             _ => Ok(Reduction::unchanged(None)),
    ///         }
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Value returned to the caller when the action is accepted
        type Output;

        /// Error returned when the action is rejected
        type Error;

        /// Reduce an action into state changes and an effect
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns the effect the runtime should apply to storage
        ///
        /// # Errors
        ///
        /// Returns `Self::Error` when the action is rejected. The runtime
        /// discards `state` in that case, so a partially applied mutation is
        /// never written.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> Result<Reduction<Self::Output>, Self::Error>;
    }
}

/// Effect module - Storage effect descriptions
///
/// Effects describe what the runtime must do with the document after a
/// reducer ran. They are values, not execution.
pub mod effect {
    /// Effect type - describes what happens to the stored document
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum Effect {
        /// No-op effect: the document is unchanged and is not rewritten
        None,

        /// Serialize the whole state and write it back under the store key
        Persist,

        /// Remove the store key entirely
        Remove,
    }

    impl Effect {
        /// Whether this effect writes to storage
        #[must_use]
        pub const fn writes(self) -> bool {
            !matches!(self, Self::None)
        }
    }

    /// The result of a successful reduction: an output plus its effect
    #[derive(Clone, Debug, PartialEq)]
    pub struct Reduction<T> {
        /// Value handed back to the caller
        pub output: T,
        /// Storage effect to execute
        pub effect: Effect,
    }

    impl<T> Reduction<T> {
        /// Output without touching storage (idempotent no-op)
        #[must_use]
        pub const fn unchanged(output: T) -> Self {
            Self {
                output,
                effect: Effect::None,
            }
        }

        /// Output whose state must be persisted
        #[must_use]
        pub const fn persist(output: T) -> Self {
            Self {
                output,
                effect: Effect::Persist,
            }
        }

        /// Output whose store key must be removed
        #[must_use]
        pub const fn remove(output: T) -> Self {
            Self {
                output,
                effect: Effect::Remove,
            }
        }

        /// Transform the output, keeping the effect
        #[must_use]
        pub fn map<U, F>(self, f: F) -> Reduction<U>
        where
            F: FnOnce(T) -> U,
        {
            Reduction {
                output: f(self.output),
                effect: self.effect,
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All non-deterministic inputs (time, identifiers) are abstracted behind
/// traits and injected via the Environment parameter.
pub mod environment {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use trailmate_core::environment::{Clock, SystemClock};
    ///
    /// let clock = SystemClock;
    /// assert!(clock.now().timestamp() > 0);
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;

        /// Current wall-clock time in the user's frame
        ///
        /// Calendar dates and `HH:MM` times are interpreted against this.
        /// Defaults to UTC.
        fn local_now(&self) -> NaiveDateTime {
            self.now().naive_utc()
        }

        /// Current calendar day in the user's frame
        fn today(&self) -> NaiveDate {
            self.local_now().date()
        }
    }

    /// System clock backed by the host's time and local timezone
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }

        fn local_now(&self) -> NaiveDateTime {
            chrono::Local::now().naive_local()
        }
    }

    /// Generates opaque unique identifiers for new records
    pub trait IdGenerator: Send + Sync {
        /// Produce the next identifier
        fn next_id(&self) -> String;
    }

    /// Random UUID v4 identifiers
    #[derive(Debug, Clone, Copy, Default)]
    pub struct UuidGenerator;

    impl IdGenerator for UuidGenerator {
        fn next_id(&self) -> String {
            uuid::Uuid::new_v4().to_string()
        }
    }
}
