//! Metric names emitted by the runtime.
//!
//! The runtime records through the `metrics` facade; whichever recorder the
//! host installs receives them. Call [`register_metrics`] once at startup to
//! attach descriptions.

use metrics::{describe_counter, describe_histogram};

// Re-export metrics macros for use in other modules
pub use metrics::{counter, histogram};

/// Actions sent through [`crate::Store::send`]
pub const COMMANDS_TOTAL: &str = "store.commands.total";

/// Actions rejected by the reducer
pub const COMMANDS_REJECTED: &str = "store.commands.rejected";

/// Successful document writes and removals
pub const WRITES_TOTAL: &str = "store.writes.total";

/// Loads that found a malformed document and fell back to empty
pub const LOADS_MALFORMED: &str = "store.loads.malformed";

/// Reducer wall time
pub const REDUCER_DURATION: &str = "store.reducer.duration_seconds";

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(COMMANDS_TOTAL, "Total number of actions sent to the store");
    describe_counter!(
        COMMANDS_REJECTED,
        "Total number of actions rejected by the reducer"
    );
    describe_counter!(WRITES_TOTAL, "Total number of document writes and removals");
    describe_counter!(
        LOADS_MALFORMED,
        "Total number of loads that replaced a malformed document with empty state"
    );
    describe_histogram!(REDUCER_DURATION, "Time taken to execute reducers");
}
