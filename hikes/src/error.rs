//! Error types for hike operations.

use crate::types::{HikeId, UserId};
use thiserror::Error;
use trailmate_core::StoreError;

/// Failures of repository and engine operations
///
/// Every variant except [`HikeError::Store`] is a recoverable rejection: the
/// stored collection is left exactly as it was.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HikeError {
    /// Malformed or missing input
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Neither a location name nor coordinates were given
    #[error("A location name or map coordinates are required")]
    Location,

    /// The hike already has as many participants as it allows
    #[error("Hike {hike_id} is full ({capacity} participants)")]
    CapacityExceeded {
        /// Hike that rejected the join
        hike_id: HikeId,
        /// Its capacity
        capacity: u32,
    },

    /// The targeted carpool block has no empty seat
    #[error("No seats left in block {block_id} of hike {hike_id} ({capacity} seats)")]
    SeatsFull {
        /// Hike owning the block
        hike_id: HikeId,
        /// Block that rejected the rider
        block_id: String,
        /// Its seat count
        capacity: u32,
    },

    /// A referenced record does not exist
    #[error("{0}")]
    NotFound(#[from] NotFound),

    /// The underlying document store failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Which referenced record was missing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotFound {
    /// No hike with this id
    #[error("Hike not found: {0}")]
    Hike(HikeId),

    /// No carpool block with this id on the hike
    #[error("Block {block_id} not found on hike {hike_id}")]
    Block {
        /// Hike searched
        hike_id: HikeId,
        /// Missing block
        block_id: String,
    },

    /// No user with this id
    #[error("User not found: {0}")]
    User(UserId),

    /// No user is signed in
    #[error("No user is signed in")]
    NotSignedIn,
}

/// Rejected input, one variant per rule
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Name is empty
    #[error("Name is required")]
    MissingName,

    /// Date is empty
    #[error("Date is required")]
    MissingDate,

    /// Date is not `YYYY-MM-DD`
    #[error("Date must be in YYYY-MM-DD format, got {0:?}")]
    DateFormat(String),

    /// Date is before today
    #[error("Date {0} is in the past")]
    DateInPast(String),

    /// Time is not a 24-hour `HH:MM`
    #[error("Time must be in HH:MM 24-hour format, got {0:?}")]
    TimeFormat(String),

    /// Participant count is not a positive integer
    #[error("Participants must be a positive whole number, got {0:?}")]
    Participants(String),

    /// Provision owner is empty
    #[error("Owner is required")]
    EmptyOwner,

    /// Provision name is empty
    #[error("Item name is required")]
    EmptyItemName,

    /// Another record already uses this id
    #[error("Duplicate id: {0}")]
    DuplicateId(String),

    /// A participant appears twice in the joined list
    #[error("User {0} is listed twice")]
    DuplicateParticipant(UserId),

    /// A carpool block holds more riders than seats
    #[error("Block {block_id} has {riders} riders for {capacity} seats")]
    DriverOverCapacity {
        /// Offending block
        block_id: String,
        /// Riders assigned
        riders: usize,
        /// Seats available
        capacity: u32,
    },

    /// A rider is not a joined participant
    #[error("Rider {user_id} in block {block_id} has not joined the hike")]
    RiderNotJoined {
        /// Offending block
        block_id: String,
        /// Rider
        user_id: UserId,
    },

    /// Driver seat count is not a positive integer
    #[error("A car needs at least one seat")]
    DriverCapacity,

    /// Map point is not a finite latitude/longitude within range
    #[error("Coordinates ({latitude}, {longitude}) are not a valid map point")]
    Coordinates {
        /// Rejected latitude
        latitude: f64,
        /// Rejected longitude
        longitude: f64,
    },

    /// A trail metric is not a finite positive number
    #[error("{field} must be a finite positive number")]
    TrailMetric {
        /// Offending field
        field: &'static str,
    },
}

/// Convenience alias for hike operations
pub type Result<T> = std::result::Result<T, HikeError>;
