//! Seat-bounded carpool assignment.
//!
//! A hike without registered cars exposes one synthetic block, `"group"`,
//! whose seats are the hike's capacity and whose riders are its participants.
//! Views can then render the same seat grid either way.

use crate::error::{HikeError, NotFound, Result, ValidationError};
use crate::membership;
use crate::reducer::HikeAction;
use crate::repository::HikeRepository;
use crate::types::{Change, DriverBlock, Hike, HikeId, UserId};
use trailmate_core::DocumentStore;

/// Id of the synthetic whole-hike block
pub const GROUP_BLOCK_ID: &str = "group";

/// The hike's carpool blocks, or the synthetic group block when none exist
#[must_use]
pub fn blocks_for(hike: &Hike) -> Vec<DriverBlock> {
    if hike.drivers.is_empty() {
        vec![DriverBlock {
            id: GROUP_BLOCK_ID.to_string(),
            capacity: hike.capacity,
            riders: hike.joined_users.clone(),
        }]
    } else {
        hike.drivers.clone()
    }
}

/// Seats to render as empty affordances
#[must_use]
pub fn empty_seats(block: &DriverBlock) -> usize {
    block.empty_seats()
}

/// One row of the participants seat grid
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeatRow {
    /// Block id to pass back to [`CarpoolAllocator::assign_rider`]
    pub block_id: String,
    /// `Group`, or `Car N` by position
    pub label: String,
    /// Seats in the block
    pub capacity: u32,
    /// Riders in assignment order
    pub riders: Vec<UserId>,
    /// Empty seats, never negative
    pub empty_seats: usize,
}

/// Seat grid for the participants view
#[must_use]
pub fn seat_grid(hike: &Hike) -> Vec<SeatRow> {
    let synthetic = hike.drivers.is_empty();
    blocks_for(hike)
        .into_iter()
        .enumerate()
        .map(|(i, block)| SeatRow {
            label: if synthetic {
                "Group".to_string()
            } else {
                format!("Car {}", i + 1)
            },
            empty_seats: block.empty_seats(),
            capacity: block.capacity,
            block_id: block.id,
            riders: block.riders,
        })
        .collect()
}

/// Seat `user` in block `block_id`.
///
/// Riding in any block already is a no-op. Without registered cars the
/// `"group"` block is the same as joining the hike. Riding a car joins the
/// hike too, so the seat check comes first and the hike capacity second.
///
/// # Errors
///
/// [`HikeError::SeatsFull`], [`HikeError::CapacityExceeded`], or
/// [`NotFound::Block`] for an unknown block.
pub fn assign_rider(hike: &mut Hike, block_id: &str, user: &UserId) -> Result<Change> {
    if hike.drivers.is_empty() {
        if block_id == GROUP_BLOCK_ID {
            return membership::join(hike, user);
        }
        return Err(unknown_block(hike, block_id));
    }

    if hike.block_of(user).is_some() {
        return Ok(Change::Unchanged);
    }

    let Some(index) = hike.drivers.iter().position(|b| b.id == block_id) else {
        return Err(unknown_block(hike, block_id));
    };

    let block = &hike.drivers[index];
    if block.is_full() {
        return Err(HikeError::SeatsFull {
            hike_id: hike.id.clone(),
            block_id: block.id.clone(),
            capacity: block.capacity,
        });
    }

    membership::join(hike, user)?;
    hike.drivers[index].riders.push(user.clone());
    Ok(Change::Applied)
}

/// Register a car with `capacity` rider seats under `block_id`.
///
/// # Errors
///
/// [`ValidationError::DriverCapacity`] for zero seats,
/// [`ValidationError::DuplicateId`] if the id is taken.
pub fn register_driver(hike: &mut Hike, block_id: &str, capacity: u32) -> Result<Change> {
    if capacity == 0 {
        return Err(ValidationError::DriverCapacity.into());
    }
    if block_id == GROUP_BLOCK_ID || hike.drivers.iter().any(|b| b.id == block_id) {
        return Err(ValidationError::DuplicateId(block_id.to_string()).into());
    }
    hike.drivers.push(DriverBlock::new(block_id, capacity));
    Ok(Change::Applied)
}

fn unknown_block(hike: &Hike, block_id: &str) -> HikeError {
    NotFound::Block {
        hike_id: hike.id.clone(),
        block_id: block_id.to_string(),
    }
    .into()
}

/// Carpool operations against the stored collection
pub struct CarpoolAllocator<'a, D: DocumentStore> {
    repository: &'a HikeRepository<D>,
}

impl<'a, D: DocumentStore> CarpoolAllocator<'a, D> {
    pub(crate) const fn new(repository: &'a HikeRepository<D>) -> Self {
        Self { repository }
    }

    /// Blocks of a stored hike
    ///
    /// # Errors
    ///
    /// [`NotFound::Hike`] or a store failure.
    pub async fn blocks_for(&self, hike_id: &HikeId) -> Result<Vec<DriverBlock>> {
        Ok(blocks_for(&self.repository.get(hike_id).await?))
    }

    /// Seat grid of a stored hike
    ///
    /// # Errors
    ///
    /// [`NotFound::Hike`] or a store failure.
    pub async fn seat_grid(&self, hike_id: &HikeId) -> Result<Vec<SeatRow>> {
        Ok(seat_grid(&self.repository.get(hike_id).await?))
    }

    /// Seat a rider
    ///
    /// # Errors
    ///
    /// See [`assign_rider`], plus [`NotFound::Hike`] and store failures.
    pub async fn assign_rider(&self, hike_id: &HikeId, block_id: &str, user_id: &UserId) -> Result<Hike> {
        self.repository
            .send_to(hike_id, HikeAction::AssignRider {
                hike_id: hike_id.clone(),
                block_id: block_id.to_string(),
                user_id: user_id.clone(),
            })
            .await
    }

    /// Register a car with a fresh block id
    ///
    /// # Errors
    ///
    /// See [`register_driver`], plus [`NotFound::Hike`] and store failures.
    pub async fn register_driver(&self, hike_id: &HikeId, capacity: u32) -> Result<Hike> {
        self.repository
            .send_to(hike_id, HikeAction::RegisterDriver {
                hike_id: hike_id.clone(),
                block_id: self.repository.next_id(),
                capacity,
            })
            .await
    }
}
