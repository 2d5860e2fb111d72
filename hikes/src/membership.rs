//! Joining, leaving and completing hikes.
//!
//! Per (hike, user) there are two states, joined and not joined. Completion
//! is an independent flag that outlives leaving.

use crate::error::{HikeError, NotFound, Result};
use crate::repository::HikeRepository;
use crate::reducer::HikeAction;
use crate::types::{Change, Hike, HikeId, UserId};
use chrono::NaiveDateTime;
use trailmate_core::DocumentStore;

/// Add `user` to the hike's participants.
///
/// Already joined is a no-op.
///
/// # Errors
///
/// [`HikeError::CapacityExceeded`] when the hike is full.
pub fn join(hike: &mut Hike, user: &UserId) -> Result<Change> {
    if hike.is_joined(user) {
        return Ok(Change::Unchanged);
    }
    if hike.is_full() {
        return Err(HikeError::CapacityExceeded {
            hike_id: hike.id.clone(),
            capacity: hike.capacity,
        });
    }
    hike.joined_users.push(user.clone());
    Ok(Change::Applied)
}

/// Remove `user` from the participants and from every carpool block.
///
/// Completion marks are kept.
pub fn leave(hike: &mut Hike, user: &UserId) -> Change {
    let before = hike.joined_users.len();
    hike.joined_users.retain(|u| u != user);
    let mut changed = hike.joined_users.len() != before;

    for block in &mut hike.drivers {
        let riders = block.riders.len();
        block.riders.retain(|u| u != user);
        changed |= block.riders.len() != riders;
    }

    if changed { Change::Applied } else { Change::Unchanged }
}

/// Record that `user` completed the hike.
pub fn mark_completed(hike: &mut Hike, user: &UserId) -> Change {
    if hike.has_completed(user) {
        return Change::Unchanged;
    }
    hike.completed_by.push(user.clone());
    Change::Applied
}

/// Hikes `user` has not completed, for discovery views
#[must_use]
pub fn visible_to<'a>(user: &UserId, hikes: &'a [Hike]) -> Vec<&'a Hike> {
    hikes.iter().filter(|h| !h.has_completed(user)).collect()
}

/// Joined hikes `user` has not completed yet
#[must_use]
pub fn upcoming_for<'a>(user: &UserId, hikes: &'a [Hike]) -> Vec<&'a Hike> {
    hikes
        .iter()
        .filter(|h| h.is_joined(user) && !h.has_completed(user))
        .collect()
}

/// Joined hikes `user` has completed
#[must_use]
pub fn completed_for<'a>(user: &UserId, hikes: &'a [Hike]) -> Vec<&'a Hike> {
    hikes
        .iter()
        .filter(|h| h.is_joined(user) && h.has_completed(user))
        .collect()
}

/// Whether the hike's scheduled instant is at or before `now`
#[must_use]
pub fn has_occurred(hike: &Hike, now: NaiveDateTime) -> bool {
    now >= hike.scheduled_at()
}

/// Membership operations against the stored collection
pub struct MembershipEngine<'a, D: DocumentStore> {
    repository: &'a HikeRepository<D>,
}

impl<'a, D: DocumentStore> MembershipEngine<'a, D> {
    pub(crate) const fn new(repository: &'a HikeRepository<D>) -> Self {
        Self { repository }
    }

    /// Join a hike
    ///
    /// # Errors
    ///
    /// [`HikeError::CapacityExceeded`], [`NotFound::Hike`], or a store failure.
    pub async fn join(&self, hike_id: &HikeId, user_id: &UserId) -> Result<Hike> {
        self.repository
            .send_to(hike_id, HikeAction::Join {
                hike_id: hike_id.clone(),
                user_id: user_id.clone(),
            })
            .await
    }

    /// Leave a hike (and any car in it)
    ///
    /// # Errors
    ///
    /// [`NotFound::Hike`] or a store failure.
    pub async fn leave(&self, hike_id: &HikeId, user_id: &UserId) -> Result<Hike> {
        self.repository
            .send_to(hike_id, HikeAction::Leave {
                hike_id: hike_id.clone(),
                user_id: user_id.clone(),
            })
            .await
    }

    /// Mark a hike completed for one user
    ///
    /// # Errors
    ///
    /// [`NotFound::Hike`] or a store failure.
    pub async fn mark_completed(&self, hike_id: &HikeId, user_id: &UserId) -> Result<Hike> {
        self.repository
            .send_to(hike_id, HikeAction::MarkCompleted {
                hike_id: hike_id.clone(),
                user_id: user_id.clone(),
            })
            .await
    }

    /// Hikes the user has not completed
    ///
    /// # Errors
    ///
    /// Store failure.
    pub async fn visible_to(&self, user_id: &UserId) -> Result<Vec<Hike>> {
        let hikes = self.repository.list_all().await?;
        Ok(visible_to(user_id, &hikes).into_iter().cloned().collect())
    }

    /// Joined hikes still ahead for the user
    ///
    /// # Errors
    ///
    /// Store failure.
    pub async fn upcoming_for(&self, user_id: &UserId) -> Result<Vec<Hike>> {
        let hikes = self.repository.list_all().await?;
        Ok(upcoming_for(user_id, &hikes).into_iter().cloned().collect())
    }

    /// Joined hikes the user completed
    ///
    /// # Errors
    ///
    /// Store failure.
    pub async fn completed_for(&self, user_id: &UserId) -> Result<Vec<Hike>> {
        let hikes = self.repository.list_all().await?;
        Ok(completed_for(user_id, &hikes).into_iter().cloned().collect())
    }

    /// Whether a stored hike has already started, by the injected clock
    ///
    /// # Errors
    ///
    /// [`NotFound::Hike`] or a store failure.
    pub async fn has_occurred(&self, hike_id: &HikeId) -> Result<bool> {
        let hike = self
            .repository
            .find_by_id(hike_id)
            .await?
            .ok_or_else(|| NotFound::Hike(hike_id.clone()))?;
        Ok(has_occurred(&hike, self.repository.local_now()))
    }
}
