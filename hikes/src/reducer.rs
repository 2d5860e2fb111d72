//! Reducer over the whole hike collection.
//!
//! Every mutating operation is one [`HikeAction`]. The reducer validates it
//! against the collection it is handed and either rejects it (nothing is
//! written) or applies it and returns the storage effect to execute.

use crate::carpool;
use crate::draft::{HikeDraft, check_invariants};
use crate::error::{HikeError, NotFound, ValidationError};
use crate::membership;
use crate::provisions;
use crate::types::{Change, Hike, HikeId, HikePatch, ProvisionKind, UserId};
use std::sync::Arc;
use trailmate_core::effect::Reduction;
use trailmate_core::environment::{Clock, IdGenerator, SystemClock, UuidGenerator};
use trailmate_core::reducer::Reducer;

/// The stored collection
pub type HikeState = Vec<Hike>;

/// Operations on the collection
#[derive(Clone, Debug, PartialEq)]
pub enum HikeAction {
    /// Validate a draft and append it under `id`
    Create {
        /// Fresh id for the new hike
        id: HikeId,
        /// Form input
        draft: HikeDraft,
    },
    /// Shallow-merge a patch onto one hike
    Update {
        /// Target hike
        hike_id: HikeId,
        /// Fields to replace
        patch: HikePatch,
    },
    /// Drop every hike
    ClearAll,
    /// Join a hike
    Join {
        /// Target hike
        hike_id: HikeId,
        /// Participant
        user_id: UserId,
    },
    /// Leave a hike and any car in it
    Leave {
        /// Target hike
        hike_id: HikeId,
        /// Participant
        user_id: UserId,
    },
    /// Mark a hike completed for one user
    MarkCompleted {
        /// Target hike
        hike_id: HikeId,
        /// Participant
        user_id: UserId,
    },
    /// Seat a rider in a carpool block
    AssignRider {
        /// Target hike
        hike_id: HikeId,
        /// Car id or `"group"`
        block_id: String,
        /// Rider
        user_id: UserId,
    },
    /// Register a car
    RegisterDriver {
        /// Target hike
        hike_id: HikeId,
        /// Fresh block id
        block_id: String,
        /// Rider seats
        capacity: u32,
    },
    /// Add a provision
    AddProvision {
        /// Target hike
        hike_id: HikeId,
        /// Fresh item id
        provision_id: String,
        /// Who brings it
        owner: String,
        /// What it is
        name: String,
        /// Consumable or tool
        kind: ProvisionKind,
    },
}

/// Injected dependencies
#[derive(Clone)]
pub struct HikeEnvironment {
    /// Wall clock, for "today" and "has it started"
    pub clock: Arc<dyn Clock>,
    /// Source of fresh record ids
    pub ids: Arc<dyn IdGenerator>,
}

impl HikeEnvironment {
    /// Creates an environment from explicit dependencies
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { clock, ids }
    }

    /// System clock and random UUIDs
    #[must_use]
    pub fn production() -> Self {
        Self::new(Arc::new(SystemClock), Arc::new(UuidGenerator))
    }
}

/// Reducer for the hike collection
#[derive(Clone, Debug, Default)]
pub struct HikeReducer;

impl HikeReducer {
    /// Creates a new `HikeReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Run a pure mutation on one hike and turn its outcome into a reduction
    fn mutate<F>(
        hikes: &mut HikeState,
        hike_id: &HikeId,
        operation: &'static str,
        f: F,
    ) -> Result<Reduction<Option<Hike>>, HikeError>
    where
        F: FnOnce(&mut Hike) -> Result<Change, HikeError>,
    {
        let hike = hikes
            .iter_mut()
            .find(|h| &h.id == hike_id)
            .ok_or_else(|| NotFound::Hike(hike_id.clone()))?;

        let reduction = match f(hike)? {
            Change::Applied => {
                tracing::info!(%hike_id, operation, "Hike updated");
                Reduction::persist(())
            }
            Change::Unchanged => {
                tracing::debug!(%hike_id, operation, "Already in target state");
                Reduction::unchanged(())
            }
        };
        Ok(reduction.map(|()| Some(hike.clone())))
    }

    fn create(
        hikes: &mut HikeState,
        id: HikeId,
        draft: HikeDraft,
        env: &HikeEnvironment,
    ) -> Result<Reduction<Option<Hike>>, HikeError> {
        if hikes.iter().any(|h| h.id == id) {
            return Err(ValidationError::DuplicateId(id.to_string()).into());
        }
        let hike = draft.validate(id, env.clock.today())?;
        tracing::info!(hike_id = %hike.id, name = %hike.name, capacity = hike.capacity, "Hike created");
        hikes.push(hike.clone());
        Ok(Reduction::persist(Some(hike)))
    }

    fn update(hikes: &mut HikeState, hike_id: &HikeId, patch: HikePatch) -> Result<Reduction<Option<Hike>>, HikeError> {
        let Some(stored) = hikes.iter_mut().find(|h| &h.id == hike_id) else {
            tracing::debug!(%hike_id, "Update target absent");
            return Ok(Reduction::unchanged(None));
        };

        let mut updated = stored.clone();
        patch.apply_to(&mut updated);
        check_invariants(&updated)?;

        if updated == *stored {
            return Ok(Reduction::unchanged(Some(updated)));
        }
        *stored = updated.clone();
        tracing::info!(%hike_id, "Hike record replaced");
        Ok(Reduction::persist(Some(updated)))
    }
}

impl Reducer for HikeReducer {
    type State = HikeState;
    type Action = HikeAction;
    type Environment = HikeEnvironment;
    type Output = Option<Hike>;
    type Error = HikeError;

    fn reduce(
        &self,
        hikes: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Result<Reduction<Self::Output>, Self::Error> {
        match action {
            HikeAction::Create { id, draft } => Self::create(hikes, id, draft, env),

            HikeAction::Update { hike_id, patch } => Self::update(hikes, &hike_id, patch),

            HikeAction::ClearAll => {
                tracing::info!(removed = hikes.len(), "Clearing all hikes");
                hikes.clear();
                Ok(Reduction::remove(None))
            }

            HikeAction::Join { hike_id, user_id } => {
                Self::mutate(hikes, &hike_id, "join", |h| membership::join(h, &user_id))
            }

            HikeAction::Leave { hike_id, user_id } => {
                Self::mutate(hikes, &hike_id, "leave", |h| Ok(membership::leave(h, &user_id)))
            }

            HikeAction::MarkCompleted { hike_id, user_id } => {
                Self::mutate(hikes, &hike_id, "mark_completed", |h| {
                    Ok(membership::mark_completed(h, &user_id))
                })
            }

            HikeAction::AssignRider {
                hike_id,
                block_id,
                user_id,
            } => Self::mutate(hikes, &hike_id, "assign_rider", |h| {
                carpool::assign_rider(h, &block_id, &user_id)
            }),

            HikeAction::RegisterDriver {
                hike_id,
                block_id,
                capacity,
            } => Self::mutate(hikes, &hike_id, "register_driver", |h| {
                carpool::register_driver(h, &block_id, capacity)
            }),

            HikeAction::AddProvision {
                hike_id,
                provision_id,
                owner,
                name,
                kind,
            } => Self::mutate(hikes, &hike_id, "add_provision", |h| {
                provisions::add_item(h, provision_id, &owner, &name, kind)
            }),
        }
    }
}
