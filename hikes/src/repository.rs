//! Record-level access to the stored hike collection.

use crate::carpool::CarpoolAllocator;
use crate::draft::HikeDraft;
use crate::error::{NotFound, Result};
use crate::membership::MembershipEngine;
use crate::provisions::ProvisioningLedger;
use crate::reducer::{HikeAction, HikeEnvironment, HikeReducer};
use crate::types::{Hike, HikeId, HikePatch};
use chrono::NaiveDateTime;
use trailmate_core::DocumentStore;
use trailmate_runtime::Store;

/// Hike repository
///
/// Holds no copy of the collection: every call re-reads the document, and
/// every mutation is one read-modify-write through [`Store::send`].
///
/// # Example
///
/// ```ignore
/// let repository = HikeRepository::new(documents, "hikes", HikeEnvironment::production());
/// let hike = repository.create(HikeDraft::new("Grouse Grind", "2025-06-02").location("Vancouver")).await?;
/// repository.membership().join(&hike.id, &user).await?;
/// ```
pub struct HikeRepository<D: DocumentStore> {
    store: Store<D, HikeReducer>,
}

impl<D: DocumentStore> HikeRepository<D> {
    /// Creates a repository over the collection stored under `key`
    #[must_use]
    pub fn new(documents: D, key: impl Into<String>, environment: HikeEnvironment) -> Self {
        Self {
            store: Store::new(documents, key, HikeReducer::new(), environment),
        }
    }

    /// The underlying store adapter
    #[must_use]
    pub const fn store(&self) -> &Store<D, HikeReducer> {
        &self.store
    }

    /// Validate a draft and append it under a fresh id
    ///
    /// # Errors
    ///
    /// Validation, location, or store failures.
    pub async fn create(&self, draft: HikeDraft) -> Result<Hike> {
        let id = HikeId::new(self.next_id());
        self.send_to(&id, HikeAction::Create {
            id: id.clone(),
            draft,
        })
        .await
    }

    /// Look up one hike
    ///
    /// # Errors
    ///
    /// Store failure.
    pub async fn find_by_id(&self, id: &HikeId) -> Result<Option<Hike>> {
        let hikes = self.store.load_all().await?;
        Ok(hikes.into_iter().find(|h| &h.id == id))
    }

    /// Every stored hike, in insertion order
    ///
    /// # Errors
    ///
    /// Store failure.
    pub async fn list_all(&self) -> Result<Vec<Hike>> {
        Ok(self.store.load_all().await?)
    }

    /// Shallow-merge `patch` onto a hike; `None` if it does not exist
    ///
    /// # Errors
    ///
    /// Validation failures when the merged record breaks an invariant, or
    /// store failures.
    pub async fn update(&self, id: &HikeId, patch: HikePatch) -> Result<Option<Hike>> {
        self.send(HikeAction::Update {
            hike_id: id.clone(),
            patch,
        })
        .await
    }

    /// Remove every hike
    ///
    /// # Errors
    ///
    /// Store failure.
    pub async fn clear_all(&self) -> Result<()> {
        self.send(HikeAction::ClearAll).await?;
        Ok(())
    }

    /// Send a raw action
    ///
    /// # Errors
    ///
    /// Whatever the reducer rejects with, or store failures.
    pub async fn send(&self, action: HikeAction) -> Result<Option<Hike>> {
        self.store.send(action).await
    }

    /// Membership operations
    #[must_use]
    pub const fn membership(&self) -> MembershipEngine<'_, D> {
        MembershipEngine::new(self)
    }

    /// Carpool operations
    #[must_use]
    pub const fn carpool(&self) -> CarpoolAllocator<'_, D> {
        CarpoolAllocator::new(self)
    }

    /// Provision operations
    #[must_use]
    pub const fn provisions(&self) -> ProvisioningLedger<'_, D> {
        ProvisioningLedger::new(self)
    }

    /// Send an action that targets one hike and yields it
    pub(crate) async fn send_to(&self, hike_id: &HikeId, action: HikeAction) -> Result<Hike> {
        self.send(action)
            .await?
            .ok_or_else(|| NotFound::Hike(hike_id.clone()).into())
    }

    /// One hike, or [`NotFound::Hike`]
    pub(crate) async fn get(&self, hike_id: &HikeId) -> Result<Hike> {
        self.find_by_id(hike_id)
            .await?
            .ok_or_else(|| NotFound::Hike(hike_id.clone()).into())
    }

    pub(crate) fn next_id(&self) -> String {
        self.store.environment().ids.next_id()
    }

    pub(crate) fn local_now(&self) -> NaiveDateTime {
        self.store.environment().clock.local_now()
    }
}
