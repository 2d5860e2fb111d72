//! Shared provisions: who brings which consumable or tool.

use crate::error::{Result, ValidationError};
use crate::reducer::HikeAction;
use crate::repository::HikeRepository;
use crate::types::{Change, Hike, HikeId, Provision, ProvisionKind};
use trailmate_core::DocumentStore;

/// Append an item.
///
/// The same owner may add the same name twice; each add is its own entry.
///
/// # Errors
///
/// [`ValidationError::EmptyOwner`] / [`ValidationError::EmptyItemName`] for
/// blank input, [`ValidationError::DuplicateId`] if `id` is taken.
pub fn add_item(hike: &mut Hike, id: String, owner: &str, name: &str, kind: ProvisionKind) -> Result<Change> {
    let owner = owner.trim();
    let name = name.trim();
    if owner.is_empty() {
        return Err(ValidationError::EmptyOwner.into());
    }
    if name.is_empty() {
        return Err(ValidationError::EmptyItemName.into());
    }
    if hike.provisions.iter().any(|p| p.id == id) {
        return Err(ValidationError::DuplicateId(id).into());
    }
    hike.provisions.push(Provision {
        id,
        owner: owner.to_string(),
        name: name.to_string(),
        kind,
    });
    Ok(Change::Applied)
}

/// Items of one owner
#[derive(Debug, PartialEq, Eq)]
pub struct OwnerGroup<'a> {
    /// Owner
    pub owner: &'a str,
    /// Their items in insertion order
    pub items: Vec<&'a Provision>,
}

/// Group items by owner, owners in first-seen order
#[must_use]
pub fn grouped_by_owner(items: &[Provision]) -> Vec<OwnerGroup<'_>> {
    let mut groups: Vec<OwnerGroup<'_>> = Vec::new();
    for item in items {
        match groups.iter_mut().find(|g| g.owner == item.owner) {
            Some(group) => group.items.push(item),
            None => groups.push(OwnerGroup {
                owner: &item.owner,
                items: vec![item],
            }),
        }
    }
    groups
}

/// Items split by kind
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ProvisionBuckets<'a> {
    /// Consumables in relative order
    pub consumables: Vec<&'a Provision>,
    /// Tools in relative order
    pub tools: Vec<&'a Provision>,
}

/// Split items into consumables and tools
#[must_use]
pub fn partition_by_type(items: &[Provision]) -> ProvisionBuckets<'_> {
    let (consumables, tools): (Vec<_>, Vec<_>) = items
        .iter()
        .partition(|item| item.kind == ProvisionKind::Consumable);
    ProvisionBuckets { consumables, tools }
}

/// Provision operations against the stored collection
pub struct ProvisioningLedger<'a, D: DocumentStore> {
    repository: &'a HikeRepository<D>,
}

impl<'a, D: DocumentStore> ProvisioningLedger<'a, D> {
    pub(crate) const fn new(repository: &'a HikeRepository<D>) -> Self {
        Self { repository }
    }

    /// Add an item with a fresh id
    ///
    /// # Errors
    ///
    /// See [`add_item`], plus not-found and store failures.
    pub async fn add_item(&self, hike_id: &HikeId, owner: &str, name: &str, kind: ProvisionKind) -> Result<Hike> {
        self.repository
            .send_to(hike_id, HikeAction::AddProvision {
                hike_id: hike_id.clone(),
                provision_id: self.repository.next_id(),
                owner: owner.to_string(),
                name: name.to_string(),
                kind,
            })
            .await
    }

    /// The hike's items
    ///
    /// # Errors
    ///
    /// Not-found and store failures.
    pub async fn items(&self, hike_id: &HikeId) -> Result<Vec<Provision>> {
        Ok(self.repository.get(hike_id).await?.provisions)
    }
}
