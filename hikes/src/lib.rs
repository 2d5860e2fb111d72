//! Group hike coordination for Trailmate.
//!
//! Users discover hikes, join and leave them under a participant cap, ride
//! in seat-limited carpools, and list the consumables and tools they bring.
//! The whole collection lives in one document; every mutation is a single
//! read-modify-write through [`trailmate_runtime::Store`].
//!
//! - [`HikeRepository`]: create, find, list, update, clear
//! - [`MembershipEngine`]: join, leave, mark completed, discovery filters
//! - [`CarpoolAllocator`]: driver blocks, seat grid, rider assignment
//! - [`ProvisioningLedger`]: add items, group by owner, split by type
//!
//! # Quick Start
//!
//! ```no_run
//! use trailmate_hikes::{HikeDraft, HikeEnvironment, HikeRepository, UserId};
//! use trailmate_filestore::FileDocumentStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let documents = FileDocumentStore::open("./trailmate-data").await?;
//! let repository = HikeRepository::new(documents, "hikes", HikeEnvironment::production());
//!
//! let hike = repository
//!     .create(HikeDraft::new("Grouse Grind", "2030-06-02").location("North Vancouver").participants("2"))
//!     .await?;
//! repository.membership().join(&hike.id, &UserId::new("alice")).await?;
//! # Ok(())
//! # }
//! ```

pub mod carpool;
pub mod config;
pub mod directory;
pub mod draft;
pub mod error;
pub mod membership;
pub mod provisions;
pub mod reducer;
pub mod repository;
pub mod session;
pub mod types;

// Re-export commonly used types
pub use carpool::{CarpoolAllocator, GROUP_BLOCK_ID, SeatRow};
pub use config::Config;
pub use directory::{InMemoryUserDirectory, UserDirectory, UserProfile, avatar_initial, avatar_initials};
pub use draft::HikeDraft;
pub use error::{HikeError, NotFound, ValidationError};
pub use membership::MembershipEngine;
pub use provisions::{OwnerGroup, ProvisionBuckets, ProvisioningLedger};
pub use reducer::{HikeAction, HikeEnvironment, HikeReducer, HikeState};
pub use repository::HikeRepository;
pub use session::{IdentityProvider, SessionKeys, SessionStore};
pub use types::{
    Coordinates, Difficulty, DriverBlock, Hike, HikeId, HikePatch, MediaAccess, MediaItem, Provision,
    ProvisionKind, UserId,
};
