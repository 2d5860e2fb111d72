//! End-to-end scenarios for the hike coordination core.
//!
//! Each test drives the public API against an in-memory document store, the
//! way a screen would: re-read, mutate, re-read.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use chrono::{DateTime, Utc};
use std::sync::Arc;
use trailmate_core::DocumentStore;
use trailmate_filestore::FileDocumentStore;
use trailmate_hikes::{
    Coordinates, GROUP_BLOCK_ID, HikeDraft, HikeEnvironment, HikeError, HikePatch, HikeRepository, ProvisionKind,
    UserId, ValidationError, carpool, membership, provisions,
};
use trailmate_testing::{FixedClock, InMemoryDocumentStore, SequentialIdGenerator, test_clock};

// ============================================================================
// Test Fixtures
// ============================================================================

const TOMORROW: &str = "2025-01-02";

fn environment() -> HikeEnvironment {
    HikeEnvironment::new(Arc::new(test_clock()), Arc::new(SequentialIdGenerator::new("id")))
}

fn repository(documents: InMemoryDocumentStore) -> HikeRepository<InMemoryDocumentStore> {
    HikeRepository::new(documents, "hikes", environment())
}

fn grouse_grind() -> HikeDraft {
    HikeDraft::new("Grouse Grind", TOMORROW)
        .location("North Vancouver")
        .participants("2")
}

fn user(id: &str) -> UserId {
    UserId::new(id)
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn capacity_two_hike_rejects_third_join() {
    let repo = repository(InMemoryDocumentStore::new());
    let hike = repo.create(grouse_grind()).await.unwrap();
    assert_eq!(hike.capacity, 2);

    let members = repo.membership();
    let after_a = members.join(&hike.id, &user("a")).await.unwrap();
    assert_eq!(after_a.joined_users, vec![user("a")]);

    let after_b = members.join(&hike.id, &user("b")).await.unwrap();
    assert_eq!(after_b.joined_users, vec![user("a"), user("b")]);

    let err = members.join(&hike.id, &user("c")).await.unwrap_err();
    assert!(matches!(err, HikeError::CapacityExceeded { capacity: 2, .. }));

    let stored = repo.find_by_id(&hike.id).await.unwrap().unwrap();
    assert_eq!(stored.joined_users, vec![user("a"), user("b")]);
}

#[tokio::test]
async fn same_owner_provisions_group_and_partition() {
    let repo = repository(InMemoryDocumentStore::new());
    let hike = repo.create(grouse_grind()).await.unwrap();

    let ledger = repo.provisions();
    ledger.add_item(&hike.id, "alice", "stove", ProvisionKind::Tool).await.unwrap();
    ledger.add_item(&hike.id, "alice", "matches", ProvisionKind::Tool).await.unwrap();

    let items = ledger.items(&hike.id).await.unwrap();
    let groups = provisions::grouped_by_owner(&items);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].owner, "alice");
    let names: Vec<_> = groups[0].items.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["stove", "matches"]);

    let buckets = provisions::partition_by_type(&items);
    assert_eq!(buckets.tools.len(), 2);
    assert!(buckets.consumables.is_empty());
    assert_ne!(items[0].id, items[1].id);
}

#[tokio::test]
async fn group_block_without_drivers_shows_empty_seats() {
    let repo = repository(InMemoryDocumentStore::new());
    let hike = repo.create(grouse_grind().participants("3")).await.unwrap();
    repo.membership().join(&hike.id, &user("a")).await.unwrap();

    let blocks = repo.carpool().blocks_for(&hike.id).await.unwrap();
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].id, GROUP_BLOCK_ID);
    assert_eq!(blocks[0].riders.len(), 1);
    assert_eq!(carpool::empty_seats(&blocks[0]), 2);

    repo.carpool()
        .assign_rider(&hike.id, GROUP_BLOCK_ID, &user("b"))
        .await
        .unwrap();
    let grid = repo.carpool().seat_grid(&hike.id).await.unwrap();
    assert_eq!(grid[0].label, "Group");
    assert_eq!(grid[0].empty_seats, 1);
}

#[tokio::test]
async fn carpool_flow_keeps_riders_within_members() {
    let repo = repository(InMemoryDocumentStore::new());
    let hike = repo.create(grouse_grind().participants("4")).await.unwrap();
    let car = repo.carpool().register_driver(&hike.id, 1).await.unwrap().drivers[0].clone();

    let seated = repo.carpool().assign_rider(&hike.id, &car.id, &user("a")).await.unwrap();
    assert_eq!(seated.joined_users, vec![user("a")]);
    assert_eq!(seated.drivers[0].riders, vec![user("a")]);

    let err = repo.carpool().assign_rider(&hike.id, &car.id, &user("b")).await.unwrap_err();
    assert!(matches!(err, HikeError::SeatsFull { .. }));

    let left = repo.membership().leave(&hike.id, &user("a")).await.unwrap();
    assert!(left.joined_users.is_empty());
    assert!(left.drivers[0].riders.is_empty());
}

#[tokio::test]
async fn completion_survives_leaving_and_hides_from_discovery() {
    let repo = repository(InMemoryDocumentStore::new());
    let first = repo.create(grouse_grind()).await.unwrap();
    let second = repo.create(grouse_grind()).await.unwrap();

    let members = repo.membership();
    members.join(&first.id, &user("a")).await.unwrap();
    members.join(&second.id, &user("a")).await.unwrap();
    members.mark_completed(&first.id, &user("a")).await.unwrap();

    let visible = members.visible_to(&user("a")).await.unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, second.id);
    assert_eq!(members.upcoming_for(&user("a")).await.unwrap()[0].id, second.id);
    assert_eq!(members.completed_for(&user("a")).await.unwrap()[0].id, first.id);

    let after_leave = members.leave(&first.id, &user("a")).await.unwrap();
    assert!(after_leave.has_completed(&user("a")));
}

#[tokio::test]
async fn has_occurred_follows_the_injected_clock() {
    let start: DateTime<Utc> = "2025-01-02T07:30:00Z".parse().unwrap();
    let documents = InMemoryDocumentStore::new();

    let before = HikeRepository::new(documents.clone(), "hikes", environment());
    let hike = before
        .create(HikeDraft::new("Dawn Patrol", TOMORROW).location("Seymour").time("07:30"))
        .await
        .unwrap();
    assert!(!before.membership().has_occurred(&hike.id).await.unwrap());

    let at_start = HikeRepository::new(
        documents,
        "hikes",
        HikeEnvironment::new(Arc::new(FixedClock::new(start)), Arc::new(SequentialIdGenerator::new("x"))),
    );
    assert!(at_start.membership().has_occurred(&hike.id).await.unwrap());
    assert!(membership::has_occurred(&hike, start.naive_utc()));
}

#[tokio::test]
async fn malformed_collection_reads_as_empty() {
    let documents = InMemoryDocumentStore::with_document("hikes", br#"[{"id":"x","name":"Bad","date":"soon"}]"#);
    let repo = repository(documents);
    assert!(repo.list_all().await.unwrap().is_empty());

    let hike = repo.create(grouse_grind()).await.unwrap();
    assert_eq!(repo.list_all().await.unwrap(), vec![hike]);
}

#[tokio::test]
async fn failed_save_keeps_previous_collection() {
    let documents = InMemoryDocumentStore::new();
    let repo = repository(documents.clone());
    let hike = repo.create(grouse_grind()).await.unwrap();
    let before = documents.raw("hikes");

    documents.fail_writes(true);
    let err = repo.membership().join(&hike.id, &user("a")).await.unwrap_err();
    assert!(matches!(err, HikeError::Store(_)));
    assert_eq!(documents.raw("hikes"), before);

    documents.fail_writes(false);
    let stored = repo.find_by_id(&hike.id).await.unwrap().unwrap();
    assert!(stored.joined_users.is_empty());
}

#[tokio::test]
async fn unencodable_map_point_never_reaches_storage() {
    let documents = InMemoryDocumentStore::new();
    let repo = repository(documents.clone());
    let keep = repo.create(grouse_grind()).await.unwrap();
    let before = documents.raw("hikes");

    let err = repo
        .create(HikeDraft::new("Bad", TOMORROW).at(Coordinates::new(f64::NAN, 1.0)))
        .await
        .unwrap_err();
    assert!(matches!(err, HikeError::Validation(ValidationError::Coordinates { .. })));

    let patch = HikePatch {
        coordinates: Some(Some(Coordinates::new(1.0, f64::INFINITY))),
        ..HikePatch::default()
    };
    assert!(matches!(
        repo.update(&keep.id, patch).await,
        Err(HikeError::Validation(ValidationError::Coordinates { .. }))
    ));

    assert_eq!(documents.raw("hikes"), before);
    assert_eq!(repo.list_all().await.unwrap().len(), 1);
    repo.membership().join(&keep.id, &user("a")).await.unwrap();
}

#[tokio::test]
async fn stored_collection_round_trips_byte_for_byte() {
    let documents = InMemoryDocumentStore::new();
    let repo = repository(documents.clone());
    let mut draft = grouse_grind().time("06:45").at(Coordinates::new(49.380_419_7, -123.081_552_3));
    draft.distance = "2.9".to_string();
    draft.duration = "1.333333333333333".to_string();
    let hike = repo.create(draft).await.unwrap();
    repo.membership().join(&hike.id, &user("a")).await.unwrap();
    repo.provisions()
        .add_item(&hike.id, "a", "water", ProvisionKind::Consumable)
        .await
        .unwrap();
    let before = documents.raw("hikes").unwrap();

    let loaded = repo.store().load_all().await.unwrap();
    assert_eq!(loaded[0].coordinates, hike.coordinates);
    assert_eq!(loaded[0].duration_hours, hike.duration_hours);
    repo.store().save_all(&loaded).await.unwrap();
    assert_eq!(documents.raw("hikes").unwrap(), before);

    let json: serde_json::Value = serde_json::from_slice(&before).unwrap();
    assert_eq!(json[0]["joinedUsers"][0], "a");
    assert_eq!(json[0]["time"], "06:45");
    assert_eq!(json[0]["provisions"][0]["type"], "consumable");
}

#[tokio::test]
async fn update_is_shallow_and_validated() {
    let repo = repository(InMemoryDocumentStore::new());
    let hike = repo.create(grouse_grind()).await.unwrap();
    repo.membership().join(&hike.id, &user("a")).await.unwrap();

    let renamed = repo
        .update(
            &hike.id,
            HikePatch {
                name: Some("Grouse Grind (wet)".into()),
                ..HikePatch::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(renamed.joined_users, vec![user("a")]);

    let duplicated = HikePatch {
        joined_users: Some(vec![user("a"), user("a")]),
        ..HikePatch::default()
    };
    assert!(matches!(
        repo.update(&hike.id, duplicated).await,
        Err(HikeError::Validation(_))
    ));
}

#[tokio::test]
async fn file_store_persists_across_repositories() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let documents = Arc::new(FileDocumentStore::open(dir.path()).await.unwrap());

    let hike = {
        let repo = HikeRepository::new(Arc::clone(&documents), "hikes", environment());
        let hike = repo.create(grouse_grind()).await.unwrap();
        repo.membership().join(&hike.id, &user("a")).await.unwrap();
        hike
    };

    let reopened = FileDocumentStore::open(dir.path()).await.unwrap();
    assert!(reopened.exists("hikes").await.unwrap());
    let repo = HikeRepository::new(reopened, "hikes", environment());
    let stored = repo.find_by_id(&hike.id).await.unwrap().unwrap();
    assert_eq!(stored.joined_users, vec![user("a")]);

    repo.clear_all().await.unwrap();
    assert!(repo.list_all().await.unwrap().is_empty());
}
