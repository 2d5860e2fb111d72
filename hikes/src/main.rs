//! Command-line walk-through of the hike coordination core.
//!
//! Creates a hike in the configured data directory, has a few people join,
//! seats them in a car and lists what they bring.

use chrono::Days;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trailmate_filestore::FileDocumentStore;
use trailmate_hikes::{
    Config, HikeDraft, HikeEnvironment, HikeError, HikeRepository, IdentityProvider, InMemoryUserDirectory,
    ProvisionKind, SessionStore, UserId, UserProfile, avatar_initials, provisions,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{},trailmate_hikes=debug", config.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    trailmate_runtime::metrics::register_metrics();
    info!(data_dir = %config.storage.data_dir.display(), "Starting Trailmate walk-through");

    let documents = Arc::new(FileDocumentStore::open(&config.storage.data_dir).await?);
    let environment = HikeEnvironment::production();
    let tomorrow = environment
        .clock
        .today()
        .checked_add_days(Days::new(1))
        .ok_or("calendar overflow")?;

    let session = SessionStore::new(Arc::clone(&documents), config.session.clone());
    let repository = HikeRepository::new(Arc::clone(&documents), config.storage.hikes_key.clone(), environment);

    let alice = UserId::new("alice");
    session.sign_in(&alice, "alice@trail.example").await?;
    let me = session.require_user().await?;

    println!("=== Trailmate ===\n");

    let hike = repository
        .create(
            HikeDraft::new("Grouse Grind", tomorrow.format("%Y-%m-%d").to_string())
                .location("North Vancouver")
                .time("07:30")
                .participants("3"),
        )
        .await?;
    println!("Created '{}' on {} (capacity {})", hike.name, hike.date, hike.capacity);

    let membership = repository.membership();
    for user in [me.clone(), UserId::new("bob"), UserId::new("chen")] {
        membership.join(&hike.id, &user).await?;
    }
    match membership.join(&hike.id, &UserId::new("dana")).await {
        Err(HikeError::CapacityExceeded { capacity, .. }) => {
            println!("dana could not join: hike is full ({capacity})");
        }
        other => println!("dana: {other:?}"),
    }

    let carpool = repository.carpool();
    let with_car = carpool.register_driver(&hike.id, 2).await?;
    if let Some(car) = with_car.drivers.first() {
        carpool.assign_rider(&hike.id, &car.id, &me).await?;
        carpool.assign_rider(&hike.id, &car.id, &UserId::new("bob")).await?;
    }

    let directory = InMemoryUserDirectory::new().with_user(
        "bob",
        UserProfile {
            username: Some("Bobby".into()),
            email: None,
        },
    );
    println!("\nSeats:");
    for row in carpool.seat_grid(&hike.id).await? {
        let initials = avatar_initials(&directory, &row.riders).await;
        println!(
            "  {:<6} [{}]{}",
            row.label,
            initials.join(" "),
            " _".repeat(row.empty_seats)
        );
    }

    let ledger = repository.provisions();
    ledger.add_item(&hike.id, "alice", "stove", ProvisionKind::Tool).await?;
    ledger.add_item(&hike.id, "alice", "matches", ProvisionKind::Tool).await?;
    ledger.add_item(&hike.id, "bob", "trail mix", ProvisionKind::Consumable).await?;

    let items = ledger.items(&hike.id).await?;
    println!("\nProvisions by owner:");
    for group in provisions::grouped_by_owner(&items) {
        let names: Vec<_> = group.items.iter().map(|p| p.name.as_str()).collect();
        println!("  {}: {}", group.owner, names.join(", "));
    }
    let buckets = provisions::partition_by_type(&items);
    println!("  ({} consumables, {} tools)", buckets.consumables.len(), buckets.tools.len());

    membership.leave(&hike.id, &UserId::new("bob")).await?;
    membership.mark_completed(&hike.id, &me).await?;
    println!(
        "\nUpcoming for {me}: {}, completed: {}",
        membership.upcoming_for(&me).await?.len(),
        membership.completed_for(&me).await?.len()
    );

    repository.clear_all().await?;
    session.sign_out().await?;
    info!("Walk-through finished");
    Ok(())
}
