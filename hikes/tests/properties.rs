//! Property tests for membership, carpool and serialization invariants.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use chrono::NaiveDate;
use proptest::prelude::*;
use trailmate_hikes::draft::check_invariants;
use trailmate_hikes::{
    Coordinates, Hike, HikeDraft, HikeError, HikeId, ProvisionKind, UserId, ValidationError, carpool, membership,
    provisions,
};

// ============================================================================
// Strategies
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    Join(u8),
    Leave(u8),
    Complete(u8),
    Register(u8, u32),
    Assign(u8, u8),
    AddItem(u8, bool),
}

fn user(n: u8) -> UserId {
    UserId::new(format!("u{n}"))
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..8).prop_map(Op::Join),
        (0u8..8).prop_map(Op::Leave),
        (0u8..8).prop_map(Op::Complete),
        ((0u8..4), (1u32..4)).prop_map(|(car, seats)| Op::Register(car, seats)),
        ((0u8..5), (0u8..8)).prop_map(|(car, u)| Op::Assign(car, u)),
        ((0u8..8), any::<bool>()).prop_map(|(u, tool)| Op::AddItem(u, tool)),
    ]
}

fn arb_coordinates() -> impl Strategy<Value = Coordinates> {
    (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lon)| Coordinates::new(lat, lon))
}

fn arb_metric() -> impl Strategy<Value = Option<f64>> {
    prop::option::of(prop_oneof![1.0e-6f64..1.0, 1.0f64..100_000.0])
}

fn base_hike(capacity: u32) -> Hike {
    let mut hike = Hike::new(
        HikeId::new("h"),
        "Loop",
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
    );
    hike.location_name = "Trailhead".to_string();
    hike.capacity = capacity;
    hike
}

/// Apply an op, ignoring business-rule rejections
fn apply(hike: &mut Hike, op: &Op, counter: &mut u32) {
    let before = hike.clone();
    let outcome: Result<(), HikeError> = match op {
        Op::Join(u) => membership::join(hike, &user(*u)).map(drop),
        Op::Leave(u) => {
            membership::leave(hike, &user(*u));
            Ok(())
        }
        Op::Complete(u) => {
            membership::mark_completed(hike, &user(*u));
            Ok(())
        }
        Op::Register(car, seats) => carpool::register_driver(hike, &format!("car-{car}"), *seats).map(drop),
        Op::Assign(car, u) => {
            let block = if *car == 4 {
                carpool::GROUP_BLOCK_ID.to_string()
            } else {
                format!("car-{car}")
            };
            carpool::assign_rider(hike, &block, &user(*u)).map(drop)
        }
        Op::AddItem(u, tool) => {
            *counter += 1;
            let kind = if *tool { ProvisionKind::Tool } else { ProvisionKind::Consumable };
            provisions::add_item(hike, format!("p{counter}"), &format!("u{u}"), "item", kind).map(drop)
        }
    };
    if outcome.is_err() {
        assert_eq!(*hike, before, "rejected op {op:?} changed the record");
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Joining twice leaves exactly one entry for the user.
    #[test]
    fn prop_join_is_idempotent(capacity in 1u32..10, u in 0u8..8) {
        let mut hike = base_hike(capacity);
        membership::join(&mut hike, &user(u)).unwrap();
        membership::join(&mut hike, &user(u)).unwrap();
        prop_assert_eq!(hike.joined_users.iter().filter(|x| **x == user(u)).count(), 1);
    }

    /// The join after capacity is reached fails and changes nothing.
    #[test]
    fn prop_capacity_bounds_joins(capacity in 0u32..8) {
        let mut hike = base_hike(capacity);
        for n in 0..capacity {
            membership::join(&mut hike, &UserId::new(format!("m{n}"))).unwrap();
        }
        let err = membership::join(&mut hike, &UserId::new("late")).unwrap_err();
        let is_capacity_error = matches!(err, HikeError::CapacityExceeded { .. });
        prop_assert!(is_capacity_error);
        prop_assert_eq!(hike.joined_users.len(), capacity as usize);
    }

    /// Any sequence of operations keeps every structural invariant.
    #[test]
    fn prop_operations_preserve_invariants(capacity in 0u32..8, ops in prop::collection::vec(arb_op(), 0..60)) {
        let mut hike = base_hike(capacity);
        let mut counter = 0;
        for op in &ops {
            apply(&mut hike, op, &mut counter);
            prop_assert!(check_invariants(&hike).is_ok(), "after {:?}: {:?}", op, check_invariants(&hike));
            for block in &hike.drivers {
                prop_assert!(block.riders.len() <= block.capacity as usize);
            }
            prop_assert!(hike.joined_users.len() <= capacity as usize);
        }
    }

    /// Leave then join restores the user without touching others.
    #[test]
    fn prop_leave_then_join_restores(capacity in 2u32..8, others in prop::collection::btree_set(1u8..8, 0..4)) {
        let mut hike = base_hike(capacity.max(others.len() as u32 + 1));
        membership::join(&mut hike, &user(0)).unwrap();
        for u in &others {
            membership::join(&mut hike, &user(*u)).unwrap();
        }
        let others_before: Vec<_> = hike.joined_users.iter().filter(|u| **u != user(0)).cloned().collect();

        membership::leave(&mut hike, &user(0));
        membership::join(&mut hike, &user(0)).unwrap();

        let others_after: Vec<_> = hike.joined_users.iter().filter(|u| **u != user(0)).cloned().collect();
        prop_assert_eq!(others_before, others_after);
        prop_assert_eq!(hike.joined_users.iter().filter(|u| **u == user(0)).count(), 1);
    }

    /// Upcoming and completed are a disjoint, exhaustive split of joined hikes.
    #[test]
    fn prop_upcoming_and_completed_partition(flags in prop::collection::vec((any::<bool>(), any::<bool>()), 0..12)) {
        let me = user(0);
        let hikes: Vec<Hike> = flags
            .iter()
            .enumerate()
            .map(|(i, (joined, completed))| {
                let mut hike = base_hike(5);
                hike.id = HikeId::new(format!("h{i}"));
                if *joined {
                    membership::join(&mut hike, &me).unwrap();
                }
                if *completed {
                    membership::mark_completed(&mut hike, &me);
                }
                hike
            })
            .collect();

        let upcoming = membership::upcoming_for(&me, &hikes);
        let completed = membership::completed_for(&me, &hikes);
        let joined = hikes.iter().filter(|h| h.is_joined(&me)).count();

        prop_assert_eq!(upcoming.len() + completed.len(), joined);
        prop_assert!(upcoming.iter().all(|h| !completed.iter().any(|c| c.id == h.id)));
        prop_assert!(membership::visible_to(&me, &hikes).iter().all(|h| !h.has_completed(&me)));
    }

    /// Serializing a decoded collection reproduces the same bytes and values.
    #[test]
    fn prop_serialization_is_stable(
        capacity in 0u32..8,
        coordinates in prop::option::of(arb_coordinates()),
        distance in arb_metric(),
        duration in arb_metric(),
        ops in prop::collection::vec(arb_op(), 0..40),
    ) {
        let mut hike = base_hike(capacity);
        hike.coordinates = coordinates;
        hike.distance_km = distance;
        hike.duration_hours = duration;
        prop_assert!(check_invariants(&hike).is_ok());
        let mut counter = 0;
        for op in &ops {
            apply(&mut hike, op, &mut counter);
        }
        let bytes = serde_json::to_vec(&vec![hike.clone()]).unwrap();
        let decoded: Vec<Hike> = serde_json::from_slice(&bytes).unwrap();
        prop_assert_eq!(&decoded[0], &hike);
        prop_assert_eq!(serde_json::to_vec(&decoded).unwrap(), bytes);
    }

    /// Non-finite or out-of-range map points are rejected at creation.
    #[test]
    fn prop_unencodable_map_points_are_rejected(
        bad in prop_oneof![Just(f64::NAN), Just(f64::INFINITY), Just(f64::NEG_INFINITY), 180.000_001f64..1.0e9],
        good in -180.0f64..=180.0,
        swap in any::<bool>(),
    ) {
        let point = if swap {
            Coordinates::new(good / 2.0, bad)
        } else {
            Coordinates::new(bad, good)
        };
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let err = HikeDraft::new("Loop", "2025-06-02")
            .at(point)
            .validate(HikeId::new("h"), today)
            .unwrap_err();
        let rejected = matches!(err, HikeError::Validation(ValidationError::Coordinates { .. }));
        prop_assert!(rejected);
    }
}
