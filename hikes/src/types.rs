//! Domain types for group hikes.
//!
//! A [`Hike`] is one scheduled group event. The whole collection of hikes is
//! stored as a single JSON array (camelCase keys) under one document key.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Identifiers
// ============================================================================

/// Opaque unique identifier for a hike, assigned at creation
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HikeId(String);

impl HikeId {
    /// Wraps an existing identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HikeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque participant identifier issued by the identity provider
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wraps an existing identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

// ============================================================================
// Value Objects
// ============================================================================

/// A point picked on the map
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

impl Coordinates {
    /// Creates a coordinate pair
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Finite, latitude within ±90 and longitude within ±180
    ///
    /// JSON has no encoding for NaN or infinity, so anything else would be
    /// written as `null` and make the stored collection unreadable.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Trail difficulty rating (display only)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    /// Easy
    Easy,
    /// Moderate
    #[default]
    Moderate,
    /// Hard
    Hard,
}

/// What kind of provision an item is
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProvisionKind {
    /// Food, water, fuel, anything used up
    Consumable,
    /// Gear that comes back home
    Tool,
}

/// A consumable or tool someone brings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provision {
    /// Unique within the hike
    pub id: String,
    /// Who brings it (free text)
    pub owner: String,
    /// What it is
    pub name: String,
    /// Consumable or tool
    #[serde(rename = "type")]
    pub kind: ProvisionKind,
}

/// A carpool vehicle with a bounded number of rider seats
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverBlock {
    /// Block identifier (`"group"` for the synthetic whole-event pool)
    pub id: String,
    /// Rider seats
    pub capacity: u32,
    /// Participants assigned to this block, in assignment order
    #[serde(default)]
    pub riders: Vec<UserId>,
}

impl DriverBlock {
    /// Creates an empty block
    #[must_use]
    pub fn new(id: impl Into<String>, capacity: u32) -> Self {
        Self {
            id: id.into(),
            capacity,
            riders: Vec::new(),
        }
    }

    /// Seats left to fill, never negative
    #[must_use]
    pub fn empty_seats(&self) -> usize {
        (self.capacity as usize).saturating_sub(self.riders.len())
    }

    /// Whether every seat is taken
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.riders.len() >= self.capacity as usize
    }

    /// Whether `user` rides in this block
    #[must_use]
    pub fn has_rider(&self, user: &UserId) -> bool {
        self.riders.contains(user)
    }
}

/// Who may see a media item
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaAccess {
    /// Everyone
    Public,
    /// Joined participants only
    Members,
}

/// A photo or video attached to a hike (pass-through)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Identifier
    pub id: String,
    /// Where the media lives
    pub uri: String,
    /// Visibility
    pub access: MediaAccess,
}

// ============================================================================
// Hike
// ============================================================================

/// One scheduled group hike
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hike {
    /// Immutable identifier
    pub id: HikeId,
    /// Display name
    pub name: String,
    /// Free-text location, may be empty when coordinates are set
    #[serde(default)]
    pub location_name: String,
    /// Present iff picked on the map
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    /// Calendar day of the hike
    pub date: NaiveDate,
    /// Optional start time (`HH:MM`, stored as `""` when absent)
    #[serde(default, with = "hhmm")]
    pub time: Option<NaiveTime>,
    /// Participant target, `0` when none was given
    #[serde(default)]
    pub capacity: u32,
    /// Informational flag, does not gate carpooling
    #[serde(default)]
    pub carpool_requested: bool,
    /// Participants in join order, no duplicates
    #[serde(default)]
    pub joined_users: Vec<UserId>,
    /// Participants who marked the hike completed for themselves
    #[serde(default)]
    pub completed_by: Vec<UserId>,
    /// Contributed items in insertion order
    #[serde(default)]
    pub provisions: Vec<Provision>,
    /// Registered carpool vehicles
    #[serde(default)]
    pub drivers: Vec<DriverBlock>,
    /// Attached media
    #[serde(default)]
    pub media: Vec<MediaItem>,
    /// Trail length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    /// Expected duration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_hours: Option<f64>,
    /// Elevation gain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation_gain_m: Option<u32>,
    /// Difficulty rating
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

impl Hike {
    /// Creates a hike with empty membership and no optional attributes
    #[must_use]
    pub fn new(id: HikeId, name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id,
            name: name.into(),
            location_name: String::new(),
            coordinates: None,
            date,
            time: None,
            capacity: 0,
            carpool_requested: false,
            joined_users: Vec::new(),
            completed_by: Vec::new(),
            provisions: Vec::new(),
            drivers: Vec::new(),
            media: Vec::new(),
            distance_km: None,
            duration_hours: None,
            elevation_gain_m: None,
            difficulty: None,
        }
    }

    /// Whether `user` has joined
    #[must_use]
    pub fn is_joined(&self, user: &UserId) -> bool {
        self.joined_users.contains(user)
    }

    /// Whether `user` marked the hike completed
    #[must_use]
    pub fn has_completed(&self, user: &UserId) -> bool {
        self.completed_by.contains(user)
    }

    /// Whether membership has reached capacity
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.joined_users.len() >= self.capacity as usize
    }

    /// Places left before the hike is full
    #[must_use]
    pub fn spots_left(&self) -> usize {
        (self.capacity as usize).saturating_sub(self.joined_users.len())
    }

    /// The driver block `user` rides in, if any
    #[must_use]
    pub fn block_of(&self, user: &UserId) -> Option<&DriverBlock> {
        self.drivers.iter().find(|block| block.has_rider(user))
    }

    /// `date` + `time` (midnight when no time is set) as one instant
    #[must_use]
    pub fn scheduled_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time.unwrap_or(NaiveTime::MIN))
    }
}

/// Shallow field-by-field replacement for [`Hike`]
///
/// Every `Some` field fully replaces the stored value; nested sequences are
/// not merged. Clearable optional attributes use `Option<Option<_>>`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HikePatch {
    /// New name
    pub name: Option<String>,
    /// New free-text location
    pub location_name: Option<String>,
    /// New coordinates (`Some(None)` clears)
    pub coordinates: Option<Option<Coordinates>>,
    /// New date
    pub date: Option<NaiveDate>,
    /// New time (`Some(None)` clears)
    pub time: Option<Option<NaiveTime>>,
    /// New capacity
    pub capacity: Option<u32>,
    /// New carpool flag
    pub carpool_requested: Option<bool>,
    /// Replacement membership list
    pub joined_users: Option<Vec<UserId>>,
    /// Replacement completion list
    pub completed_by: Option<Vec<UserId>>,
    /// Replacement provisions
    pub provisions: Option<Vec<Provision>>,
    /// Replacement driver blocks
    pub drivers: Option<Vec<DriverBlock>>,
    /// Replacement media
    pub media: Option<Vec<MediaItem>>,
    /// New distance (`Some(None)` clears)
    pub distance_km: Option<Option<f64>>,
    /// New duration (`Some(None)` clears)
    pub duration_hours: Option<Option<f64>>,
    /// New elevation gain (`Some(None)` clears)
    pub elevation_gain_m: Option<Option<u32>>,
    /// New difficulty (`Some(None)` clears)
    pub difficulty: Option<Option<Difficulty>>,
}

impl HikePatch {
    /// Whether the patch replaces nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the patch onto `hike`
    pub fn apply_to(self, hike: &mut Hike) {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }

        set(&mut hike.name, self.name);
        set(&mut hike.location_name, self.location_name);
        set(&mut hike.coordinates, self.coordinates);
        set(&mut hike.date, self.date);
        set(&mut hike.time, self.time);
        set(&mut hike.capacity, self.capacity);
        set(&mut hike.carpool_requested, self.carpool_requested);
        set(&mut hike.joined_users, self.joined_users);
        set(&mut hike.completed_by, self.completed_by);
        set(&mut hike.provisions, self.provisions);
        set(&mut hike.drivers, self.drivers);
        set(&mut hike.media, self.media);
        set(&mut hike.distance_km, self.distance_km);
        set(&mut hike.duration_hours, self.duration_hours);
        set(&mut hike.elevation_gain_m, self.elevation_gain_m);
        set(&mut hike.difficulty, self.difficulty);
    }
}

/// Whether a pure mutation changed the record
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Change {
    /// The record was modified and must be written
    Applied,
    /// Idempotent no-op, nothing to write
    Unchanged,
}

/// Serde adapter storing `Option<NaiveTime>` as `"HH:MM"` or `""`.
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    #[allow(clippy::ref_option)] // serde `with` modules receive `&Option<T>`
    pub fn serialize<S: Serializer>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error> {
        match time {
            Some(time) => serializer.serialize_str(&time.format("%H:%M").to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => crate::draft::parse_time(text)
                .map(Some)
                .map_err(D::Error::custom),
        }
    }
}
