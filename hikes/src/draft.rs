//! Parsing and validation at the create/update boundary.
//!
//! The create form hands over free text. Everything past this module only
//! sees typed, validated values.

use crate::error::{HikeError, ValidationError};
use crate::types::{Coordinates, Difficulty, Hike, HikeId};
use chrono::{NaiveDate, NaiveTime};
use std::collections::HashSet;

/// Raw create-form input
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HikeDraft {
    /// Hike name
    pub name: String,
    /// Free-text location
    pub location_name: String,
    /// Point picked on the map
    pub coordinates: Option<Coordinates>,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM` or empty
    pub time: String,
    /// Participant count or empty
    pub participants: String,
    /// Whether a carpool is wanted
    pub carpool_requested: bool,
    /// Trail length in km
    pub distance: String,
    /// Duration in hours
    pub duration: String,
    /// Elevation gain in meters
    pub elevation_gain: String,
    /// Difficulty picked in the form
    pub difficulty: Difficulty,
}

impl HikeDraft {
    /// Start a draft with the two required fields
    #[must_use]
    pub fn new(name: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            date: date.into(),
            ..Self::default()
        }
    }

    /// Set the free-text location
    #[must_use]
    pub fn location(mut self, location_name: impl Into<String>) -> Self {
        self.location_name = location_name.into();
        self
    }

    /// Set map coordinates
    #[must_use]
    pub const fn at(mut self, coordinates: Coordinates) -> Self {
        self.coordinates = Some(coordinates);
        self
    }

    /// Set the start time text
    #[must_use]
    pub fn time(mut self, time: impl Into<String>) -> Self {
        self.time = time.into();
        self
    }

    /// Set the participant count text
    #[must_use]
    pub fn participants(mut self, participants: impl Into<String>) -> Self {
        self.participants = participants.into();
        self
    }

    /// Validate the draft and build the hike it describes.
    ///
    /// Checks run in the order the form reports them: required name and
    /// date, then location and map point, date format, past date, time,
    /// participants. Trail metrics never fail; unusable input is simply
    /// dropped.
    ///
    /// # Errors
    ///
    /// [`HikeError::Validation`] for malformed fields and
    /// [`HikeError::Location`] when no location was given.
    pub fn validate(self, id: HikeId, today: NaiveDate) -> Result<Hike, HikeError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingName.into());
        }
        let date_text = self.date.trim();
        if date_text.is_empty() {
            return Err(ValidationError::MissingDate.into());
        }

        let location_name = self.location_name.trim();
        if location_name.is_empty() && self.coordinates.is_none() {
            return Err(HikeError::Location);
        }
        if let Some(point) = self.coordinates {
            check_coordinates(point)?;
        }

        let date = parse_date(date_text)?;
        if date < today {
            return Err(ValidationError::DateInPast(date_text.to_string()).into());
        }

        let time_text = self.time.trim();
        let time = if time_text.is_empty() {
            None
        } else {
            Some(parse_time(time_text)?)
        };

        let capacity = parse_capacity(&self.participants)?;

        let mut hike = Hike::new(id, name, date);
        hike.location_name = location_name.to_string();
        hike.coordinates = self.coordinates;
        hike.time = time;
        hike.capacity = capacity;
        hike.carpool_requested = self.carpool_requested;
        hike.distance_km = positive_float(&self.distance);
        hike.duration_hours = positive_float(&self.duration);
        hike.elevation_gain_m = self.elevation_gain.trim().parse().ok().filter(|m| *m > 0);
        hike.difficulty = Some(self.difficulty);
        Ok(hike)
    }
}

/// Parse a strict `YYYY-MM-DD` calendar date.
///
/// # Errors
///
/// [`ValidationError::DateFormat`] if the shape is wrong or the day does not
/// exist.
pub fn parse_date(text: &str) -> Result<NaiveDate, ValidationError> {
    let bytes = text.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return Err(ValidationError::DateFormat(text.to_string()));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|_| ValidationError::DateFormat(text.to_string()))
}

/// Parse a 24-hour `HH:MM` time (`00:00` to `23:59`).
///
/// # Errors
///
/// [`ValidationError::TimeFormat`] for anything else.
pub fn parse_time(text: &str) -> Result<NaiveTime, ValidationError> {
    let invalid = || ValidationError::TimeFormat(text.to_string());
    let (hours, minutes) = text.split_once(':').ok_or_else(invalid)?;
    let two_digits = |part: &str| part.len() == 2 && part.bytes().all(|b| b.is_ascii_digit());
    if !two_digits(hours) || !two_digits(minutes) {
        return Err(invalid());
    }
    let hours = hours.parse().map_err(|_| invalid())?;
    let minutes = minutes.parse().map_err(|_| invalid())?;
    NaiveTime::from_hms_opt(hours, minutes, 0).ok_or_else(invalid)
}

/// Parse the participant field: empty means no target (`0`).
///
/// # Errors
///
/// [`ValidationError::Participants`] if present and not a positive integer.
pub fn parse_capacity(text: &str) -> Result<u32, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    match trimmed.parse::<u32>() {
        Ok(n) if n > 0 && trimmed.bytes().all(|b| b.is_ascii_digit()) => Ok(n),
        _ => Err(ValidationError::Participants(text.to_string())),
    }
}

fn positive_float(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

fn check_coordinates(point: Coordinates) -> Result<(), ValidationError> {
    if point.is_valid() {
        Ok(())
    } else {
        Err(ValidationError::Coordinates {
            latitude: point.latitude,
            longitude: point.longitude,
        })
    }
}

fn check_metric(field: &'static str, value: Option<f64>) -> Result<(), ValidationError> {
    match value {
        Some(v) if !(v.is_finite() && v > 0.0) => Err(ValidationError::TrailMetric { field }),
        _ => Ok(()),
    }
}

/// Check the structural invariants of a stored record.
///
/// Run after every whole-record update.
///
/// # Errors
///
/// The first broken invariant.
pub fn check_invariants(hike: &Hike) -> Result<(), ValidationError> {
    if let Some(point) = hike.coordinates {
        check_coordinates(point)?;
    }
    check_metric("distanceKm", hike.distance_km)?;
    check_metric("durationHours", hike.duration_hours)?;

    let mut seen = HashSet::new();
    for user in &hike.joined_users {
        if !seen.insert(user) {
            return Err(ValidationError::DuplicateParticipant(user.clone()));
        }
    }

    for block in &hike.drivers {
        if block.riders.len() > block.capacity as usize {
            return Err(ValidationError::DriverOverCapacity {
                block_id: block.id.clone(),
                riders: block.riders.len(),
                capacity: block.capacity,
            });
        }
        if let Some(rider) = block.riders.iter().find(|r| !hike.is_joined(r)) {
            return Err(ValidationError::RiderNotJoined {
                block_id: block.id.clone(),
                user_id: rider.clone(),
            });
        }
    }

    for item in &hike.provisions {
        if item.owner.trim().is_empty() {
            return Err(ValidationError::EmptyOwner);
        }
        if item.name.trim().is_empty() {
            return Err(ValidationError::EmptyItemName);
        }
    }
    Ok(())
}
