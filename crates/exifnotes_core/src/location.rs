//! Frame geolocation codec.
//!
//! # Responsibility
//! - Encode a latitude/longitude pair into the single `frames.location`
//!   text column and decode it back.
//! - Render coordinates as degrees/minutes/seconds for display.
//!
//! # Invariants
//! - Encoding always uses `.` as decimal separator, independent of locale.
//! - `encode` emits the shortest representation that parses back to the
//!   same `f64`, so `decode(encode(lat, lng))` is exact.
//! - Decoding never fails loudly: empty, `null` and malformed values all
//!   decode to `None`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const NULL_MARKER: &str = "null";
const MAX_LATITUDE: f64 = 90.0;
const MAX_LONGITUDE: f64 = 180.0;

/// A WGS84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// Reason a stored location string could not be decoded.
///
/// Only surfaced through [`Location::from_str`]; [`decode`] folds every
/// variant into `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedLocation {
    /// Empty text or the literal `null` written by older releases.
    Absent,
    /// No space between latitude and longitude.
    MissingSeparator,
    /// One half is not a decimal number.
    InvalidNumber(String),
    /// Parsed value is outside the valid latitude/longitude range.
    OutOfRange,
}

impl Display for MalformedLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Absent => write!(f, "location is absent"),
            Self::MissingSeparator => write!(f, "location has no latitude/longitude separator"),
            Self::InvalidNumber(value) => write!(f, "invalid coordinate component `{value}`"),
            Self::OutOfRange => write!(f, "coordinate is out of range"),
        }
    }
}

impl Error for MalformedLocation {}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Finite and within ±90° latitude, ±180° longitude.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude.abs() <= MAX_LATITUDE
            && self.longitude.abs() <= MAX_LONGITUDE
    }

    /// Storage form: `"<lat> <lng>"`.
    pub fn encode(&self) -> String {
        encode(self.latitude, self.longitude)
    }

    /// Degrees/minutes/seconds with hemisphere letters,
    /// e.g. `60° 10' 11.64" N 24° 56' 18.24" E`.
    pub fn readable(&self) -> String {
        let lat_ref = if self.latitude < 0.0 { 'S' } else { 'N' };
        let lng_ref = if self.longitude < 0.0 { 'W' } else { 'E' };
        format!(
            "{} {} {} {}",
            dms(self.latitude.abs()),
            lat_ref,
            dms(self.longitude.abs()),
            lng_ref
        )
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.latitude, self.longitude)
    }
}

impl FromStr for Location {
    type Err = MalformedLocation;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == NULL_MARKER {
            return Err(MalformedLocation::Absent);
        }

        let (lat_text, lng_text) = trimmed
            .split_once(' ')
            .ok_or(MalformedLocation::MissingSeparator)?;
        let location = Self::new(parse_component(lat_text)?, parse_component(lng_text)?);
        if !location.is_valid() {
            return Err(MalformedLocation::OutOfRange);
        }
        Ok(location)
    }
}

/// Encodes a coordinate pair into its storage form.
pub fn encode(latitude: f64, longitude: f64) -> String {
    Location::new(latitude, longitude).to_string()
}

/// Decodes a stored location; malformed and absent values yield `None`.
pub fn decode(text: &str) -> Option<Location> {
    text.parse().ok()
}

fn parse_component(text: &str) -> Result<f64, MalformedLocation> {
    // Older rows were written with the device locale, e.g. `60,1699`.
    let normalized = text.replace(',', ".");
    normalized
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| MalformedLocation::InvalidNumber(text.to_string()))
}

fn dms(value: f64) -> String {
    let mut degrees = value.trunc();
    let minutes_total = (value - degrees) * 60.0;
    let mut minutes = minutes_total.trunc();
    let mut seconds = round_to(((minutes_total - minutes) * 60.0).max(0.0), 5);

    if seconds >= 60.0 {
        seconds -= 60.0;
        minutes += 1.0;
    }
    if minutes >= 60.0 {
        minutes -= 60.0;
        degrees += 1.0;
    }

    format!(
        "{}° {}' {}\"",
        degrees as i64,
        minutes as i64,
        trim_decimal(&format!("{seconds:.5}"))
    )
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn trim_decimal(value: &str) -> String {
    if !value.contains('.') {
        return value.to_string();
    }
    value
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}
