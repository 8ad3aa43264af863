//! Domain model for the film photography log.
//!
//! # Responsibility
//! - Define the records persisted by the store: gear, rolls and frames.
//! - Own entity validation and the persisted date format.
//!
//! # Invariants
//! - Identifiers are positive integers assigned by the store at insert time;
//!   `UNSAVED_ID` marks a record that has not been inserted yet.
//! - Optional references (`Roll::camera_id`, `Frame::lens_id`) are `None`
//!   in memory and `0` in storage.

use chrono::NaiveDateTime;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod frame;
pub mod gear;
pub mod roll;

pub type CameraId = i64;
pub type LensId = i64;
pub type RollId = i64;
pub type FrameId = i64;

/// Placeholder id carried by records before insertion.
pub const UNSAVED_ID: i64 = 0;

/// Fraction is written only when nonzero.
const DB_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
const LEGACY_DATETIME_FORMATS: &[&str] =
    &["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Table-level entity kind, used in error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Camera,
    Lens,
    Roll,
    Frame,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Camera => "camera",
            Self::Lens => "lens",
            Self::Roll => "roll",
            Self::Frame => "frame",
        };
        f.write_str(label)
    }
}

/// Validation failure raised before any write reaches storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is empty or whitespace only.
    EmptyField {
        entity: EntityKind,
        field: &'static str,
    },
    /// A value cannot be stored so that it reads back unchanged.
    Unrepresentable {
        entity: EntityKind,
        field: &'static str,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField { entity, field } => {
                write!(f, "{entity} field `{field}` must not be empty")
            }
            Self::Unrepresentable { entity, field } => {
                write!(f, "{entity} field `{field}` holds a value that cannot be stored")
            }
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_text(
    entity: EntityKind,
    field: &'static str,
    value: &str,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField { entity, field });
    }
    Ok(())
}

/// Formats a timestamp the way it is persisted in date columns.
pub fn format_db_datetime(value: &NaiveDateTime) -> String {
    value.format(DB_DATETIME_FORMAT).to_string()
}

/// Parses a persisted timestamp.
///
/// Accepts the canonical `YYYY-MM-DD HH:MM:SS` form, minute-precision and
/// non-padded legacy values such as `2016-1-5 9:03`, and `T`-separated forms.
pub fn parse_db_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    std::iter::once(DB_DATETIME_FORMAT)
        .chain(LEGACY_DATETIME_FORMATS.iter().copied())
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
}

/// Maps an optional reference to its storage form (`None` becomes `0`).
pub(crate) fn optional_id_to_db(id: Option<i64>) -> i64 {
    id.unwrap_or(UNSAVED_ID)
}

/// Maps a stored reference back to its model form (`0` becomes `None`).
pub(crate) fn optional_id_from_db(value: i64) -> Option<i64> {
    if value == UNSAVED_ID {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{format_db_datetime, optional_id_from_db, optional_id_to_db, parse_db_datetime};
    use chrono::NaiveDate;

    #[test]
    fn persisted_dates_accept_legacy_unpadded_values() {
        let expected = NaiveDate::from_ymd_opt(2016, 1, 5)
            .unwrap()
            .and_hms_opt(9, 3, 0)
            .unwrap();
        assert_eq!(parse_db_datetime("2016-1-5 9:03"), Some(expected));
        assert_eq!(parse_db_datetime("2016-01-05T09:03"), Some(expected));
        assert_eq!(format_db_datetime(&expected), "2016-01-05 09:03:00");
        assert_eq!(parse_db_datetime("yesterday"), None);
    }

    #[test]
    fn persisted_dates_keep_seconds() {
        let value = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(17, 42, 33)
            .unwrap();
        let text = format_db_datetime(&value);
        assert_eq!(text, "2024-03-09 17:42:33");
        assert_eq!(parse_db_datetime(&text), Some(value));
        assert_eq!(parse_db_datetime("2024-03-09T17:42:33"), Some(value));

        let precise = value + chrono::Duration::milliseconds(250);
        assert_eq!(parse_db_datetime(&format_db_datetime(&precise)), Some(precise));
    }

    #[test]
    fn zero_reference_maps_to_none() {
        assert_eq!(optional_id_from_db(0), None);
        assert_eq!(optional_id_from_db(7), Some(7));
        assert_eq!(optional_id_to_db(None), 0);
        assert_eq!(optional_id_to_db(Some(7)), 7);
    }
}
