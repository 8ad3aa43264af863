//! Frame (single exposure) record.

use super::{EntityKind, FrameId, LensId, RollId, ValidationError, UNSAVED_ID};
use crate::location::Location;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One exposure on a roll.
///
/// `shutter` and `aperture` are display strings exactly as entered
/// (`1/250`, `1"`, `B`, `f/2.8`); they are only parsed for ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub id: FrameId,
    pub roll_id: RollId,
    /// Frame number on the roll. Unique by convention only.
    pub count: u32,
    pub date: NaiveDateTime,
    /// `None` means no lens was recorded.
    pub lens_id: Option<LensId>,
    pub shutter: String,
    pub aperture: String,
    pub note: Option<String>,
    pub location: Option<Location>,
}

impl Frame {
    /// Creates an unsaved frame with empty exposure values.
    pub fn new(roll_id: RollId, count: u32, date: NaiveDateTime) -> Self {
        Self {
            id: UNSAVED_ID,
            roll_id,
            count,
            date,
            lens_id: None,
            shutter: String::new(),
            aperture: String::new(),
            note: None,
            location: None,
        }
    }

    /// Rejects a location that would not read back from storage.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.location {
            Some(location) if !location.is_valid() => Err(ValidationError::Unrepresentable {
                entity: EntityKind::Frame,
                field: "location",
            }),
            _ => Ok(()),
        }
    }
}
