//! Roll record and archive filter.

use super::{require_text, CameraId, EntityKind, RollId, ValidationError, UNSAVED_ID};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One roll of film, optionally loaded in a camera.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roll {
    pub id: RollId,
    pub name: String,
    /// Date the roll was loaded.
    pub date: NaiveDateTime,
    pub note: Option<String>,
    /// `None` means the roll is not tied to a camera.
    pub camera_id: Option<CameraId>,
    /// Archived rolls are hidden from the default (active) listing.
    pub archived: bool,
}

impl Roll {
    /// Creates an unsaved, active roll without camera.
    pub fn new(name: impl Into<String>, date: NaiveDateTime) -> Self {
        Self {
            id: UNSAVED_ID,
            name: name.into(),
            date,
            note: None,
            camera_id: None,
            archived: false,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text(EntityKind::Roll, "name", &self.name)
    }
}

/// Archive-state filter for roll listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollFilter {
    #[default]
    Active,
    Archived,
    All,
}

impl RollFilter {
    /// Stable integer used for caller-side preference persistence.
    pub fn value(self) -> i32 {
        match self {
            Self::Active => 0,
            Self::Archived => 1,
            Self::All => 2,
        }
    }

    /// Inverse of [`RollFilter::value`]; unknown values fall back to `Active`.
    pub fn from_value(value: i32) -> Self {
        match value {
            1 => Self::Archived,
            2 => Self::All,
            _ => Self::Active,
        }
    }

    /// Required `archived` column value; `None` matches every roll.
    pub(crate) fn archived_flag(self) -> Option<bool> {
        match self {
            Self::Active => Some(false),
            Self::Archived => Some(true),
            Self::All => None,
        }
    }
}
