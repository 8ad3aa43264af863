//! Camera and lens records.

use super::{require_text, CameraId, EntityKind, LensId, ValidationError, UNSAVED_ID};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Camera {
    pub id: CameraId,
    pub make: String,
    pub model: String,
}

impl Camera {
    /// Creates an unsaved camera.
    pub fn new(make: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            id: UNSAVED_ID,
            make: make.into(),
            model: model.into(),
        }
    }

    /// Checks that make and model are present.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text(EntityKind::Camera, "make", &self.make)?;
        require_text(EntityKind::Camera, "model", &self.model)
    }

    /// `make model`, as shown in lists.
    pub fn name(&self) -> String {
        format!("{} {}", self.make, self.model)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lens {
    pub id: LensId,
    pub make: String,
    pub model: String,
}

impl Lens {
    /// Creates an unsaved lens.
    pub fn new(make: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            id: UNSAVED_ID,
            make: make.into(),
            model: model.into(),
        }
    }

    /// Checks that make and model are present.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text(EntityKind::Lens, "make", &self.make)?;
        require_text(EntityKind::Lens, "model", &self.model)
    }

    /// `make model`, as shown in lists.
    pub fn name(&self) -> String {
        format!("{} {}", self.make, self.model)
    }
}

/// Gear ordering shared by SQL listings and in-memory sorts: make, model, id.
///
/// Byte-wise string comparison, matching SQLite's default `BINARY` collation.
pub(crate) fn compare_gear(
    (make_a, model_a, id_a): (&str, &str, i64),
    (make_b, model_b, id_b): (&str, &str, i64),
) -> Ordering {
    make_a
        .cmp(make_b)
        .then_with(|| model_a.cmp(model_b))
        .then_with(|| id_a.cmp(&id_b))
}

#[cfg(test)]
mod tests {
    use super::{Camera, Lens};
    use crate::model::{EntityKind, ValidationError};

    #[test]
    fn blank_make_or_model_is_rejected() {
        let err = Camera::new("  ", "F3").validate().unwrap_err();
        assert_eq!(
            err,
            ValidationError::EmptyField {
                entity: EntityKind::Camera,
                field: "make"
            }
        );

        let err = Lens::new("Nikon", "").validate().unwrap_err();
        assert_eq!(
            err,
            ValidationError::EmptyField {
                entity: EntityKind::Lens,
                field: "model"
            }
        );
        assert!(Lens::new("Nikon", "Nikkor 50mm f/1.4").validate().is_ok());
    }
}
