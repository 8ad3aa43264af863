//! Core persistence for the Exif Notes film photography log.
//! Gear, rolls and frames live here together with their integrity rules.

pub mod db;
pub mod location;
pub mod logging;
pub mod model;
pub mod ordering;
pub mod repo;
pub mod store;

pub use location::{Location, MalformedLocation};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::frame::Frame;
pub use model::gear::{Camera, Lens};
pub use model::roll::{Roll, RollFilter};
pub use model::{CameraId, EntityKind, FrameId, LensId, RollId, ValidationError};
pub use ordering::{sort_frames, sort_rolls, FrameSortMode, RollSortMode};
pub use store::{DeleteMode, FilmStore, IntegrityViolation, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
