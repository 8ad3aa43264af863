//! Roll operations.

use super::{DeleteMode, FilmStore, IntegrityViolation, StoreError, StoreResult};
use crate::model::roll::{Roll, RollFilter};
use crate::model::{EntityKind, RollId};
use crate::ordering::{sort_rolls, RollSortMode};
use crate::repo::frame_repo::{FrameRepository, SqliteFrameRepository};
use crate::repo::gear_repo::{CameraRepository, SqliteGearRepository};
use crate::repo::roll_repo::{RollRepository, SqliteRollRepository};
use log::info;
use rusqlite::Connection;

impl FilmStore {
    /// Inserts a roll and returns its new id. `roll.id` is ignored.
    pub fn add_roll(&self, roll: &Roll) -> StoreResult<RollId> {
        let id = self.with_conn(|conn| {
            roll.validate()?;
            ensure_camera_reference(conn, roll)?;
            Ok(SqliteRollRepository::new(conn).insert_roll(roll)?)
        })?;
        info!("event=roll_add module=store status=ok roll_id={id}");
        Ok(id)
    }

    pub fn get_roll(&self, id: RollId) -> StoreResult<Roll> {
        self.with_conn(|conn| {
            SqliteRollRepository::new(conn)
                .get_roll(id)?
                .ok_or(StoreError::NotFound {
                    entity: EntityKind::Roll,
                    id,
                })
        })
    }

    /// Rolls matching `filter`, newest id first.
    pub fn list_rolls(&self, filter: RollFilter) -> StoreResult<Vec<Roll>> {
        self.with_conn(|conn| Ok(SqliteRollRepository::new(conn).list_rolls(filter)?))
    }

    /// Rolls matching `filter` in the requested display order.
    pub fn list_rolls_sorted(
        &self,
        filter: RollFilter,
        mode: RollSortMode,
    ) -> StoreResult<Vec<Roll>> {
        self.with_conn(|conn| {
            let rolls = SqliteRollRepository::new(conn).list_rolls(filter)?;
            let cameras = SqliteGearRepository::new(conn).list_cameras()?;
            Ok(sort_rolls(&rolls, mode, &cameras))
        })
    }

    pub fn update_roll(&self, roll: &Roll) -> StoreResult<()> {
        self.with_conn(|conn| {
            roll.validate()?;
            ensure_camera_reference(conn, roll)?;
            Ok(SqliteRollRepository::new(conn).update_roll(roll)?)
        })?;
        info!("event=roll_update module=store status=ok roll_id={}", roll.id);
        Ok(())
    }

    /// Deletes a roll.
    ///
    /// In [`DeleteMode::Strict`] the delete fails while the roll has frames;
    /// in [`DeleteMode::Cascade`] its frames are deleted with it.
    pub fn delete_roll(&self, id: RollId, mode: DeleteMode) -> StoreResult<()> {
        let removed_frames = self.with_tx(|tx| {
            let rolls = SqliteRollRepository::new(tx);
            let frames = SqliteFrameRepository::new(tx);
            if !rolls.roll_exists(id)? {
                return Err(StoreError::NotFound {
                    entity: EntityKind::Roll,
                    id,
                });
            }

            let removed = match mode {
                DeleteMode::Strict => {
                    let frame_count = frames.count_frames(id)?;
                    if frame_count > 0 {
                        return Err(IntegrityViolation::RollHasFrames {
                            roll_id: id,
                            frame_count,
                        }
                        .into());
                    }
                    0
                }
                DeleteMode::Cascade => frames.delete_frames_for_roll(id)?,
            };

            rolls.delete_roll(id)?;
            Ok(removed)
        })?;

        info!(
            "event=roll_delete module=store status=ok roll_id={id} mode={mode} removed_frames={removed_frames}"
        );
        Ok(())
    }

    /// `(active, archived)` roll totals.
    pub fn roll_counts(&self) -> StoreResult<(u64, u64)> {
        self.with_conn(|conn| Ok(SqliteRollRepository::new(conn).roll_counts()?))
    }
}

fn ensure_camera_reference(conn: &Connection, roll: &Roll) -> StoreResult<()> {
    if let Some(camera_id) = roll.camera_id {
        if !SqliteGearRepository::new(conn).camera_exists(camera_id)? {
            return Err(IntegrityViolation::MissingReference {
                entity: EntityKind::Camera,
                id: camera_id,
            }
            .into());
        }
    }
    Ok(())
}
