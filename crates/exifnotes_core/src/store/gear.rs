//! Camera, lens and compatibility-graph operations.

use super::{DeleteMode, FilmStore, IntegrityViolation, StoreError, StoreResult};
use crate::model::gear::{Camera, Lens};
use crate::model::{CameraId, EntityKind, LensId};
use crate::repo::frame_repo::{FrameRepository, SqliteFrameRepository};
use crate::repo::gear_repo::{CameraRepository, LensRepository, SqliteGearRepository};
use crate::repo::mount_repo::{MountRepository, SqliteMountRepository};
use crate::repo::roll_repo::{RollRepository, SqliteRollRepository};
use log::info;
use rusqlite::Connection;

impl FilmStore {
    /// Inserts a camera and returns its new id. `camera.id` is ignored.
    pub fn add_camera(&self, camera: &Camera) -> StoreResult<CameraId> {
        let id = self.with_conn(|conn| Ok(SqliteGearRepository::new(conn).insert_camera(camera)?))?;
        info!("event=camera_add module=store status=ok camera_id={id}");
        Ok(id)
    }

    pub fn get_camera(&self, id: CameraId) -> StoreResult<Camera> {
        self.with_conn(|conn| {
            SqliteGearRepository::new(conn)
                .get_camera(id)?
                .ok_or(StoreError::NotFound {
                    entity: EntityKind::Camera,
                    id,
                })
        })
    }

    /// All cameras ordered by make, model, then id.
    pub fn list_cameras(&self) -> StoreResult<Vec<Camera>> {
        self.with_conn(|conn| Ok(SqliteGearRepository::new(conn).list_cameras()?))
    }

    pub fn update_camera(&self, camera: &Camera) -> StoreResult<()> {
        self.with_conn(|conn| Ok(SqliteGearRepository::new(conn).update_camera(camera)?))?;
        info!(
            "event=camera_update module=store status=ok camera_id={}",
            camera.id
        );
        Ok(())
    }

    /// Deletes a camera together with its compatibility edges.
    ///
    /// In [`DeleteMode::Strict`] the delete fails while rolls still use the
    /// camera; in [`DeleteMode::Cascade`] those rolls are set to "no camera".
    pub fn delete_camera(&self, id: CameraId, mode: DeleteMode) -> StoreResult<()> {
        let (edges, detached) = self.with_tx(|tx| {
            let gear = SqliteGearRepository::new(tx);
            let rolls = SqliteRollRepository::new(tx);
            if !gear.camera_exists(id)? {
                return Err(StoreError::NotFound {
                    entity: EntityKind::Camera,
                    id,
                });
            }

            let detached = match mode {
                DeleteMode::Strict => {
                    let roll_count = rolls.count_rolls_with_camera(id)?;
                    if roll_count > 0 {
                        return Err(IntegrityViolation::CameraInUse {
                            camera_id: id,
                            roll_count,
                        }
                        .into());
                    }
                    0
                }
                DeleteMode::Cascade => rolls.detach_camera(id)?,
            };

            let edges = SqliteMountRepository::new(tx).on_camera_deleted(id)?;
            gear.delete_camera(id)?;
            Ok((edges, detached))
        })?;

        info!(
            "event=camera_delete module=store status=ok camera_id={id} mode={mode} mount_edges={edges} detached_rolls={detached}"
        );
        Ok(())
    }

    /// Whether any roll is loaded in the camera.
    pub fn is_camera_in_use(&self, id: CameraId) -> StoreResult<bool> {
        self.with_conn(|conn| Ok(SqliteRollRepository::new(conn).count_rolls_with_camera(id)? > 0))
    }

    /// Inserts a lens and returns its new id. `lens.id` is ignored.
    pub fn add_lens(&self, lens: &Lens) -> StoreResult<LensId> {
        let id = self.with_conn(|conn| Ok(SqliteGearRepository::new(conn).insert_lens(lens)?))?;
        info!("event=lens_add module=store status=ok lens_id={id}");
        Ok(id)
    }

    pub fn get_lens(&self, id: LensId) -> StoreResult<Lens> {
        self.with_conn(|conn| {
            SqliteGearRepository::new(conn)
                .get_lens(id)?
                .ok_or(StoreError::NotFound {
                    entity: EntityKind::Lens,
                    id,
                })
        })
    }

    /// All lenses ordered by make, model, then id.
    pub fn list_lenses(&self) -> StoreResult<Vec<Lens>> {
        self.with_conn(|conn| Ok(SqliteGearRepository::new(conn).list_lenses()?))
    }

    pub fn update_lens(&self, lens: &Lens) -> StoreResult<()> {
        self.with_conn(|conn| Ok(SqliteGearRepository::new(conn).update_lens(lens)?))?;
        info!("event=lens_update module=store status=ok lens_id={}", lens.id);
        Ok(())
    }

    /// Deletes a lens together with its compatibility edges.
    ///
    /// In [`DeleteMode::Strict`] the delete fails while frames still record
    /// the lens; in [`DeleteMode::Cascade`] those frames are set to "no lens".
    pub fn delete_lens(&self, id: LensId, mode: DeleteMode) -> StoreResult<()> {
        let (edges, detached) = self.with_tx(|tx| {
            let gear = SqliteGearRepository::new(tx);
            let frames = SqliteFrameRepository::new(tx);
            if !gear.lens_exists(id)? {
                return Err(StoreError::NotFound {
                    entity: EntityKind::Lens,
                    id,
                });
            }

            let detached = match mode {
                DeleteMode::Strict => {
                    let frame_count = frames.count_frames_with_lens(id)?;
                    if frame_count > 0 {
                        return Err(IntegrityViolation::LensInUse {
                            lens_id: id,
                            frame_count,
                        }
                        .into());
                    }
                    0
                }
                DeleteMode::Cascade => frames.detach_lens(id)?,
            };

            let edges = SqliteMountRepository::new(tx).on_lens_deleted(id)?;
            gear.delete_lens(id)?;
            Ok((edges, detached))
        })?;

        info!(
            "event=lens_delete module=store status=ok lens_id={id} mode={mode} mount_edges={edges} detached_frames={detached}"
        );
        Ok(())
    }

    /// Whether any frame records the lens.
    pub fn is_lens_in_use(&self, id: LensId) -> StoreResult<bool> {
        self.with_conn(|conn| {
            Ok(SqliteFrameRepository::new(conn).count_frames_with_lens(id)? > 0)
        })
    }

    /// Records that the lens fits the camera. Mounting twice is a no-op.
    pub fn mount(&self, camera_id: CameraId, lens_id: LensId) -> StoreResult<()> {
        let inserted = self.with_conn(|conn| {
            ensure_gear_exists(conn, camera_id, lens_id)?;
            Ok(SqliteMountRepository::new(conn).mount(camera_id, lens_id)?)
        })?;
        info!(
            "event=mount_add module=store status=ok camera_id={camera_id} lens_id={lens_id} inserted={inserted}"
        );
        Ok(())
    }

    /// Removes the compatibility edge. An absent edge is a no-op.
    pub fn unmount(&self, camera_id: CameraId, lens_id: LensId) -> StoreResult<()> {
        let removed =
            self.with_conn(|conn| Ok(SqliteMountRepository::new(conn).unmount(camera_id, lens_id)?))?;
        info!(
            "event=mount_remove module=store status=ok camera_id={camera_id} lens_id={lens_id} removed={removed}"
        );
        Ok(())
    }

    pub fn is_mountable(&self, camera_id: CameraId, lens_id: LensId) -> StoreResult<bool> {
        self.with_conn(|conn| Ok(SqliteMountRepository::new(conn).is_mountable(camera_id, lens_id)?))
    }

    /// Lenses that fit the camera, ordered by make, model, then id.
    pub fn compatible_lenses(&self, camera_id: CameraId) -> StoreResult<Vec<Lens>> {
        self.with_conn(|conn| Ok(SqliteMountRepository::new(conn).compatible_lenses(camera_id)?))
    }

    /// Cameras the lens fits, ordered by make, model, then id.
    pub fn compatible_cameras(&self, lens_id: LensId) -> StoreResult<Vec<Camera>> {
        self.with_conn(|conn| Ok(SqliteMountRepository::new(conn).compatible_cameras(lens_id)?))
    }
}

fn ensure_gear_exists(conn: &Connection, camera_id: CameraId, lens_id: LensId) -> StoreResult<()> {
    let gear = SqliteGearRepository::new(conn);
    if !gear.camera_exists(camera_id)? {
        return Err(StoreError::NotFound {
            entity: EntityKind::Camera,
            id: camera_id,
        });
    }
    if !gear.lens_exists(lens_id)? {
        return Err(StoreError::NotFound {
            entity: EntityKind::Lens,
            id: lens_id,
        });
    }
    Ok(())
}
