//! Camera↔lens compatibility graph over the `mountables` table.
//!
//! # Responsibility
//! - Maintain "lens may be mounted on camera" edges.
//! - Answer compatibility queries in both directions.
//!
//! # Invariants
//! - `(camera_id, lens_id)` is the primary key: an edge exists at most once.
//! - `mount` and `unmount` are idempotent.
//! - Compatibility listings are ordered by make, model, then id.

use super::gear_repo::{parse_camera_row, parse_lens_row};
use super::RepoResult;
use crate::model::gear::{Camera, Lens};
use crate::model::{CameraId, LensId};
use rusqlite::{params, Connection};

/// Repository interface for the compatibility graph.
pub trait MountRepository {
    /// Adds an edge. Returns `false` when it already existed.
    fn mount(&self, camera_id: CameraId, lens_id: LensId) -> RepoResult<bool>;
    /// Removes an edge. Returns `false` when it was absent.
    fn unmount(&self, camera_id: CameraId, lens_id: LensId) -> RepoResult<bool>;
    fn is_mountable(&self, camera_id: CameraId, lens_id: LensId) -> RepoResult<bool>;
    fn compatible_lenses(&self, camera_id: CameraId) -> RepoResult<Vec<Lens>>;
    fn compatible_cameras(&self, lens_id: LensId) -> RepoResult<Vec<Camera>>;
    /// Strips every edge of a camera that is about to be deleted.
    fn on_camera_deleted(&self, camera_id: CameraId) -> RepoResult<usize>;
    /// Strips every edge of a lens that is about to be deleted.
    fn on_lens_deleted(&self, lens_id: LensId) -> RepoResult<usize>;
}

/// SQLite-backed compatibility graph repository.
pub struct SqliteMountRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMountRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl MountRepository for SqliteMountRepository<'_> {
    fn mount(&self, camera_id: CameraId, lens_id: LensId) -> RepoResult<bool> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO mountables (camera_id, lens_id) VALUES (?1, ?2);",
            params![camera_id, lens_id],
        )?;
        Ok(inserted == 1)
    }

    fn unmount(&self, camera_id: CameraId, lens_id: LensId) -> RepoResult<bool> {
        let removed = self.conn.execute(
            "DELETE FROM mountables WHERE camera_id = ?1 AND lens_id = ?2;",
            params![camera_id, lens_id],
        )?;
        Ok(removed == 1)
    }

    fn is_mountable(&self, camera_id: CameraId, lens_id: LensId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM mountables WHERE camera_id = ?1 AND lens_id = ?2
            );",
            params![camera_id, lens_id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn compatible_lenses(&self, camera_id: CameraId) -> RepoResult<Vec<Lens>> {
        let mut stmt = self.conn.prepare(
            "SELECT l.lens_id AS lens_id, l.lens_make AS lens_make, l.lens_model AS lens_model
             FROM lenses l
             INNER JOIN mountables m ON m.lens_id = l.lens_id
             WHERE m.camera_id = ?1
             ORDER BY l.lens_make ASC, l.lens_model ASC, l.lens_id ASC;",
        )?;
        let mut rows = stmt.query([camera_id])?;
        let mut lenses = Vec::new();
        while let Some(row) = rows.next()? {
            lenses.push(parse_lens_row(row)?);
        }
        Ok(lenses)
    }

    fn compatible_cameras(&self, lens_id: LensId) -> RepoResult<Vec<Camera>> {
        let mut stmt = self.conn.prepare(
            "SELECT c.camera_id AS camera_id, c.camera_make AS camera_make, c.camera_model AS camera_model
             FROM cameras c
             INNER JOIN mountables m ON m.camera_id = c.camera_id
             WHERE m.lens_id = ?1
             ORDER BY c.camera_make ASC, c.camera_model ASC, c.camera_id ASC;",
        )?;
        let mut rows = stmt.query([lens_id])?;
        let mut cameras = Vec::new();
        while let Some(row) = rows.next()? {
            cameras.push(parse_camera_row(row)?);
        }
        Ok(cameras)
    }

    fn on_camera_deleted(&self, camera_id: CameraId) -> RepoResult<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM mountables WHERE camera_id = ?1;", [camera_id])?;
        Ok(removed)
    }

    fn on_lens_deleted(&self, lens_id: LensId) -> RepoResult<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM mountables WHERE lens_id = ?1;", [lens_id])?;
        Ok(removed)
    }
}
