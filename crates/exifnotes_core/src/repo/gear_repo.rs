//! Camera and lens repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over the `cameras` and `lenses` tables.
//!
//! # Invariants
//! - Listings are ordered by make, model, then id.
//! - Deleting a row here does not touch `mountables`; the store strips
//!   compatibility edges in the same transaction first.

use super::{allocated_id, exists, RepoError, RepoResult};
use crate::model::gear::{Camera, Lens};
use crate::model::{CameraId, EntityKind, LensId};
use rusqlite::{params, Connection, Row};

/// Column layout of one gear table. Camera and lens tables share a shape.
struct GearTable {
    entity: EntityKind,
    table: &'static str,
    id: &'static str,
    make: &'static str,
    model: &'static str,
}

const CAMERAS: GearTable = GearTable {
    entity: EntityKind::Camera,
    table: "cameras",
    id: "camera_id",
    make: "camera_make",
    model: "camera_model",
};

const LENSES: GearTable = GearTable {
    entity: EntityKind::Lens,
    table: "lenses",
    id: "lens_id",
    make: "lens_make",
    model: "lens_model",
};

/// Repository interface for camera CRUD.
pub trait CameraRepository {
    fn insert_camera(&self, camera: &Camera) -> RepoResult<CameraId>;
    fn get_camera(&self, id: CameraId) -> RepoResult<Option<Camera>>;
    fn camera_exists(&self, id: CameraId) -> RepoResult<bool>;
    fn list_cameras(&self) -> RepoResult<Vec<Camera>>;
    fn update_camera(&self, camera: &Camera) -> RepoResult<()>;
    fn delete_camera(&self, id: CameraId) -> RepoResult<()>;
}

/// Repository interface for lens CRUD.
pub trait LensRepository {
    fn insert_lens(&self, lens: &Lens) -> RepoResult<LensId>;
    fn get_lens(&self, id: LensId) -> RepoResult<Option<Lens>>;
    fn lens_exists(&self, id: LensId) -> RepoResult<bool>;
    fn list_lenses(&self) -> RepoResult<Vec<Lens>>;
    fn update_lens(&self, lens: &Lens) -> RepoResult<()>;
    fn delete_lens(&self, id: LensId) -> RepoResult<()>;
}

/// SQLite-backed camera and lens repository.
pub struct SqliteGearRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGearRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CameraRepository for SqliteGearRepository<'_> {
    fn insert_camera(&self, camera: &Camera) -> RepoResult<CameraId> {
        camera.validate()?;
        insert_gear(self.conn, &CAMERAS, &camera.make, &camera.model)
    }

    fn get_camera(&self, id: CameraId) -> RepoResult<Option<Camera>> {
        get_gear(self.conn, &CAMERAS, id, parse_camera_row)
    }

    fn camera_exists(&self, id: CameraId) -> RepoResult<bool> {
        gear_exists(self.conn, &CAMERAS, id)
    }

    fn list_cameras(&self) -> RepoResult<Vec<Camera>> {
        list_gear(self.conn, &CAMERAS, parse_camera_row)
    }

    fn update_camera(&self, camera: &Camera) -> RepoResult<()> {
        camera.validate()?;
        update_gear(self.conn, &CAMERAS, camera.id, &camera.make, &camera.model)
    }

    fn delete_camera(&self, id: CameraId) -> RepoResult<()> {
        delete_gear(self.conn, &CAMERAS, id)
    }
}

impl LensRepository for SqliteGearRepository<'_> {
    fn insert_lens(&self, lens: &Lens) -> RepoResult<LensId> {
        lens.validate()?;
        insert_gear(self.conn, &LENSES, &lens.make, &lens.model)
    }

    fn get_lens(&self, id: LensId) -> RepoResult<Option<Lens>> {
        get_gear(self.conn, &LENSES, id, parse_lens_row)
    }

    fn lens_exists(&self, id: LensId) -> RepoResult<bool> {
        gear_exists(self.conn, &LENSES, id)
    }

    fn list_lenses(&self) -> RepoResult<Vec<Lens>> {
        list_gear(self.conn, &LENSES, parse_lens_row)
    }

    fn update_lens(&self, lens: &Lens) -> RepoResult<()> {
        lens.validate()?;
        update_gear(self.conn, &LENSES, lens.id, &lens.make, &lens.model)
    }

    fn delete_lens(&self, id: LensId) -> RepoResult<()> {
        delete_gear(self.conn, &LENSES, id)
    }
}

/// Maps a `cameras` row selected with its native column names.
pub(crate) fn parse_camera_row(row: &Row<'_>) -> RepoResult<Camera> {
    Ok(Camera {
        id: row.get(CAMERAS.id)?,
        make: row.get(CAMERAS.make)?,
        model: row.get(CAMERAS.model)?,
    })
}

/// Maps a `lenses` row selected with its native column names.
pub(crate) fn parse_lens_row(row: &Row<'_>) -> RepoResult<Lens> {
    Ok(Lens {
        id: row.get(LENSES.id)?,
        make: row.get(LENSES.make)?,
        model: row.get(LENSES.model)?,
    })
}

fn insert_gear(conn: &Connection, table: &GearTable, make: &str, model: &str) -> RepoResult<i64> {
    conn.execute(
        &format!(
            "INSERT INTO {} ({}, {}) VALUES (?1, ?2);",
            table.table, table.make, table.model
        ),
        params![make, model],
    )?;
    allocated_id(conn, table.entity)
}

fn get_gear<T>(
    conn: &Connection,
    table: &GearTable,
    id: i64,
    parse: fn(&Row<'_>) -> RepoResult<T>,
) -> RepoResult<Option<T>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {id}, {make}, {model} FROM {table} WHERE {id} = ?1;",
        id = table.id,
        make = table.make,
        model = table.model,
        table = table.table,
    ))?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse(row)?));
    }
    Ok(None)
}

fn gear_exists(conn: &Connection, table: &GearTable, id: i64) -> RepoResult<bool> {
    exists(
        conn,
        &format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = ?1);",
            table.table, table.id
        ),
        id,
    )
}

fn list_gear<T>(
    conn: &Connection,
    table: &GearTable,
    parse: fn(&Row<'_>) -> RepoResult<T>,
) -> RepoResult<Vec<T>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {id}, {make}, {model} FROM {table} ORDER BY {make} ASC, {model} ASC, {id} ASC;",
        id = table.id,
        make = table.make,
        model = table.model,
        table = table.table,
    ))?;
    let mut rows = stmt.query([])?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(parse(row)?);
    }
    Ok(items)
}

fn update_gear(
    conn: &Connection,
    table: &GearTable,
    id: i64,
    make: &str,
    model: &str,
) -> RepoResult<()> {
    let changed = conn.execute(
        &format!(
            "UPDATE {} SET {} = ?1, {} = ?2 WHERE {} = ?3;",
            table.table, table.make, table.model, table.id
        ),
        params![make, model, id],
    )?;
    if changed == 0 {
        return Err(RepoError::NotFound {
            entity: table.entity,
            id,
        });
    }
    Ok(())
}

fn delete_gear(conn: &Connection, table: &GearTable, id: i64) -> RepoResult<()> {
    let changed = conn.execute(
        &format!("DELETE FROM {} WHERE {} = ?1;", table.table, table.id),
        [id],
    )?;
    if changed == 0 {
        return Err(RepoError::NotFound {
            entity: table.entity,
            id,
        });
    }
    Ok(())
}
