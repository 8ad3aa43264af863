//! Roll repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over the `rolls` table.
//! - Answer camera usage queries and detach rolls from a camera.
//!
//! # Invariants
//! - Listings are newest first (`roll_id DESC`).
//! - `camera_id = 0` in storage is `None` in the model.

use super::{allocated_id, bool_to_int, count, exists, RepoError, RepoResult};
use crate::model::roll::{Roll, RollFilter};
use crate::model::{
    format_db_datetime, optional_id_from_db, optional_id_to_db, parse_db_datetime, CameraId,
    EntityKind, RollId,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const ROLL_SELECT_SQL: &str = "SELECT
    roll_id,
    rollname,
    roll_date,
    roll_note,
    camera_id,
    archived
FROM rolls";

/// Repository interface for roll operations.
pub trait RollRepository {
    fn insert_roll(&self, roll: &Roll) -> RepoResult<RollId>;
    fn get_roll(&self, id: RollId) -> RepoResult<Option<Roll>>;
    fn roll_exists(&self, id: RollId) -> RepoResult<bool>;
    fn list_rolls(&self, filter: RollFilter) -> RepoResult<Vec<Roll>>;
    fn update_roll(&self, roll: &Roll) -> RepoResult<()>;
    fn delete_roll(&self, id: RollId) -> RepoResult<()>;
    /// Number of rolls loaded in the camera.
    fn count_rolls_with_camera(&self, camera_id: CameraId) -> RepoResult<u64>;
    /// Resets `camera_id` to "no camera" on every roll using the camera.
    fn detach_camera(&self, camera_id: CameraId) -> RepoResult<usize>;
    /// `(active, archived)` roll totals.
    fn roll_counts(&self) -> RepoResult<(u64, u64)>;
}

/// SQLite-backed roll repository.
pub struct SqliteRollRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRollRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl RollRepository for SqliteRollRepository<'_> {
    fn insert_roll(&self, roll: &Roll) -> RepoResult<RollId> {
        roll.validate()?;

        self.conn.execute(
            "INSERT INTO rolls (
                rollname,
                roll_date,
                roll_note,
                camera_id,
                archived
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                roll.name.as_str(),
                format_db_datetime(&roll.date),
                roll.note.as_deref(),
                optional_id_to_db(roll.camera_id),
                bool_to_int(roll.archived),
            ],
        )?;

        allocated_id(self.conn, EntityKind::Roll)
    }

    fn get_roll(&self, id: RollId) -> RepoResult<Option<Roll>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ROLL_SELECT_SQL} WHERE roll_id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_roll_row(row)?));
        }
        Ok(None)
    }

    fn roll_exists(&self, id: RollId) -> RepoResult<bool> {
        exists(
            self.conn,
            "SELECT EXISTS(SELECT 1 FROM rolls WHERE roll_id = ?1);",
            id,
        )
    }

    fn list_rolls(&self, filter: RollFilter) -> RepoResult<Vec<Roll>> {
        let mut sql = format!("{ROLL_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(archived) = filter.archived_flag() {
            sql.push_str(" AND archived = ?");
            bind_values.push(Value::Integer(bool_to_int(archived)));
        }

        sql.push_str(" ORDER BY roll_id DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut rolls = Vec::new();
        while let Some(row) = rows.next()? {
            rolls.push(parse_roll_row(row)?);
        }
        Ok(rolls)
    }

    fn update_roll(&self, roll: &Roll) -> RepoResult<()> {
        roll.validate()?;

        let changed = self.conn.execute(
            "UPDATE rolls
             SET
                rollname = ?1,
                roll_date = ?2,
                roll_note = ?3,
                camera_id = ?4,
                archived = ?5
             WHERE roll_id = ?6;",
            params![
                roll.name.as_str(),
                format_db_datetime(&roll.date),
                roll.note.as_deref(),
                optional_id_to_db(roll.camera_id),
                bool_to_int(roll.archived),
                roll.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Roll,
                id: roll.id,
            });
        }
        Ok(())
    }

    fn delete_roll(&self, id: RollId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM rolls WHERE roll_id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Roll,
                id,
            });
        }
        Ok(())
    }

    fn count_rolls_with_camera(&self, camera_id: CameraId) -> RepoResult<u64> {
        count(
            self.conn,
            "SELECT COUNT(*) FROM rolls WHERE camera_id = ?1;",
            camera_id,
        )
    }

    fn detach_camera(&self, camera_id: CameraId) -> RepoResult<usize> {
        let changed = self.conn.execute(
            "UPDATE rolls SET camera_id = 0 WHERE camera_id = ?1;",
            [camera_id],
        )?;
        Ok(changed)
    }

    fn roll_counts(&self) -> RepoResult<(u64, u64)> {
        let (active, archived): (i64, i64) = self.conn.query_row(
            "SELECT
                COALESCE(SUM(CASE WHEN archived = 0 THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN archived = 1 THEN 1 ELSE 0 END), 0)
             FROM rolls;",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok((non_negative(active)?, non_negative(archived)?))
    }
}

fn non_negative(value: i64) -> RepoResult<u64> {
    u64::try_from(value).map_err(|_| RepoError::InvalidData(format!("negative count {value}")))
}

fn parse_roll_row(row: &Row<'_>) -> RepoResult<Roll> {
    let id: RollId = row.get("roll_id")?;

    let date_text: String = row.get("roll_date")?;
    let date = parse_db_datetime(&date_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid date `{date_text}` in rolls.roll_date for roll {id}"
        ))
    })?;

    let archived = match row.get::<_, i64>("archived")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid archived value `{other}` in rolls.archived"
            )));
        }
    };

    let roll = Roll {
        id,
        name: row.get("rollname")?,
        date,
        note: row.get("roll_note")?,
        camera_id: optional_id_from_db(row.get("camera_id")?),
        archived,
    };
    roll.validate()?;
    Ok(roll)
}
