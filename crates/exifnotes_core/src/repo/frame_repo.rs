//! Frame repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over the `frames` table.
//! - Answer lens usage queries and detach frames from a lens.
//!
//! # Invariants
//! - Roll listings are ordered by `count ASC, frame_id ASC`.
//! - `shutter` is stored verbatim through bound parameters, so quote
//!   characters (`1"`) survive a write/read cycle unchanged.
//! - `location` is written with the location codec; unreadable legacy
//!   values read back as `None` instead of failing the row.

use super::{allocated_id, count, RepoError, RepoResult};
use crate::location;
use crate::model::frame::Frame;
use crate::model::{
    format_db_datetime, optional_id_from_db, optional_id_to_db, parse_db_datetime, EntityKind,
    FrameId, LensId, RollId,
};
use log::warn;
use rusqlite::{params, Connection, OptionalExtension, Row};

const FRAME_SELECT_SQL: &str = "SELECT
    frame_id,
    roll_id,
    count,
    date,
    lens_id,
    shutter,
    aperture,
    frame_note,
    location
FROM frames";

/// Repository interface for frame operations.
pub trait FrameRepository {
    fn insert_frame(&self, frame: &Frame) -> RepoResult<FrameId>;
    fn get_frame(&self, id: FrameId) -> RepoResult<Option<Frame>>;
    fn list_frames(&self, roll_id: RollId) -> RepoResult<Vec<Frame>>;
    fn update_frame(&self, frame: &Frame) -> RepoResult<()>;
    fn delete_frame(&self, id: FrameId) -> RepoResult<()>;
    fn delete_frames_for_roll(&self, roll_id: RollId) -> RepoResult<usize>;
    fn count_frames(&self, roll_id: RollId) -> RepoResult<u64>;
    /// Number of frames shot with the lens.
    fn count_frames_with_lens(&self, lens_id: LensId) -> RepoResult<u64>;
    /// Resets `lens_id` to "no lens" on every frame using the lens.
    fn detach_lens(&self, lens_id: LensId) -> RepoResult<usize>;
    /// Most recently inserted frame of the roll (highest id).
    fn last_inserted_frame(&self, roll_id: RollId) -> RepoResult<Option<Frame>>;
    /// Highest frame count on the roll, `None` for an empty roll.
    fn max_count(&self, roll_id: RollId) -> RepoResult<Option<u32>>;
}

/// SQLite-backed frame repository.
pub struct SqliteFrameRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteFrameRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl FrameRepository for SqliteFrameRepository<'_> {
    fn insert_frame(&self, frame: &Frame) -> RepoResult<FrameId> {
        frame.validate()?;
        self.conn.execute(
            "INSERT INTO frames (
                roll_id,
                count,
                date,
                lens_id,
                shutter,
                aperture,
                frame_note,
                location
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                frame.roll_id,
                frame.count,
                format_db_datetime(&frame.date),
                optional_id_to_db(frame.lens_id),
                frame.shutter.as_str(),
                frame.aperture.as_str(),
                frame.note.as_deref(),
                frame.location.as_ref().map(|value| value.encode()),
            ],
        )?;

        allocated_id(self.conn, EntityKind::Frame)
    }

    fn get_frame(&self, id: FrameId) -> RepoResult<Option<Frame>> {
        self.conn
            .query_row(
                &format!("{FRAME_SELECT_SQL} WHERE frame_id = ?1;"),
                [id],
                |row| Ok(parse_frame_row(row)),
            )
            .optional()?
            .transpose()
    }

    fn list_frames(&self, roll_id: RollId) -> RepoResult<Vec<Frame>> {
        let mut stmt = self.conn.prepare(&format!(
            "{FRAME_SELECT_SQL} WHERE roll_id = ?1 ORDER BY count ASC, frame_id ASC;"
        ))?;
        let mut rows = stmt.query([roll_id])?;
        let mut frames = Vec::new();
        while let Some(row) = rows.next()? {
            frames.push(parse_frame_row(row)?);
        }
        Ok(frames)
    }

    fn update_frame(&self, frame: &Frame) -> RepoResult<()> {
        frame.validate()?;
        let changed = self.conn.execute(
            "UPDATE frames
             SET
                roll_id = ?1,
                count = ?2,
                date = ?3,
                lens_id = ?4,
                shutter = ?5,
                aperture = ?6,
                frame_note = ?7,
                location = ?8
             WHERE frame_id = ?9;",
            params![
                frame.roll_id,
                frame.count,
                format_db_datetime(&frame.date),
                optional_id_to_db(frame.lens_id),
                frame.shutter.as_str(),
                frame.aperture.as_str(),
                frame.note.as_deref(),
                frame.location.as_ref().map(|value| value.encode()),
                frame.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Frame,
                id: frame.id,
            });
        }
        Ok(())
    }

    fn delete_frame(&self, id: FrameId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM frames WHERE frame_id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Frame,
                id,
            });
        }
        Ok(())
    }

    fn delete_frames_for_roll(&self, roll_id: RollId) -> RepoResult<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM frames WHERE roll_id = ?1;", [roll_id])?;
        Ok(removed)
    }

    fn count_frames(&self, roll_id: RollId) -> RepoResult<u64> {
        count(
            self.conn,
            "SELECT COUNT(frame_id) FROM frames WHERE roll_id = ?1;",
            roll_id,
        )
    }

    fn count_frames_with_lens(&self, lens_id: LensId) -> RepoResult<u64> {
        count(
            self.conn,
            "SELECT COUNT(frame_id) FROM frames WHERE lens_id = ?1;",
            lens_id,
        )
    }

    fn detach_lens(&self, lens_id: LensId) -> RepoResult<usize> {
        let changed = self
            .conn
            .execute("UPDATE frames SET lens_id = 0 WHERE lens_id = ?1;", [lens_id])?;
        Ok(changed)
    }

    fn last_inserted_frame(&self, roll_id: RollId) -> RepoResult<Option<Frame>> {
        self.conn
            .query_row(
                &format!("{FRAME_SELECT_SQL} WHERE roll_id = ?1 ORDER BY frame_id DESC LIMIT 1;"),
                [roll_id],
                |row| Ok(parse_frame_row(row)),
            )
            .optional()?
            .transpose()
    }

    fn max_count(&self, roll_id: RollId) -> RepoResult<Option<u32>> {
        let max: Option<i64> = self.conn.query_row(
            "SELECT MAX(count) FROM frames WHERE roll_id = ?1;",
            [roll_id],
            |row| row.get(0),
        )?;
        max.map(frame_count_from_db).transpose()
    }
}

fn frame_count_from_db(value: i64) -> RepoResult<u32> {
    u32::try_from(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid count `{value}` in frames.count")))
}

fn parse_frame_row(row: &Row<'_>) -> RepoResult<Frame> {
    let id: FrameId = row.get("frame_id")?;

    let date_text: String = row.get("date")?;
    let date = parse_db_datetime(&date_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid date `{date_text}` in frames.date for frame {id}"
        ))
    })?;

    let location = match row.get::<_, Option<String>>("location")? {
        Some(text) => {
            let decoded = location::decode(&text);
            if decoded.is_none() && !text.trim().is_empty() && text.trim() != "null" {
                warn!("event=frame_read module=repo status=degraded frame_id={id} reason=malformed_location");
            }
            decoded
        }
        None => None,
    };

    Ok(Frame {
        id,
        roll_id: row.get("roll_id")?,
        count: frame_count_from_db(row.get("count")?)?,
        date,
        lens_id: optional_id_from_db(row.get("lens_id")?),
        shutter: row.get("shutter")?,
        aperture: row.get("aperture")?,
        note: row.get("frame_note")?,
        location,
    })
}
