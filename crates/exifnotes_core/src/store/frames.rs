//! Frame operations.

use super::{FilmStore, IntegrityViolation, StoreError, StoreResult};
use crate::model::frame::Frame;
use crate::model::{EntityKind, FrameId, RollId};
use crate::ordering::{sort_frames, FrameSortMode};
use crate::repo::frame_repo::{FrameRepository, SqliteFrameRepository};
use crate::repo::gear_repo::{LensRepository, SqliteGearRepository};
use crate::repo::roll_repo::{RollRepository, SqliteRollRepository};
use chrono::NaiveDateTime;
use log::info;
use rusqlite::Connection;

impl FilmStore {
    /// Inserts a frame and returns its new id. `frame.id` is ignored.
    pub fn add_frame(&self, frame: &Frame) -> StoreResult<FrameId> {
        let id = self.with_conn(|conn| {
            ensure_frame_references(conn, frame)?;
            Ok(SqliteFrameRepository::new(conn).insert_frame(frame)?)
        })?;
        info!(
            "event=frame_add module=store status=ok frame_id={id} roll_id={}",
            frame.roll_id
        );
        Ok(id)
    }

    pub fn get_frame(&self, id: FrameId) -> StoreResult<Frame> {
        self.with_conn(|conn| {
            SqliteFrameRepository::new(conn)
                .get_frame(id)?
                .ok_or(StoreError::NotFound {
                    entity: EntityKind::Frame,
                    id,
                })
        })
    }

    /// Frames of a roll ordered by count, then id.
    pub fn list_frames(&self, roll_id: RollId) -> StoreResult<Vec<Frame>> {
        self.with_conn(|conn| {
            ensure_roll_exists(conn, roll_id)?;
            Ok(SqliteFrameRepository::new(conn).list_frames(roll_id)?)
        })
    }

    /// Frames of a roll in the requested display order.
    pub fn list_frames_sorted(
        &self,
        roll_id: RollId,
        mode: FrameSortMode,
    ) -> StoreResult<Vec<Frame>> {
        self.with_conn(|conn| {
            ensure_roll_exists(conn, roll_id)?;
            let frames = SqliteFrameRepository::new(conn).list_frames(roll_id)?;
            let lenses = SqliteGearRepository::new(conn).list_lenses()?;
            Ok(sort_frames(&frames, mode, &lenses))
        })
    }

    pub fn update_frame(&self, frame: &Frame) -> StoreResult<()> {
        self.with_conn(|conn| {
            ensure_frame_references(conn, frame)?;
            Ok(SqliteFrameRepository::new(conn).update_frame(frame)?)
        })?;
        info!(
            "event=frame_update module=store status=ok frame_id={}",
            frame.id
        );
        Ok(())
    }

    pub fn delete_frame(&self, id: FrameId) -> StoreResult<()> {
        self.with_conn(|conn| Ok(SqliteFrameRepository::new(conn).delete_frame(id)?))?;
        info!("event=frame_delete module=store status=ok frame_id={id}");
        Ok(())
    }

    /// Deletes every frame of the roll and returns how many were removed.
    pub fn delete_frames_for_roll(&self, roll_id: RollId) -> StoreResult<usize> {
        let removed = self.with_tx(|tx| {
            ensure_roll_exists(tx, roll_id)?;
            Ok(SqliteFrameRepository::new(tx).delete_frames_for_roll(roll_id)?)
        })?;
        info!(
            "event=frames_delete module=store status=ok roll_id={roll_id} removed_frames={removed}"
        );
        Ok(removed)
    }

    /// Number of frames on the roll.
    pub fn count_frames(&self, roll_id: RollId) -> StoreResult<u64> {
        self.with_conn(|conn| {
            ensure_roll_exists(conn, roll_id)?;
            Ok(SqliteFrameRepository::new(conn).count_frames(roll_id)?)
        })
    }

    /// Unsaved template for the next exposure on the roll.
    ///
    /// The count is one past the highest count on the roll (1 when empty).
    /// Lens, shutter and aperture carry over from the most recently added
    /// frame.
    pub fn next_frame(&self, roll_id: RollId, date: NaiveDateTime) -> StoreResult<Frame> {
        self.with_conn(|conn| next_frame_template(conn, roll_id, date))
    }

    /// Builds the next-frame template and inserts it atomically.
    pub fn add_next_frame(&self, roll_id: RollId, date: NaiveDateTime) -> StoreResult<Frame> {
        let frame = self.with_tx(|tx| {
            let mut frame = next_frame_template(tx, roll_id, date)?;
            frame.id = SqliteFrameRepository::new(tx).insert_frame(&frame)?;
            Ok(frame)
        })?;
        info!(
            "event=frame_add module=store status=ok frame_id={} roll_id={roll_id} count={}",
            frame.id, frame.count
        );
        Ok(frame)
    }
}

fn next_frame_template(
    conn: &Connection,
    roll_id: RollId,
    date: NaiveDateTime,
) -> StoreResult<Frame> {
    ensure_roll_exists(conn, roll_id)?;
    let frames = SqliteFrameRepository::new(conn);

    let count = match frames.max_count(roll_id)? {
        Some(max) => max.checked_add(1).ok_or_else(|| {
            StoreError::InvalidData(format!("frame count overflow on roll {roll_id}"))
        })?,
        None => 1,
    };

    let mut frame = Frame::new(roll_id, count, date);
    if let Some(previous) = frames.last_inserted_frame(roll_id)? {
        frame.lens_id = previous.lens_id;
        frame.shutter = previous.shutter;
        frame.aperture = previous.aperture;
    }
    Ok(frame)
}

fn ensure_roll_exists(conn: &Connection, roll_id: RollId) -> StoreResult<()> {
    if !SqliteRollRepository::new(conn).roll_exists(roll_id)? {
        return Err(StoreError::NotFound {
            entity: EntityKind::Roll,
            id: roll_id,
        });
    }
    Ok(())
}

fn ensure_frame_references(conn: &Connection, frame: &Frame) -> StoreResult<()> {
    frame.validate()?;
    if !SqliteRollRepository::new(conn).roll_exists(frame.roll_id)? {
        return Err(IntegrityViolation::MissingReference {
            entity: EntityKind::Roll,
            id: frame.roll_id,
        }
        .into());
    }
    if let Some(lens_id) = frame.lens_id {
        if !SqliteGearRepository::new(conn).lens_exists(lens_id)? {
            return Err(IntegrityViolation::MissingReference {
                entity: EntityKind::Lens,
                id: lens_id,
            }
            .into());
        }
    }
    Ok(())
}
