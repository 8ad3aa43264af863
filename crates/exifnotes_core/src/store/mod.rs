//! Public store facade over the film log database.
//!
//! # Responsibility
//! - Own the single SQLite connection and serialize access to it.
//! - Enforce referential integrity between rolls, frames and gear.
//! - Translate repository failures into [`StoreError`].
//!
//! # Invariants
//! - Every public operation holds the connection lock for its full duration.
//! - Multi-statement mutations run inside one immediate transaction and
//!   either fully apply or leave storage untouched.
//! - Log lines carry ids and counts only, never user-entered text.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::{configure_connection, open_db, open_db_in_memory, DbError};
use crate::model::{EntityKind, ValidationError};
use crate::repo::RepoError;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

mod frames;
mod gear;
mod rolls;

pub type StoreResult<T> = Result<T, StoreError>;

/// How a delete treats rows that still reference the target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeleteMode {
    /// Refuse the delete while references exist.
    #[default]
    Strict,
    /// Detach referencing gear, or delete the frames of a roll.
    Cascade,
}

impl Display for DeleteMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Strict => f.write_str("strict"),
            Self::Cascade => f.write_str("cascade"),
        }
    }
}

/// A reference rule that an operation would have broken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityViolation {
    /// Rolls are still loaded in the camera.
    CameraInUse { camera_id: i64, roll_count: u64 },
    /// Frames still record the lens.
    LensInUse { lens_id: i64, frame_count: u64 },
    /// The roll still owns frames.
    RollHasFrames { roll_id: i64, frame_count: u64 },
    /// A roll, camera or lens referenced by the record does not exist.
    MissingReference { entity: EntityKind, id: i64 },
}

impl Display for IntegrityViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CameraInUse {
                camera_id,
                roll_count,
            } => write!(f, "camera {camera_id} is used by {roll_count} roll(s)"),
            Self::LensInUse {
                lens_id,
                frame_count,
            } => write!(f, "lens {lens_id} is used by {frame_count} frame(s)"),
            Self::RollHasFrames {
                roll_id,
                frame_count,
            } => write!(f, "roll {roll_id} still has {frame_count} frame(s)"),
            Self::MissingReference { entity, id } => {
                write!(f, "referenced {entity} does not exist: {id}")
            }
        }
    }
}

/// Error returned by every [`FilmStore`] operation.
#[derive(Debug)]
pub enum StoreError {
    Validation(ValidationError),
    NotFound { entity: EntityKind, id: i64 },
    ReferentialIntegrity(IntegrityViolation),
    Db(DbError),
    /// Persisted state that cannot be mapped back into the model.
    InvalidData(String),
    /// A connection handed to [`FilmStore::from_connection`] is not migrated.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// A previous operation panicked while holding the connection lock.
    ConnectionPoisoned,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::ReferentialIntegrity(violation) => {
                write!(f, "referential integrity violation: {violation}")
            }
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::ConnectionPoisoned => write!(f, "store connection lock is poisoned"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::Db(err) => Self::Db(err),
            RepoError::NotFound { entity, id } => Self::NotFound { entity, id },
            RepoError::InvalidData(message) => Self::InvalidData(message),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<IntegrityViolation> for StoreError {
    fn from(value: IntegrityViolation) -> Self {
        Self::ReferentialIntegrity(value)
    }
}

/// Film log store: gear, rolls, frames and the compatibility graph.
///
/// Constructed once by the embedding application and shared by reference.
/// All methods take `&self`; the connection lives behind a mutex.
pub struct FilmStore {
    conn: Mutex<Connection>,
}

impl FilmStore {
    /// Opens (or creates) a database file and migrates it to the latest schema.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self::wrap(open_db(path)?))
    }

    /// Opens a fresh in-memory database with the latest schema.
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::wrap(open_db_in_memory()?))
    }

    /// Wraps an already-open connection.
    ///
    /// The connection must already be at the latest schema version; use
    /// [`crate::db::open_db`] to bootstrap one.
    pub fn from_connection(conn: Connection) -> StoreResult<Self> {
        let actual_version = current_user_version(&conn)?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(StoreError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        configure_connection(&conn)?;
        Ok(Self::wrap(conn))
    }

    fn wrap(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn lock_conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::ConnectionPoisoned)
    }

    /// Runs a read-only closure under the connection lock.
    fn with_conn<T>(&self, op: impl FnOnce(&Connection) -> StoreResult<T>) -> StoreResult<T> {
        let conn = self.lock_conn()?;
        op(&conn)
    }

    /// Runs a closure inside one immediate transaction.
    ///
    /// The transaction rolls back on drop unless `op` succeeds.
    fn with_tx<T>(&self, op: impl FnOnce(&Transaction<'_>) -> StoreResult<T>) -> StoreResult<T> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let value = op(&tx)?;
        tx.commit()?;
        Ok(value)
    }
}
