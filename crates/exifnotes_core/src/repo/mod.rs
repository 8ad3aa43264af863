//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define per-table data access contracts for gear, rolls and frames.
//! - Keep SQL details out of the store facade.
//!
//! # Invariants
//! - All statements are parameterized; user text is never spliced into SQL.
//! - Write paths validate entities before touching storage.
//! - Read paths reject invalid persisted state (`InvalidData`) except for the
//!   frame location column, which decodes tolerantly.
//! - Repositories never open transactions themselves; callers pass a
//!   `Transaction` (which derefs to `Connection`) when atomicity is needed.

use crate::db::DbError;
use crate::model::{EntityKind, ValidationError};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod frame_repo;
pub mod gear_repo;
pub mod mount_repo;
pub mod roll_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    NotFound { entity: EntityKind, id: i64 },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Returns the id SQLite allocated for the last `INSERT` on `conn`.
///
/// Tables use `AUTOINCREMENT`, so ids grow monotonically and are never
/// reused after a delete.
pub(crate) fn allocated_id(conn: &Connection, entity: EntityKind) -> RepoResult<i64> {
    let id = conn.last_insert_rowid();
    if id <= 0 {
        return Err(RepoError::InvalidData(format!(
            "{entity} insert returned non-positive id {id}"
        )));
    }
    Ok(id)
}

pub(crate) fn exists(conn: &Connection, sql: &str, id: i64) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(sql, [id], |row| row.get(0))?;
    Ok(exists == 1)
}

pub(crate) fn count(conn: &Connection, sql: &str, id: i64) -> RepoResult<u64> {
    let count: i64 = conn.query_row(sql, [id], |row| row.get(0))?;
    u64::try_from(count).map_err(|_| RepoError::InvalidData(format!("negative count {count}")))
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
