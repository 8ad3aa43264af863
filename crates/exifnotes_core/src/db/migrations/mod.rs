//! SQLite migration registry and executor.
//!
//! # Responsibility
//! - Register forward schema migrations in strictly increasing order.
//! - Apply each pending migration atomically together with its version bump.
//!
//! # Invariants
//! - `version` values are contiguous, starting at 1.
//! - A failed step rolls back and leaves `PRAGMA user_version` at the last
//!   successfully applied version.

use crate::db::{DbError, DbResult};
use log::{error, info};
use rusqlite::{Connection, TransactionBehavior};

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "init",
        sql: include_str!("0001_init.sql"),
    },
    Migration {
        version: 2,
        name: "roll_archive",
        sql: include_str!("0002_roll_archive.sql"),
    },
    Migration {
        version: 3,
        name: "reference_indexes",
        sql: include_str!("0003_reference_indexes.sql"),
    },
];

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Applies all pending migrations on the provided connection.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    run_migrations(conn, MIGRATIONS, latest_version())
}

/// Applies pending migrations up to and including `target_version`.
///
/// Used by upgrade tests to materialize an older schema before moving forward.
pub fn apply_migrations_to(conn: &mut Connection, target_version: u32) -> DbResult<()> {
    run_migrations(conn, MIGRATIONS, target_version.min(latest_version()))
}

/// Reads the schema version stamped on the connection.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

fn run_migrations(
    conn: &mut Connection,
    migrations: &[Migration],
    target_version: u32,
) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = migrations.last().map_or(0, |migration| migration.version);

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    let mut applied_version = current_version;
    for migration in migrations {
        if migration.version <= applied_version || migration.version > target_version {
            continue;
        }

        if let Err(source) = apply_one(conn, migration) {
            error!(
                "event=migration_apply module=db status=error from_version={} target_version={} name={} error={}",
                applied_version, migration.version, migration.name, source
            );
            return Err(DbError::MigrationFailed {
                from_version: applied_version,
                target_version: migration.version,
                source,
            });
        }

        info!(
            "event=migration_apply module=db status=ok from_version={} target_version={} name={}",
            applied_version, migration.version, migration.name
        );
        applied_version = migration.version;
    }

    Ok(())
}

fn apply_one(conn: &mut Connection, migration: &Migration) -> rusqlite::Result<()> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    tx.execute_batch(migration.sql)?;
    tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    tx.commit()
}

#[cfg(test)]
mod tests {
    use super::{current_user_version, run_migrations, Migration, MIGRATIONS};
    use crate::db::DbError;
    use rusqlite::Connection;

    #[test]
    fn registry_versions_are_contiguous_from_one() {
        for (index, migration) in MIGRATIONS.iter().enumerate() {
            assert_eq!(migration.version as usize, index + 1);
        }
    }

    #[test]
    fn failing_step_rolls_back_and_keeps_previous_version() {
        let broken: &[Migration] = &[
            Migration {
                version: 1,
                name: "ok",
                sql: "CREATE TABLE first_step (id INTEGER PRIMARY KEY);",
            },
            Migration {
                version: 2,
                name: "broken",
                sql: "CREATE TABLE second_step (id INTEGER PRIMARY KEY);
                      ALTER TABLE missing_table ADD COLUMN nope INTEGER;",
            },
        ];
        let mut conn = Connection::open_in_memory().unwrap();

        let err = run_migrations(&mut conn, broken, 2).unwrap_err();
        assert!(matches!(
            err,
            DbError::MigrationFailed {
                from_version: 1,
                target_version: 2,
                ..
            }
        ));
        assert_eq!(current_user_version(&conn).unwrap(), 1);

        let second_exists: i64 = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE name = 'second_step');",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(second_exists, 0);
    }
}
