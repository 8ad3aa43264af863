//! Command-line summary of the film log database.
//!
//! # Responsibility
//! - Parse options from flags or `EXIFNOTES_*` environment variables.
//! - Start logging when a log directory is configured, then open the store.
//! - Print a deterministic summary of gear and rolls for local sanity checks.

use clap::Parser;
use exifnotes_core::{
    core_version, default_log_level, init_logging, FilmStore, RollFilter, RollSortMode,
    StoreResult,
};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

const DEFAULT_DB_FILE_NAME: &str = "exifnotes.sqlite3";

#[derive(Debug, Parser)]
#[command(name = "exifnotes")]
#[command(about = "Summarize an Exif Notes film log database")]
#[command(version)]
struct Options {
    /// SQLite database file; created and migrated when missing.
    #[arg(long, env = "EXIFNOTES_DB_PATH", default_value_os_t = default_db_path())]
    db_path: PathBuf,

    /// trace, debug, info, warn or error.
    #[arg(long, env = "EXIFNOTES_LOG_LEVEL", default_value = default_log_level())]
    log_level: String,

    /// Absolute directory for rotating log files. Logging is off without it.
    #[arg(long, env = "EXIFNOTES_LOG_DIR")]
    log_dir: Option<PathBuf>,
}

fn default_db_path() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
}

fn main() -> ExitCode {
    let options = Options::parse();

    if let Some(log_dir) = options.log_dir.as_deref() {
        if let Err(err) = init_logging(&options.log_level, log_dir) {
            eprintln!("exifnotes: logging disabled: {err}");
        }
    }

    let store = match FilmStore::open(&options.db_path) {
        Ok(store) => store,
        Err(err) => {
            eprintln!(
                "exifnotes: cannot open `{}`: {err}",
                options.db_path.display()
            );
            return ExitCode::FAILURE;
        }
    };

    match print_summary(&store) {
        Ok(()) => {
            info!("event=cli_summary module=cli status=ok");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("exifnotes: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_summary(store: &FilmStore) -> StoreResult<()> {
    println!("exifnotes_core version={}", core_version());

    let cameras = store.list_cameras()?;
    let lenses = store.list_lenses()?;
    let (active, archived) = store.roll_counts()?;
    println!(
        "cameras={} lenses={} rolls_active={active} rolls_archived={archived}",
        cameras.len(),
        lenses.len()
    );

    for roll in store.list_rolls_sorted(RollFilter::All, RollSortMode::Date)? {
        let frames = store.count_frames(roll.id)?;
        let camera = roll
            .camera_id
            .and_then(|id| cameras.iter().find(|camera| camera.id == id))
            .map_or_else(|| "-".to_string(), |camera| camera.name());
        println!(
            "roll id={} frames={frames} camera=\"{camera}\" name=\"{}\"",
            roll.id, roll.name
        );
    }
    Ok(())
}
