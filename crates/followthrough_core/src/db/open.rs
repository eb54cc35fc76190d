//! Connection setup.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`, a busy timeout and a
//!   current schema.
//! - File databases run in WAL mode so a CLI and an API process can share
//!   one file.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone, Copy)]
enum Target<'a> {
    File(&'a Path),
    Memory,
}

impl Target<'_> {
    fn label(self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Memory => "memory",
        }
    }
}

/// Opens (creating if needed) a database file, including missing parent
/// directories, and migrates it.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_logged(Target::File(path.as_ref()))
}

/// Fresh migrated in-memory database. Used by tests.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_logged(Target::Memory)
}

fn open_logged(target: Target<'_>) -> DbResult<Connection> {
    let started_at = Instant::now();
    let result = connect(target);
    let duration_ms = started_at.elapsed().as_millis();

    match &result {
        Ok(_) => info!(
            "event=db_open module=db status=ok mode={} duration_ms={duration_ms}",
            target.label()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error mode={} duration_ms={duration_ms} error={err}",
            target.label()
        ),
    }
    result
}

fn connect(target: Target<'_>) -> DbResult<Connection> {
    let mut conn = match target {
        Target::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|source| DbError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            let conn = Connection::open(path)?;
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
                row.get::<_, String>(0)
            })?;
            conn
        }
        Target::Memory => Connection::open_in_memory()?,
    };

    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(&mut conn)?;
    Ok(conn)
}
