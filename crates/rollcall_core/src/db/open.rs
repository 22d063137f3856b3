//! Connection bootstrap for the student store.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections from an explicit config.
//! - Configure connection pragmas required by core behavior.
//! - Trigger schema migrations, and seed a freshly created store.
//!
//! # Invariants
//! - Returned connections have migrations fully applied.
//! - Seed rows are inserted only when the store did not exist before this
//!   call; reopening an initialized store never duplicates them.

use super::migrations::{apply_migrations, current_user_version};
use super::DbResult;
use log::{error, info};
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Sample records inserted into a freshly created store.
const SEED_STUDENTS: &[(&str, &str, &str, i64, &str)] = &[
    ("CS101", "Asha Patel", "CSE", 3, "asha.patel@example.com"),
    ("CS102", "Rohit Kumar", "CSE", 2, "rohit.kumar@example.com"),
    ("EC201", "Priya Singh", "ECE", 4, "priya.singh@example.com"),
];

/// Where the student store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// SQLite database file, created on first open.
    File(PathBuf),
    /// Private in-memory database, mainly for tests.
    InMemory,
}

/// Explicit store configuration passed in by the embedding application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub location: StoreLocation,
    /// Insert [`SEED_STUDENTS`] when the store is freshly created.
    pub seed_on_init: bool,
}

impl StoreConfig {
    /// File-backed store, seeded on first creation.
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self {
            location: StoreLocation::File(path.as_ref().to_path_buf()),
            seed_on_init: true,
        }
    }

    /// In-memory store without seed rows.
    pub fn in_memory() -> Self {
        Self {
            location: StoreLocation::InMemory,
            seed_on_init: false,
        }
    }

    /// Overrides the seed-on-init behavior.
    pub fn with_seed(mut self, seed_on_init: bool) -> Self {
        self.seed_on_init = seed_on_init;
        self
    }
}

/// Opens the student store and brings it to the latest schema.
///
/// Safe to call on every process start: an already-initialized store passes
/// through unchanged. Any failure here means the store is unavailable and
/// the caller must abort startup.
///
/// # Side effects
/// - Creates the database file and seed rows on first open of a file store.
/// - Emits `store_open` logging events with duration and status.
pub fn open_store(config: &StoreConfig) -> DbResult<Connection> {
    let started_at = Instant::now();
    let mode = match &config.location {
        StoreLocation::File(_) => "file",
        StoreLocation::InMemory => "memory",
    };
    info!("event=store_open module=db status=start mode={mode}");

    let open_result = match &config.location {
        StoreLocation::File(path) => Connection::open(path),
        StoreLocation::InMemory => Connection::open_in_memory(),
    };
    let mut conn = match open_result {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=store_open module=db status=error mode={mode} duration_ms={} error_code=store_open_failed error={err}",
                started_at.elapsed().as_millis()
            );
            return Err(err.into());
        }
    };

    match bootstrap_connection(&mut conn, config.seed_on_init) {
        Ok(()) => {
            info!(
                "event=store_open module=db status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=store_open module=db status=error mode={mode} duration_ms={} error_code=store_bootstrap_failed error={err}",
                started_at.elapsed().as_millis()
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection, seed_on_init: bool) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;

    // Version 0 before migrating means this store did not exist yet; that is
    // the only state in which seeding is allowed.
    let freshly_created = current_user_version(conn)? == 0;
    apply_migrations(conn)?;

    if freshly_created && seed_on_init {
        seed_students(conn)?;
    }

    Ok(())
}

fn seed_students(conn: &mut Connection) -> DbResult<()> {
    let tx = conn.transaction()?;
    for (roll, name, department, year, email) in SEED_STUDENTS {
        tx.execute(
            "INSERT INTO students (roll, name, department, year, email)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![roll, name, department, year, email],
        )?;
    }
    tx.commit()?;

    info!(
        "event=store_seed module=db status=ok rows={}",
        SEED_STUDENTS.len()
    );
    Ok(())
}
