//! Connection bootstrap for the key-value database.
//!
//! # Invariants
//! - Returned connections hold `kv_entries` at [`KV_SCHEMA_VERSION`].
//! - Every open emits one `db_open` start event and one terminal event.

use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::cmp::Ordering;
use std::path::Path;
use std::time::{Duration, Instant};

/// `user_version` written once `kv_entries` exists.
pub const KV_SCHEMA_VERSION: u32 = 1;

const KV_SCHEMA_SQL: &str = include_str!("kv_schema.sql");
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens a SQLite database file, creating `kv_entries` on first use.
///
/// Parent directories are not created; callers own path layout.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    open_with("file", || Connection::open(path))
}

/// Opens an in-memory database with `kv_entries` in place.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with("memory", Connection::open_in_memory)
}

fn open_with(
    mode: &'static str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let mut conn = match connect() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_open_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match bootstrap_connection(&mut conn) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={} duration_ms={}",
                mode,
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_bootstrap_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    ensure_kv_schema(conn)
}

fn ensure_kv_schema(conn: &mut Connection) -> DbResult<()> {
    let found: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    match found.cmp(&KV_SCHEMA_VERSION) {
        Ordering::Equal => Ok(()),
        Ordering::Greater => Err(DbError::SchemaTooNew {
            found,
            supported: KV_SCHEMA_VERSION,
        }),
        Ordering::Less => {
            // Table creation and version bump land together or not at all.
            let tx = conn.transaction()?;
            tx.execute_batch(KV_SCHEMA_SQL)?;
            tx.pragma_update(None, "user_version", KV_SCHEMA_VERSION)?;
            tx.commit()?;
            info!(
                "event=db_schema module=db status=ok from_version={} to_version={}",
                found, KV_SCHEMA_VERSION
            );
            Ok(())
        }
    }
}
