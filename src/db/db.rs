use super::migrations::init_with_migrations;
use crate::libs::config::{Config, DatabaseConfig};
use crate::libs::error::StoreError;
use anyhow::Result;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

pub struct Db {
    pub conn: Connection,
}

impl Db {
    /// Opens the configured database and applies pending migrations.
    pub fn new() -> Result<Db> {
        let config = Config::load()?;
        Self::connect(&config.database)
    }

    pub fn connect(config: &DatabaseConfig) -> Result<Db> {
        let path = config.resolve_path()?;
        let mut conn = open_connection(&path, Duration::from_millis(config.busy_timeout_ms))?;
        init_with_migrations(&mut conn)?;

        Ok(Db { conn })
    }

    /// Opens `path` with default settings. Mostly useful for tests and tools.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Db> {
        Self::connect(&DatabaseConfig::at(path.as_ref()))
    }

    /// Configured database without running migrations.
    pub fn new_without_migrations() -> Result<Connection> {
        let config = Config::load()?;
        let path = config.database.resolve_path()?;
        open_connection(&path, Duration::from_millis(config.database.busy_timeout_ms))
    }
}

fn open_connection(path: &Path, busy_timeout: Duration) -> Result<Connection> {
    debug!(path = %path.display(), "opening database");
    let conn = Connection::open(path)?;
    conn.busy_timeout(busy_timeout)?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    Ok(conn)
}

/// Runs `f` inside one IMMEDIATE transaction.
///
/// Commits when `f` succeeds and rolls back explicitly when it fails. If the
/// commit itself fails the guard rolls back on drop. Either way the
/// connection is back in autocommit mode when this returns.
pub fn with_transaction<T, F>(conn: &mut Connection, f: F) -> Result<T, StoreError>
where
    F: FnOnce(&Transaction<'_>) -> Result<T, StoreError>,
{
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    match f(&tx) {
        Ok(value) => {
            tx.commit()?;
            Ok(value)
        }
        Err(err) => {
            warn!(error = %err, "rolling back transaction");
            if let Err(rollback_err) = tx.rollback() {
                warn!(error = %rollback_err, "rollback failed");
            }
            Err(err)
        }
    }
}

/// Id of the row last inserted on `conn`, checked against the `i32` id range.
pub fn last_insert_id(conn: &Connection) -> Result<i32, StoreError> {
    let rowid = conn.last_insert_rowid();
    i32::try_from(rowid).map_err(|_| StoreError::IdOutOfRange(rowid))
}
