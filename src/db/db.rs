use super::migrations::init_with_migrations;
use crate::libs::error::{DashboardError, DashboardResult};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::time::Duration;

pub struct Db {
    pub conn: Connection,
}

impl Db {
    /// Opens an existing store for reading.
    ///
    /// The store is never created implicitly: a missing file means the store
    /// is unreachable, not empty.
    pub fn open(path: &Path, busy_timeout: Duration) -> DashboardResult<Db> {
        if !path.exists() {
            return Err(DashboardError::SourceUnavailable(format!("store not found at {}", path.display())));
        }

        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX | OpenFlags::SQLITE_OPEN_URI;
        let conn = Connection::open_with_flags(path, flags)?;
        conn.busy_timeout(busy_timeout)?;

        Ok(Db { conn })
    }

    /// Opens a store for writing, creating the file and bringing the Deck
    /// schema up to date.
    pub fn create(path: &Path) -> anyhow::Result<Db> {
        let mut conn = Connection::open(path)?;
        init_with_migrations(&mut conn)?;

        Ok(Db { conn })
    }

    /// Opens a store for writing without touching its schema.
    pub fn open_without_migrations(path: &Path) -> anyhow::Result<Connection> {
        Ok(Connection::open(path)?)
    }
}
