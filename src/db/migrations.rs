//! Versioned schema for locally created task stores.
//!
//! deckpulse only reads production stores, whose schema belongs to the board
//! application. Stores created through [`Db::create`](super::db::Db::create)
//! (`deckpulse init --create-store`, test fixtures) get the subset of the Deck
//! schema the adapter reads, built up by the migrations below.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use deckpulse::db::migrations::{init_with_migrations, get_db_version};
//! use rusqlite::Connection;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut conn = Connection::open("deck.db")?;
//! init_with_migrations(&mut conn)?;
//! let version = get_db_version(&conn)?;
//! # Ok(())
//! # }
//! ```

use crate::libs::messages::Message;
use crate::{msg_debug, msg_error, msg_info, msg_success};
use anyhow::Result;
use rusqlite::{params, Connection, Transaction};

const MIGRATIONS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS migrations (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

#[derive(Debug, Clone)]
struct Migration {
    version: u32,
    name: &'static str,
    up: fn(&Transaction) -> Result<()>,
}

/// Registry of schema migrations, applied in version order.
pub struct MigrationManager {
    migrations: Vec<Migration>,
}

impl Default for MigrationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MigrationManager {
    pub fn new() -> Self {
        let mut manager = Self { migrations: Vec::new() };
        manager.register_migrations();
        manager
    }

    fn register_migrations(&mut self) {
        // Version 1: boards, their stacks and the cards on them
        self.add_migration(1, "create_board_tables", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS boards (
                    id INTEGER PRIMARY KEY,
                    title TEXT NOT NULL,
                    deleted_at INTEGER NOT NULL DEFAULT 0
                )",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS stacks (
                    id INTEGER PRIMARY KEY,
                    board_id INTEGER NOT NULL,
                    title TEXT NOT NULL,
                    \"order\" INTEGER NOT NULL DEFAULT 0,
                    FOREIGN KEY (board_id) REFERENCES boards(id)
                )",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS cards (
                    id INTEGER PRIMARY KEY,
                    title TEXT NOT NULL,
                    stack_id INTEGER NOT NULL,
                    duedate TEXT,
                    done TEXT,
                    last_modified INTEGER,
                    archived BOOLEAN NOT NULL DEFAULT FALSE,
                    deleted_at INTEGER NOT NULL DEFAULT 0,
                    FOREIGN KEY (stack_id) REFERENCES stacks(id)
                )",
                [],
            )?;
            Ok(())
        });

        // Version 2: project registry, one board per project.
        // board_id is text in the registry and cast on join.
        self.add_migration(2, "create_projects", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS projects (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL,
                    status TEXT,
                    board_id TEXT
                )",
                [],
            )?;
            Ok(())
        });

        // Version 3: board labels and their assignment to cards
        self.add_migration(3, "create_labels", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS labels (
                    id INTEGER PRIMARY KEY,
                    board_id INTEGER NOT NULL,
                    title TEXT NOT NULL
                )",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS assigned_labels (
                    id INTEGER PRIMARY KEY,
                    label_id INTEGER NOT NULL,
                    card_id INTEGER NOT NULL,
                    FOREIGN KEY (label_id) REFERENCES labels(id) ON DELETE CASCADE,
                    FOREIGN KEY (card_id) REFERENCES cards(id) ON DELETE CASCADE
                )",
                [],
            )?;
            Ok(())
        });

        // Version 4: card assignees
        self.add_migration(4, "create_assigned_users", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS assigned_users (
                    id INTEGER PRIMARY KEY,
                    card_id INTEGER NOT NULL,
                    participant TEXT NOT NULL,
                    FOREIGN KEY (card_id) REFERENCES cards(id) ON DELETE CASCADE
                )",
                [],
            )?;
            Ok(())
        });

        // Version 5: server notifications (app update notices live here)
        self.add_migration(5, "create_notifications", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS notifications (
                    id INTEGER PRIMARY KEY,
                    app TEXT NOT NULL,
                    subject TEXT NOT NULL,
                    timestamp INTEGER NOT NULL DEFAULT 0
                )",
                [],
            )?;
            Ok(())
        });

        // Version 6: lookup indices for the per-board reads
        self.add_migration(6, "add_lookup_indices", |tx| {
            tx.execute("CREATE INDEX IF NOT EXISTS idx_stacks_board_id ON stacks(board_id)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_cards_stack_id ON cards(stack_id)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_assigned_labels_card_id ON assigned_labels(card_id)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_assigned_users_card_id ON assigned_users(card_id)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_notifications_app ON notifications(app, subject)", [])?;
            Ok(())
        });
    }

    fn add_migration(&mut self, version: u32, name: &'static str, up: fn(&Transaction) -> Result<()>) {
        self.migrations.push(Migration { version, name, up });
    }

    /// Applies every pending migration inside one transaction.
    pub fn run_migrations(&self, conn: &mut Connection) -> Result<()> {
        conn.execute(MIGRATIONS_TABLE, [])?;

        let current_version = self.get_current_version(conn)?;
        let pending: Vec<&Migration> = self.migrations.iter().filter(|m| m.version > current_version).collect();

        if pending.is_empty() {
            msg_debug!("Store schema is up to date");
            return Ok(());
        }

        msg_info!(Message::MigrationsFound(pending.len()));

        let tx = conn.transaction()?;

        for migration in pending {
            msg_debug!(Message::RunningMigration(migration.version, migration.name.to_string()));

            match (migration.up)(&tx) {
                Ok(()) => {
                    tx.execute(
                        "INSERT INTO migrations (version, name) VALUES (?1, ?2)",
                        params![migration.version, migration.name],
                    )?;
                    msg_debug!(Message::MigrationCompleted(migration.version));
                }
                Err(e) => {
                    msg_error!(Message::MigrationFailed(migration.version, e.to_string()));
                    return Err(e);
                }
            }
        }

        tx.commit()?;
        msg_success!(Message::AllMigrationsCompleted);

        Ok(())
    }

    fn get_current_version(&self, conn: &Connection) -> Result<u32> {
        let version: Option<u32> = conn.query_row("SELECT MAX(version) FROM migrations", [], |row| row.get(0)).unwrap_or(Some(0));

        Ok(version.unwrap_or(0))
    }

    fn latest_version(&self) -> u32 {
        self.migrations.last().map(|m| m.version).unwrap_or(0)
    }

    pub fn is_migration_applied(&self, conn: &Connection, version: u32) -> Result<bool> {
        let count: i32 = conn.query_row("SELECT COUNT(*) FROM migrations WHERE version = ?1", params![version], |row| row.get(0))?;

        Ok(count > 0)
    }

    /// Applied migrations as (version, name, applied_at), oldest first.
    pub fn get_migration_history(&self, conn: &Connection) -> Result<Vec<(u32, String, String)>> {
        conn.execute(MIGRATIONS_TABLE, [])?;
        let mut stmt = conn.prepare("SELECT version, name, applied_at FROM migrations ORDER BY version")?;

        let history = stmt
            .query_map([], |row| Ok((row.get::<_, u32>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(history)
    }

    /// Forgets migrations above `target_version` (debug builds only).
    ///
    /// Schema objects are left in place; only the tracking rows go.
    #[cfg(debug_assertions)]
    pub fn rollback_to(&self, conn: &mut Connection, target_version: u32) -> Result<()> {
        let current_version = self.get_current_version(conn)?;

        if target_version >= current_version {
            msg_info!(Message::NothingToRollback);
            return Ok(());
        }

        msg_info!(Message::RollingBack(current_version, target_version));
        conn.execute("DELETE FROM migrations WHERE version > ?1", params![target_version])?;
        msg_success!(Message::RollbackCompleted(target_version));
        Ok(())
    }
}

pub fn init_with_migrations(conn: &mut Connection) -> Result<()> {
    MigrationManager::new().run_migrations(conn)
}

pub fn get_db_version(conn: &Connection) -> Result<u32> {
    MigrationManager::new().get_current_version(conn)
}

pub fn needs_migration(conn: &Connection) -> Result<bool> {
    let manager = MigrationManager::new();
    Ok(manager.get_current_version(conn)? < manager.latest_version())
}
