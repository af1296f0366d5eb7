//! Task store access.
//!
//! deckpulse reads a Deck-style SQLite store: boards hold stacks, stacks hold
//! cards, and a project registry maps each project to one board. Every reader
//! here takes its own [`db::Db`] so reads can run side by side.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use deckpulse::db::{db::Db, projects::Projects, tasks::Tasks};
//! use std::path::Path;
//! use std::time::Duration;
//!
//! # fn main() -> anyhow::Result<()> {
//! let path = Path::new("deck.db");
//! let projects = Projects::new(Db::open(path, Duration::from_secs(5))?).list()?;
//! let boards: Vec<i64> = projects.iter().map(|p| p.board_id).collect();
//! let batch = Tasks::new(Db::open(path, Duration::from_secs(5))?).fetch(&boards)?;
//! # Ok(())
//! # }
//! ```

/// Connection handling: read-only opens for production stores, writable
/// opens with migrations for locally created ones.
pub mod db;

/// Versioned schema for locally created stores.
pub mod migrations;

/// Card assignee lookups.
pub mod assignees;

/// Board labels attached to cards.
pub mod labels;

/// Pending system update notices.
pub mod notifications;

/// Project registry.
pub mod projects;

/// [`TaskSource`](crate::libs::source::TaskSource) over a SQLite file.
pub mod store;

/// Card reads and row validation.
pub mod tasks;
