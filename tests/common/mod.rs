//! Shared fixtures: in-memory tasks for the engine tests and a throwaway
//! SQLite store for the adapter tests.
#![allow(dead_code)]

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use deckpulse::db::db::Db;
use deckpulse::libs::classifier::{CompletionRule, CompletionSource};
use deckpulse::libs::source::Snapshot;
use deckpulse::libs::task::{Due, Project, Task, TaskBatch};
use rusqlite::params;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use tempfile::TempDir;

pub const DONE: &str = "Approved/Done";
pub const TODO: &str = "To do";

/// Wednesday 2026-10-14 12:00 UTC.
pub fn now() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2026-10-14T12:00:00+00:00").unwrap()
}

pub fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

pub fn rule() -> CompletionRule {
    CompletionRule::new(CompletionSource::Stage, DONE)
}

pub fn task(id: i64, board_id: i64, stage: &str) -> Task {
    Task::new(id, &format!("Task {}", id), board_id, stage)
}

/// Builds a snapshot with every task assigned and no pending updates.
pub fn snapshot(projects: Vec<Project>, tasks: Vec<Task>, labels: HashMap<i64, Vec<String>>) -> Snapshot {
    let assigned: HashSet<i64> = tasks.iter().map(|t| t.id).collect();
    Snapshot::build(
        projects,
        TaskBatch { tasks, rejected: Vec::new() },
        labels,
        Some(assigned),
        Some(0),
        &rule(),
        now(),
    )
}

/// The four-task project used across the engine tests:
/// done late, done without due date, open overdue, open not yet due.
pub fn apollo_tasks() -> Vec<Task> {
    let mut late = task(1, 1, DONE);
    late.due = Some(Due::At(utc(2026, 10, 1)));
    late.completed_at = Some(utc(2026, 10, 5));
    late.last_activity_at = Some(utc(2026, 10, 5));

    let mut undated = task(2, 1, DONE);
    undated.completed_at = Some(utc(2026, 10, 13));
    undated.last_activity_at = Some(utc(2026, 10, 13));

    let mut overdue = task(3, 1, TODO);
    overdue.due = Some(Due::At(utc(2026, 10, 10)));
    overdue.last_activity_at = Some(utc(2026, 10, 12));

    let mut upcoming = task(4, 1, TODO);
    upcoming.due = Some(Due::At(utc(2026, 10, 20)));
    upcoming.last_activity_at = Some(utc(2026, 10, 12));

    vec![late, undated, overdue, upcoming]
}

/// A Deck schema in a temporary directory.
pub struct StoreFixture {
    pub dir: TempDir,
    pub path: PathBuf,
    pub db: Db,
}

impl StoreFixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.db");
        let db = Db::create(&path).unwrap();
        StoreFixture { dir, path, db }
    }

    pub fn board(&self, id: i64, title: &str, deleted_at: i64) -> &Self {
        self.db
            .conn
            .execute("INSERT INTO boards (id, title, deleted_at) VALUES (?1, ?2, ?3)", params![id, title, deleted_at])
            .unwrap();
        self
    }

    pub fn stack(&self, id: i64, board_id: i64, title: &str) -> &Self {
        self.db
            .conn
            .execute("INSERT INTO stacks (id, board_id, title) VALUES (?1, ?2, ?3)", params![id, board_id, title])
            .unwrap();
        self
    }

    pub fn project(&self, id: i64, name: &str, board_id: &str) -> &Self {
        self.db
            .conn
            .execute("INSERT INTO projects (id, name, status, board_id) VALUES (?1, ?2, 'active', ?3)", params![id, name, board_id])
            .unwrap();
        self
    }

    #[allow(clippy::too_many_arguments)]
    pub fn card(&self, id: i64, stack_id: i64, duedate: Option<&str>, done: Option<&str>, last_modified: i64, archived: bool, deleted_at: i64) -> &Self {
        self.db
            .conn
            .execute(
                "INSERT INTO cards (id, title, stack_id, duedate, done, last_modified, archived, deleted_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![id, format!("Card {}", id), stack_id, duedate, done, last_modified, archived, deleted_at],
            )
            .unwrap();
        self
    }

    pub fn label(&self, id: i64, board_id: i64, title: &str) -> &Self {
        self.db
            .conn
            .execute("INSERT INTO labels (id, board_id, title) VALUES (?1, ?2, ?3)", params![id, board_id, title])
            .unwrap();
        self
    }

    pub fn tag(&self, label_id: i64, card_id: i64) -> &Self {
        self.db
            .conn
            .execute("INSERT INTO assigned_labels (label_id, card_id) VALUES (?1, ?2)", params![label_id, card_id])
            .unwrap();
        self
    }

    pub fn assign(&self, card_id: i64, participant: &str) -> &Self {
        self.db
            .conn
            .execute("INSERT INTO assigned_users (card_id, participant) VALUES (?1, ?2)", params![card_id, participant])
            .unwrap();
        self
    }

    pub fn notify(&self, app: &str, subject: &str) -> &Self {
        self.db
            .conn
            .execute("INSERT INTO notifications (app, subject, timestamp) VALUES (?1, ?2, 0)", params![app, subject])
            .unwrap();
        self
    }

    /// Two live projects and one on a deleted board:
    /// Apollo (board 1) mirrors [`apollo_tasks`], Gemini (board 2) has one
    /// archived card and one open unassigned card, Mercury (board 3) is gone.
    pub fn seeded() -> Self {
        let fixture = StoreFixture::new();
        let ts = |d: u32| utc(2026, 10, d).timestamp();
        fixture
            .board(1, "Apollo board", 0)
            .board(2, "Gemini board", 0)
            .board(3, "Mercury board", 1_700_000_000)
            .stack(10, 1, TODO)
            .stack(11, 1, DONE)
            .stack(20, 2, TODO)
            .stack(30, 3, TODO)
            .project(1, "Apollo", "1")
            .project(2, "Gemini", "2")
            .project(3, "Mercury", "3")
            .card(1, 11, Some("2026-10-01 12:00:00"), Some("2026-10-05 12:00:00"), ts(5), false, 0)
            .card(2, 11, None, Some("2026-10-13 12:00:00"), ts(13), false, 0)
            .card(3, 10, Some("2026-10-10 12:00:00"), None, ts(12), false, 0)
            .card(4, 10, Some("2026-10-20 12:00:00"), None, ts(12), false, 0)
            .card(5, 11, None, None, ts(12), false, ts(12))
            .card(6, 20, None, None, ts(13), true, 0)
            .card(7, 20, Some("2026-10-30"), None, ts(13), false, 0)
            .card(8, 30, Some("2026-10-01"), None, ts(1), false, 0)
            .label(1, 1, "Design")
            .label(2, 1, "Backend")
            .tag(1, 1)
            .tag(1, 3)
            .tag(2, 3)
            .assign(1, "alice")
            .assign(2, "alice")
            .assign(3, "bob")
            .assign(4, "bob")
            .notify("updatenotification", "update_available")
            .notify("updatenotification", "update_available")
            .notify("files", "shared");
        fixture
    }
}
