//! Typed records read from the task store and the values derived from them.
//!
//! Rows are validated into these types at the adapter boundary (`db::*`), so
//! the engines never see loosely-typed input. Derived values ([`TaskStatus`],
//! [`DueBucket`]) are recomputed on every pass and never written back.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A project mapped onto exactly one live board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub board_id: i64,
}

impl Project {
    pub fn new(id: i64, name: &str, board_id: i64) -> Self {
        Project {
            id,
            name: name.to_string(),
            board_id,
        }
    }
}

/// A single card on a board, as read from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub board_id: i64,
    /// Title of the stack (column) the card currently sits in.
    pub stage: String,
    pub due: Option<Due>,
    pub completed_at: Option<DateTime<Utc>>,
    pub last_activity_at: Option<DateTime<Utc>>,
    pub archived: bool,
    pub deleted: bool,
}

impl Task {
    pub fn new(id: i64, title: &str, board_id: i64, stage: &str) -> Self {
        Task {
            id,
            title: title.to_string(),
            board_id,
            stage: stage.to_string(),
            due: None,
            completed_at: None,
            last_activity_at: None,
            archived: false,
            deleted: false,
        }
    }
}

/// A due date as stored: a bare calendar day or an exact instant.
///
/// A bare day has no zone. It is compared as a day and never shifted
/// through UTC into the reference zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Due {
    Day(NaiveDate),
    At(DateTime<Utc>),
}

impl Due {
    /// Calendar day of the due date in `offset`.
    pub fn day_in(&self, offset: &FixedOffset) -> NaiveDate {
        match self {
            Due::Day(day) => *day,
            Due::At(at) => at.with_timezone(offset).date_naive(),
        }
    }

    /// Whether a completion at `done` came after this due date. A bare day
    /// is only missed by a completion on a later day in `offset`.
    pub fn is_missed_by(&self, done: &DateTime<Utc>, offset: &FixedOffset) -> bool {
        match self {
            Due::Day(day) => done.with_timezone(offset).date_naive() > *day,
            Due::At(at) => done > at,
        }
    }
}

/// Output of a task listing: valid rows plus the rows that failed validation.
#[derive(Debug, Clone, Default)]
pub struct TaskBatch {
    pub tasks: Vec<Task>,
    pub rejected: Vec<RejectedRow>,
}

/// A quarantined row that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRow {
    pub kind: &'static str,
    pub id: i64,
    pub reason: String,
}

/// Lifecycle status, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Deleted,
    Archived,
    Done,
    Open,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Deleted => "deleted",
            TaskStatus::Archived => "archived",
            TaskStatus::Done => "done",
            TaskStatus::Open => "open",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position of a due date relative to the current calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DueBucket {
    None,
    Overdue,
    Today,
    Tomorrow,
    #[serde(rename = "next_7_days")]
    NextSevenDays,
    Later,
}

impl DueBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            DueBucket::None => "none",
            DueBucket::Overdue => "overdue",
            DueBucket::Today => "today",
            DueBucket::Tomorrow => "tomorrow",
            DueBucket::NextSevenDays => "next_7_days",
            DueBucket::Later => "later",
        }
    }
}

impl fmt::Display for DueBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task together with everything derived for it during one pass.
#[derive(Debug, Clone)]
pub struct ClassifiedTask {
    pub task: Task,
    pub status: TaskStatus,
    pub due_bucket: DueBucket,
    /// The instant the task counts as completed, if it is done and one is known.
    pub completed_at: Option<DateTime<Utc>>,
    pub labels: Vec<String>,
    /// `None` when assignee information could not be read.
    pub assigned: Option<bool>,
}

impl ClassifiedTask {
    pub fn is_deleted(&self) -> bool {
        self.status == TaskStatus::Deleted
    }

    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }

    pub fn is_open(&self) -> bool {
        self.status == TaskStatus::Open
    }
}

/// A project with its classified tasks, in store order.
#[derive(Debug, Clone)]
pub struct ProjectTasks {
    pub project: Project,
    pub tasks: Vec<ClassifiedTask>,
}

impl ProjectTasks {
    /// Tasks that count towards aggregates.
    pub fn live_tasks(&self) -> impl Iterator<Item = &ClassifiedTask> {
        self.tasks.iter().filter(|t| !t.is_deleted())
    }
}
