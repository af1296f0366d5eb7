//! Status and due-date classification shared by the analytics and alert engines.
//!
//! Both engines run every task through [`classify`] so the two can never drift
//! apart on what "done" or "overdue" means.
//!
//! ## Status precedence
//!
//! ```text
//! deleted  ->  archived  ->  done  ->  open
//! ```
//!
//! The first matching rule wins. A deleted card sitting in the terminal stack is
//! `deleted`, never `done`; an archived card is never `open`.
//!
//! ## Calendar days
//!
//! Due buckets compare calendar days, not instants. The day of any instant is
//! taken in the offset carried by `now`, which is the single reference zone of
//! the pass.

use super::app::APP_METADATA_DEFAULT_STAGE;
use super::task::{ClassifiedTask, DueBucket, Task, TaskStatus};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Stack title that marks a card as finished on Deck boards.
///
/// Fixed at build time; `Approved/Done` unless `DECKPULSE_DEFAULT_STAGE` says
/// otherwise.
pub const DEFAULT_DONE_STAGE: &str = APP_METADATA_DEFAULT_STAGE;

/// Where a deployment reads completion from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CompletionSource {
    /// Done means "sits in the terminal stack"; the completion instant falls
    /// back to the card's last modification.
    #[default]
    Stage,
    /// Done means "has a completion timestamp", whatever the stack.
    Timestamp,
}

/// The single source of truth for completion used during a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRule {
    pub source: CompletionSource,
    pub terminal_stage: String,
}

impl Default for CompletionRule {
    fn default() -> Self {
        CompletionRule {
            source: CompletionSource::Stage,
            terminal_stage: DEFAULT_DONE_STAGE.to_string(),
        }
    }
}

impl CompletionRule {
    pub fn new(source: CompletionSource, terminal_stage: &str) -> Self {
        CompletionRule {
            source,
            terminal_stage: terminal_stage.to_string(),
        }
    }
}

/// Derives the lifecycle status of a task.
pub fn derive_status(task: &Task, rule: &CompletionRule) -> TaskStatus {
    if task.deleted {
        return TaskStatus::Deleted;
    }
    if task.archived {
        return TaskStatus::Archived;
    }
    let done = match rule.source {
        CompletionSource::Stage => task.stage == rule.terminal_stage,
        CompletionSource::Timestamp => task.completed_at.is_some(),
    };
    if done {
        TaskStatus::Done
    } else {
        TaskStatus::Open
    }
}

/// Calendar day of `instant` in the reference zone of `now`.
pub fn local_day(instant: &DateTime<Utc>, now: &DateTime<FixedOffset>) -> NaiveDate {
    instant.with_timezone(&now.timezone()).date_naive()
}

/// Buckets a task's due date against the current day.
pub fn due_bucket(task: &Task, now: &DateTime<FixedOffset>) -> DueBucket {
    let Some(due) = task.due.as_ref() else {
        return DueBucket::None;
    };

    let today = now.date_naive();
    let days_ahead = (due.day_in(now.offset()) - today).num_days();

    match days_ahead {
        d if d < 0 => DueBucket::Overdue,
        0 => DueBucket::Today,
        1 => DueBucket::Tomorrow,
        2..=7 => DueBucket::NextSevenDays,
        _ => DueBucket::Later,
    }
}

/// The instant a done task counts as completed.
///
/// Returns `None` for tasks that are not done, and for done tasks with no
/// usable timestamp.
pub fn completion_instant(task: &Task, status: TaskStatus, rule: &CompletionRule) -> Option<DateTime<Utc>> {
    if status != TaskStatus::Done {
        return None;
    }
    match rule.source {
        CompletionSource::Stage => task.completed_at.or(task.last_activity_at),
        CompletionSource::Timestamp => task.completed_at,
    }
}

/// Runs every derivation for a task and bundles the result.
pub fn classify(
    task: Task,
    labels: Vec<String>,
    assigned: Option<bool>,
    rule: &CompletionRule,
    now: &DateTime<FixedOffset>,
) -> ClassifiedTask {
    let status = derive_status(&task, rule);
    let due_bucket = due_bucket(&task, now);
    let completed_at = completion_instant(&task, status, rule);

    ClassifiedTask {
        task,
        status,
        due_bucket,
        completed_at,
        labels,
        assigned,
    }
}
