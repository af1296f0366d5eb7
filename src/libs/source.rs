//! The task data source seam and the per-pass snapshot built from it.
//!
//! A pass reads the project registry first (it yields the board ids), then
//! issues the task, label, assignee and update-notification reads
//! concurrently on the blocking pool. Aggregation only starts once every read
//! has returned, over the fully materialized [`Snapshot`].

use super::classifier::{classify, CompletionRule};
use super::error::{DashboardError, DashboardResult};
use super::task::{Project, ProjectTasks, RejectedRow, TaskBatch};
use chrono::{DateTime, FixedOffset};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

/// Read access to the external task store.
///
/// Implementations own their timeouts and must fail rather than hang.
pub trait TaskSource: Send + Sync + 'static {
    /// Projects whose board exists and is not deleted, ordered by project id.
    fn list_projects(&self) -> DashboardResult<Vec<Project>>;

    /// Every card on the given boards, deleted and archived ones included.
    fn list_tasks(&self, board_ids: &[i64]) -> DashboardResult<TaskBatch>;

    /// Label titles per task id.
    fn list_labels_for_tasks(&self, board_ids: &[i64]) -> DashboardResult<HashMap<i64, Vec<String>>>;

    /// Ids of tasks that have at least one assignee.
    fn list_assigned_tasks(&self, board_ids: &[i64]) -> DashboardResult<HashSet<i64>>;

    /// Number of pending system update notices.
    fn count_pending_system_updates(&self) -> DashboardResult<u64>;
}

/// Everything one pass needs, classified and grouped by project.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub now: DateTime<FixedOffset>,
    pub projects: Vec<ProjectTasks>,
    /// `None` when the notification read failed.
    pub pending_updates: Option<u64>,
    /// `false` when the assignee read failed.
    pub assignees_known: bool,
    pub rejected: Vec<RejectedRow>,
}

impl Snapshot {
    /// Classifies raw listings into a snapshot.
    ///
    /// Tasks on boards that belong to no listed project are dropped.
    pub fn build(
        projects: Vec<Project>,
        batch: TaskBatch,
        mut labels: HashMap<i64, Vec<String>>,
        assigned: Option<HashSet<i64>>,
        pending_updates: Option<u64>,
        rule: &CompletionRule,
        now: DateTime<FixedOffset>,
    ) -> Snapshot {
        let index: HashMap<i64, usize> = projects.iter().enumerate().map(|(i, p)| (p.board_id, i)).collect();
        let mut grouped: Vec<ProjectTasks> = projects.into_iter().map(|project| ProjectTasks { project, tasks: Vec::new() }).collect();

        for task in batch.tasks {
            let Some(&slot) = index.get(&task.board_id) else {
                continue;
            };
            let task_labels = labels.remove(&task.id).unwrap_or_default();
            let is_assigned = assigned.as_ref().map(|ids| ids.contains(&task.id));
            grouped[slot].tasks.push(classify(task, task_labels, is_assigned, rule, &now));
        }

        for row in &batch.rejected {
            let err = DashboardError::MalformedRecord {
                kind: row.kind,
                id: row.id,
                reason: row.reason.clone(),
            };
            tracing::warn!(kind = row.kind, id = row.id, "{}", err);
        }

        Snapshot {
            now,
            projects: grouped,
            pending_updates,
            assignees_known: assigned.is_some(),
            rejected: batch.rejected,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn task_count(&self) -> usize {
        self.projects.iter().map(|p| p.tasks.len()).sum()
    }
}

/// Runs one blocking store read on tokio's blocking pool.
async fn read<S, T, F>(source: &Arc<S>, f: F) -> DashboardResult<T>
where
    S: TaskSource,
    T: Send + 'static,
    F: FnOnce(&S) -> DashboardResult<T> + Send + 'static,
{
    let source = Arc::clone(source);
    tokio::task::spawn_blocking(move || f(&source)).await?
}

/// Fetches and classifies the current state of the store.
///
/// Fails only when the project registry or the task listing cannot be read.
/// Label, assignee and notification failures degrade the snapshot instead.
pub async fn fetch_snapshot<S: TaskSource>(source: Arc<S>, rule: &CompletionRule, now: DateTime<FixedOffset>) -> DashboardResult<Snapshot> {
    let started = Instant::now();

    let projects = read(&source, |s| s.list_projects()).await?;
    let board_ids: Arc<[i64]> = projects.iter().map(|p| p.board_id).collect();

    let (tasks, labels, assigned, updates) = {
        let (ids_tasks, ids_labels, ids_assigned) = (board_ids.clone(), board_ids.clone(), board_ids.clone());
        tokio::join!(
            read(&source, move |s| s.list_tasks(&ids_tasks)),
            read(&source, move |s| s.list_labels_for_tasks(&ids_labels)),
            read(&source, move |s| s.list_assigned_tasks(&ids_assigned)),
            read(&source, |s| s.count_pending_system_updates()),
        )
    };

    let batch = tasks?;
    let labels = labels.unwrap_or_else(|err| {
        tracing::warn!(error = %err, "label read failed, categories left empty");
        HashMap::new()
    });
    let assigned = degrade("assignees", assigned);
    let pending_updates = degrade("update notifications", updates);

    let snapshot = Snapshot::build(projects, batch, labels, assigned, pending_updates, rule, now);
    tracing::debug!(
        projects = snapshot.projects.len(),
        tasks = snapshot.task_count(),
        rejected = snapshot.rejected.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "snapshot fetched"
    );
    Ok(snapshot)
}

fn degrade<T>(what: &'static str, result: DashboardResult<T>) -> Option<T> {
    result
        .map_err(|err: DashboardError| tracing::warn!(read = what, error = %err, "optional store read failed"))
        .ok()
}
