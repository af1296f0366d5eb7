//! Rule-based alert feed over a classified snapshot.
//!
//! Every rule is evaluated on every pass, in a fixed order. The order is part
//! of the output: action items first, then attention items, then the positive
//! signals.
//!
//! Rules that depend on an optional store read (assignees, update notices) are
//! skipped when that read failed. The skip is logged and recorded in
//! [`AlertFeed::skipped`], and the remaining rules still fire.

use super::error::DashboardError;
use super::source::Snapshot;
use super::task::{ClassifiedTask, Due, DueBucket, ProjectTasks};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::fmt;

/// Inactivity threshold used when none is configured.
pub const DEFAULT_STALLED_AFTER_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Severity {
    #[serde(rename = "action")]
    ActionRequired,
    #[serde(rename = "attention")]
    Attention,
    #[serde(rename = "ontrack")]
    OnTrack,
}

impl Severity {
    /// Badge text shown next to an alert.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::ActionRequired => "Action required",
            Severity::Attention => "Attention needed",
            Severity::OnTrack => "On track",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertRule {
    Overdue,
    Unassigned,
    MissingDueDate,
    StalledProject,
    ZeroProgress,
    PendingUpdates,
    NoOverdue,
    AllAssigned,
}

impl AlertRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertRule::Overdue => "overdue",
            AlertRule::Unassigned => "unassigned",
            AlertRule::MissingDueDate => "missing-due-date",
            AlertRule::StalledProject => "stalled-project",
            AlertRule::ZeroProgress => "zero-progress",
            AlertRule::PendingUpdates => "pending-updates",
            AlertRule::NoOverdue => "no-overdue",
            AlertRule::AllAssigned => "all-assigned",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            AlertRule::Overdue => Severity::ActionRequired,
            AlertRule::NoOverdue | AlertRule::AllAssigned => Severity::OnTrack,
            _ => Severity::Attention,
        }
    }
}

impl fmt::Display for AlertRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of a stalled-project alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StalledProject {
    pub project: String,
    pub last_activity: DateTime<Utc>,
    pub days_inactive: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    #[serde(rename = "badgeType")]
    pub severity: Severity,
    #[serde(rename = "badgeLabel")]
    pub label: &'static str,
    pub description: String,
    pub rule: AlertRule,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stalled: Option<StalledProject>,
}

impl Alert {
    fn new(rule: AlertRule, description: String) -> Self {
        let severity = rule.severity();
        Alert {
            severity,
            label: severity.label(),
            description,
            rule,
            stalled: None,
        }
    }
}

/// Counters behind the feed. `None` marks a counter whose input was unreadable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertSummary {
    pub overdue: usize,
    pub unassigned: Option<usize>,
    pub missing_due_date: usize,
    pub stalled_projects: usize,
    pub zero_progress_projects: usize,
    pub pending_updates: Option<u64>,
    pub active_tasks: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertFeed {
    pub alerts: Vec<Alert>,
    pub summary: AlertSummary,
    pub skipped: Vec<AlertRule>,
}

impl AlertFeed {
    pub fn fired(&self, rule: AlertRule) -> impl Iterator<Item = &Alert> {
        self.alerts.iter().filter(move |a| a.rule == rule)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertOptions {
    pub stalled_after_days: i64,
}

impl Default for AlertOptions {
    fn default() -> Self {
        AlertOptions {
            stalled_after_days: DEFAULT_STALLED_AFTER_DAYS,
        }
    }
}

// === Task predicates shared by the feed and the detail view ===

fn is_overdue(task: &ClassifiedTask) -> bool {
    task.is_open() && task.due_bucket == DueBucket::Overdue
}

fn is_unassigned(task: &ClassifiedTask) -> bool {
    task.is_open() && task.assigned == Some(false)
}

fn is_missing_due_date(task: &ClassifiedTask) -> bool {
    !task.is_deleted() && !task.is_done() && task.task.due.is_none()
}

fn count_where(snapshot: &Snapshot, predicate: fn(&ClassifiedTask) -> bool) -> usize {
    snapshot.projects.iter().flat_map(|p| p.tasks.iter()).filter(|t| predicate(t)).count()
}

/// Latest activity of a project if it is older than the threshold.
pub fn stalled_project(project: &ProjectTasks, now: DateTime<Utc>, options: &AlertOptions) -> Option<StalledProject> {
    let last_activity = project.live_tasks().filter_map(|t| t.task.last_activity_at).max()?;
    // A threshold past chrono's range can never be exceeded.
    let threshold = Duration::try_days(options.stalled_after_days)?;
    let inactive = now.signed_duration_since(last_activity);
    if inactive <= threshold {
        return None;
    }
    Some(StalledProject {
        project: project.project.name.clone(),
        last_activity,
        days_inactive: inactive.num_days(),
    })
}

fn is_zero_progress(project: &ProjectTasks) -> bool {
    project.live_tasks().next().is_some() && !project.live_tasks().any(|t| t.is_done())
}

fn plural(n: usize, one: &str, many: &str) -> String {
    format!("{} {}", n, if n == 1 { one } else { many })
}

fn skip(skipped: &mut Vec<AlertRule>, rule: AlertRule, reason: &str) {
    let err = DashboardError::PartialRuleFailure {
        rule: rule.as_str(),
        reason: reason.to_string(),
    };
    tracing::warn!(rule = rule.as_str(), "{}", err);
    skipped.push(rule);
}

/// Evaluates every rule against the snapshot.
pub fn evaluate(snapshot: &Snapshot, options: &AlertOptions) -> AlertFeed {
    let mut alerts = Vec::new();
    let mut skipped = Vec::new();
    let now = snapshot.now.with_timezone(&Utc);

    let overdue = count_where(snapshot, is_overdue);
    let unassigned = snapshot.assignees_known.then(|| count_where(snapshot, is_unassigned));
    let missing_due_date = count_where(snapshot, is_missing_due_date);
    let active_tasks = count_where(snapshot, ClassifiedTask::is_open);
    let stalled: Vec<StalledProject> = snapshot.projects.iter().filter_map(|p| stalled_project(p, now, options)).collect();
    let zero_progress: Vec<&str> = snapshot
        .projects
        .iter()
        .filter(|p| is_zero_progress(p))
        .map(|p| p.project.name.as_str())
        .collect();

    if overdue > 0 {
        alerts.push(Alert::new(
            AlertRule::Overdue,
            format!("{} overdue across projects", plural(overdue, "task", "tasks")),
        ));
    }

    match unassigned {
        Some(n) if n > 0 => alerts.push(Alert::new(
            AlertRule::Unassigned,
            format!("{} no assignee", plural(n, "task has", "tasks have")),
        )),
        Some(_) => {}
        None => skip(&mut skipped, AlertRule::Unassigned, "assignee read failed"),
    }

    if missing_due_date > 0 {
        alerts.push(Alert::new(
            AlertRule::MissingDueDate,
            format!("{} no due date set", plural(missing_due_date, "task has", "tasks have")),
        ));
    }

    for entry in &stalled {
        let mut alert = Alert::new(
            AlertRule::StalledProject,
            format!(
                "Project \"{}\" has had no activity in {}+ days",
                entry.project, options.stalled_after_days
            ),
        );
        alert.stalled = Some(entry.clone());
        alerts.push(alert);
    }

    if !zero_progress.is_empty() {
        alerts.push(Alert::new(
            AlertRule::ZeroProgress,
            format!(
                "{} zero completed tasks ({})",
                plural(zero_progress.len(), "project has", "projects have"),
                zero_progress.join(", ")
            ),
        ));
    }

    match snapshot.pending_updates {
        Some(n) if n > 0 => alerts.push(Alert::new(
            AlertRule::PendingUpdates,
            format!("{} available", plural(n as usize, "app update", "app updates")),
        )),
        Some(_) => {}
        None => skip(&mut skipped, AlertRule::PendingUpdates, "update notification read failed"),
    }

    if overdue == 0 {
        alerts.push(Alert::new(AlertRule::NoOverdue, "No overdue tasks across all projects".to_string()));
    }

    match unassigned {
        Some(0) if active_tasks > 0 => alerts.push(Alert::new(
            AlertRule::AllAssigned,
            "All active tasks have an assignee".to_string(),
        )),
        Some(_) => {}
        None => skip(&mut skipped, AlertRule::AllAssigned, "assignee read failed"),
    }

    tracing::debug!(alerts = alerts.len(), skipped = skipped.len(), "alert rules evaluated");

    AlertFeed {
        alerts,
        summary: AlertSummary {
            overdue,
            unassigned,
            missing_due_date,
            stalled_projects: stalled.len(),
            zero_progress_projects: zero_progress.len(),
            pending_updates: snapshot.pending_updates,
            active_tasks,
        },
        skipped,
    }
}

// === Detail variant ===

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertTaskRow {
    pub id: i64,
    pub title: String,
    #[serde(rename = "stack")]
    pub stage: String,
    pub due: Option<Due>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectTaskGroup {
    pub project: String,
    pub count: usize,
    pub tasks: Vec<AlertTaskRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub label: &'static str,
    pub value: u64,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertDetails {
    pub overdue: Vec<ProjectTaskGroup>,
    /// `None` when assignees could not be read.
    pub unassigned: Option<Vec<ProjectTaskGroup>>,
    pub missing_due_date: Vec<ProjectTaskGroup>,
    pub stalled_projects: Vec<StalledProject>,
    pub summary: Vec<SummaryRow>,
}

fn group_by_project(snapshot: &Snapshot, predicate: fn(&ClassifiedTask) -> bool) -> Vec<ProjectTaskGroup> {
    snapshot
        .projects
        .iter()
        .filter_map(|p| {
            let tasks: Vec<AlertTaskRow> = p
                .tasks
                .iter()
                .filter(|t| predicate(t))
                .map(|t| AlertTaskRow {
                    id: t.task.id,
                    title: t.task.title.clone(),
                    stage: t.task.stage.clone(),
                    due: t.task.due,
                })
                .collect();
            (!tasks.is_empty()).then(|| ProjectTaskGroup {
                project: p.project.name.clone(),
                count: tasks.len(),
                tasks,
            })
        })
        .collect()
}

fn summary_row(label: &'static str, value: u64, rule: AlertRule) -> SummaryRow {
    SummaryRow {
        label,
        value,
        severity: if value > 0 { rule.severity() } else { Severity::OnTrack },
    }
}

/// Task-level view of the overdue, unassigned and missing-due-date rules,
/// consistent with an already evaluated `feed`.
pub fn details(snapshot: &Snapshot, feed: &AlertFeed) -> AlertDetails {
    let mut summary = vec![summary_row("Overdue tasks", feed.summary.overdue as u64, AlertRule::Overdue)];
    if let Some(n) = feed.summary.unassigned {
        summary.push(summary_row("Unassigned tasks", n as u64, AlertRule::Unassigned));
    }
    summary.push(summary_row(
        "Tasks without due date",
        feed.summary.missing_due_date as u64,
        AlertRule::MissingDueDate,
    ));
    summary.push(summary_row(
        "Stalled projects",
        feed.summary.stalled_projects as u64,
        AlertRule::StalledProject,
    ));
    summary.push(summary_row(
        "Projects with zero progress",
        feed.summary.zero_progress_projects as u64,
        AlertRule::ZeroProgress,
    ));
    if let Some(n) = feed.summary.pending_updates {
        summary.push(summary_row("Pending app updates", n, AlertRule::PendingUpdates));
    }

    AlertDetails {
        overdue: group_by_project(snapshot, is_overdue),
        unassigned: snapshot.assignees_known.then(|| group_by_project(snapshot, is_unassigned)),
        missing_due_date: group_by_project(snapshot, is_missing_due_date),
        stalled_projects: feed.fired(AlertRule::StalledProject).filter_map(|a| a.stalled.clone()).collect(),
        summary,
    }
}
