//! Project performance analytics: the four dashboard widgets and their
//! drill-down views.
//!
//! Every function here is a synchronous fold over a classified [`Snapshot`].
//! Deleted tasks never enter a numerator or a denominator.
//!
//! ## Widgets
//!
//! - **Project progress**: share of done tasks per project
//! - **Productivity by category**: share of done tasks per label
//! - **Delay composition**: on-time / delayed / blocked split per project
//! - **Completion velocity**: completions per week over the last six weeks
//!
//! ## Empty store
//!
//! With no projects at all each widget still returns a designed placeholder
//! (see [`build_widgets`]) so consumers never receive an empty chart.

use super::classifier::local_day;
use super::source::Snapshot;
use super::task::{ClassifiedTask, Due, DueBucket, TaskStatus};
use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDateTime, NaiveTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// Placeholder category when no task carries a label.
pub const ALL_TASKS: &str = "All Tasks";
/// Drill-down bucket for tasks without labels.
pub const UNLABELLED: &str = "Unlabelled";
/// Placeholder entry name when the store has no projects.
pub const NO_PROJECTS: &str = "No Projects";
/// Number of trailing weeks in the velocity widget.
pub const WEEK_COUNT: usize = 6;
/// Legend of the delay chart, positionally matched by renderers.
pub const DELAY_LABELS: [&str; 3] = ["On-time Tasks", "Delayed Tasks", "Blocked Tasks"];
/// Colors of the delay chart slots.
pub const DELAY_COLORS: [&str; 3] = ["#2ec4b6", "#f4a261", "#e63946"];

/// Rounded percentage of `part` over `total`; 0 for an empty total.
pub fn percent(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((part as f64 / total as f64) * 100.0).round() as u8
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Tally {
    total: usize,
    done: usize,
}

impl Tally {
    fn add(&mut self, task: &ClassifiedTask) {
        self.total += 1;
        if task.is_done() {
            self.done += 1;
        }
    }

    fn progress(&self) -> u8 {
        percent(self.done, self.total)
    }
}

/// Insertion-ordered grouping keyed by name.
struct Groups<T> {
    index: HashMap<String, usize>,
    groups: Vec<(String, Tally, Vec<T>)>,
}

impl<T> Groups<T> {
    fn new() -> Self {
        Groups {
            index: HashMap::new(),
            groups: Vec::new(),
        }
    }

    fn entry(&mut self, name: &str) -> &mut (String, Tally, Vec<T>) {
        let slot = match self.index.get(name) {
            Some(&slot) => slot,
            None => {
                self.groups.push((name.to_string(), Tally::default(), Vec::new()));
                self.index.insert(name.to_string(), self.groups.len() - 1);
                self.groups.len() - 1
            }
        };
        &mut self.groups[slot]
    }
}

// === Delay classification ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DelayCategory {
    OnTime,
    Delayed,
    Blocked,
}

impl DelayCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DelayCategory::OnTime => "on-time",
            DelayCategory::Delayed => "delayed",
            DelayCategory::Blocked => "blocked",
        }
    }
}

/// Delay category of a task, `None` for deleted ones.
pub fn delay_category(task: &ClassifiedTask, offset: &FixedOffset) -> Option<DelayCategory> {
    match task.status {
        TaskStatus::Deleted => None,
        TaskStatus::Archived => Some(DelayCategory::Blocked),
        TaskStatus::Done => match (task.task.due, task.completed_at) {
            (Some(due), Some(done)) if due.is_missed_by(&done, offset) => Some(DelayCategory::Delayed),
            _ => Some(DelayCategory::OnTime),
        },
        TaskStatus::Open if task.due_bucket == DueBucket::Overdue => Some(DelayCategory::Delayed),
        TaskStatus::Open => Some(DelayCategory::OnTime),
    }
}

/// Calendar days a task ran past its due date, for delayed tasks only.
pub fn days_overdue(task: &ClassifiedTask, now: &DateTime<FixedOffset>) -> Option<i64> {
    let due_day = task.task.due.as_ref()?.day_in(now.offset());
    match (task.status, delay_category(task, now.offset())?) {
        (TaskStatus::Open, DelayCategory::Delayed) => Some((now.date_naive() - due_day).num_days()),
        (TaskStatus::Done, DelayCategory::Delayed) => {
            let done_day = local_day(task.completed_at.as_ref()?, now);
            Some((done_day - due_day).num_days())
        }
        _ => None,
    }
}

// === Week windows ===

/// One Monday-to-Sunday bucket in the reference zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub label: String,
}

impl WeekWindow {
    pub fn contains(&self, instant: &DateTime<Utc>, now: &DateTime<FixedOffset>) -> bool {
        let local = instant.with_timezone(&now.timezone()).naive_local();
        local >= self.start && local <= self.end
    }
}

/// The trailing week buckets ending with the current week, oldest first.
pub fn week_windows(now: &DateTime<FixedOffset>) -> Vec<WeekWindow> {
    let today = now.date_naive();
    let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);

    (0..WEEK_COUNT as i64)
        .rev()
        .map(|weeks_back| {
            let start_day = monday - Duration::weeks(weeks_back);
            let start = start_day.and_time(NaiveTime::MIN);
            WeekWindow {
                start,
                end: start + Duration::days(7) - Duration::seconds(1),
                label: start_day.format("%b %d").to_string(),
            }
        })
        .collect()
}

// === Widgets ===

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressEntry {
    pub name: String,
    pub progress: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DelayChart {
    pub labels: [&'static str; 3],
    pub data: [u8; 3],
    pub colors: [&'static str; 3],
}

impl DelayChart {
    fn new(on_time: usize, delayed: usize, blocked: usize) -> Self {
        let total = on_time + delayed + blocked;
        DelayChart {
            labels: DELAY_LABELS,
            data: [percent(on_time, total), percent(delayed, total), percent(blocked, total)],
            colors: DELAY_COLORS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DelayEntry {
    pub name: String,
    pub chart: DelayChart,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionEntry {
    pub name: String,
    pub weeks: Vec<String>,
    pub data: Vec<usize>,
}

/// The four summary widgets, keyed the way the dashboard front end reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsWidgets {
    pub project_progress: Vec<ProgressEntry>,
    pub productivity_by_discipline: Vec<ProgressEntry>,
    pub task_delay_projects: Vec<DelayEntry>,
    pub task_completion_projects: Vec<CompletionEntry>,
}

pub fn project_progress(snapshot: &Snapshot) -> Vec<ProgressEntry> {
    snapshot
        .projects
        .iter()
        .map(|p| {
            let mut tally = Tally::default();
            p.live_tasks().for_each(|t| tally.add(t));
            ProgressEntry {
                name: p.project.name.clone(),
                progress: tally.progress(),
            }
        })
        .collect()
}

pub fn productivity_by_category(snapshot: &Snapshot) -> Vec<ProgressEntry> {
    let mut groups: Groups<()> = Groups::new();
    for task in snapshot.projects.iter().flat_map(|p| p.live_tasks()) {
        for label in &task.labels {
            groups.entry(label).1.add(task);
        }
    }

    let mut entries: Vec<ProgressEntry> = groups
        .groups
        .into_iter()
        .map(|(name, tally, _)| ProgressEntry {
            name,
            progress: tally.progress(),
        })
        .collect();

    if entries.is_empty() {
        entries.push(ProgressEntry {
            name: ALL_TASKS.to_string(),
            progress: 0,
        });
    }
    entries
}

pub fn delay_composition(snapshot: &Snapshot) -> Vec<DelayEntry> {
    if snapshot.is_empty() {
        return vec![DelayEntry {
            name: NO_PROJECTS.to_string(),
            chart: DelayChart::new(0, 0, 0),
        }];
    }

    let offset = snapshot.now.offset();
    snapshot
        .projects
        .iter()
        .map(|p| {
            let (mut on_time, mut delayed, mut blocked) = (0, 0, 0);
            for category in p.tasks.iter().filter_map(|t| delay_category(t, offset)) {
                match category {
                    DelayCategory::OnTime => on_time += 1,
                    DelayCategory::Delayed => delayed += 1,
                    DelayCategory::Blocked => blocked += 1,
                }
            }
            DelayEntry {
                name: p.project.name.clone(),
                chart: DelayChart::new(on_time, delayed, blocked),
            }
        })
        .collect()
}

pub fn completion_velocity(snapshot: &Snapshot) -> Vec<CompletionEntry> {
    let windows = week_windows(&snapshot.now);
    let weeks: Vec<String> = windows.iter().map(|w| w.label.clone()).collect();

    if snapshot.is_empty() {
        return vec![CompletionEntry {
            name: NO_PROJECTS.to_string(),
            weeks,
            data: vec![0; WEEK_COUNT],
        }];
    }

    snapshot
        .projects
        .iter()
        .map(|p| {
            let completions: Vec<&DateTime<Utc>> = p
                .live_tasks()
                .filter(|t| t.is_done())
                .filter_map(|t| t.completed_at.as_ref())
                .collect();
            let data = windows
                .iter()
                .map(|w| completions.iter().filter(|at| w.contains(at, &snapshot.now)).count())
                .collect();
            CompletionEntry {
                name: p.project.name.clone(),
                weeks: weeks.clone(),
                data,
            }
        })
        .collect()
}

/// Builds all four widgets for one pass.
pub fn build_widgets(snapshot: &Snapshot) -> AnalyticsWidgets {
    AnalyticsWidgets {
        project_progress: project_progress(snapshot),
        productivity_by_discipline: productivity_by_category(snapshot),
        task_delay_projects: delay_composition(snapshot),
        task_completion_projects: completion_velocity(snapshot),
    }
}

// === Drill-down views ===

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressTaskRow {
    pub id: i64,
    pub title: String,
    pub status: TaskStatus,
    #[serde(rename = "stack")]
    pub stage: String,
    pub due: Option<Due>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressDetail {
    pub name: String,
    pub total: usize,
    pub done: usize,
    pub progress: u8,
    pub tasks: Vec<ProgressTaskRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTaskRow {
    pub id: i64,
    pub title: String,
    pub status: TaskStatus,
    pub project: String,
    #[serde(rename = "stack")]
    pub stage: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDetail {
    pub name: String,
    pub total: usize,
    pub done: usize,
    pub progress: u8,
    pub tasks: Vec<CategoryTaskRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DelayTaskRow {
    pub id: i64,
    pub title: String,
    pub status: TaskStatus,
    #[serde(rename = "stack")]
    pub stage: String,
    pub due: Option<Due>,
    pub category: DelayCategory,
    pub days_overdue: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DelayDetail {
    pub name: String,
    pub tasks: Vec<DelayTaskRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletedTaskRow {
    pub id: i64,
    pub title: String,
    pub completed_at: DateTime<Utc>,
    #[serde(rename = "stack")]
    pub stage: String,
    pub due: Option<Due>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionDetail {
    pub name: String,
    pub total_tasks: usize,
    pub completed: usize,
    pub tasks: Vec<CompletedTaskRow>,
}

/// Task-level listings behind each widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsDetails {
    pub progress_details: Vec<ProgressDetail>,
    pub discipline_details: Vec<CategoryDetail>,
    pub delay_details: Vec<DelayDetail>,
    pub completion_details: Vec<CompletionDetail>,
}

pub fn progress_details(snapshot: &Snapshot) -> Vec<ProgressDetail> {
    snapshot
        .projects
        .iter()
        .map(|p| {
            let mut tally = Tally::default();
            let tasks = p
                .live_tasks()
                .map(|t| {
                    tally.add(t);
                    ProgressTaskRow {
                        id: t.task.id,
                        title: t.task.title.clone(),
                        status: t.status,
                        stage: t.task.stage.clone(),
                        due: t.task.due,
                    }
                })
                .collect();
            ProgressDetail {
                name: p.project.name.clone(),
                total: tally.total,
                done: tally.done,
                progress: tally.progress(),
                tasks,
            }
        })
        .collect()
}

/// Per-label listing. Unlike the summary widget, unlabelled tasks are kept
/// under [`UNLABELLED`].
pub fn category_details(snapshot: &Snapshot) -> Vec<CategoryDetail> {
    let mut groups: Groups<CategoryTaskRow> = Groups::new();
    for p in &snapshot.projects {
        for task in p.live_tasks() {
            let unlabelled = [UNLABELLED.to_string()];
            let labels: &[String] = if task.labels.is_empty() { &unlabelled } else { &task.labels };
            for label in labels {
                let (_, tally, rows) = groups.entry(label);
                tally.add(task);
                rows.push(CategoryTaskRow {
                    id: task.task.id,
                    title: task.task.title.clone(),
                    status: task.status,
                    project: p.project.name.clone(),
                    stage: task.task.stage.clone(),
                });
            }
        }
    }

    groups
        .groups
        .into_iter()
        .map(|(name, tally, tasks)| CategoryDetail {
            name,
            total: tally.total,
            done: tally.done,
            progress: tally.progress(),
            tasks,
        })
        .collect()
}

pub fn delay_details(snapshot: &Snapshot) -> Vec<DelayDetail> {
    snapshot
        .projects
        .iter()
        .map(|p| DelayDetail {
            name: p.project.name.clone(),
            tasks: p
                .tasks
                .iter()
                .filter_map(|t| {
                    let category = delay_category(t, snapshot.now.offset())?;
                    Some(DelayTaskRow {
                        id: t.task.id,
                        title: t.task.title.clone(),
                        status: t.status,
                        stage: t.task.stage.clone(),
                        due: t.task.due,
                        category,
                        days_overdue: days_overdue(t, &snapshot.now),
                    })
                })
                .collect(),
        })
        .collect()
}

/// Completed tasks per project, newest first; equal instants sort by task id.
pub fn completion_details(snapshot: &Snapshot) -> Vec<CompletionDetail> {
    snapshot
        .projects
        .iter()
        .map(|p| {
            let mut tasks: Vec<CompletedTaskRow> = p
                .live_tasks()
                .filter(|t| t.is_done())
                .filter_map(|t| {
                    Some(CompletedTaskRow {
                        id: t.task.id,
                        title: t.task.title.clone(),
                        completed_at: t.completed_at?,
                        stage: t.task.stage.clone(),
                        due: t.task.due,
                    })
                })
                .collect();
            tasks.sort_by(|a, b| b.completed_at.cmp(&a.completed_at).then(a.id.cmp(&b.id)));

            CompletionDetail {
                name: p.project.name.clone(),
                total_tasks: p.live_tasks().count(),
                completed: tasks.len(),
                tasks,
            }
        })
        .collect()
}

pub fn build_details(snapshot: &Snapshot) -> AnalyticsDetails {
    AnalyticsDetails {
        progress_details: progress_details(snapshot),
        discipline_details: category_details(snapshot),
        delay_details: delay_details(snapshot),
        completion_details: completion_details(snapshot),
    }
}
