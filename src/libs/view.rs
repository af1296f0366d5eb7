//! Console tables for the dashboard commands.
//!
//! Dates are printed as calendar days in the reference zone of the pass.

use super::alerts::{Alert, AlertDetails, AlertFeed, AlertSummary, ProjectTaskGroup};
use super::analytics::{AnalyticsDetails, AnalyticsWidgets};
use super::dashboard::DashboardData;
use super::messages::Message;
use super::task::Due;
use crate::{msg_print, msg_warning};
use anyhow::Result;
use chrono::{DateTime, FixedOffset, Utc};
use prettytable::{row, Table};

pub struct View {}

impl View {
    pub fn dashboard(data: &DashboardData) -> Result<()> {
        msg_print!(Message::DashboardHeader(data.generated_at.format("%Y-%m-%d %H:%M %:z").to_string()), true);
        Self::widgets(&data.widgets)?;

        msg_print!(Message::AlertsHeader, true);
        Self::alert_table(&data.alerts)?;

        msg_print!(Message::AlertSummaryHeader, true);
        Self::summary(&data.summary)?;

        if !data.skipped_rules.is_empty() {
            let rules: Vec<&str> = data.skipped_rules.iter().map(|r| r.as_str()).collect();
            msg_warning!(Message::RulesSkipped(rules.join(", ")));
        }
        if !data.rejected.is_empty() {
            msg_warning!(Message::RecordsQuarantined(data.rejected.len()));
        }

        Ok(())
    }

    pub fn widgets(widgets: &AnalyticsWidgets) -> Result<()> {
        msg_print!(Message::ProjectProgressHeader, true);
        if widgets.project_progress.is_empty() {
            msg_print!(Message::NoProjectsFound);
        } else {
            let mut table = Table::new();
            table.add_row(row!["PROJECT", "PROGRESS"]);
            for entry in &widgets.project_progress {
                table.add_row(row![entry.name, format!("{}%", entry.progress)]);
            }
            table.printstd();
        }

        msg_print!(Message::ProductivityHeader, true);
        let mut table = Table::new();
        table.add_row(row!["DISCIPLINE", "PROGRESS"]);
        for entry in &widgets.productivity_by_discipline {
            table.add_row(row![entry.name, format!("{}%", entry.progress)]);
        }
        table.printstd();

        msg_print!(Message::DelayCompositionHeader, true);
        let mut table = Table::new();
        table.add_row(row!["PROJECT", "ON TIME", "DELAYED", "BLOCKED"]);
        for entry in &widgets.task_delay_projects {
            let [on_time, delayed, blocked] = entry.chart.data;
            table.add_row(row![
                entry.name,
                format!("{}%", on_time),
                format!("{}%", delayed),
                format!("{}%", blocked)
            ]);
        }
        table.printstd();

        msg_print!(Message::CompletionVelocityHeader, true);
        let mut table = Table::new();
        let mut header = vec!["PROJECT".to_string()];
        if let Some(first) = widgets.task_completion_projects.first() {
            header.extend(first.weeks.iter().cloned());
        }
        table.set_titles(header.into_iter().collect());
        for entry in &widgets.task_completion_projects {
            let mut cells = vec![entry.name.clone()];
            cells.extend(entry.data.iter().map(|n| n.to_string()));
            table.add_row(cells.into_iter().collect());
        }
        table.printstd();

        Ok(())
    }

    pub fn alerts(feed: &AlertFeed) -> Result<()> {
        msg_print!(Message::AlertsHeader, true);
        Self::alert_table(&feed.alerts)?;

        msg_print!(Message::AlertSummaryHeader, true);
        Self::summary(&feed.summary)?;

        if !feed.skipped.is_empty() {
            let rules: Vec<&str> = feed.skipped.iter().map(|r| r.as_str()).collect();
            msg_warning!(Message::RulesSkipped(rules.join(", ")));
        }

        Ok(())
    }

    fn alert_table(alerts: &[Alert]) -> Result<()> {
        let mut table = Table::new();
        table.add_row(row!["BADGE", "ALERT"]);
        for alert in alerts {
            table.add_row(row![alert.label, alert.description]);
        }
        table.printstd();

        Ok(())
    }

    fn summary(summary: &AlertSummary) -> Result<()> {
        let unassigned = summary.unassigned.map_or("n/a".to_string(), |n| n.to_string());
        let updates = summary.pending_updates.map_or("n/a".to_string(), |n| n.to_string());

        let mut table = Table::new();
        table.add_row(row!["Active tasks", summary.active_tasks]);
        table.add_row(row!["Overdue tasks", summary.overdue]);
        table.add_row(row!["Unassigned tasks", unassigned]);
        table.add_row(row!["Tasks without due date", summary.missing_due_date]);
        table.add_row(row!["Stalled projects", summary.stalled_projects]);
        table.add_row(row!["Projects with zero progress", summary.zero_progress_projects]);
        table.add_row(row!["Pending app updates", updates]);
        table.printstd();

        Ok(())
    }

    pub fn details(details: &AnalyticsDetails, offset: &FixedOffset) -> Result<()> {
        for project in &details.progress_details {
            msg_print!(
                Message::ProgressDetailsHeader(project.name.clone(), project.done, project.total, project.progress),
                true
            );
            let mut table = Table::new();
            table.add_row(row!["ID", "TITLE", "STATUS", "STACK", "DUE"]);
            for task in &project.tasks {
                table.add_row(row![task.id, task.title, task.status, task.stage, due_day(task.due, offset)]);
            }
            table.printstd();
        }

        for category in &details.discipline_details {
            msg_print!(
                Message::CategoryDetailsHeader(category.name.clone(), category.done, category.total, category.progress),
                true
            );
            let mut table = Table::new();
            table.add_row(row!["ID", "TITLE", "STATUS", "PROJECT", "STACK"]);
            for task in &category.tasks {
                table.add_row(row![task.id, task.title, task.status, task.project, task.stage]);
            }
            table.printstd();
        }

        for project in &details.delay_details {
            msg_print!(Message::DelayDetailsHeader(project.name.clone()), true);
            let mut table = Table::new();
            table.add_row(row!["ID", "TITLE", "CATEGORY", "STACK", "DUE", "DAYS OVER"]);
            for task in &project.tasks {
                table.add_row(row![
                    task.id,
                    task.title,
                    task.category.as_str(),
                    task.stage,
                    due_day(task.due, offset),
                    task.days_overdue.map_or(String::new(), |d| d.to_string())
                ]);
            }
            table.printstd();
        }

        for project in &details.completion_details {
            msg_print!(
                Message::CompletionDetailsHeader(project.name.clone(), project.completed, project.total_tasks),
                true
            );
            let mut table = Table::new();
            table.add_row(row!["ID", "TITLE", "COMPLETED", "STACK", "DUE"]);
            for task in &project.tasks {
                table.add_row(row![
                    task.id,
                    task.title,
                    day(Some(task.completed_at), offset),
                    task.stage,
                    due_day(task.due, offset)
                ]);
            }
            table.printstd();
        }

        Ok(())
    }

    pub fn alert_details(details: &AlertDetails, offset: &FixedOffset) -> Result<()> {
        msg_print!(Message::OverdueTasksHeader, true);
        Self::task_groups(&details.overdue, offset);

        msg_print!(Message::UnassignedTasksHeader, true);
        match &details.unassigned {
            Some(groups) => Self::task_groups(groups, offset),
            None => msg_warning!(Message::AssigneesUnavailable),
        }

        msg_print!(Message::MissingDueDateHeader, true);
        Self::task_groups(&details.missing_due_date, offset);

        msg_print!(Message::StalledProjectsHeader, true);
        if details.stalled_projects.is_empty() {
            msg_print!(Message::NoMatchingTasks);
        } else {
            let mut table = Table::new();
            table.add_row(row!["PROJECT", "LAST ACTIVITY", "DAYS INACTIVE"]);
            for stalled in &details.stalled_projects {
                table.add_row(row![
                    stalled.project,
                    day(Some(stalled.last_activity), offset),
                    stalled.days_inactive
                ]);
            }
            table.printstd();
        }

        msg_print!(Message::AlertSummaryHeader, true);
        let mut table = Table::new();
        for entry in &details.summary {
            table.add_row(row![entry.label, entry.value, entry.severity]);
        }
        table.printstd();

        Ok(())
    }

    fn task_groups(groups: &[ProjectTaskGroup], offset: &FixedOffset) {
        if groups.is_empty() {
            msg_print!(Message::NoMatchingTasks);
            return;
        }

        let mut table = Table::new();
        table.add_row(row!["PROJECT", "ID", "TITLE", "STACK", "DUE"]);
        for group in groups {
            for task in &group.tasks {
                table.add_row(row![group.project, task.id, task.title, task.stage, due_day(task.due, offset)]);
            }
        }
        table.printstd();
    }
}

/// `YYYY-MM-DD` in the reference zone, empty for no date.
pub fn day(instant: Option<DateTime<Utc>>, offset: &FixedOffset) -> String {
    instant
        .map(|i| i.with_timezone(offset).format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Due date as `YYYY-MM-DD`, empty when unset. Bare days print unshifted.
pub fn due_day(due: Option<Due>, offset: &FixedOffset) -> String {
    due.map(|d| d.day_in(offset).format("%Y-%m-%d").to_string()).unwrap_or_default()
}
