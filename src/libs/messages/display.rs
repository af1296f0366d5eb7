//! Display text for [`Message`].
//!
//! All user-facing wording lives in this one match, so a message can be
//! reworded without touching the code that emits it.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigDeleted => "Configuration removed".to_string(),
            Message::ConfigFileNotFound => "Configuration file not found, nothing to remove".to_string(),
            Message::ConfigLocation(path) => format!("Configuration file: {}", path),
            Message::ConfigModuleStore => "Task store settings".to_string(),
            Message::ConfigModuleAnalytics => "Analytics settings".to_string(),
            Message::InvalidUtcOffset(value) => format!("Invalid UTC offset '{}': expected minutes between -1439 and 1439", value),

            // === PROMPTS ===
            Message::PromptSelectModules => "Select sections to configure".to_string(),
            Message::PromptStorePath => "Path to the task store (SQLite)".to_string(),
            Message::PromptDoneStage => "Stack title that marks a task as done".to_string(),
            Message::PromptCompletionSource => "Read task completion from".to_string(),
            Message::PromptBusyTimeout => "Store busy timeout (ms)".to_string(),
            Message::PromptUtcOffset => "Reference UTC offset (minutes east of UTC)".to_string(),
            Message::PromptStalledAfterDays => "Days without activity before a project is stalled".to_string(),

            // === STORE MESSAGES ===
            Message::StoreCreated(path) => format!("Empty task store created at {}", path),
            Message::StoreUnavailable(reason) => format!("Task store unavailable: {}", reason),
            Message::StoreLocation(path) => format!("Task store: {}", path),
            Message::RecordsQuarantined(count) => format!("{} malformed record(s) skipped", count),

            // === DASHBOARD MESSAGES ===
            Message::DashboardHeader(now) => format!("Project dashboard as of {}", now),
            Message::ProjectProgressHeader => "Project progress".to_string(),
            Message::ProductivityHeader => "Productivity by discipline".to_string(),
            Message::DelayCompositionHeader => "Task delay composition".to_string(),
            Message::CompletionVelocityHeader => "Weekly completions".to_string(),
            Message::AlertsHeader => "Alerts".to_string(),
            Message::AlertSummaryHeader => "Alert summary".to_string(),
            Message::NoProjectsFound => "No projects found in the task store".to_string(),
            Message::RulesSkipped(rules) => format!("Alert rules skipped: {}", rules),
            Message::InvalidNowTimestamp(value) => format!("Invalid timestamp '{}': expected RFC 3339, e.g. 2026-10-19T09:00:00+02:00", value),

            // === DETAIL MESSAGES ===
            Message::ProgressDetailsHeader(name, done, total, progress) => format!("{}: {}/{} done ({}%)", name, done, total, progress),
            Message::CategoryDetailsHeader(name, done, total, progress) => format!("{}: {}/{} done ({}%)", name, done, total, progress),
            Message::DelayDetailsHeader(name) => format!("{}: delay breakdown", name),
            Message::CompletionDetailsHeader(name, completed, total) => format!("{}: {} of {} tasks completed", name, completed, total),
            Message::OverdueTasksHeader => "Overdue tasks".to_string(),
            Message::UnassignedTasksHeader => "Unassigned tasks".to_string(),
            Message::MissingDueDateHeader => "Tasks without a due date".to_string(),
            Message::StalledProjectsHeader => "Stalled projects".to_string(),
            Message::AssigneesUnavailable => "Assignee information unavailable".to_string(),
            Message::NoMatchingTasks => "None".to_string(),

            // === EXPORT MESSAGES ===
            Message::ExportingData(data, format) => format!("Exporting {} as {}...", data, format),
            Message::ExportCompleted(path) => format!("Data exported successfully to: {}", path),

            // === MIGRATION MESSAGES ===
            Message::MigrationsFound(count) => format!("Found {} pending store migrations", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationCompleted(version) => format!("✓ Migration v{} completed", version),
            Message::MigrationFailed(version, error) => format!("✗ Migration v{} failed: {}", version, error),
            Message::AllMigrationsCompleted => "All store migrations completed successfully".to_string(),
            Message::DatabaseVersion(version) => format!("Current store schema version: {}", version),
            Message::DatabaseUpToDate => "Store schema is up to date".to_string(),
            Message::DatabaseNeedsUpdate => "Store schema needs to be updated".to_string(),
            Message::MigrationHistory => "Migration history:".to_string(),
            Message::NothingToRollback => "Nothing to rollback".to_string(),
            Message::RollingBack(from, to) => format!("Rolling back from v{} to v{}", from, to),
            Message::RollbackCompleted(version) => format!("Rollback to v{} completed", version),
        };

        write!(f, "{}", text)
    }
}
