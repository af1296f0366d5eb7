//! The SQLite-backed [`TaskSource`].
//!
//! Every read opens its own read-only connection, so the concurrent reads of
//! one pass never share a handle. A locked store is retried for the configured
//! busy timeout and then reported as unavailable.

use super::assignees::Assignees;
use super::db::Db;
use super::labels::Labels;
use super::notifications::Notifications;
use super::projects::Projects;
use super::tasks::Tasks;
use crate::libs::config::Config;
use crate::libs::error::DashboardResult;
use crate::libs::source::TaskSource;
use crate::libs::task::{Project, TaskBatch};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
    busy_timeout: Duration,
}

impl SqliteStore {
    pub fn new(path: impl Into<PathBuf>, busy_timeout: Duration) -> Self {
        SqliteStore {
            path: path.into(),
            busy_timeout,
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(config.store_path()?, config.busy_timeout()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> DashboardResult<Db> {
        Db::open(&self.path, self.busy_timeout)
    }
}

impl TaskSource for SqliteStore {
    fn list_projects(&self) -> DashboardResult<Vec<Project>> {
        Projects::new(self.open()?).list()
    }

    fn list_tasks(&self, board_ids: &[i64]) -> DashboardResult<TaskBatch> {
        Tasks::new(self.open()?).fetch(board_ids)
    }

    fn list_labels_for_tasks(&self, board_ids: &[i64]) -> DashboardResult<HashMap<i64, Vec<String>>> {
        Labels::new(self.open()?).fetch_for_boards(board_ids)
    }

    fn list_assigned_tasks(&self, board_ids: &[i64]) -> DashboardResult<HashSet<i64>> {
        Assignees::new(self.open()?).fetch_assigned(board_ids)
    }

    fn count_pending_system_updates(&self) -> DashboardResult<u64> {
        Notifications::new(self.open()?).count_pending_updates()
    }
}
