mod common;

#[cfg(test)]
mod tests {
    use super::common::{apollo_tasks, now, rule, StoreFixture};
    use deckpulse::db::store::SqliteStore;
    use deckpulse::libs::alerts::{AlertOptions, AlertRule};
    use deckpulse::libs::analytics::ALL_TASKS;
    use deckpulse::libs::dashboard::Dashboard;
    use deckpulse::libs::error::{DashboardError, DashboardResult};
    use deckpulse::libs::source::TaskSource;
    use deckpulse::libs::task::{Project, RejectedRow, TaskBatch};
    use std::collections::{HashMap, HashSet};
    use std::time::Duration;

    /// In-memory source over the Apollo tasks whose reads can be made to fail.
    #[derive(Default)]
    struct FlakySource {
        projects_down: bool,
        tasks_down: bool,
        labels_down: bool,
        assignees_down: bool,
        updates_down: bool,
    }

    fn down<T>(what: &str) -> DashboardResult<T> {
        Err(DashboardError::SourceUnavailable(format!("{} read failed", what)))
    }

    impl TaskSource for FlakySource {
        fn list_projects(&self) -> DashboardResult<Vec<Project>> {
            if self.projects_down {
                return down("projects");
            }
            Ok(vec![Project::new(1, "Apollo", 1)])
        }

        fn list_tasks(&self, board_ids: &[i64]) -> DashboardResult<TaskBatch> {
            if self.tasks_down {
                return down("tasks");
            }
            assert_eq!(board_ids, [1]);
            Ok(TaskBatch {
                tasks: apollo_tasks(),
                rejected: vec![RejectedRow {
                    kind: "task",
                    id: 99,
                    reason: "unparseable due date 'soon'".to_string(),
                }],
            })
        }

        fn list_labels_for_tasks(&self, _board_ids: &[i64]) -> DashboardResult<HashMap<i64, Vec<String>>> {
            if self.labels_down {
                return down("labels");
            }
            Ok(HashMap::from([(1, vec!["Design".to_string()])]))
        }

        fn list_assigned_tasks(&self, _board_ids: &[i64]) -> DashboardResult<HashSet<i64>> {
            if self.assignees_down {
                return down("assignees");
            }
            Ok(HashSet::from([1, 2, 3, 4]))
        }

        fn count_pending_system_updates(&self) -> DashboardResult<u64> {
            if self.updates_down {
                return down("notifications");
            }
            Ok(0)
        }
    }

    fn dashboard(source: FlakySource) -> Dashboard<FlakySource> {
        Dashboard::new(source, rule(), AlertOptions::default())
    }

    #[tokio::test]
    async fn test_pass_over_sqlite_store() {
        let fixture = StoreFixture::seeded();
        let store = SqliteStore::new(&fixture.path, Duration::from_secs(1));
        let data = Dashboard::new(store, rule(), AlertOptions::default()).data(now()).await.unwrap();

        let progress: Vec<(&str, u8)> = data.widgets.project_progress.iter().map(|e| (e.name.as_str(), e.progress)).collect();
        assert_eq!(progress, [("Apollo", 50), ("Gemini", 0)]);

        let delay: Vec<[u8; 3]> = data.widgets.task_delay_projects.iter().map(|e| e.chart.data).collect();
        assert_eq!(delay, [[50, 50, 0], [50, 0, 50]]);

        let categories: Vec<(&str, u8)> = data
            .widgets
            .productivity_by_discipline
            .iter()
            .map(|e| (e.name.as_str(), e.progress))
            .collect();
        assert_eq!(categories, [("Design", 50), ("Backend", 0)]);

        assert_eq!(data.widgets.task_completion_projects[0].data, vec![0, 0, 0, 0, 1, 1]);

        let rules: Vec<AlertRule> = data.alerts.iter().map(|a| a.rule).collect();
        assert_eq!(
            rules,
            [
                AlertRule::Overdue,
                AlertRule::Unassigned,
                AlertRule::MissingDueDate,
                AlertRule::ZeroProgress,
                AlertRule::PendingUpdates,
            ]
        );
        assert_eq!(data.summary.unassigned, Some(1));
        assert_eq!(data.summary.pending_updates, Some(2));
        assert!(data.skipped_rules.is_empty());
        assert!(data.rejected.is_empty());
    }

    #[tokio::test]
    async fn test_dashboard_json_shape() {
        let fixture = StoreFixture::seeded();
        let store = SqliteStore::new(&fixture.path, Duration::from_secs(1));
        let data = Dashboard::new(store, rule(), AlertOptions::default()).data(now()).await.unwrap();
        let json = serde_json::to_value(&data).unwrap();

        for key in [
            "projectProgress",
            "productivityByDiscipline",
            "taskDelayProjects",
            "taskCompletionProjects",
            "alerts",
            "summary",
        ] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
        assert!(json.get("skippedRules").is_none());
        assert!(json.get("rejected").is_none());
        assert_eq!(json["generatedAt"], "2026-10-14T12:00:00+00:00");
    }

    #[tokio::test]
    async fn test_empty_store() {
        let fixture = StoreFixture::new();
        let store = SqliteStore::new(&fixture.path, Duration::from_secs(1));
        let report = Dashboard::new(store, rule(), AlertOptions::default()).report(now()).await.unwrap();

        assert!(report.data.widgets.project_progress.is_empty());
        assert_eq!(report.data.widgets.productivity_by_discipline[0].name, ALL_TASKS);
        let rules: Vec<AlertRule> = report.data.alerts.iter().map(|a| a.rule).collect();
        assert_eq!(rules, [AlertRule::NoOverdue]);
        assert!(report.details.progress_details.is_empty());
        assert!(report.alert_details.overdue.is_empty());
    }

    #[tokio::test]
    async fn test_missing_store_fails_the_pass() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::new(dir.path().join("gone.db"), Duration::from_millis(100));
        let result = Dashboard::new(store, rule(), AlertOptions::default()).data(now()).await;

        assert!(matches!(result, Err(DashboardError::SourceUnavailable(_))));
    }

    #[tokio::test]
    async fn test_core_reads_are_fatal() {
        let projects = dashboard(FlakySource {
            projects_down: true,
            ..Default::default()
        });
        assert!(projects.data(now()).await.unwrap_err().is_fatal());

        let tasks = dashboard(FlakySource {
            tasks_down: true,
            ..Default::default()
        });
        assert!(matches!(tasks.alerts(now()).await, Err(DashboardError::SourceUnavailable(_))));
    }

    #[tokio::test]
    async fn test_optional_reads_degrade() {
        let source = FlakySource {
            labels_down: true,
            assignees_down: true,
            updates_down: true,
            ..Default::default()
        };
        let data = dashboard(source).data(now()).await.unwrap();

        assert_eq!(data.widgets.productivity_by_discipline.len(), 1);
        assert_eq!(data.widgets.productivity_by_discipline[0].name, ALL_TASKS);
        assert_eq!(data.widgets.project_progress[0].progress, 50);
        assert_eq!(
            data.skipped_rules,
            [AlertRule::Unassigned, AlertRule::PendingUpdates, AlertRule::AllAssigned]
        );
        assert_eq!(data.summary.unassigned, None);

        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["skippedRules"], serde_json::json!(["unassigned", "pending-updates", "all-assigned"]));
    }

    #[tokio::test]
    async fn test_rejected_rows_are_reported() {
        let data = dashboard(FlakySource::default()).data(now()).await.unwrap();
        assert_eq!(data.rejected.len(), 1);
        assert_eq!(data.rejected[0].id, 99);
        assert_eq!(data.widgets.project_progress[0].progress, 50);
    }

    #[tokio::test]
    async fn test_report_is_consistent() {
        let report = dashboard(FlakySource::default()).report(now()).await.unwrap();

        assert_eq!(report.details.progress_details[0].progress, report.data.widgets.project_progress[0].progress);
        assert_eq!(report.alert_details.overdue[0].count, report.data.summary.overdue);
        assert_eq!(report.details.discipline_details[0].name, "Design");
    }
}
