mod common;

#[cfg(test)]
mod tests {
    use super::common::{apollo_tasks, now, rule, snapshot, task, utc, DONE, TODO};
    use chrono::{Duration, Utc};
    use deckpulse::libs::alerts::{self, AlertOptions, AlertRule, Severity};
    use deckpulse::libs::source::Snapshot;
    use deckpulse::libs::task::{Due, Project, TaskBatch};
    use std::collections::{HashMap, HashSet};

    fn rules(feed: &alerts::AlertFeed) -> Vec<AlertRule> {
        feed.alerts.iter().map(|a| a.rule).collect()
    }

    #[test]
    fn test_stalled_project_after_ten_days() {
        let mut quiet = task(1, 1, TODO);
        quiet.last_activity_at = Some(now().with_timezone(&Utc) - Duration::days(10));
        let snap = snapshot(vec![Project::new(1, "Quiet", 1)], vec![quiet], HashMap::new());

        let feed = alerts::evaluate(&snap, &AlertOptions::default());
        let stalled: Vec<_> = feed.fired(AlertRule::StalledProject).collect();

        assert_eq!(stalled.len(), 1);
        assert_eq!(stalled[0].description, "Project \"Quiet\" has had no activity in 7+ days");
        assert_eq!(stalled[0].severity, Severity::Attention);
        let payload = stalled[0].stalled.as_ref().unwrap();
        assert_eq!(payload.project, "Quiet");
        assert_eq!(payload.days_inactive, 10);
        assert_eq!(feed.summary.stalled_projects, 1);
    }

    #[test]
    fn test_stalled_threshold_is_exclusive() {
        let mut edge = task(1, 1, TODO);
        edge.last_activity_at = Some(now().with_timezone(&Utc) - Duration::days(7));
        let snap = snapshot(vec![Project::new(1, "Edge", 1)], vec![edge], HashMap::new());

        let feed = alerts::evaluate(&snap, &AlertOptions::default());
        assert_eq!(feed.fired(AlertRule::StalledProject).count(), 0);

        let strict = AlertOptions { stalled_after_days: 6 };
        assert_eq!(alerts::evaluate(&snap, &strict).fired(AlertRule::StalledProject).count(), 1);
    }

    #[test]
    fn test_huge_stalled_threshold_never_fires() {
        let mut ancient = task(1, 1, TODO);
        ancient.last_activity_at = Some(utc(2000, 1, 1));
        let snap = snapshot(vec![Project::new(1, "Ancient", 1)], vec![ancient], HashMap::new());

        for days in [i64::MAX / 1000, i64::MAX] {
            let feed = alerts::evaluate(&snap, &AlertOptions { stalled_after_days: days });
            assert_eq!(feed.fired(AlertRule::StalledProject).count(), 0);
            assert_eq!(feed.summary.stalled_projects, 0);
        }
    }

    #[test]
    fn test_project_without_activity_is_not_stalled() {
        let snap = snapshot(vec![Project::new(1, "Fresh", 1)], vec![task(1, 1, TODO)], HashMap::new());
        let feed = alerts::evaluate(&snap, &AlertOptions::default());
        assert_eq!(feed.fired(AlertRule::StalledProject).count(), 0);
    }

    #[test]
    fn test_overdue_and_no_overdue_are_exclusive() {
        let with_overdue = snapshot(vec![Project::new(1, "Apollo", 1)], apollo_tasks(), HashMap::new());
        let feed = alerts::evaluate(&with_overdue, &AlertOptions::default());
        assert_eq!(feed.fired(AlertRule::Overdue).count(), 1);
        assert_eq!(feed.fired(AlertRule::NoOverdue).count(), 0);
        assert_eq!(feed.alerts[0].description, "1 task overdue across projects");
        assert_eq!(feed.alerts[0].label, "Action required");

        let empty = snapshot(Vec::new(), Vec::new(), HashMap::new());
        let feed = alerts::evaluate(&empty, &AlertOptions::default());
        assert_eq!(feed.fired(AlertRule::Overdue).count(), 0);
        assert_eq!(feed.fired(AlertRule::NoOverdue).count(), 1);
    }

    #[test]
    fn test_done_task_past_due_is_not_overdue() {
        let mut late = task(1, 1, DONE);
        late.due = Some(Due::At(utc(2026, 10, 1)));
        let snap = snapshot(vec![Project::new(1, "Apollo", 1)], vec![late], HashMap::new());

        let feed = alerts::evaluate(&snap, &AlertOptions::default());
        assert_eq!(feed.summary.overdue, 0);
        assert_eq!(rules(&feed), [AlertRule::NoOverdue]);
    }

    #[test]
    fn test_feed_order_and_wording() {
        let mut tasks = apollo_tasks();
        let mut stale = task(20, 2, TODO);
        stale.last_activity_at = Some(utc(2026, 9, 1));
        tasks.push(stale);
        let projects = vec![Project::new(1, "Apollo", 1), Project::new(2, "Zephyr", 2)];

        // Only tasks 1 and 2 have assignees.
        let snap = Snapshot::build(
            projects,
            TaskBatch { tasks, rejected: Vec::new() },
            HashMap::new(),
            Some(HashSet::from([1, 2])),
            Some(2),
            &rule(),
            now(),
        );
        let feed = alerts::evaluate(&snap, &AlertOptions::default());

        assert_eq!(
            rules(&feed),
            [
                AlertRule::Overdue,
                AlertRule::Unassigned,
                AlertRule::MissingDueDate,
                AlertRule::StalledProject,
                AlertRule::ZeroProgress,
                AlertRule::PendingUpdates,
            ]
        );
        let descriptions: Vec<&str> = feed.alerts.iter().map(|a| a.description.as_str()).collect();
        assert_eq!(
            descriptions,
            [
                "1 task overdue across projects",
                "3 tasks have no assignee",
                "1 task has no due date set",
                "Project \"Zephyr\" has had no activity in 7+ days",
                "1 project has zero completed tasks (Zephyr)",
                "2 app updates available",
            ]
        );

        assert_eq!(feed.summary.unassigned, Some(3));
        assert_eq!(feed.summary.active_tasks, 3);
        assert_eq!(feed.summary.pending_updates, Some(2));
        assert!(feed.skipped.is_empty());
    }

    #[test]
    fn test_all_assigned_fires_for_fully_staffed_store() {
        let mut open = task(1, 1, TODO);
        open.due = Some(Due::At(utc(2026, 10, 20)));
        let snap = snapshot(vec![Project::new(1, "Apollo", 1)], vec![open], HashMap::new());

        let feed = alerts::evaluate(&snap, &AlertOptions::default());
        assert_eq!(rules(&feed), [AlertRule::ZeroProgress, AlertRule::NoOverdue, AlertRule::AllAssigned]);
        assert!(feed.alerts.iter().filter(|a| a.rule != AlertRule::ZeroProgress).all(|a| a.severity == Severity::OnTrack));
    }

    #[test]
    fn test_unreadable_inputs_skip_their_rules() {
        let snap = Snapshot::build(
            vec![Project::new(1, "Apollo", 1)],
            TaskBatch {
                tasks: apollo_tasks(),
                rejected: Vec::new(),
            },
            HashMap::new(),
            None,
            None,
            &rule(),
            now(),
        );
        let feed = alerts::evaluate(&snap, &AlertOptions::default());

        assert_eq!(feed.skipped, [AlertRule::Unassigned, AlertRule::PendingUpdates, AlertRule::AllAssigned]);
        assert_eq!(feed.fired(AlertRule::Unassigned).count(), 0);
        assert_eq!(feed.fired(AlertRule::AllAssigned).count(), 0);
        assert_eq!(feed.fired(AlertRule::Overdue).count(), 1);
        assert_eq!(feed.summary.unassigned, None);
        assert_eq!(feed.summary.pending_updates, None);

        let details = alerts::details(&snap, &feed);
        assert!(details.unassigned.is_none());
        assert!(details.summary.iter().all(|row| row.label != "Unassigned tasks"));
    }

    #[test]
    fn test_alert_details() {
        let mut tasks = apollo_tasks();
        let mut archived = task(6, 1, TODO);
        archived.archived = true;
        tasks.push(archived);
        let snap = Snapshot::build(
            vec![Project::new(1, "Apollo", 1)],
            TaskBatch { tasks, rejected: Vec::new() },
            HashMap::new(),
            Some(HashSet::from([1, 2, 3])),
            Some(0),
            &rule(),
            now(),
        );
        let feed = alerts::evaluate(&snap, &AlertOptions::default());
        let details = alerts::details(&snap, &feed);

        assert_eq!(details.overdue.len(), 1);
        assert_eq!(details.overdue[0].project, "Apollo");
        assert_eq!(details.overdue[0].count, 1);
        assert_eq!(details.overdue[0].tasks[0].id, 3);

        let unassigned = details.unassigned.as_ref().unwrap();
        let ids: Vec<i64> = unassigned[0].tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, [4]);

        // Archived tasks still lack a due date.
        let ids: Vec<i64> = details.missing_due_date[0].tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, [6]);

        assert!(details.stalled_projects.is_empty());

        let overdue_row = &details.summary[0];
        assert_eq!((overdue_row.label, overdue_row.value, overdue_row.severity), ("Overdue tasks", 1, Severity::ActionRequired));
        let stalled_row = details.summary.iter().find(|row| row.label == "Stalled projects").unwrap();
        assert_eq!(stalled_row.severity, Severity::OnTrack);
    }

    #[test]
    fn test_alert_serialization() {
        let snap = snapshot(Vec::new(), Vec::new(), HashMap::new());
        let feed = alerts::evaluate(&snap, &AlertOptions::default());
        let json = serde_json::to_value(&feed.alerts[0]).unwrap();

        assert_eq!(json["badgeType"], "ontrack");
        assert_eq!(json["badgeLabel"], "On track");
        assert_eq!(json["description"], "No overdue tasks across all projects");
    }
}
