mod common;

#[cfg(test)]
mod tests {
    use super::common::{now, rule, StoreFixture};
    use deckpulse::db::store::SqliteStore;
    use deckpulse::libs::alerts::AlertOptions;
    use deckpulse::libs::dashboard::{Dashboard, DashboardReport};
    use deckpulse::libs::export::{ExportData, ExportFormat, Exporter};
    use std::path::PathBuf;
    use std::time::Duration;
    use tempfile::TempDir;

    async fn report() -> DashboardReport {
        let fixture = StoreFixture::seeded();
        let store = SqliteStore::new(&fixture.path, Duration::from_secs(1));
        Dashboard::new(store, rule(), AlertOptions::default()).report(now()).await.unwrap()
    }

    fn out(dir: &TempDir, name: &str) -> PathBuf {
        dir.path().join(name)
    }

    #[test]
    fn test_default_file_name() {
        let exporter = Exporter::new(ExportFormat::Excel, None);
        let name = exporter.output_path().to_string_lossy().to_string();
        assert!(name.starts_with("deckpulse_export_"));
        assert!(name.ends_with(".xlsx"));
    }

    #[tokio::test]
    async fn test_analytics_csv() {
        let report = report().await;
        let dir = tempfile::tempdir().unwrap();
        let path = out(&dir, "analytics.csv");

        Exporter::new(ExportFormat::Csv, Some(path.clone())).export(ExportData::Analytics, &report).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("PROJECT PROGRESS"));
        assert!(content.contains("Apollo,50%"));
        assert!(content.contains("Gemini,50%,0%,50%"));
        assert!(content.contains("Project,Sep 07,Sep 14,Sep 21,Sep 28,Oct 05,Oct 12"));
        assert!(content.contains("Apollo,0,0,0,0,1,1"));
    }

    #[tokio::test]
    async fn test_details_csv() {
        let report = report().await;
        let dir = tempfile::tempdir().unwrap();
        let path = out(&dir, "details.csv");

        Exporter::new(ExportFormat::Csv, Some(path.clone())).export(ExportData::Details, &report).unwrap();

        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(&path).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert!(rows.iter().any(|r| &r[0] == "delay" && &r[2] == "3" && &r[7] == "delayed (4 days)"));
        assert!(rows.iter().any(|r| &r[0] == "completion" && &r[2] == "2" && &r[7] == "2026-10-13"));
        assert!(rows.iter().all(|r| &r[2] != "5"));
    }

    #[tokio::test]
    async fn test_alerts_json() {
        let report = report().await;
        let dir = tempfile::tempdir().unwrap();
        let path = out(&dir, "alerts.json");

        Exporter::new(ExportFormat::Json, Some(path.clone())).export(ExportData::Alerts, &report).unwrap();

        let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["alerts"][0]["badgeType"], "action");
        assert_eq!(json["summary"]["overdue"], 1);
        assert_eq!(json["details"]["overdue"][0]["tasks"][0]["id"], 3);
        assert_eq!(json["details"]["missingDueDate"][0]["project"], "Gemini");
    }

    #[tokio::test]
    async fn test_all_as_json_is_one_file() {
        let report = report().await;
        let dir = tempfile::tempdir().unwrap();
        let path = out(&dir, "all.json");

        Exporter::new(ExportFormat::Json, Some(path.clone())).export(ExportData::All, &report).unwrap();

        let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(json["projectProgress"].is_array());
        assert!(json["details"]["progressDetails"].is_array());
        assert!(json["alertDetails"]["summary"].is_array());
    }

    #[tokio::test]
    async fn test_all_as_excel_splits_files() {
        let report = report().await;
        let dir = tempfile::tempdir().unwrap();

        Exporter::new(ExportFormat::Excel, Some(out(&dir, "pulse.xlsx")))
            .export(ExportData::All, &report)
            .unwrap();

        for part in ["analytics", "details", "alerts"] {
            let path = out(&dir, &format!("pulse_{}.xlsx", part));
            assert!(path.exists(), "missing {}", path.display());
            assert!(std::fs::metadata(&path).unwrap().len() > 0);
        }
        assert!(!out(&dir, "pulse.xlsx").exists());
    }

    #[tokio::test]
    async fn test_all_as_csv_splits_files() {
        let report = report().await;
        let dir = tempfile::tempdir().unwrap();

        Exporter::new(ExportFormat::Csv, Some(out(&dir, "pulse.csv")))
            .export(ExportData::All, &report)
            .unwrap();

        let alerts = std::fs::read_to_string(out(&dir, "pulse_alerts.csv")).unwrap();
        assert!(alerts.contains("Action required,overdue,1 task overdue across projects"));
        assert!(alerts.contains("unassigned,Gemini,7,Card 7,To do,2026-10-30"));
    }
}
