//! File export of a dashboard pass.
//!
//! An [`Exporter`] writes one part of a [`DashboardReport`] (or all of it) as
//! CSV, JSON or Excel. JSON mirrors the structures the dashboard serves; CSV
//! and Excel flatten them into labelled sections.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use deckpulse::libs::export::{ExportData, ExportFormat, Exporter};
//! # use deckpulse::libs::dashboard::DashboardReport;
//!
//! # fn run(report: &DashboardReport) -> anyhow::Result<()> {
//! let exporter = Exporter::new(ExportFormat::Excel, None);
//! exporter.export(ExportData::Alerts, report)?;
//! # Ok(())
//! # }
//! ```

use super::alerts::{Alert, AlertDetails, AlertFeed, AlertSummary, ProjectTaskGroup};
use super::analytics::{AnalyticsDetails, AnalyticsWidgets};
use super::dashboard::{DashboardData, DashboardReport};
use super::messages::Message;
use super::view::{day, due_day};
use crate::{msg_info, msg_success};
use anyhow::Result;
use chrono::{FixedOffset, Local};
use rust_xlsxwriter::{Color, Format, Workbook, Worksheet};
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
    Excel,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Excel => "xlsx",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Json => "JSON",
            ExportFormat::Excel => "Excel",
        })
    }
}

/// Which part of the pass to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportData {
    /// The four widgets
    Analytics,
    /// Drill-down rows behind the widgets
    Details,
    /// Alert feed, summary and alert detail
    Alerts,
    /// Everything above
    All,
}

impl fmt::Display for ExportData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportData::Analytics => "analytics",
            ExportData::Details => "details",
            ExportData::Alerts => "alerts",
            ExportData::All => "all data",
        })
    }
}

/// JSON shape of an alerts export.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AlertsExport<'a> {
    alerts: &'a [Alert],
    summary: &'a AlertSummary,
    details: &'a AlertDetails,
}

pub struct Exporter {
    format: ExportFormat,
    output_path: PathBuf,
}

impl Exporter {
    /// Creates an exporter. Without `output_path` the file is
    /// `deckpulse_export_<YYYYMMDD_HHMMSS>.<ext>` in the working directory.
    pub fn new(format: ExportFormat, output_path: Option<PathBuf>) -> Self {
        let default_name = format!("deckpulse_export_{}", Local::now().format("%Y%m%d_%H%M%S"));
        let output_path = output_path.unwrap_or_else(|| PathBuf::from(format!("{}.{}", default_name, format.extension())));

        Self { format, output_path }
    }

    pub fn output_path(&self) -> &PathBuf {
        &self.output_path
    }

    pub fn export(&self, data_type: ExportData, report: &DashboardReport) -> Result<()> {
        msg_info!(Message::ExportingData(data_type.to_string(), self.format.to_string()));

        match data_type {
            ExportData::Analytics => self.export_analytics(&report.data)?,
            ExportData::Details => self.export_details(&report.details, report.data.generated_at.offset())?,
            ExportData::Alerts => self.export_alerts(report)?,
            ExportData::All => return self.export_all(report),
        }

        msg_success!(Message::ExportCompleted(self.output_path.display().to_string()));
        Ok(())
    }

    fn export_analytics(&self, data: &DashboardData) -> Result<()> {
        match self.format {
            ExportFormat::Csv => self.analytics_csv(&data.widgets),
            ExportFormat::Json => self.write_json(&data.widgets),
            ExportFormat::Excel => self.analytics_excel(&data.widgets),
        }
    }

    fn export_details(&self, details: &AnalyticsDetails, offset: &FixedOffset) -> Result<()> {
        match self.format {
            ExportFormat::Csv => self.details_csv(details, offset),
            ExportFormat::Json => self.write_json(details),
            ExportFormat::Excel => self.details_excel(details, offset),
        }
    }

    fn export_alerts(&self, report: &DashboardReport) -> Result<()> {
        let offset = report.data.generated_at.offset();
        let feed = AlertFeed {
            alerts: report.data.alerts.clone(),
            summary: report.data.summary.clone(),
            skipped: report.data.skipped_rules.clone(),
        };
        match self.format {
            ExportFormat::Csv => self.alerts_csv(&feed, &report.alert_details, offset),
            ExportFormat::Json => self.write_json(&AlertsExport {
                alerts: &feed.alerts,
                summary: &feed.summary,
                details: &report.alert_details,
            }),
            ExportFormat::Excel => self.alerts_excel(&feed, &report.alert_details, offset),
        }
    }

    /// JSON goes into one file; CSV and Excel get one file per part, named
    /// `<stem>_analytics`, `<stem>_details` and `<stem>_alerts`.
    fn export_all(&self, report: &DashboardReport) -> Result<()> {
        if self.format == ExportFormat::Json {
            self.write_json(report)?;
            msg_success!(Message::ExportCompleted(self.output_path.display().to_string()));
            return Ok(());
        }

        let base = self
            .output_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "deckpulse_export".to_string());

        for (suffix, part) in [
            ("analytics", ExportData::Analytics),
            ("details", ExportData::Details),
            ("alerts", ExportData::Alerts),
        ] {
            let path = self
                .output_path
                .with_file_name(format!("{}_{}.{}", base, suffix, self.format.extension()));
            Exporter::new(self.format, Some(path)).export(part, report)?;
        }

        Ok(())
    }

    fn write_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        File::create(&self.output_path)?.write_all(json.as_bytes())?;
        Ok(())
    }

    fn csv_writer(&self) -> Result<csv::Writer<File>> {
        // Sections have different widths.
        Ok(csv::WriterBuilder::new().flexible(true).from_path(&self.output_path)?)
    }

    fn analytics_csv(&self, widgets: &AnalyticsWidgets) -> Result<()> {
        let mut wtr = self.csv_writer()?;

        wtr.write_record(["PROJECT PROGRESS"])?;
        wtr.write_record(["Project", "Progress"])?;
        for entry in &widgets.project_progress {
            wtr.write_record([entry.name.clone(), format!("{}%", entry.progress)])?;
        }

        wtr.write_record([""])?;
        wtr.write_record(["PRODUCTIVITY BY DISCIPLINE"])?;
        wtr.write_record(["Discipline", "Progress"])?;
        for entry in &widgets.productivity_by_discipline {
            wtr.write_record([entry.name.clone(), format!("{}%", entry.progress)])?;
        }

        wtr.write_record([""])?;
        wtr.write_record(["TASK DELAY"])?;
        let mut header = vec!["Project".to_string()];
        if let Some(first) = widgets.task_delay_projects.first() {
            header.extend(first.chart.labels.iter().map(|l| l.to_string()));
        }
        wtr.write_record(&header)?;
        for entry in &widgets.task_delay_projects {
            let mut record = vec![entry.name.clone()];
            record.extend(entry.chart.data.iter().map(|p| format!("{}%", p)));
            wtr.write_record(&record)?;
        }

        wtr.write_record([""])?;
        wtr.write_record(["WEEKLY COMPLETIONS"])?;
        let mut header = vec!["Project".to_string()];
        if let Some(first) = widgets.task_completion_projects.first() {
            header.extend(first.weeks.iter().cloned());
        }
        wtr.write_record(&header)?;
        for entry in &widgets.task_completion_projects {
            let mut record = vec![entry.name.clone()];
            record.extend(entry.data.iter().map(|n| n.to_string()));
            wtr.write_record(&record)?;
        }

        wtr.flush()?;
        Ok(())
    }

    fn details_csv(&self, details: &AnalyticsDetails, offset: &FixedOffset) -> Result<()> {
        let mut wtr = self.csv_writer()?;
        wtr.write_record(["View", "Group", "ID", "Title", "Status", "Stack", "Due", "Extra"])?;

        for project in &details.progress_details {
            for task in &project.tasks {
                wtr.write_record([
                    "progress".to_string(),
                    project.name.clone(),
                    task.id.to_string(),
                    task.title.clone(),
                    task.status.to_string(),
                    task.stage.clone(),
                    due_day(task.due, offset),
                    String::new(),
                ])?;
            }
        }
        for category in &details.discipline_details {
            for task in &category.tasks {
                wtr.write_record([
                    "discipline".to_string(),
                    category.name.clone(),
                    task.id.to_string(),
                    task.title.clone(),
                    task.status.to_string(),
                    task.stage.clone(),
                    String::new(),
                    task.project.clone(),
                ])?;
            }
        }
        for project in &details.delay_details {
            for task in &project.tasks {
                let extra = match task.days_overdue {
                    Some(days) => format!("{} ({} days)", task.category.as_str(), days),
                    None => task.category.as_str().to_string(),
                };
                wtr.write_record([
                    "delay".to_string(),
                    project.name.clone(),
                    task.id.to_string(),
                    task.title.clone(),
                    task.status.to_string(),
                    task.stage.clone(),
                    due_day(task.due, offset),
                    extra,
                ])?;
            }
        }
        for project in &details.completion_details {
            for task in &project.tasks {
                wtr.write_record([
                    "completion".to_string(),
                    project.name.clone(),
                    task.id.to_string(),
                    task.title.clone(),
                    "done".to_string(),
                    task.stage.clone(),
                    due_day(task.due, offset),
                    day(Some(task.completed_at), offset),
                ])?;
            }
        }

        wtr.flush()?;
        Ok(())
    }

    fn alerts_csv(&self, feed: &AlertFeed, details: &AlertDetails, offset: &FixedOffset) -> Result<()> {
        let mut wtr = self.csv_writer()?;

        wtr.write_record(["ALERTS"])?;
        wtr.write_record(["Badge", "Rule", "Description"])?;
        for alert in &feed.alerts {
            wtr.write_record([alert.label, alert.rule.as_str(), alert.description.as_str()])?;
        }

        wtr.write_record([""])?;
        wtr.write_record(["SUMMARY"])?;
        wtr.write_record(["Metric", "Value", "Status"])?;
        for entry in &details.summary {
            wtr.write_record([entry.label.to_string(), entry.value.to_string(), entry.severity.to_string()])?;
        }

        wtr.write_record([""])?;
        wtr.write_record(["TASKS"])?;
        wtr.write_record(["List", "Project", "ID", "Title", "Stack", "Due"])?;
        let mut lists: Vec<(&str, &[ProjectTaskGroup])> = vec![("overdue", &details.overdue)];
        if let Some(unassigned) = &details.unassigned {
            lists.push(("unassigned", unassigned));
        }
        lists.push(("missing due date", &details.missing_due_date));
        for (list, groups) in lists {
            for group in groups {
                for task in &group.tasks {
                    wtr.write_record([
                        list.to_string(),
                        group.project.clone(),
                        task.id.to_string(),
                        task.title.clone(),
                        task.stage.clone(),
                        due_day(task.due, offset),
                    ])?;
                }
            }
        }

        wtr.flush()?;
        Ok(())
    }

    fn analytics_excel(&self, widgets: &AnalyticsWidgets) -> Result<()> {
        let mut workbook = Workbook::new();
        let header_format = header_format();

        let sheet = workbook.add_worksheet().set_name("Progress")?;
        write_headers(sheet, 0, &["Project", "Progress (%)"], &header_format)?;
        for (i, entry) in widgets.project_progress.iter().enumerate() {
            let row = i as u32 + 1;
            sheet.write_string(row, 0, &entry.name)?;
            sheet.write_number(row, 1, entry.progress as f64)?;
        }
        sheet.autofit();

        let sheet = workbook.add_worksheet().set_name("Disciplines")?;
        write_headers(sheet, 0, &["Discipline", "Progress (%)"], &header_format)?;
        for (i, entry) in widgets.productivity_by_discipline.iter().enumerate() {
            let row = i as u32 + 1;
            sheet.write_string(row, 0, &entry.name)?;
            sheet.write_number(row, 1, entry.progress as f64)?;
        }
        sheet.autofit();

        let sheet = workbook.add_worksheet().set_name("Delay")?;
        write_headers(sheet, 0, &["Project", "On-time (%)", "Delayed (%)", "Blocked (%)"], &header_format)?;
        for (i, entry) in widgets.task_delay_projects.iter().enumerate() {
            let row = i as u32 + 1;
            sheet.write_string(row, 0, &entry.name)?;
            for (col, value) in entry.chart.data.iter().enumerate() {
                sheet.write_number(row, col as u16 + 1, *value as f64)?;
            }
        }
        sheet.autofit();

        let sheet = workbook.add_worksheet().set_name("Velocity")?;
        sheet.write_string_with_format(0, 0, "Project", &header_format)?;
        if let Some(first) = widgets.task_completion_projects.first() {
            for (col, week) in first.weeks.iter().enumerate() {
                sheet.write_string_with_format(0, col as u16 + 1, week, &header_format)?;
            }
        }
        for (i, entry) in widgets.task_completion_projects.iter().enumerate() {
            let row = i as u32 + 1;
            sheet.write_string(row, 0, &entry.name)?;
            for (col, count) in entry.data.iter().enumerate() {
                sheet.write_number(row, col as u16 + 1, *count as f64)?;
            }
        }
        sheet.autofit();

        workbook.save(&self.output_path)?;
        Ok(())
    }

    fn details_excel(&self, details: &AnalyticsDetails, offset: &FixedOffset) -> Result<()> {
        let mut workbook = Workbook::new();
        let header_format = header_format();

        let sheet = workbook.add_worksheet().set_name("Progress")?;
        write_headers(sheet, 0, &["Project", "ID", "Title", "Status", "Stack", "Due"], &header_format)?;
        let mut row = 1;
        for project in &details.progress_details {
            for task in &project.tasks {
                sheet.write_string(row, 0, &project.name)?;
                sheet.write_number(row, 1, task.id as f64)?;
                sheet.write_string(row, 2, &task.title)?;
                sheet.write_string(row, 3, task.status.as_str())?;
                sheet.write_string(row, 4, &task.stage)?;
                sheet.write_string(row, 5, due_day(task.due, offset))?;
                row += 1;
            }
        }
        sheet.autofit();

        let sheet = workbook.add_worksheet().set_name("Disciplines")?;
        write_headers(sheet, 0, &["Discipline", "ID", "Title", "Status", "Project", "Stack"], &header_format)?;
        let mut row = 1;
        for category in &details.discipline_details {
            for task in &category.tasks {
                sheet.write_string(row, 0, &category.name)?;
                sheet.write_number(row, 1, task.id as f64)?;
                sheet.write_string(row, 2, &task.title)?;
                sheet.write_string(row, 3, task.status.as_str())?;
                sheet.write_string(row, 4, &task.project)?;
                sheet.write_string(row, 5, &task.stage)?;
                row += 1;
            }
        }
        sheet.autofit();

        let sheet = workbook.add_worksheet().set_name("Delay")?;
        write_headers(
            sheet,
            0,
            &["Project", "ID", "Title", "Category", "Stack", "Due", "Days overdue"],
            &header_format,
        )?;
        let mut row = 1;
        for project in &details.delay_details {
            for task in &project.tasks {
                sheet.write_string(row, 0, &project.name)?;
                sheet.write_number(row, 1, task.id as f64)?;
                sheet.write_string(row, 2, &task.title)?;
                sheet.write_string(row, 3, task.category.as_str())?;
                sheet.write_string(row, 4, &task.stage)?;
                sheet.write_string(row, 5, due_day(task.due, offset))?;
                if let Some(days) = task.days_overdue {
                    sheet.write_number(row, 6, days as f64)?;
                }
                row += 1;
            }
        }
        sheet.autofit();

        let sheet = workbook.add_worksheet().set_name("Completions")?;
        write_headers(sheet, 0, &["Project", "ID", "Title", "Completed", "Stack", "Due"], &header_format)?;
        let mut row = 1;
        for project in &details.completion_details {
            for task in &project.tasks {
                sheet.write_string(row, 0, &project.name)?;
                sheet.write_number(row, 1, task.id as f64)?;
                sheet.write_string(row, 2, &task.title)?;
                sheet.write_string(row, 3, day(Some(task.completed_at), offset))?;
                sheet.write_string(row, 4, &task.stage)?;
                sheet.write_string(row, 5, due_day(task.due, offset))?;
                row += 1;
            }
        }
        sheet.autofit();

        workbook.save(&self.output_path)?;
        Ok(())
    }

    fn alerts_excel(&self, feed: &AlertFeed, details: &AlertDetails, offset: &FixedOffset) -> Result<()> {
        let mut workbook = Workbook::new();
        let header_format = header_format();

        let sheet = workbook.add_worksheet().set_name("Alerts")?;
        write_headers(sheet, 0, &["Badge", "Rule", "Description"], &header_format)?;
        for (i, alert) in feed.alerts.iter().enumerate() {
            let row = i as u32 + 1;
            sheet.write_string(row, 0, alert.label)?;
            sheet.write_string(row, 1, alert.rule.as_str())?;
            sheet.write_string(row, 2, &alert.description)?;
        }
        sheet.autofit();

        let sheet = workbook.add_worksheet().set_name("Summary")?;
        write_headers(sheet, 0, &["Metric", "Value", "Status"], &header_format)?;
        for (i, entry) in details.summary.iter().enumerate() {
            let row = i as u32 + 1;
            sheet.write_string(row, 0, entry.label)?;
            sheet.write_number(row, 1, entry.value as f64)?;
            sheet.write_string(row, 2, entry.severity.label())?;
        }
        sheet.autofit();

        task_group_sheet(workbook.add_worksheet().set_name("Overdue")?, &details.overdue, offset, &header_format)?;
        if let Some(unassigned) = &details.unassigned {
            task_group_sheet(workbook.add_worksheet().set_name("Unassigned")?, unassigned, offset, &header_format)?;
        }
        task_group_sheet(
            workbook.add_worksheet().set_name("No due date")?,
            &details.missing_due_date,
            offset,
            &header_format,
        )?;

        let sheet = workbook.add_worksheet().set_name("Stalled")?;
        write_headers(sheet, 0, &["Project", "Last activity", "Days inactive"], &header_format)?;
        for (i, stalled) in details.stalled_projects.iter().enumerate() {
            let row = i as u32 + 1;
            sheet.write_string(row, 0, &stalled.project)?;
            sheet.write_string(row, 1, day(Some(stalled.last_activity), offset))?;
            sheet.write_number(row, 2, stalled.days_inactive as f64)?;
        }
        sheet.autofit();

        workbook.save(&self.output_path)?;
        Ok(())
    }
}

fn header_format() -> Format {
    Format::new().set_bold().set_background_color(Color::Gray)
}

fn write_headers(sheet: &mut Worksheet, row: u32, headers: &[&str], format: &Format) -> Result<()> {
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(row, col as u16, *header, format)?;
    }
    Ok(())
}

fn task_group_sheet(sheet: &mut Worksheet, groups: &[ProjectTaskGroup], offset: &FixedOffset, format: &Format) -> Result<()> {
    write_headers(sheet, 0, &["Project", "ID", "Title", "Stack", "Due"], format)?;
    let mut row = 1;
    for group in groups {
        for task in &group.tasks {
            sheet.write_string(row, 0, &group.project)?;
            sheet.write_number(row, 1, task.id as f64)?;
            sheet.write_string(row, 2, &task.title)?;
            sheet.write_string(row, 3, &task.stage)?;
            sheet.write_string(row, 4, due_day(task.due, offset))?;
            row += 1;
        }
    }
    sheet.autofit();
    Ok(())
}
