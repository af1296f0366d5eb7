//! One dashboard pass: fetch, classify, aggregate.
//!
//! [`Dashboard`] is what callers hold. Each method performs a full pass
//! against the task source and returns serializable output; nothing is kept
//! between calls.
//!
//! ```rust,no_run
//! use deckpulse::db::store::SqliteStore;
//! use deckpulse::libs::config::Config;
//! use deckpulse::libs::dashboard::Dashboard;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::load()?;
//! let dashboard = Dashboard::from_config(SqliteStore::from_config(&config)?, &config);
//! let data = dashboard.data(config.now()?).await?;
//! println!("{}", serde_json::to_string_pretty(&data)?);
//! # Ok(())
//! # }
//! ```

use super::alerts::{self, Alert, AlertDetails, AlertFeed, AlertOptions, AlertRule, AlertSummary};
use super::analytics::{self, AnalyticsDetails, AnalyticsWidgets};
use super::classifier::CompletionRule;
use super::config::Config;
use super::error::DashboardResult;
use super::source::{fetch_snapshot, Snapshot, TaskSource};
use super::task::RejectedRow;
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::sync::Arc;

/// Widgets and alert feed, shaped for the dashboard front end.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub generated_at: DateTime<FixedOffset>,
    #[serde(flatten)]
    pub widgets: AnalyticsWidgets,
    pub alerts: Vec<Alert>,
    pub summary: AlertSummary,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped_rules: Vec<AlertRule>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<RejectedRow>,
}

impl DashboardData {
    pub fn from_snapshot(snapshot: &Snapshot, options: &AlertOptions) -> Self {
        let feed = alerts::evaluate(snapshot, options);
        DashboardData {
            generated_at: snapshot.now,
            widgets: analytics::build_widgets(snapshot),
            alerts: feed.alerts,
            summary: feed.summary,
            skipped_rules: feed.skipped,
            rejected: snapshot.rejected.clone(),
        }
    }
}

/// Everything a pass can produce, from a single snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    #[serde(flatten)]
    pub data: DashboardData,
    pub details: AnalyticsDetails,
    pub alert_details: AlertDetails,
}

pub struct Dashboard<S: TaskSource> {
    source: Arc<S>,
    rule: CompletionRule,
    options: AlertOptions,
}

impl<S: TaskSource> Dashboard<S> {
    pub fn new(source: S, rule: CompletionRule, options: AlertOptions) -> Self {
        Dashboard {
            source: Arc::new(source),
            rule,
            options,
        }
    }

    pub fn from_config(source: S, config: &Config) -> Self {
        Self::new(source, config.completion_rule(), config.alert_options())
    }

    pub async fn snapshot(&self, now: DateTime<FixedOffset>) -> DashboardResult<Snapshot> {
        fetch_snapshot(Arc::clone(&self.source), &self.rule, now).await
    }

    pub async fn data(&self, now: DateTime<FixedOffset>) -> DashboardResult<DashboardData> {
        let snapshot = self.snapshot(now).await?;
        Ok(DashboardData::from_snapshot(&snapshot, &self.options))
    }

    pub async fn widgets(&self, now: DateTime<FixedOffset>) -> DashboardResult<AnalyticsWidgets> {
        Ok(analytics::build_widgets(&self.snapshot(now).await?))
    }

    pub async fn details(&self, now: DateTime<FixedOffset>) -> DashboardResult<AnalyticsDetails> {
        Ok(analytics::build_details(&self.snapshot(now).await?))
    }

    pub async fn alerts(&self, now: DateTime<FixedOffset>) -> DashboardResult<AlertFeed> {
        Ok(alerts::evaluate(&self.snapshot(now).await?, &self.options))
    }

    pub async fn alert_details(&self, now: DateTime<FixedOffset>) -> DashboardResult<AlertDetails> {
        let snapshot = self.snapshot(now).await?;
        let feed = alerts::evaluate(&snapshot, &self.options);
        Ok(alerts::details(&snapshot, &feed))
    }

    pub async fn report(&self, now: DateTime<FixedOffset>) -> DashboardResult<DashboardReport> {
        let snapshot = self.snapshot(now).await?;
        let data = DashboardData::from_snapshot(&snapshot, &self.options);
        let feed = AlertFeed {
            alerts: data.alerts.clone(),
            summary: data.summary.clone(),
            skipped: data.skipped_rules.clone(),
        };
        Ok(DashboardReport {
            details: analytics::build_details(&snapshot),
            alert_details: alerts::details(&snapshot, &feed),
            data,
        })
    }
}
