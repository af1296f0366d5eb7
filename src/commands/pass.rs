//! Options and plumbing shared by the commands that run a dashboard pass.

use crate::{
    db::store::SqliteStore,
    libs::{config::Config, dashboard::Dashboard, error::DashboardError, messages::Message},
    msg_debug, msg_error_anyhow,
};
use anyhow::Result;
use chrono::{DateTime, FixedOffset};
use clap::Args;
use serde::Serialize;

#[derive(Debug, Args)]
pub struct PassArgs {
    /// Print JSON instead of tables
    #[arg(long)]
    pub json: bool,

    /// Evaluate as of this instant (RFC 3339) instead of the current time
    #[arg(long, value_name = "RFC3339")]
    pub now: Option<String>,
}

impl PassArgs {
    pub fn reference_now(&self, config: &Config) -> Result<DateTime<FixedOffset>> {
        reference_now(config, self.now.as_deref())
    }
}

/// The reference instant of a pass: `now` if given, the current time
/// otherwise, in the configured offset either way.
pub fn reference_now(config: &Config, now: Option<&str>) -> Result<DateTime<FixedOffset>> {
    match now {
        None => config.now(),
        Some(value) => {
            let instant = DateTime::parse_from_rfc3339(value.trim())
                .map_err(|_| msg_error_anyhow!(Message::InvalidNowTimestamp(value.to_string())))?;
            Ok(instant.with_timezone(&config.reference_offset()?))
        }
    }
}

pub fn open_dashboard(config: &Config) -> Result<Dashboard<SqliteStore>> {
    let store = SqliteStore::from_config(config)?;
    msg_debug!(Message::StoreLocation(store.path().display().to_string()));
    Ok(Dashboard::from_config(store, config))
}

/// Turns an unreachable store into a user-facing message.
pub fn store_error(err: DashboardError) -> anyhow::Error {
    match err {
        DashboardError::SourceUnavailable(reason) => msg_error_anyhow!(Message::StoreUnavailable(reason)),
        other => other.into(),
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
