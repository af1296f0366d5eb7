//! Export command: writes a dashboard pass to CSV, JSON or Excel.

use super::pass::{open_dashboard, reference_now, store_error};
use crate::libs::{
    config::Config,
    export::{ExportData, ExportFormat, Exporter},
};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// What to export
    #[arg(value_enum, default_value = "all")]
    data: ExportData,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: ExportFormat,

    /// Output file, `deckpulse_export_<timestamp>.<ext>` by default.
    ///
    /// For `all` in CSV or Excel the parts go to `<stem>_analytics`,
    /// `<stem>_details` and `<stem>_alerts` next to it.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Evaluate as of this instant (RFC 3339) instead of the current time
    #[arg(long, value_name = "RFC3339")]
    now: Option<String>,
}

pub async fn cmd(args: ExportArgs) -> Result<()> {
    let config = Config::load()?;
    let now = reference_now(&config, args.now.as_deref())?;

    let report = open_dashboard(&config)?.report(now).await.map_err(store_error)?;
    Exporter::new(args.format, args.output).export(args.data, &report)
}
