//! Alerts command: the rule-based feed, or with `--details` the tasks and
//! projects behind it.

use super::pass::{open_dashboard, print_json, store_error, PassArgs};
use crate::libs::{config::Config, view::View};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct AlertsArgs {
    /// List the tasks and projects behind each alert
    #[arg(short, long)]
    details: bool,

    #[command(flatten)]
    pass: PassArgs,
}

pub async fn cmd(args: AlertsArgs) -> Result<()> {
    let config = Config::load()?;
    let now = args.pass.reference_now(&config)?;
    let dashboard = open_dashboard(&config)?;

    if args.details {
        let details = dashboard.alert_details(now).await.map_err(store_error)?;
        if args.pass.json {
            return print_json(&details);
        }
        return View::alert_details(&details, now.offset());
    }

    let feed = dashboard.alerts(now).await.map_err(store_error)?;
    if args.pass.json {
        return print_json(&feed);
    }
    View::alerts(&feed)
}
