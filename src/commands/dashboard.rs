//! Dashboard command: the four widgets, the alert feed and its summary.

use super::pass::{open_dashboard, print_json, store_error, PassArgs};
use crate::libs::{config::Config, view::View};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct DashboardArgs {
    #[command(flatten)]
    pass: PassArgs,
}

pub async fn cmd(args: DashboardArgs) -> Result<()> {
    let config = Config::load()?;
    let now = args.pass.reference_now(&config)?;
    let data = open_dashboard(&config)?.data(now).await.map_err(store_error)?;

    if args.pass.json {
        return print_json(&data);
    }
    View::dashboard(&data)
}
