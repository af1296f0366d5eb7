//! Details command: the task rows behind each dashboard widget.

use super::pass::{open_dashboard, print_json, store_error, PassArgs};
use crate::libs::{config::Config, view::View};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct DetailsArgs {
    #[command(flatten)]
    pass: PassArgs,
}

pub async fn cmd(args: DetailsArgs) -> Result<()> {
    let config = Config::load()?;
    let now = args.pass.reference_now(&config)?;
    let details = open_dashboard(&config)?.details(now).await.map_err(store_error)?;

    if args.pass.json {
        return print_json(&details);
    }
    View::details(&details, now.offset())
}
