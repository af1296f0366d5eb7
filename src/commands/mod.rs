pub mod alerts;
pub mod dashboard;
pub mod details;
pub mod export;
pub mod init;
#[cfg(debug_assertions)]
pub mod migrations;
pub mod pass;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Show project widgets and the alert feed")]
    Dashboard(dashboard::DashboardArgs),
    #[command(about = "Show the tasks behind each widget")]
    Details(details::DetailsArgs),
    #[command(about = "Show alerts")]
    Alerts(alerts::AlertsArgs),
    #[command(about = "Export dashboard data to CSV, JSON or Excel")]
    Export(export::ExportArgs),
    #[cfg(debug_assertions)]
    #[command(about = "Inspect the local store schema (debug builds)")]
    Migrations(migrations::MigrationsArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Dashboard(args) => dashboard::cmd(args).await,
            Commands::Details(args) => details::cmd(args).await,
            Commands::Alerts(args) => alerts::cmd(args).await,
            Commands::Export(args) => export::cmd(args).await,
            #[cfg(debug_assertions)]
            Commands::Migrations(args) => migrations::cmd(args),
        }
    }
}
