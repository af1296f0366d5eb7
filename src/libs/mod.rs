//! Core library modules for deckpulse.
//!
//! ## Layout
//!
//! - **Domain**: [`task`] records, the [`classifier`] and the [`error`] type
//! - **Engines**: [`analytics`] widgets and details, [`alerts`] feed and details
//! - **Orchestration**: [`source`] snapshot fetching and the [`dashboard`] facade
//! - **Infrastructure**: configuration, data storage, messaging, telemetry
//! - **Presentation**: console tables in [`view`], file output in [`export`]
//!
//! ## Usage
//!
//! ```rust,no_run
//! use deckpulse::db::store::SqliteStore;
//! use deckpulse::libs::{config::Config, dashboard::Dashboard};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::load()?;
//! let dashboard = Dashboard::from_config(SqliteStore::from_config(&config)?, &config);
//! let feed = dashboard.alerts(config.now()?).await?;
//! # Ok(())
//! # }
//! ```

pub mod alerts;
pub mod analytics;
pub mod app;
pub mod classifier;
pub mod config;
pub mod dashboard;
pub mod data_storage;
pub mod error;
pub mod export;
pub mod messages;
pub mod source;
pub mod task;
pub mod telemetry;
pub mod view;
