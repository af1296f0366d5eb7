//! Configuration management for deckpulse.
//!
//! Settings live in a JSON file inside the platform data directory resolved by
//! [`DataStorage`]. A missing file is not an error: every section has defaults
//! that work against a Deck store with the stock `Approved/Done` stack.
//!
//! ## Sections
//!
//! - **store**: where the task store lives and how completion is read from it
//! - **analytics**: reference time zone and the stalled-project threshold
//!
//! ## Environment Overrides
//!
//! [`Config::load`] applies these on top of the file (a `.env` file in the
//! working directory is honoured, see `main`):
//!
//! - `DECKPULSE_STORE`: path of the SQLite store
//! - `DECKPULSE_UTC_OFFSET`: reference offset in minutes east of UTC
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use deckpulse::libs::config::Config;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::load()?;
//! let rule = config.completion_rule();
//! let now = config.now()?;
//! # Ok(())
//! # }
//! ```

use super::alerts::{AlertOptions, DEFAULT_STALLED_AFTER_DAYS};
use super::classifier::{CompletionRule, CompletionSource, DEFAULT_DONE_STAGE};
use super::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::{msg_bail_anyhow, msg_error_anyhow, msg_print};
use anyhow::Result;
use chrono::{DateTime, FixedOffset, Utc};
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect, Select};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::{self, File};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration file name inside the data directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Store file used when no path is configured.
pub const DEFAULT_STORE_FILE_NAME: &str = "deck.db";

pub const STORE_ENV: &str = "DECKPULSE_STORE";
pub const UTC_OFFSET_ENV: &str = "DECKPULSE_UTC_OFFSET";

pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

/// A configurable section offered by the setup wizard.
#[derive(Debug, Clone)]
pub struct ConfigModule {
    pub key: String,
    pub name: String,
}

/// Task store settings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the SQLite store. Defaults to `deck.db` in the data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Title of the stack that marks a card as done.
    pub done_stage: String,

    /// Where completion is read from. Exactly one source per deployment.
    pub completion_source: CompletionSource,

    /// How long a read waits on a locked store before failing.
    pub busy_timeout_ms: u64,
}

/// Aggregation and alerting settings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Offset of the reference time zone, in minutes east of UTC.
    ///
    /// Calendar days (due buckets, week windows, day counts) are taken in
    /// this offset.
    pub utc_offset_minutes: i32,

    /// Days without card activity before a project counts as stalled.
    pub stalled_after_days: i64,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            path: None,
            done_stage: DEFAULT_DONE_STAGE.to_string(),
            completion_source: CompletionSource::default(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        AnalyticsConfig {
            utc_offset_minutes: 0,
            stalled_after_days: DEFAULT_STALLED_AFTER_DAYS,
        }
    }
}

impl Config {
    /// Reads the configuration file, falling back to defaults when it does not
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;

        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    /// Reads the configuration and applies environment overrides.
    ///
    /// This is what commands use. [`Config::read`] stays override-free so
    /// that saving never persists a value that came from the environment.
    pub fn load() -> Result<Config> {
        let mut config = Self::read()?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Removes the configuration file. Returns `false` if there was none.
    pub fn delete() -> Result<bool> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if !config_file_path.exists() {
            return Ok(false);
        }
        fs::remove_file(config_file_path)?;
        Ok(true)
    }

    /// Applies `DECKPULSE_STORE` and `DECKPULSE_UTC_OFFSET`.
    ///
    /// # Errors
    ///
    /// Returns an error if the offset variable is set but is not a valid
    /// number of minutes.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(path) = env::var(STORE_ENV) {
            if !path.trim().is_empty() {
                self.store.path = Some(PathBuf::from(path));
            }
        }

        if let Ok(offset) = env::var(UTC_OFFSET_ENV) {
            let minutes: i32 = offset
                .trim()
                .parse()
                .map_err(|_| msg_error_anyhow!(Message::InvalidUtcOffset(offset.clone())))?;
            self.analytics.utc_offset_minutes = minutes;
        }

        Ok(())
    }

    /// Runs the interactive setup wizard over the selected sections.
    ///
    /// Existing values are offered as defaults, so re-running the wizard only
    /// changes what the user edits.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();

        let modules = vec![
            ConfigModule {
                key: "store".to_string(),
                name: "Task store".to_string(),
            },
            ConfigModule {
                key: "analytics".to_string(),
                name: "Analytics".to_string(),
            },
        ];

        let selected = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&modules.iter().map(|module| &module.name).collect::<Vec<_>>())
            .interact()?;

        for &selection in &selected {
            match modules[selection].key.as_str() {
                "store" => {
                    msg_print!(Message::ConfigModuleStore);
                    config.store = Self::init_store(&config.store)?;
                }
                "analytics" => {
                    msg_print!(Message::ConfigModuleAnalytics);
                    config.analytics = Self::init_analytics(&config.analytics)?;
                }
                _ => {}
            }
        }

        Ok(config)
    }

    fn init_store(current: &StoreConfig) -> Result<StoreConfig> {
        let default_path = match &current.path {
            Some(path) => path.display().to_string(),
            None => DataStorage::new().get_path(DEFAULT_STORE_FILE_NAME)?.display().to_string(),
        };

        let path: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptStorePath.to_string())
            .default(default_path)
            .interact_text()?;

        let done_stage: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptDoneStage.to_string())
            .default(current.done_stage.clone())
            .interact_text()?;

        let sources = [CompletionSource::Stage, CompletionSource::Timestamp];
        let source_names = ["stage (card sits in the done stack)", "timestamp (card has a completion date)"];
        let source_index = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptCompletionSource.to_string())
            .items(&source_names)
            .default(sources.iter().position(|s| *s == current.completion_source).unwrap_or(0))
            .interact()?;

        let busy_timeout_ms: u64 = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptBusyTimeout.to_string())
            .default(current.busy_timeout_ms)
            .interact_text()?;

        Ok(StoreConfig {
            path: Some(PathBuf::from(path)),
            done_stage,
            completion_source: sources[source_index],
            busy_timeout_ms,
        })
    }

    fn init_analytics(current: &AnalyticsConfig) -> Result<AnalyticsConfig> {
        Ok(AnalyticsConfig {
            utc_offset_minutes: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptUtcOffset.to_string())
                .default(current.utc_offset_minutes)
                .validate_with(|minutes: &i32| -> Result<(), String> {
                    minutes
                        .checked_mul(60)
                        .and_then(FixedOffset::east_opt)
                        .map(|_| ())
                        .ok_or_else(|| Message::InvalidUtcOffset(minutes.to_string()).to_string())
                })
                .interact_text()?,
            stalled_after_days: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptStalledAfterDays.to_string())
                .default(current.stalled_after_days)
                .interact_text()?,
        })
    }

    /// Path of the task store, configured or default.
    pub fn store_path(&self) -> Result<PathBuf> {
        match &self.store.path {
            Some(path) => Ok(path.clone()),
            None => DataStorage::new().get_path(DEFAULT_STORE_FILE_NAME),
        }
    }

    pub fn completion_rule(&self) -> CompletionRule {
        CompletionRule::new(self.store.completion_source, &self.store.done_stage)
    }

    pub fn alert_options(&self) -> AlertOptions {
        AlertOptions {
            stalled_after_days: self.analytics.stalled_after_days,
        }
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.store.busy_timeout_ms)
    }

    /// The reference zone of every pass.
    pub fn reference_offset(&self) -> Result<FixedOffset> {
        let minutes = self.analytics.utc_offset_minutes;
        let Some(offset) = minutes.checked_mul(60).and_then(FixedOffset::east_opt) else {
            msg_bail_anyhow!(Message::InvalidUtcOffset(minutes.to_string()));
        };
        Ok(offset)
    }

    /// Current instant in the reference zone.
    pub fn now(&self) -> Result<DateTime<FixedOffset>> {
        Ok(Utc::now().with_timezone(&self.reference_offset()?))
    }
}
