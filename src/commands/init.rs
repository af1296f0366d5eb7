//! Configuration setup command.
//!
//! Without flags this runs the interactive wizard. `--store` sets the store
//! path directly, which is enough for scripted setups, and `--create-store`
//! lays down an empty Deck schema at the configured path.

use crate::{
    db::db::Db,
    libs::{
        config::{Config, CONFIG_FILE_NAME},
        data_storage::DataStorage,
        messages::Message,
    },
    msg_info, msg_success, msg_warning,
};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Use this task store without running the wizard
    #[arg(short, long, value_name = "PATH")]
    store: Option<PathBuf>,

    /// Create an empty task store at the configured path
    #[arg(long)]
    create_store: bool,

    /// Remove the existing configuration file
    #[arg(short, long, conflicts_with_all = ["store", "create_store"])]
    delete: bool,
}

pub fn cmd(init_args: InitArgs) -> Result<()> {
    if init_args.delete {
        if Config::delete()? {
            msg_success!(Message::ConfigDeleted);
        } else {
            msg_warning!(Message::ConfigFileNotFound);
        }
        return Ok(());
    }

    let config = match init_args.store {
        Some(path) => {
            let mut config = Config::read()?;
            config.store.path = Some(path);
            config
        }
        None if init_args.create_store => Config::read()?,
        None => Config::init()?,
    };
    config.save()?;
    msg_success!(Message::ConfigSaved);
    msg_info!(Message::ConfigLocation(DataStorage::new().get_path(CONFIG_FILE_NAME)?.display().to_string()));

    if init_args.create_store {
        let path = config.store_path()?;
        Db::create(&path)?;
        msg_success!(Message::StoreCreated(path.display().to_string()));
    }

    Ok(())
}
