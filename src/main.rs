mod config;
mod contacts;
mod entries;
mod focus;
mod logging;
mod overview;
mod profile;
mod storage;
mod ui;

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use config::Config;
use storage::{ProfileSlot, SlotRead, SqliteStore};

#[derive(Parser, Debug)]
#[command(name = "namo", version, about = "Terminal dashboard for your contact profile")]
struct Cli {
    /// Read configuration from this file instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Inspect or reset the saved profile
    #[command(subcommand)]
    Profile(ProfileCommand),
}

#[derive(Subcommand, Debug)]
enum ProfileCommand {
    /// Print the saved profile as JSON
    Show,
    /// Delete the saved profile
    Clear,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init()?;
    let config = config::load(cli.config.as_deref())?;
    tracing::debug!(path = %config.config_path.display(), "configuration loaded");

    let mut store = SqliteStore::open(&config.storage_path)?;

    if let Some(Command::Profile(command)) = cli.command {
        return handle_profile(command, &config, &mut store);
    }

    let mut app = ui::app::App::new(&config, &mut store)?;
    app.run()?;

    Ok(())
}

fn handle_profile(command: ProfileCommand, config: &Config, store: &mut SqliteStore) -> Result<()> {
    let slot = ProfileSlot::new(config.slot_key.clone());
    match command {
        ProfileCommand::Show => match slot.read(&*store)? {
            SlotRead::Present(profile) => {
                println!("{}", serde_json::to_string_pretty(&profile)?);
            }
            SlotRead::Absent => println!("No saved profile"),
            SlotRead::Corrupt(reason) => {
                bail!("saved profile in slot '{}' is unreadable: {}", slot.key(), reason)
            }
        },
        ProfileCommand::Clear => {
            slot.clear(store)?;
            println!("Cleared saved profile from slot '{}'", slot.key());
        }
    }
    Ok(())
}
