// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use controller_shared::settings::Settings;
use std::path::PathBuf;

mod game_types;
mod gamers;

#[derive(Parser, Debug, Clone)]
#[clap(name = "levelup-controller", version)]
pub struct Args {
    #[clap(
        short,
        long,
        default_value = "config.toml",
        help = "Specify path to configuration file"
    )]
    pub config: PathBuf,

    #[clap(subcommand)]
    cmd: Option<SubCommand>,
}

#[derive(Subcommand, Debug, Clone)]
#[clap(rename_all = "kebab_case")]
enum SubCommand {
    /// Migrate the db. This is done automatically during start of the controller,
    /// but can be done without starting the controller using this command.
    MigrateDb,

    /// Manage gamers and their access tokens
    #[clap(subcommand)]
    Gamers(gamers::Command),

    /// Manage the available game types
    #[clap(subcommand)]
    GameTypes(game_types::Command),
}

impl Args {
    /// Returns true if we want to startup the controller after we finished the cli part
    pub fn controller_should_start(&self) -> bool {
        self.cmd.is_none()
    }
}

/// Parses the CLI-Arguments into [`Args`]
///
/// Also runs (optional) cli commands if necessary
pub async fn parse_args() -> Result<Args> {
    let args = Args::parse();

    if let Some(sub_command) = args.cmd.clone() {
        let settings = Settings::load(&args.config)?;

        match sub_command {
            SubCommand::MigrateDb => {
                let report = db_storage::migrations::migrate_from_url(&settings.database.url)
                    .await
                    .context("Failed to migrate database")?;

                println!(
                    "Applied {} migration(s)",
                    report.applied_migrations().len()
                );
            }
            SubCommand::Gamers(command) => {
                gamers::handle_command(settings, command)?;
            }
            SubCommand::GameTypes(command) => {
                game_types::handle_command(settings, command)?;
            }
        }
    }

    Ok(args)
}
