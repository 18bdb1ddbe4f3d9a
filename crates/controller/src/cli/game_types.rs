// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use anyhow::{Context, Result};
use clap::Subcommand;
use controller_shared::settings::Settings;
use database::Db;
use db_storage::game_types::{GameType, GameTypeId, NewGameType};
use tabled::{Style, Table, Tabled};

#[derive(Subcommand, Debug, Clone)]
#[clap(rename_all = "kebab_case")]
pub enum Command {
    /// Add a new game type
    Create { label: String },
    /// List all available game types
    List,
}

pub fn handle_command(settings: Settings, command: Command) -> Result<()> {
    let db = Db::connect(&settings.database).context("Failed to connect to database")?;
    let mut conn = db.get_conn()?;

    match command {
        Command::Create { label } => {
            let game_type = NewGameType { label }.insert(&mut conn)?;

            println!("Created game type {}", game_type.id);
        }
        Command::List => {
            let rows: Vec<GameTypeTableRow> = GameType::get_all(&mut conn)?
                .into_iter()
                .map(|game_type| GameTypeTableRow {
                    id: game_type.id,
                    label: game_type.label,
                })
                .collect();

            println!("{}", Table::new(rows).with(Style::psql()));
        }
    }

    Ok(())
}

#[derive(Tabled)]
struct GameTypeTableRow {
    id: GameTypeId,
    label: String,
}
