// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use controller_shared::settings::Settings;
use database::{DatabaseError, Db};
use db_storage::gamers::{Gamer, GamerId, NewGamer};
use db_storage::tokens::NewAuthToken;
use db_storage::users::{NewUser, User, UserId};
use diesel::Connection;
use tabled::{Style, Table, Tabled};

#[derive(Subcommand, Debug, Clone)]
#[clap(rename_all = "kebab_case")]
pub enum Command {
    /// Create a user with a gamer profile and print its access token
    Create {
        username: String,
        #[clap(long)]
        first_name: String,
        #[clap(long)]
        last_name: String,
        #[clap(long, default_value = "")]
        bio: String,
        /// Mark the user as staff member
        #[clap(long)]
        staff: bool,
        /// Allow the user to modify everything
        #[clap(long)]
        superuser: bool,
    },
    /// List all gamers
    List,
    /// Issue a new access token for a user, the previous token stops working
    Token { username: String },
}

pub fn handle_command(settings: Settings, command: Command) -> Result<()> {
    let db = Db::connect(&settings.database).context("Failed to connect to database")?;

    match command {
        Command::Create {
            username,
            first_name,
            last_name,
            bio,
            staff,
            superuser,
        } => create_gamer(
            &db,
            NewUser {
                username,
                first_name,
                last_name,
                is_staff: staff,
                is_superuser: superuser,
            },
            bio,
        ),
        Command::List => list_all_gamers(&db),
        Command::Token { username } => issue_token(&db, &username),
    }
}

/// Implementation of the `levelup-controller gamers create <username>` command
fn create_gamer(db: &Db, new_user: NewUser, bio: String) -> Result<()> {
    let mut conn = db.get_conn()?;
    let username = new_user.username.clone();

    let result = conn.transaction::<_, DatabaseError, _>(|conn| {
        let user = new_user.insert(conn)?;

        let gamer = NewGamer {
            user_id: user.id,
            bio,
        }
        .insert(conn)?;

        let token = NewAuthToken::generate(user.id).replace(conn)?;

        Ok((gamer, token))
    });

    let (gamer, token) = match result {
        Err(e) if e.is_unique_violation() => bail!("A user named {username} already exists"),
        result => result?,
    };

    println!(
        "Created gamer\n\tid    = {}\n\ttoken = {}",
        gamer.id, token.key
    );

    Ok(())
}

#[derive(Tabled)]
struct GamerTableRow {
    id: GamerId,
    user_id: UserId,
    username: String,
    full_name: String,
    bio: String,
}

impl GamerTableRow {
    fn from_gamer((gamer, user): (Gamer, User)) -> Self {
        Self {
            id: gamer.id,
            user_id: user.id,
            full_name: user.full_name(),
            username: user.username,
            bio: gamer.bio,
        }
    }
}

/// Implementation of the `levelup-controller gamers list` command
fn list_all_gamers(db: &Db) -> Result<()> {
    let mut conn = db.get_conn()?;

    let rows: Vec<GamerTableRow> = Gamer::get_all_with_user(&mut conn)?
        .into_iter()
        .map(GamerTableRow::from_gamer)
        .collect();

    println!("{}", Table::new(rows).with(Style::psql()));

    Ok(())
}

/// Implementation of the `levelup-controller gamers token <username>` command
fn issue_token(db: &Db, username: &str) -> Result<()> {
    let mut conn = db.get_conn()?;

    let user = User::get_by_username(&mut conn, username)
        .with_context(|| format!("No user named {username}"))?;

    let token = NewAuthToken::generate(user.id).replace(&mut conn)?;

    println!("{}", token.key);

    Ok(())
}
