// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

#![allow(clippy::extra_unused_lifetimes)]

//! Contains the database ORM and database migrations for the levelup controller
//! Builds upon levelup-database
//!
//! Every entity lives in its own module and exposes its queries as associated
//! functions taking a [`database::DbConnection`]:
//! ```rust,no_run
//! # use levelup_db_storage::events::EventDetails;
//! # use levelup_db_storage::games::{Game, GameId};
//! # fn events_of_game(db: &database::Db, game_id: GameId) -> database::Result<()> {
//! let mut conn = db.get_conn()?;
//!
//! let game = Game::get(&mut conn, game_id)?;
//! let events = EventDetails::get_all(&mut conn, Some(game.id))?;
//! # Ok(())
//! # }
//! ```

#[macro_use]
extern crate diesel;

#[macro_use]
mod macros;
mod schema;

pub mod events;
pub mod game_types;
pub mod gamers;
pub mod games;
pub mod migrations;
pub mod tokens;
pub mod users;
