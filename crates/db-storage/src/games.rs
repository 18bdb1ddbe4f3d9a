// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Games and their per-request aggregates
use crate::game_types::{GameType, GameTypeId};
use crate::gamers::{Gamer, GamerId, GamerProfile};
use crate::schema::{events, game_types, gamers, games, users};
use crate::users::User;
use database::{DatabaseError, DbConnection, Result};
use diesel::{
    AsChangeset, ExpressionMethods, Insertable, JoinOnDsl, QueryDsl, Queryable, RunQueryDsl,
};
use std::collections::HashMap;

diesel_newtype! {
    #[derive(Copy)] GameId(i64) => diesel::sql_types::BigInt
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable)]
pub struct Game {
    pub id: GameId,
    pub title: String,
    pub maker: String,
    pub number_of_players: i32,
    pub skill_level: i32,
    pub game_type_id: GameTypeId,
    pub creator_id: GamerId,
}

impl Game {
    #[tracing::instrument(err, skip_all)]
    pub fn get(conn: &mut DbConnection, game_id: GameId) -> Result<Game> {
        let game = games::table.filter(games::id.eq(game_id)).get_result(conn)?;

        Ok(game)
    }

    /// Deletes the game, its events are removed by the database
    #[tracing::instrument(err, skip_all)]
    pub fn delete_by_id(conn: &mut DbConnection, game_id: GameId) -> Result<()> {
        let lines_changed = diesel::delete(games::table)
            .filter(games::id.eq(game_id))
            .execute(conn)?;

        if lines_changed == 0 {
            return Err(DatabaseError::NotFound);
        }

        Ok(())
    }

    /// Returns true if the requester may modify or delete this game
    ///
    /// Superusers may modify every game, even without a gamer profile.
    pub fn can_be_modified_by(&self, gamer_id: Option<GamerId>, is_superuser: bool) -> bool {
        is_superuser || gamer_id == Some(self.creator_id)
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = games)]
pub struct NewGame {
    pub title: String,
    pub maker: String,
    pub number_of_players: i32,
    pub skill_level: i32,
    pub game_type_id: GameTypeId,
    pub creator_id: GamerId,
}

impl NewGame {
    #[tracing::instrument(err, skip_all)]
    pub fn insert(self, conn: &mut DbConnection) -> Result<Game> {
        let game = self.insert_into(games::table).get_result(conn)?;

        Ok(game)
    }
}

/// Overwrites all mutable fields of a game. The creator never changes.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = games)]
pub struct UpdateGame {
    pub title: String,
    pub maker: String,
    pub number_of_players: i32,
    pub skill_level: i32,
    pub game_type_id: GameTypeId,
}

impl UpdateGame {
    #[tracing::instrument(err, skip_all)]
    pub fn apply(self, conn: &mut DbConnection, game_id: GameId) -> Result<Game> {
        let game = diesel::update(games::table)
            .filter(games::id.eq(game_id))
            .set(self)
            .returning(games::all_columns)
            .get_result(conn)?;

        Ok(game)
    }
}

/// A game together with its type, creator and event counts
#[derive(Debug, Clone)]
pub struct GameDetails {
    pub game: Game,
    pub game_type: GameType,
    pub creator: GamerProfile,
    pub event_count: i64,
    pub user_event_count: i64,
}

impl GameDetails {
    fn new(
        (game, game_type, creator, user): (Game, GameType, Gamer, User),
        event_counts: &HashMap<GameId, i64>,
        requester: GamerId,
    ) -> Self {
        let event_count = event_counts.get(&game.id).copied().unwrap_or_default();
        let user_event_count = user_event_count(&game, requester, event_count);

        Self {
            game,
            game_type,
            creator: GamerProfile::from((creator, user)),
            event_count,
            user_event_count,
        }
    }

    /// Returns all games ordered by id, annotated for the requesting gamer
    #[tracing::instrument(err, skip_all)]
    pub fn get_all(conn: &mut DbConnection, requester: GamerId) -> Result<Vec<GameDetails>> {
        let rows: Vec<(Game, GameType, Gamer, User)> = games::table
            .inner_join(game_types::table)
            .inner_join(gamers::table.on(gamers::id.eq(games::creator_id)))
            .inner_join(users::table.on(users::id.eq(gamers::user_id)))
            .select((
                games::all_columns,
                game_types::all_columns,
                gamers::all_columns,
                users::all_columns,
            ))
            .order_by(games::id)
            .load(conn)?;

        let event_counts = event_counts(conn)?;

        Ok(rows
            .into_iter()
            .map(|row| Self::new(row, &event_counts, requester))
            .collect())
    }

    /// Returns a single game annotated for the requesting gamer
    #[tracing::instrument(err, skip_all)]
    pub fn get(conn: &mut DbConnection, game_id: GameId, requester: GamerId) -> Result<Self> {
        let row: (Game, GameType, Gamer, User) = games::table
            .inner_join(game_types::table)
            .inner_join(gamers::table.on(gamers::id.eq(games::creator_id)))
            .inner_join(users::table.on(users::id.eq(gamers::user_id)))
            .filter(games::id.eq(game_id))
            .select((
                games::all_columns,
                game_types::all_columns,
                gamers::all_columns,
                users::all_columns,
            ))
            .get_result(conn)?;

        let event_count: i64 = events::table
            .filter(events::game_id.eq(game_id))
            .count()
            .get_result(conn)?;

        let event_counts = HashMap::from([(game_id, event_count)]);

        Ok(Self::new(row, &event_counts, requester))
    }
}

/// Number of events per game. Games without events are absent.
fn event_counts(conn: &mut DbConnection) -> Result<HashMap<GameId, i64>> {
    let counts: Vec<(GameId, i64)> = events::table
        .group_by(events::game_id)
        .select((events::game_id, diesel::dsl::count(events::id)))
        .load(conn)?;

    Ok(counts.into_iter().collect())
}

/// Counts the game's events under the filter "game creator is the requester".
///
/// The filter applies to the creator of the game and not to the organizer of
/// the events, so the result is either all events of the game or none.
pub fn user_event_count(game: &Game, requester: GamerId, event_count: i64) -> i64 {
    if game.creator_id == requester {
        event_count
    } else {
        0
    }
}
