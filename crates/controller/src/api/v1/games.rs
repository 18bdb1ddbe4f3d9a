// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Game related API structs and Endpoints
//!
//! The defined structs are exposed to the REST API and will be serialized/deserialized. Similar
//! structs are defined in the Database crate [`db_storage`] for database operations.
use super::game_types::GameTypeResource;
use super::gamers::{current_gamer, GamerResource};
use super::response::{ApiError, Created, NoContent};
use actix_web::web::{Data, Json, Path, ReqData};
use actix_web::{delete, get, post, put};
use database::{DatabaseError, Db, OptionalExt};
use db_storage::game_types::{GameType, GameTypeId};
use db_storage::games::{Game, GameDetails, GameId, NewGame, UpdateGame};
use db_storage::users::User;
use diesel::Connection;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A game including its aggregated event counts
///
/// `user_event_count` counts the events of the game if the requesting gamer created it.
#[derive(Debug, Serialize)]
pub struct GameResource {
    pub id: GameId,
    pub title: String,
    pub maker: String,
    pub number_of_players: i32,
    pub skill_level: i32,
    #[serde(rename = "type")]
    pub game_type: GameTypeResource,
    pub creator: GamerResource,
    pub event_count: i64,
    pub user_event_count: i64,
}

impl From<GameDetails> for GameResource {
    fn from(details: GameDetails) -> Self {
        let GameDetails {
            game,
            game_type,
            creator,
            event_count,
            user_event_count,
        } = details;

        Self {
            id: game.id,
            title: game.title,
            maker: game.maker,
            number_of_players: game.number_of_players,
            skill_level: game.skill_level,
            game_type: game_type.into(),
            creator: creator.into(),
            event_count,
            user_event_count,
        }
    }
}

/// API request body to create or overwrite a game
///
/// The creator is always the requesting gamer, a provided `creator` field is ignored.
#[derive(Debug, Validate, Deserialize)]
pub struct GameBody {
    #[validate(length(min = 1, max = 50))]
    pub title: String,
    #[validate(length(min = 1, max = 50))]
    pub maker: String,
    #[validate(range(min = 1))]
    pub number_of_players: i32,
    #[validate(range(min = 1))]
    pub skill_level: i32,
    #[serde(rename = "type")]
    pub game_type: GameTypeId,
}

/// API Endpoint *GET /games*
///
/// Returns a JSON array of all games as [`GameResource`], ordered by id
#[get("/games")]
pub async fn get_games(
    db: Data<Db>,
    current_user: ReqData<User>,
) -> Result<Json<Vec<GameResource>>, ApiError> {
    let current_user = current_user.into_inner();

    let games = crate::block(move || {
        let mut conn = db.get_conn()?;

        let gamer = current_gamer(&mut conn, &current_user)?;

        GameDetails::get_all(&mut conn, gamer.id)
    })
    .await??;

    Ok(Json(games.into_iter().map(GameResource::from).collect()))
}

/// API Endpoint *POST /games*
///
/// Uses the provided [`GameBody`] to create a new game owned by the requesting gamer.
/// Returns the created [`GameResource`].
#[post("/games")]
pub async fn new_game(
    db: Data<Db>,
    current_user: ReqData<User>,
    body: Json<GameBody>,
) -> Result<Created<GameResource>, ApiError> {
    let current_user = current_user.into_inner();
    let body = body.into_inner();

    body.validate()?;

    let game = crate::block(move || {
        let mut conn = db.get_conn()?;

        conn.transaction::<_, DatabaseError, _>(|conn| {
            let gamer = current_gamer(conn, &current_user)?;
            let game_type = GameType::get(conn, body.game_type)?;

            let game = NewGame {
                title: body.title,
                maker: body.maker,
                number_of_players: body.number_of_players,
                skill_level: body.skill_level,
                game_type_id: game_type.id,
                creator_id: gamer.id,
            }
            .insert(conn)?;

            GameDetails::get(conn, game.id, gamer.id)
        })
    })
    .await??;

    log::debug!("Created game {}", game.game.id);

    Ok(Created(game.into()))
}

/// API Endpoint *GET /games/{game_id}*
///
/// Returns the specified [`GameResource`]
#[get("/games/{game_id}")]
pub async fn get_game(
    db: Data<Db>,
    current_user: ReqData<User>,
    game_id: Path<GameId>,
) -> Result<Json<GameResource>, ApiError> {
    let current_user = current_user.into_inner();
    let game_id = game_id.into_inner();

    let game = crate::block(move || {
        let mut conn = db.get_conn()?;

        let gamer = current_gamer(&mut conn, &current_user)?;

        GameDetails::get(&mut conn, game_id, gamer.id)
    })
    .await??;

    Ok(Json(game.into()))
}

/// Fails with `forbidden` unless the requesting user may modify the game
///
/// Superusers pass without a gamer profile.
fn check_modify_permission(
    conn: &mut database::DbConnection,
    current_user: &User,
    game_id: GameId,
) -> Result<(), ApiError> {
    let game = Game::get(conn, game_id)?;
    let gamer_id = current_gamer(conn, current_user)
        .optional()?
        .map(|gamer| gamer.id);

    if !game.can_be_modified_by(gamer_id, current_user.is_superuser) {
        log::debug!(
            "User {} is not allowed to modify game {}",
            current_user.id,
            game_id
        );
        return Err(ApiError::forbidden());
    }

    Ok(())
}

/// API Endpoint *PUT /games/{game_id}*
///
/// Overwrites all fields of the specified game with the provided [`GameBody`].
/// Only the creator of the game or a superuser may do this.
#[put("/games/{game_id}")]
pub async fn put_game(
    db: Data<Db>,
    current_user: ReqData<User>,
    game_id: Path<GameId>,
    body: Json<GameBody>,
) -> Result<NoContent, ApiError> {
    let current_user = current_user.into_inner();
    let game_id = game_id.into_inner();
    let body = body.into_inner();

    body.validate()?;

    crate::block(move || -> Result<(), ApiError> {
        let mut conn = db.get_conn()?;

        conn.transaction::<_, ApiError, _>(|conn| {
            check_modify_permission(conn, &current_user, game_id)?;

            let game_type = GameType::get(conn, body.game_type)?;

            UpdateGame {
                title: body.title,
                maker: body.maker,
                number_of_players: body.number_of_players,
                skill_level: body.skill_level,
                game_type_id: game_type.id,
            }
            .apply(conn, game_id)?;

            Ok(())
        })
    })
    .await??;

    Ok(NoContent)
}

/// API Endpoint *DELETE /games/{game_id}*
///
/// Deletes the specified game together with all of its events.
/// Only the creator of the game or a superuser may do this.
#[delete("/games/{game_id}")]
pub async fn delete_game(
    db: Data<Db>,
    current_user: ReqData<User>,
    game_id: Path<GameId>,
) -> Result<NoContent, ApiError> {
    let current_user = current_user.into_inner();
    let game_id = game_id.into_inner();

    crate::block(move || -> Result<(), ApiError> {
        let mut conn = db.get_conn()?;

        conn.transaction::<_, ApiError, _>(|conn| {
            check_modify_permission(conn, &current_user, game_id)?;

            Game::delete_by_id(conn, game_id)?;

            Ok(())
        })
    })
    .await??;

    Ok(NoContent)
}
