// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Game type related API structs and Endpoints
//!
//! Game types are read-only over the REST API, they are created with the `game-types` CLI command.
use super::response::ApiError;
use actix_web::get;
use actix_web::web::{Data, Json, Path};
use database::Db;
use db_storage::game_types::{GameType, GameTypeId};
use serde::Serialize;

/// A game type, e.g. a board game or a card game
#[derive(Debug, Clone, Serialize)]
pub struct GameTypeResource {
    pub id: GameTypeId,
    pub label: String,
}

impl From<GameType> for GameTypeResource {
    fn from(game_type: GameType) -> Self {
        Self {
            id: game_type.id,
            label: game_type.label,
        }
    }
}

/// API Endpoint *GET /gametypes*
///
/// Returns a JSON array of all game types ordered by id
#[get("/gametypes")]
pub async fn get_game_types(db: Data<Db>) -> Result<Json<Vec<GameTypeResource>>, ApiError> {
    let game_types = crate::block(move || {
        let mut conn = db.get_conn()?;

        GameType::get_all(&mut conn)
    })
    .await??;

    Ok(Json(
        game_types
            .into_iter()
            .map(GameTypeResource::from)
            .collect(),
    ))
}

/// API Endpoint *GET /gametypes/{game_type_id}*
///
/// Returns the specified [`GameTypeResource`]
#[get("/gametypes/{game_type_id}")]
pub async fn get_game_type(
    db: Data<Db>,
    game_type_id: Path<GameTypeId>,
) -> Result<Json<GameTypeResource>, ApiError> {
    let game_type_id = game_type_id.into_inner();

    let game_type = crate::block(move || {
        let mut conn = db.get_conn()?;

        GameType::get(&mut conn, game_type_id)
    })
    .await??;

    Ok(Json(game_type.into()))
}
