// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use crate::schema::game_types;
use database::{DbConnection, Result};
use diesel::{ExpressionMethods, Insertable, QueryDsl, Queryable, RunQueryDsl};

diesel_newtype! {
    #[derive(Copy)] GameTypeId(i64) => diesel::sql_types::BigInt
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable)]
pub struct GameType {
    pub id: GameTypeId,
    pub label: String,
}

impl GameType {
    #[tracing::instrument(err, skip_all)]
    pub fn get(conn: &mut DbConnection, game_type_id: GameTypeId) -> Result<GameType> {
        let game_type = game_types::table
            .filter(game_types::id.eq(game_type_id))
            .get_result(conn)?;

        Ok(game_type)
    }

    #[tracing::instrument(err, skip_all)]
    pub fn get_all(conn: &mut DbConnection) -> Result<Vec<GameType>> {
        let game_types = game_types::table.order_by(game_types::id).load(conn)?;

        Ok(game_types)
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = game_types)]
pub struct NewGameType {
    pub label: String,
}

impl NewGameType {
    #[tracing::instrument(err, skip_all)]
    pub fn insert(self, conn: &mut DbConnection) -> Result<GameType> {
        let game_type = self.insert_into(game_types::table).get_result(conn)?;

        Ok(game_type)
    }
}
