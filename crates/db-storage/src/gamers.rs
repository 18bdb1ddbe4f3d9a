// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Gamers are the participants of the platform. Every gamer is bound to exactly one user.
use crate::schema::{gamers, users};
use crate::users::{User, UserId};
use database::{DbConnection, Result};
use diesel::{ExpressionMethods, Insertable, JoinOnDsl, QueryDsl, Queryable, RunQueryDsl};

diesel_newtype! {
    #[derive(Copy)] GamerId(i64) => diesel::sql_types::BigInt
}

#[derive(Debug, Clone, Queryable, Identifiable)]
pub struct Gamer {
    pub id: GamerId,
    pub user_id: UserId,
    pub bio: String,
}

impl Gamer {
    /// Returns the gamer bound to the given user
    #[tracing::instrument(err, skip_all, fields(%user_id))]
    pub fn get_by_user(conn: &mut DbConnection, user_id: UserId) -> Result<Gamer> {
        let gamer = gamers::table
            .filter(gamers::user_id.eq(user_id))
            .get_result(conn)?;

        Ok(gamer)
    }

    #[tracing::instrument(err, skip_all)]
    pub fn get_all_with_user(conn: &mut DbConnection) -> Result<Vec<(Gamer, User)>> {
        let gamers = gamers::table
            .inner_join(users::table.on(users::id.eq(gamers::user_id)))
            .select((gamers::all_columns, users::all_columns))
            .order_by(gamers::id)
            .load(conn)?;

        Ok(gamers)
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = gamers)]
pub struct NewGamer {
    pub user_id: UserId,
    pub bio: String,
}

impl NewGamer {
    #[tracing::instrument(err, skip_all)]
    pub fn insert(self, conn: &mut DbConnection) -> Result<Gamer> {
        let gamer = self.insert_into(gamers::table).get_result(conn)?;

        Ok(gamer)
    }
}

/// Public view of a gamer as it gets embedded into games and events
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GamerProfile {
    pub id: GamerId,
    pub bio: String,
    pub full_name: String,
}

impl From<(Gamer, User)> for GamerProfile {
    fn from((gamer, user): (Gamer, User)) -> Self {
        Self {
            id: gamer.id,
            bio: gamer.bio,
            full_name: user.full_name(),
        }
    }
}
