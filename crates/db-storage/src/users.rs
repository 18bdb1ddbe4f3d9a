// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Contains the user specific database structs and queries
use crate::schema::{auth_tokens, users};
use chrono::{DateTime, Utc};
use database::{DbConnection, Result};
use diesel::{ExpressionMethods, Insertable, QueryDsl, Queryable, RunQueryDsl};

diesel_newtype! {
    #[derive(Copy)] UserId(i64) => diesel::sql_types::BigInt
}

/// Diesel user struct
///
/// Is used as a result in various queries. Represents a user column
#[derive(Debug, Clone, Queryable, Identifiable)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub date_joined: DateTime<Utc>,
}

impl User {
    /// First and last name separated by a space
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }

    #[tracing::instrument(err, skip_all)]
    pub fn get_by_username(conn: &mut DbConnection, username: &str) -> Result<User> {
        let user = users::table
            .filter(users::username.eq(username))
            .get_result(conn)?;

        Ok(user)
    }

    /// Resolves the user owning the given auth token key
    #[tracing::instrument(err, skip_all)]
    pub fn get_by_token(conn: &mut DbConnection, key: &str) -> Result<User> {
        let user = users::table
            .inner_join(auth_tokens::table)
            .filter(auth_tokens::key.eq(key))
            .select(users::all_columns)
            .get_result(conn)?;

        Ok(user)
    }
}

/// Diesel insertable user struct
///
/// Represents fields that have to be provided on user insertion.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl NewUser {
    #[tracing::instrument(err, skip_all)]
    pub fn insert(self, conn: &mut DbConnection) -> Result<User> {
        let user = self.insert_into(users::table).get_result(conn)?;

        Ok(user)
    }
}
