// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Bearer tokens used to authenticate API requests
use crate::schema::auth_tokens;
use crate::users::UserId;
use chrono::{DateTime, Utc};
use database::{DatabaseError, DbConnection, Result};
use diesel::{Connection, ExpressionMethods, Insertable, Queryable, RunQueryDsl};
use rand::Rng;
use std::fmt::Write;

/// Length of a token key in bytes before hex encoding
const KEY_BYTES: usize = 20;

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(primary_key(key))]
pub struct AuthToken {
    pub key: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = auth_tokens)]
pub struct NewAuthToken {
    pub key: String,
    pub user_id: UserId,
}

impl NewAuthToken {
    /// Creates a token with a freshly generated random key
    pub fn generate(user_id: UserId) -> Self {
        Self {
            key: generate_key(),
            user_id,
        }
    }

    /// Inserts the token, replacing any token the user had before
    #[tracing::instrument(err, skip_all)]
    pub fn replace(self, conn: &mut DbConnection) -> Result<AuthToken> {
        conn.transaction::<_, DatabaseError, _>(|conn| {
            diesel::delete(auth_tokens::table)
                .filter(auth_tokens::user_id.eq(self.user_id))
                .execute(conn)?;

            let token = self.insert_into(auth_tokens::table).get_result(conn)?;

            Ok(token)
        })
    }
}

/// Generates 40 lowercase hex characters from a random source
fn generate_key() -> String {
    let bytes: [u8; KEY_BYTES] = rand::thread_rng().gen();

    bytes.iter().fold(String::with_capacity(KEY_BYTES * 2), |mut key, b| {
        let _ = write!(key, "{b:02x}");
        key
    })
}
