// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Public gamer representation shared by the game and event endpoints
use database::DbConnection;
use db_storage::gamers::{Gamer, GamerId, GamerProfile};
use db_storage::users::User;
use serde::Serialize;

/// Public profile of a gamer
#[derive(Debug, Clone, Serialize)]
pub struct GamerResource {
    pub id: GamerId,
    pub bio: String,
    pub full_name: String,
}

impl From<GamerProfile> for GamerResource {
    fn from(profile: GamerProfile) -> Self {
        Self {
            id: profile.id,
            bio: profile.bio,
            full_name: profile.full_name,
        }
    }
}

/// Resolves the gamer profile of the requesting user
///
/// Fails with `NotFound` when the user has no gamer profile.
pub(super) fn current_gamer(conn: &mut DbConnection, user: &User) -> database::Result<Gamer> {
    Gamer::get_by_user(conn, user.id)
}
