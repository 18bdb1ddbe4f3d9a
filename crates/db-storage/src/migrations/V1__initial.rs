// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use barrel::backend::Pg;
use barrel::{types, Migration};

pub fn migration() -> String {
    let mut migr = Migration::new();

    migr.create_table("users", |table| {
        table.add_column("id", types::custom("BIGSERIAL").primary(true));
        table.add_column("username", types::varchar(150).unique(true).nullable(false));
        table.add_column("first_name", types::varchar(150).nullable(false));
        table.add_column("last_name", types::varchar(150).nullable(false));
        table.add_column("is_staff", types::custom("BOOLEAN DEFAULT false"));
        table.add_column("is_superuser", types::custom("BOOLEAN DEFAULT false"));
        table.add_column("date_joined", types::custom("TIMESTAMPTZ DEFAULT now()"));
    });

    migr.create_table("auth_tokens", |table| {
        table.add_column("key", types::varchar(40).primary(true));
        table.add_column(
            "user_id",
            types::custom("BIGINT UNIQUE REFERENCES users(id) ON DELETE CASCADE"),
        );
        table.add_column("created_at", types::custom("TIMESTAMPTZ DEFAULT now()"));
    });

    migr.create_table("gamers", |table| {
        table.add_column("id", types::custom("BIGSERIAL").primary(true));
        table.add_column(
            "user_id",
            types::custom("BIGINT UNIQUE REFERENCES users(id) ON DELETE CASCADE"),
        );
        table.add_column("bio", types::varchar(50).nullable(false));
    });

    migr.create_table("game_types", |table| {
        table.add_column("id", types::custom("BIGSERIAL").primary(true));
        table.add_column("label", types::varchar(50).nullable(false));
    });

    migr.create_table("games", |table| {
        table.add_column("id", types::custom("BIGSERIAL").primary(true));
        table.add_column("title", types::varchar(50).nullable(false));
        table.add_column("maker", types::varchar(50).nullable(false));
        table.add_column("number_of_players", types::integer().nullable(false));
        table.add_column("skill_level", types::integer().nullable(false));
        table.add_column(
            "game_type_id",
            types::custom("BIGINT REFERENCES game_types(id) ON DELETE CASCADE"),
        );
        table.add_column(
            "creator_id",
            types::custom("BIGINT REFERENCES gamers(id) ON DELETE CASCADE"),
        );
    });

    migr.create_table("events", |table| {
        table.add_column("id", types::custom("BIGSERIAL").primary(true));
        table.add_column("description", types::varchar(155).nullable(false));
        table.add_column("date", types::custom("DATE"));
        table.add_column("time", types::custom("TIME"));
        table.add_column(
            "game_id",
            types::custom("BIGINT REFERENCES games(id) ON DELETE CASCADE"),
        );
        table.add_column(
            "organizer_id",
            types::custom("BIGINT REFERENCES gamers(id) ON DELETE CASCADE"),
        );
    });

    migr.create_table("event_attendees", |table| {
        table.add_column(
            "event_id",
            types::custom("BIGINT REFERENCES events(id) ON DELETE CASCADE"),
        );
        table.add_column(
            "gamer_id",
            types::custom("BIGINT REFERENCES gamers(id) ON DELETE CASCADE"),
        );
        table.inject_custom("PRIMARY KEY (event_id, gamer_id)");
    });

    migr.make::<Pg>()
}
