// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Events, their attendees and the attendance aggregates
use crate::gamers::{Gamer, GamerId, GamerProfile};
use crate::games::{Game, GameId};
use crate::schema::{event_attendees, events, gamers, games, users};
use crate::users::User;
use chrono::{NaiveDate, NaiveTime};
use database::{DatabaseError, DbConnection, Result};
use diesel::{
    AsChangeset, BoolExpressionMethods, Connection, ExpressionMethods, Insertable, JoinOnDsl,
    QueryDsl, Queryable, RunQueryDsl,
};
use std::collections::HashMap;

diesel_newtype! {
    #[derive(Copy)] EventId(i64) => diesel::sql_types::BigInt
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable)]
pub struct Event {
    pub id: EventId,
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub game_id: GameId,
    pub organizer_id: GamerId,
}

impl Event {
    #[tracing::instrument(err, skip_all)]
    pub fn get(conn: &mut DbConnection, event_id: EventId) -> Result<Event> {
        let event = events::table
            .filter(events::id.eq(event_id))
            .get_result(conn)?;

        Ok(event)
    }

    #[tracing::instrument(err, skip_all)]
    pub fn delete_by_id(conn: &mut DbConnection, event_id: EventId) -> Result<()> {
        let lines_changed = diesel::delete(events::table)
            .filter(events::id.eq(event_id))
            .execute(conn)?;

        if lines_changed == 0 {
            return Err(DatabaseError::NotFound);
        }

        Ok(())
    }

    /// Adds the gamer to the attendees of the event
    ///
    /// Returns false if the gamer already attended the event.
    #[tracing::instrument(err, skip_all, fields(%event_id, %gamer_id))]
    pub fn add_attendee(
        conn: &mut DbConnection,
        event_id: EventId,
        gamer_id: GamerId,
    ) -> Result<bool> {
        conn.transaction::<_, DatabaseError, _>(|conn| {
            // Fails with NotFound for unknown events
            Event::get(conn, event_id)?;

            let lines_changed = NewEventAttendee { event_id, gamer_id }
                .insert_into(event_attendees::table)
                .on_conflict_do_nothing()
                .execute(conn)?;

            Ok(lines_changed > 0)
        })
    }

    /// Removes the gamer from the attendees of the event
    ///
    /// Returns false if the gamer did not attend the event.
    #[tracing::instrument(err, skip_all, fields(%event_id, %gamer_id))]
    pub fn remove_attendee(
        conn: &mut DbConnection,
        event_id: EventId,
        gamer_id: GamerId,
    ) -> Result<bool> {
        conn.transaction::<_, DatabaseError, _>(|conn| {
            Event::get(conn, event_id)?;

            let lines_changed = diesel::delete(event_attendees::table)
                .filter(
                    event_attendees::event_id
                        .eq(event_id)
                        .and(event_attendees::gamer_id.eq(gamer_id)),
                )
                .execute(conn)?;

            Ok(lines_changed > 0)
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = events)]
pub struct NewEvent {
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub game_id: GameId,
    pub organizer_id: GamerId,
}

impl NewEvent {
    #[tracing::instrument(err, skip_all)]
    pub fn insert(self, conn: &mut DbConnection) -> Result<Event> {
        let event = self.insert_into(events::table).get_result(conn)?;

        Ok(event)
    }
}

/// Overwrites all mutable fields of an event. The organizer never changes.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = events)]
pub struct UpdateEvent {
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub game_id: GameId,
}

impl UpdateEvent {
    #[tracing::instrument(err, skip_all)]
    pub fn apply(self, conn: &mut DbConnection, event_id: EventId) -> Result<Event> {
        let event = diesel::update(events::table)
            .filter(events::id.eq(event_id))
            .set(self)
            .returning(events::all_columns)
            .get_result(conn)?;

        Ok(event)
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = event_attendees)]
struct NewEventAttendee {
    event_id: EventId,
    gamer_id: GamerId,
}

/// An event together with its game, organizer and attendees
#[derive(Debug, Clone)]
pub struct EventDetails {
    pub event: Event,
    pub game: Game,
    pub organizer: GamerProfile,
    /// Ordered by gamer id
    pub attendees: Vec<GamerProfile>,
}

type EventRow = (Event, Game, Gamer, User);

impl EventDetails {
    /// Number of gamers attending the event
    pub fn attendees_count(&self) -> i64 {
        self.attendees.len() as i64
    }

    /// 1 if the gamer attends the event, 0 otherwise
    pub fn joined(&self, gamer_id: GamerId) -> i64 {
        i64::from(self.is_attendee(gamer_id))
    }

    pub fn is_attendee(&self, gamer_id: GamerId) -> bool {
        self.attendees.iter().any(|attendee| attendee.id == gamer_id)
    }

    fn from_rows(
        rows: Vec<EventRow>,
        mut attendees: HashMap<EventId, Vec<GamerProfile>>,
    ) -> Vec<Self> {
        rows.into_iter()
            .map(|(event, game, organizer, user)| Self {
                attendees: attendees.remove(&event.id).unwrap_or_default(),
                event,
                game,
                organizer: GamerProfile::from((organizer, user)),
            })
            .collect()
    }

    /// Returns all events ordered by id, optionally only those of a single game
    #[tracing::instrument(err, skip_all)]
    pub fn get_all(conn: &mut DbConnection, game_id: Option<GameId>) -> Result<Vec<Self>> {
        let mut query = events::table
            .inner_join(games::table)
            .inner_join(gamers::table.on(gamers::id.eq(events::organizer_id)))
            .inner_join(users::table.on(users::id.eq(gamers::user_id)))
            .select((
                events::all_columns,
                games::all_columns,
                gamers::all_columns,
                users::all_columns,
            ))
            .order_by(events::id)
            .into_boxed();

        if let Some(game_id) = game_id {
            query = query.filter(events::game_id.eq(game_id));
        }

        let rows: Vec<EventRow> = query.load(conn)?;

        let event_ids = rows.iter().map(|(event, ..)| event.id).collect();
        let attendees = get_attendees(conn, event_ids)?;

        Ok(Self::from_rows(rows, attendees))
    }

    #[tracing::instrument(err, skip_all)]
    pub fn get(conn: &mut DbConnection, event_id: EventId) -> Result<Self> {
        let row: EventRow = events::table
            .inner_join(games::table)
            .inner_join(gamers::table.on(gamers::id.eq(events::organizer_id)))
            .inner_join(users::table.on(users::id.eq(gamers::user_id)))
            .filter(events::id.eq(event_id))
            .select((
                events::all_columns,
                games::all_columns,
                gamers::all_columns,
                users::all_columns,
            ))
            .get_result(conn)?;

        let attendees = get_attendees(conn, vec![event_id])?;

        Self::from_rows(vec![row], attendees)
            .pop()
            .ok_or(DatabaseError::NotFound)
    }
}

/// Loads the attendee profiles of the given events, grouped by event
fn get_attendees(
    conn: &mut DbConnection,
    event_ids: Vec<EventId>,
) -> Result<HashMap<EventId, Vec<GamerProfile>>> {
    let rows: Vec<(EventId, Gamer, User)> = event_attendees::table
        .inner_join(gamers::table.on(gamers::id.eq(event_attendees::gamer_id)))
        .inner_join(users::table.on(users::id.eq(gamers::user_id)))
        .filter(event_attendees::event_id.eq_any(event_ids))
        .select((
            event_attendees::event_id,
            gamers::all_columns,
            users::all_columns,
        ))
        .order_by((event_attendees::event_id, gamers::id))
        .load(conn)?;

    let mut attendees: HashMap<EventId, Vec<GamerProfile>> = HashMap::new();

    for (event_id, gamer, user) in rows {
        attendees
            .entry(event_id)
            .or_default()
            .push(GamerProfile::from((gamer, user)));
    }

    Ok(attendees)
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn profile(id: i64) -> GamerProfile {
        GamerProfile {
            id: GamerId::from(id),
            bio: String::new(),
            full_name: format!("Gamer {id}"),
        }
    }

    fn details(attendees: Vec<GamerProfile>) -> EventDetails {
        EventDetails {
            event: Event {
                id: EventId::from(1),
                description: "Chess night".into(),
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
                game_id: GameId::from(1),
                organizer_id: GamerId::from(2),
            },
            game: Game {
                id: GameId::from(1),
                title: "Chess".into(),
                maker: "Unknown".into(),
                number_of_players: 2,
                skill_level: 3,
                game_type_id: crate::game_types::GameTypeId::from(1),
                creator_id: GamerId::from(1),
            },
            organizer: profile(2),
            attendees,
        }
    }

    #[test]
    fn empty_event() {
        let event = details(vec![]);

        assert_eq!(event.attendees_count(), 0);
        assert_eq!(event.joined(GamerId::from(1)), 0);
    }

    #[test]
    fn joined_only_for_attendees() {
        let event = details(vec![profile(1), profile(3)]);

        assert_eq!(event.attendees_count(), 2);
        assert_eq!(event.joined(GamerId::from(1)), 1);
        assert_eq!(event.joined(GamerId::from(3)), 1);
        assert_eq!(event.joined(GamerId::from(2)), 0);
    }

    #[test]
    fn rows_are_matched_with_their_attendees() {
        let first = details(vec![]);
        let mut second = details(vec![]);
        second.event.id = EventId::from(2);

        let rows = vec![first, second]
            .into_iter()
            .map(|d| {
                let user = User {
                    id: crate::users::UserId::from(2),
                    username: "bob".into(),
                    first_name: "Bob".into(),
                    last_name: "Builder".into(),
                    is_staff: false,
                    is_superuser: false,
                    date_joined: chrono::DateTime::default(),
                };
                let gamer = Gamer {
                    id: GamerId::from(2),
                    user_id: user.id,
                    bio: String::new(),
                };
                (d.event, d.game, gamer, user)
            })
            .collect();

        let attendees = HashMap::from([(EventId::from(2), vec![profile(1), profile(3)])]);

        let events = EventDetails::from_rows(rows, attendees);

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].attendees_count(), 0);
        assert_eq!(events[1].attendees_count(), 2);
        assert_eq!(events[1].organizer.full_name, "Bob Builder");
        assert_eq!(events[1].joined(GamerId::from(3)), 1);
    }
}
