// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Event related API structs and Endpoints
//!
//! Events are scheduled sessions of a game. Gamers attend an event via the `signup` endpoint
//! and stop attending via the `leave` endpoint.
use super::gamers::{current_gamer, GamerResource};
use super::response::{ApiError, Created, NoContent};
use actix_web::web::{self, Data, Json, Path, ReqData};
use actix_web::{delete, get, post, put};
use chrono::{NaiveDate, NaiveTime};
use database::{DatabaseError, Db};
use db_storage::events::{Event, EventDetails, EventId, NewEvent, UpdateEvent};
use db_storage::game_types::GameTypeId;
use db_storage::gamers::GamerId;
use db_storage::games::{Game, GameId};
use db_storage::users::User;
use diesel::Connection;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// The game of an event, referencing its type and creator by id
#[derive(Debug, Serialize)]
pub struct EventGameResource {
    pub id: GameId,
    pub title: String,
    pub maker: String,
    pub number_of_players: i32,
    pub skill_level: i32,
    #[serde(rename = "type")]
    pub game_type: GameTypeId,
    pub creator: GamerId,
}

impl From<Game> for EventGameResource {
    fn from(game: Game) -> Self {
        Self {
            id: game.id,
            title: game.title,
            maker: game.maker,
            number_of_players: game.number_of_players,
            skill_level: game.skill_level,
            game_type: game.game_type_id,
            creator: game.creator_id,
        }
    }
}

/// An event as seen by the requesting gamer
///
/// `joined` is 1 if the requesting gamer attends the event, 0 otherwise.
#[derive(Debug, Serialize)]
pub struct EventResource {
    pub id: EventId,
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub game: EventGameResource,
    pub organizer: GamerResource,
    pub attendees: Vec<GamerResource>,
    pub joined: i64,
    pub attendees_count: i64,
}

impl EventResource {
    fn new(details: EventDetails, requester: GamerId) -> Self {
        let joined = details.joined(requester);
        let attendees_count = details.attendees_count();

        let EventDetails {
            event,
            game,
            organizer,
            attendees,
        } = details;

        Self {
            id: event.id,
            description: event.description,
            date: event.date,
            time: event.time,
            game: game.into(),
            organizer: organizer.into(),
            attendees: attendees.into_iter().map(GamerResource::from).collect(),
            joined,
            attendees_count,
        }
    }
}

/// API request body to create or overwrite an event
///
/// The organizer is always the requesting gamer, a provided `organizer` field is ignored.
#[derive(Debug, Validate, Deserialize)]
pub struct EventBody {
    #[validate(length(min = 1, max = 155))]
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub game: GameId,
}

#[derive(Debug, Deserialize)]
pub struct GetEventsQuery {
    /// Only return the events of this game
    pub game: Option<GameId>,
}

/// API Endpoint *GET /events*
///
/// Returns a JSON array of all events as [`EventResource`], ordered by id.
/// The `game` query parameter restricts the list to the events of a single game.
#[get("/events")]
pub async fn get_events(
    db: Data<Db>,
    current_user: ReqData<User>,
    query: web::Query<GetEventsQuery>,
) -> Result<Json<Vec<EventResource>>, ApiError> {
    let current_user = current_user.into_inner();
    let GetEventsQuery { game } = query.into_inner();

    let (events, gamer) = crate::block(move || -> database::Result<_> {
        let mut conn = db.get_conn()?;

        let gamer = current_gamer(&mut conn, &current_user)?;
        let events = EventDetails::get_all(&mut conn, game)?;

        Ok((events, gamer))
    })
    .await??;

    Ok(Json(
        events
            .into_iter()
            .map(|event| EventResource::new(event, gamer.id))
            .collect(),
    ))
}

/// API Endpoint *POST /events*
///
/// Uses the provided [`EventBody`] to create a new event organized by the requesting gamer.
/// Returns the created [`EventResource`].
#[post("/events")]
pub async fn new_event(
    db: Data<Db>,
    current_user: ReqData<User>,
    body: Json<EventBody>,
) -> Result<Created<EventResource>, ApiError> {
    let current_user = current_user.into_inner();
    let body = body.into_inner();

    body.validate()?;

    let (event, gamer) = crate::block(move || {
        let mut conn = db.get_conn()?;

        conn.transaction::<_, DatabaseError, _>(|conn| {
            let gamer = current_gamer(conn, &current_user)?;
            let game = Game::get(conn, body.game)?;

            let event = NewEvent {
                description: body.description,
                date: body.date,
                time: body.time,
                game_id: game.id,
                organizer_id: gamer.id,
            }
            .insert(conn)?;

            let event = EventDetails::get(conn, event.id)?;

            Ok((event, gamer))
        })
    })
    .await??;

    log::debug!("Created event {}", event.event.id);

    Ok(Created(EventResource::new(event, gamer.id)))
}

/// API Endpoint *GET /events/{event_id}*
///
/// Returns the specified [`EventResource`]
#[get("/events/{event_id}")]
pub async fn get_event(
    db: Data<Db>,
    current_user: ReqData<User>,
    event_id: Path<EventId>,
) -> Result<Json<EventResource>, ApiError> {
    let current_user = current_user.into_inner();
    let event_id = event_id.into_inner();

    let (event, gamer) = crate::block(move || -> database::Result<_> {
        let mut conn = db.get_conn()?;

        let gamer = current_gamer(&mut conn, &current_user)?;
        let event = EventDetails::get(&mut conn, event_id)?;

        Ok((event, gamer))
    })
    .await??;

    Ok(Json(EventResource::new(event, gamer.id)))
}

/// API Endpoint *PUT /events/{event_id}*
///
/// Overwrites description, date, time and game of the specified event with the
/// provided [`EventBody`]. The organizer stays unchanged.
#[put("/events/{event_id}")]
pub async fn put_event(
    db: Data<Db>,
    event_id: Path<EventId>,
    body: Json<EventBody>,
) -> Result<NoContent, ApiError> {
    let event_id = event_id.into_inner();
    let body = body.into_inner();

    body.validate()?;

    crate::block(move || {
        let mut conn = db.get_conn()?;

        conn.transaction::<_, DatabaseError, _>(|conn| {
            let game = Game::get(conn, body.game)?;

            UpdateEvent {
                description: body.description,
                date: body.date,
                time: body.time,
                game_id: game.id,
            }
            .apply(conn, event_id)
        })
    })
    .await??;

    Ok(NoContent)
}

/// API Endpoint *DELETE /events/{event_id}*
///
/// Deletes the specified event
#[delete("/events/{event_id}")]
pub async fn delete_event(db: Data<Db>, event_id: Path<EventId>) -> Result<NoContent, ApiError> {
    let event_id = event_id.into_inner();

    crate::block(move || {
        let mut conn = db.get_conn()?;

        Event::delete_by_id(&mut conn, event_id)
    })
    .await??;

    Ok(NoContent)
}

/// API Endpoint *POST /events/{event_id}/signup*
///
/// Adds the requesting gamer to the attendees of the event. Signing up twice has no effect.
/// Returns the updated [`EventResource`].
#[post("/events/{event_id}/signup")]
pub async fn signup(
    db: Data<Db>,
    current_user: ReqData<User>,
    event_id: Path<EventId>,
) -> Result<Created<EventResource>, ApiError> {
    let current_user = current_user.into_inner();
    let event_id = event_id.into_inner();

    let (event, gamer) = crate::block(move || -> database::Result<_> {
        let mut conn = db.get_conn()?;

        let gamer = current_gamer(&mut conn, &current_user)?;

        if !Event::add_attendee(&mut conn, event_id, gamer.id)? {
            log::debug!("Gamer {} already attends event {}", gamer.id, event_id);
        }

        let event = EventDetails::get(&mut conn, event_id)?;

        Ok((event, gamer))
    })
    .await??;

    Ok(Created(EventResource::new(event, gamer.id)))
}

/// API Endpoint *DELETE /events/{event_id}/leave*
///
/// Removes the requesting gamer from the attendees of the event. Leaving an event the
/// gamer does not attend has no effect.
#[delete("/events/{event_id}/leave")]
pub async fn leave(
    db: Data<Db>,
    current_user: ReqData<User>,
    event_id: Path<EventId>,
) -> Result<NoContent, ApiError> {
    let current_user = current_user.into_inner();
    let event_id = event_id.into_inner();

    crate::block(move || -> database::Result<_> {
        let mut conn = db.get_conn()?;

        let gamer = current_gamer(&mut conn, &current_user)?;

        if !Event::remove_attendee(&mut conn, event_id, gamer.id)? {
            log::debug!("Gamer {} did not attend event {}", gamer.id, event_id);
        }

        Ok(())
    })
    .await??;

    Ok(NoContent)
}

#[cfg(test)]
mod test {
    use super::*;
    use db_storage::gamers::GamerProfile;
    use test_util::assert_eq_json;

    fn profile(id: i64, full_name: &str) -> GamerProfile {
        GamerProfile {
            id: GamerId::from(id),
            bio: String::new(),
            full_name: full_name.into(),
        }
    }

    fn chess_night(attendees: Vec<GamerProfile>) -> EventDetails {
        EventDetails {
            event: Event {
                id: EventId::from(3),
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
                game_type_id: GameTypeId::from(4),
                creator_id: GamerId::from(1),
            },
            organizer: profile(2, "Bob Builder"),
            attendees,
        }
    }

    #[test]
    fn event_resource_for_attendee() {
        let event = chess_night(vec![profile(1, "Ada Lovelace")]);

        assert_eq_json!(
            EventResource::new(event, GamerId::from(1)),
            {
                "id": 3,
                "description": "Chess night",
                "date": "2024-01-01",
                "time": "19:00:00",
                "game": {
                    "id": 1,
                    "title": "Chess",
                    "maker": "Unknown",
                    "number_of_players": 2,
                    "skill_level": 3,
                    "type": 4,
                    "creator": 1
                },
                "organizer": {
                    "id": 2,
                    "bio": "",
                    "full_name": "Bob Builder"
                },
                "attendees": [
                    {
                        "id": 1,
                        "bio": "",
                        "full_name": "Ada Lovelace"
                    }
                ],
                "joined": 1,
                "attendees_count": 1
            }
        );
    }

    #[test]
    fn event_resource_for_other_gamer() {
        let event = chess_night(vec![profile(1, "Ada Lovelace")]);

        let resource = EventResource::new(event, GamerId::from(2));

        assert_eq!(resource.joined, 0);
        assert_eq!(resource.attendees_count, 1);
    }

    #[test]
    fn body_ignores_organizer() {
        let body: EventBody = serde_json::from_value(serde_json::json!({
            "description": "Chess night",
            "date": "2024-01-01",
            "time": "19:00:00",
            "game": 1,
            "organizer": 42
        }))
        .unwrap();

        assert_eq!(body.game, GameId::from(1));
        assert_eq!(body.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert!(body.validate().is_ok());
    }

    #[test]
    fn body_validation() {
        let body = EventBody {
            description: "x".repeat(156),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            game: GameId::from(1),
        };

        let errors = body.validate().unwrap_err();

        assert!(errors.field_errors().contains_key("description"));
    }

    #[test]
    fn malformed_date_is_rejected() {
        let result = serde_json::from_value::<EventBody>(serde_json::json!({
            "description": "Chess night",
            "date": "01.01.2024",
            "time": "19:00:00",
            "game": 1
        }));

        assert!(result.is_err());
    }
}
