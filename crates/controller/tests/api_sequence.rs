// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Request sequences against the `/v1` endpoints backed by a real database
//!
//! Requires a running postgres instance, see [`DatabaseContext`].
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{header, StatusCode};
use actix_web::web::{self, Data};
use actix_web::{test, App};
use levelup_controller_core::api::v1::response::error::{json_error_handler, query_error_handler};
use levelup_controller_core::v1_scope;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use serial_test::serial;
use test_util::database::DatabaseContext;

async fn init_app(
    ctx: &DatabaseContext,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    let db = Data::from(ctx.db.clone());

    test::init_service(
        App::new()
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(db.clone())
            .service(v1_scope(db)),
    )
    .await
}

fn get(uri: &str, bearer: &str) -> actix_http::Request {
    test::TestRequest::get()
        .uri(uri)
        .insert_header((header::AUTHORIZATION, bearer))
        .to_request()
}

fn delete(uri: &str, bearer: &str) -> actix_http::Request {
    test::TestRequest::delete()
        .uri(uri)
        .insert_header((header::AUTHORIZATION, bearer))
        .to_request()
}

fn post(uri: &str, bearer: &str, body: Value) -> actix_http::Request {
    test::TestRequest::post()
        .uri(uri)
        .insert_header((header::AUTHORIZATION, bearer))
        .set_json(body)
        .to_request()
}

fn put(uri: &str, bearer: &str, body: Value) -> actix_http::Request {
    test::TestRequest::put()
        .uri(uri)
        .insert_header((header::AUTHORIZATION, bearer))
        .set_json(body)
        .to_request()
}

#[actix_web::test]
#[serial]
#[ignore = "requires a running postgres instance"]
async fn requests_without_valid_token_are_rejected() {
    let ctx = DatabaseContext::new(true).await;
    let app = init_app(&ctx).await;

    let req = test::TestRequest::get().uri("/v1/games").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));

    let req = test::TestRequest::get()
        .uri("/v1/games")
        .insert_header((header::AUTHORIZATION, "Bearer 0123456789abcdef"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "unauthorized");
}

#[actix_web::test]
#[serial]
#[ignore = "requires a running postgres instance"]
async fn signup_and_leave_sequence() {
    let ctx = DatabaseContext::new(true).await;
    let app = init_app(&ctx).await;

    let ada = ctx.create_test_gamer(1).unwrap();
    let bob = ctx.create_test_gamer(2).unwrap();
    let board_game = ctx.create_test_game_type("Board game").unwrap();

    // Ada creates the game
    let resp = test::call_service(
        &app,
        post(
            "/v1/games",
            &ada.bearer(),
            json!({
                "title": "Chess",
                "maker": "Unknown",
                "number_of_players": 2,
                "skill_level": 3,
                "type": board_game.id,
            }),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let game: Value = test::read_body_json(resp).await;
    assert_eq!(game["creator"]["id"], json!(ada.gamer.id));
    assert_eq!(game["type"]["label"], "Board game");
    assert_eq!(game["event_count"], 0);

    // Bob organizes an event, the provided organizer is ignored
    let resp = test::call_service(
        &app,
        post(
            "/v1/events",
            &bob.bearer(),
            json!({
                "description": "Chess night",
                "date": "2024-01-01",
                "time": "19:00:00",
                "game": game["id"],
                "organizer": ada.gamer.id,
            }),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let event: Value = test::read_body_json(resp).await;
    assert_eq!(event["organizer"]["id"], json!(bob.gamer.id));
    assert_eq!(event["organizer"]["full_name"], "Test Gamer2");
    assert_eq!(event["game"]["creator"], json!(ada.gamer.id));
    assert_eq!(event["attendees_count"], 0);
    assert_eq!(event["joined"], 0);

    let event_id = event["id"].as_i64().unwrap();

    // Ada signs up, twice
    for _ in 0..2 {
        let resp = test::call_service(
            &app,
            post(&format!("/v1/events/{event_id}/signup"), &ada.bearer(), json!({})),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let event: Value = test::read_body_json(resp).await;
        assert_eq!(event["attendees"][0]["id"], json!(ada.gamer.id));
        assert_eq!(event["attendees_count"], 1);
        assert_eq!(event["joined"], 1);
    }

    let events: Value = test::read_body_json(test::call_service(&app, get("/v1/events", &ada.bearer())).await).await;
    assert_eq!(events[0]["joined"], 1);
    assert_eq!(events[0]["attendees_count"], 1);

    let events: Value = test::read_body_json(test::call_service(&app, get("/v1/events", &bob.bearer())).await).await;
    assert_eq!(events[0]["joined"], 0);
    assert_eq!(events[0]["attendees_count"], 1);

    // Ada leaves, leaving again has no effect
    for _ in 0..2 {
        let resp = test::call_service(
            &app,
            delete(&format!("/v1/events/{event_id}/leave"), &ada.bearer()),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }

    let event: Value = test::read_body_json(
        test::call_service(&app, get(&format!("/v1/events/{event_id}"), &ada.bearer())).await,
    )
    .await;
    assert_eq!(event["joined"], 0);
    assert_eq!(event["attendees_count"], 0);
    assert_eq!(event["attendees"], json!([]));

    // Unknown events
    let resp = test::call_service(&app, post("/v1/events/9999/signup", &ada.bearer(), json!({}))).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(&app, delete("/v1/events/9999/leave", &ada.bearer())).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
#[serial]
#[ignore = "requires a running postgres instance"]
async fn game_event_counts() {
    let ctx = DatabaseContext::new(true).await;
    let app = init_app(&ctx).await;

    let ada = ctx.create_test_gamer(1).unwrap();
    let bob = ctx.create_test_gamer(2).unwrap();
    let game_type = ctx.create_test_game_type("Card game").unwrap();
    let game = ctx
        .create_test_game("Skat", game_type.id, ada.gamer.id)
        .unwrap();
    let other_game = ctx
        .create_test_game("Poker", game_type.id, bob.gamer.id)
        .unwrap();

    ctx.create_test_event("First round", game.id, bob.gamer.id)
        .unwrap();
    ctx.create_test_event("Second round", game.id, bob.gamer.id)
        .unwrap();
    ctx.create_test_event("Poker night", other_game.id, ada.gamer.id)
        .unwrap();

    let games: Value = test::read_body_json(test::call_service(&app, get("/v1/games", &ada.bearer())).await).await;
    assert_eq!(games[0]["title"], "Skat");
    assert_eq!(games[0]["event_count"], 2);
    assert_eq!(games[0]["user_event_count"], 2);
    assert_eq!(games[1]["title"], "Poker");
    assert_eq!(games[1]["event_count"], 1);
    assert_eq!(games[1]["user_event_count"], 0);

    let skat: Value = test::read_body_json(
        test::call_service(&app, get(&format!("/v1/games/{}", game.id), &bob.bearer())).await,
    )
    .await;
    assert_eq!(skat["event_count"], 2);
    assert_eq!(skat["user_event_count"], 0);

    let events: Value = test::read_body_json(
        test::call_service(&app, get(&format!("/v1/events?game={}", other_game.id), &ada.bearer())).await,
    )
    .await;
    assert_eq!(events.as_array().map(Vec::len), Some(1));
    assert_eq!(events[0]["description"], "Poker night");

    let resp = test::call_service(&app, get("/v1/events?game=poker", &ada.bearer())).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
#[serial]
#[ignore = "requires a running postgres instance"]
async fn only_the_creator_modifies_a_game() {
    let ctx = DatabaseContext::new(true).await;
    let app = init_app(&ctx).await;

    let ada = ctx.create_test_gamer(1).unwrap();
    let bob = ctx.create_test_gamer(2).unwrap();
    let game_type = ctx.create_test_game_type("Board game").unwrap();
    let game = ctx
        .create_test_game("Chess", game_type.id, ada.gamer.id)
        .unwrap();
    let event = ctx
        .create_test_event("Chess night", game.id, bob.gamer.id)
        .unwrap();

    let update = json!({
        "title": "Speed chess",
        "maker": "Unknown",
        "number_of_players": 2,
        "skill_level": 4,
        "type": game_type.id,
    });

    let resp = test::call_service(&app, put(&format!("/v1/games/{}", game.id), &bob.bearer(), update.clone())).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = test::call_service(&app, delete(&format!("/v1/games/{}", game.id), &bob.bearer())).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = test::call_service(&app, put(&format!("/v1/games/{}", game.id), &ada.bearer(), update)).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let chess: Value = test::read_body_json(
        test::call_service(&app, get(&format!("/v1/games/{}", game.id), &ada.bearer())).await,
    )
    .await;
    assert_eq!(chess["title"], "Speed chess");
    assert_eq!(chess["skill_level"], 4);
    assert_eq!(chess["creator"]["id"], json!(ada.gamer.id));

    // Deleting the game removes its events
    let resp = test::call_service(&app, delete(&format!("/v1/games/{}", game.id), &ada.bearer())).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = test::call_service(&app, get(&format!("/v1/events/{}", event.id), &ada.bearer())).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
#[serial]
#[ignore = "requires a running postgres instance"]
async fn events_are_updated_and_deleted() {
    let ctx = DatabaseContext::new(true).await;
    let app = init_app(&ctx).await;

    let ada = ctx.create_test_gamer(1).unwrap();
    let game_type = ctx.create_test_game_type("Board game").unwrap();
    let chess = ctx
        .create_test_game("Chess", game_type.id, ada.gamer.id)
        .unwrap();
    let go = ctx
        .create_test_game("Go", game_type.id, ada.gamer.id)
        .unwrap();
    let event = ctx
        .create_test_event("Chess night", chess.id, ada.gamer.id)
        .unwrap();

    let uri = format!("/v1/events/{}", event.id);

    let resp = test::call_service(
        &app,
        put(
            &uri,
            &ada.bearer(),
            json!({
                "description": "Go night",
                "date": "2024-02-03",
                "time": "18:30:00",
                "game": go.id,
            }),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let updated: Value = test::read_body_json(test::call_service(&app, get(&uri, &ada.bearer())).await).await;
    assert_eq!(updated["description"], "Go night");
    assert_eq!(updated["date"], "2024-02-03");
    assert_eq!(updated["time"], "18:30:00");
    assert_eq!(updated["game"]["id"], json!(go.id));

    // Unknown game reference
    let resp = test::call_service(
        &app,
        put(
            &uri,
            &ada.bearer(),
            json!({
                "description": "Go night",
                "date": "2024-02-03",
                "time": "18:30:00",
                "game": 9999,
            }),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(&app, delete(&uri, &ada.bearer())).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = test::call_service(&app, delete(&uri, &ada.bearer())).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
#[serial]
#[ignore = "requires a running postgres instance"]
async fn invalid_bodies_are_rejected() {
    let ctx = DatabaseContext::new(true).await;
    let app = init_app(&ctx).await;

    let ada = ctx.create_test_gamer(1).unwrap();
    let game_type = ctx.create_test_game_type("Board game").unwrap();

    let resp = test::call_service(
        &app,
        post(
            "/v1/games",
            &ada.bearer(),
            json!({
                "title": "Chess",
                "maker": "Unknown",
                "number_of_players": 2,
                "skill_level": 0,
                "type": game_type.id,
            }),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "validation_failed");
    assert_eq!(body["errors"][0]["field"], "skill_level");

    let resp = test::call_service(
        &app,
        post("/v1/games", &ada.bearer(), json!({ "title": "Chess" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "invalid_json");

    let resp = test::call_service(
        &app,
        post(
            "/v1/games",
            &ada.bearer(),
            json!({
                "title": "Chess",
                "maker": "Unknown",
                "number_of_players": 2,
                "skill_level": 3,
                "type": 9999,
            }),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let types: Value = test::read_body_json(test::call_service(&app, get("/v1/gametypes", &ada.bearer())).await).await;
    assert_eq!(types, json!([{ "id": game_type.id, "label": "Board game" }]));

    let resp = test::call_service(&app, get("/v1/gametypes/9999", &ada.bearer())).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
#[serial]
#[ignore = "requires a running postgres instance"]
async fn superuser_without_gamer_profile_modifies_games() {
    let ctx = DatabaseContext::new(true).await;
    let app = init_app(&ctx).await;

    let ada = ctx.create_test_gamer(1).unwrap();
    let admin = ctx.create_test_superuser(1).unwrap();
    let game_type = ctx.create_test_game_type("Board game").unwrap();
    let game = ctx
        .create_test_game("Chess", game_type.id, ada.gamer.id)
        .unwrap();

    let uri = format!("/v1/games/{}", game.id);

    let resp = test::call_service(
        &app,
        put(
            &uri,
            &admin.bearer(),
            json!({
                "title": "Fischer random",
                "maker": "Unknown",
                "number_of_players": 2,
                "skill_level": 5,
                "type": game_type.id,
            }),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let chess: Value =
        test::read_body_json(test::call_service(&app, get(&uri, &ada.bearer())).await).await;
    assert_eq!(chess["title"], "Fischer random");
    assert_eq!(chess["creator"]["id"], json!(ada.gamer.id));

    // Listing still needs a gamer profile to compute the per-gamer counts
    let resp = test::call_service(&app, get("/v1/games", &admin.bearer())).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(&app, delete(&uri, &admin.bearer())).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = test::call_service(&app, get(&uri, &ada.bearer())).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
