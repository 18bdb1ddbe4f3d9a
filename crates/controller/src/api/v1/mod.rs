// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! REST API v1
//!
//! Current Endpoints. See their respective function:
//! - `/events` ([GET](events::get_events), [POST](events::new_event))
//! - `/events/{event_id}` ([GET](events::get_event), [PUT](events::put_event), [DELETE](events::delete_event))
//! - `/events/{event_id}/signup` ([POST](events::signup))
//! - `/events/{event_id}/leave` ([DELETE](events::leave))
//! - `/games` ([GET](games::get_games), [POST](games::new_game))
//! - `/games/{game_id}` ([GET](games::get_game), [PUT](games::put_game), [DELETE](games::delete_game))
//! - `/gametypes` ([GET](game_types::get_game_types))
//! - `/gametypes/{game_type_id}` ([GET](game_types::get_game_type))

pub mod events;
pub mod game_types;
pub mod gamers;
pub mod games;
pub mod middleware;
pub mod response;
