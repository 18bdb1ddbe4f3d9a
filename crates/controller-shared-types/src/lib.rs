// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Shared types for the levelup controller.
//! Kept separate so the storage crates don't depend on the web layer.

pub mod settings;
