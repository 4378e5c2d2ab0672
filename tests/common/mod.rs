// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use serde_json::json;
use std::sync::Arc;
use wheelloop::db::{keys, KeyValueStorage, MemoryStorage, SessionPersistence};
use wheelloop::models::{AthleteProfile, TokenPayload, WheelSettings};
use wheelloop::services::SessionStore;

/// Token payload shaped like a Strava token response.
#[allow(dead_code)]
pub fn sample_tokens() -> TokenPayload {
    TokenPayload {
        token_type: "Bearer".to_string(),
        access_token: "a9b723a6f8e4c1d2".to_string(),
        expires_at: 1_760_000_000,
        expires_in: 21600,
        refresh_token: "e5n567567f2a9b10".to_string(),
    }
}

/// Athlete profile with a mix of value kinds.
#[allow(dead_code)]
pub fn sample_athlete() -> AthleteProfile {
    [
        ("id", json!(134815)),
        ("firstname", json!("Marianne")),
        ("lastname", json!("Teutenberg")),
        ("premium", json!(true)),
        ("weight", json!(62.5)),
        ("clubs", json!([])),
        ("bikes", json!([{ "id": "b12345678987655", "primary": true }])),
    ]
    .into_iter()
    .collect()
}

#[allow(dead_code)]
pub fn filled_wheel() -> WheelSettings {
    WheelSettings {
        model: "a".to_string(),
        base_url: "b".to_string(),
        api_key: "c".to_string(),
        system_prompt: "d".to_string(),
    }
}

/// Memory storage with `raw` already stored under the session key.
#[allow(dead_code)]
pub fn seeded_storage(raw: &str) -> MemoryStorage {
    let storage = MemoryStorage::new();
    storage
        .set_item(keys::SESSION, raw)
        .expect("seeding memory storage");
    storage
}

/// Store on top of a (shared) memory storage.
#[allow(dead_code)]
pub fn store_on(storage: &MemoryStorage) -> SessionStore {
    SessionStore::new(SessionPersistence::new(Arc::new(storage.clone())))
}

/// Parsed JSON currently in the session slot.
#[allow(dead_code)]
pub fn stored_json(storage: &MemoryStorage) -> Option<serde_json::Value> {
    storage
        .get_item(keys::SESSION)
        .expect("reading memory storage")
        .map(|raw| serde_json::from_str(&raw).expect("stored session should be JSON"))
}
