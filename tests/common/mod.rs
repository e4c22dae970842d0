//! Shared fixtures: an in-memory store wired into `Services`, plus tokens.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Days, NaiveDate, Utc};
use courtside_server::{
    auth::JwtVerifier,
    db::{models::Player, MemoryStore},
    game::{registry::CreateGameInput, today},
    Services,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;
use uuid::Uuid;

pub const SECRET: &str = "test-secret";
pub const CHECK_IN_RADIUS_KM: f64 = 0.1;

pub fn setup() -> (Arc<MemoryStore>, Services) {
    let store = Arc::new(MemoryStore::new());
    let verifier = Arc::new(JwtVerifier::new(SECRET, None));
    let services = Services::new(store.clone(), verifier, CHECK_IN_RADIUS_KM);
    (store, services)
}

/// A signed, unexpired token for `user_id`.
pub fn token_for(user_id: Uuid) -> String {
    let claims = json!({
        "sub": user_id.to_string(),
        "email": "hooper@example.com",
        "exp": Utc::now().timestamp() + 3600,
    });
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .expect("encode token")
}

pub fn player(store: &MemoryStore, name: &str) -> Player {
    store.add_player(Uuid::new_v4(), name)
}

pub fn days_from_today(days: i64) -> NaiveDate {
    if days >= 0 {
        today() + Days::new(days as u64)
    } else {
        today() - Days::new(days.unsigned_abs())
    }
}

pub fn game_input(host_id: i64, court_id: i64, game_date: NaiveDate) -> CreateGameInput {
    CreateGameInput {
        host_id: Some(host_id),
        court_id: Some(court_id),
        game_date: Some(game_date),
        game_time: Some("18:30".into()),
        players_needed: Some(10),
        skill_level: Some("intermediate".into()),
        notes: Some("full court".into()),
    }
}
