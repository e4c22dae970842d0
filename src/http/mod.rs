pub mod auth;
pub mod courts;
pub mod games;
pub mod health;
pub mod players;
pub mod routes;
pub mod rsvps;

use actix_web::web;

use crate::error::AppError;

// Extractor failures use the same `{ "error": ... }` body as everything else.

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::validation(format!("invalid JSON body: {err}")).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::validation(format!("invalid query: {err}")).into())
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req| AppError::validation(format!("invalid path: {err}")).into())
}
