//! Pickup-game endpoints: listing, per-player views and host mutations.

use actix_web::{get, post, route, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::db::models::GameChanges;
use crate::error::AppError;
use crate::game::{query::DEFAULT_UPCOMING_LIMIT, registry::CreateGameInput};
use crate::http::auth::BearerToken;
use crate::Services;

//////////////////////////////////////////////////
// Requests
//////////////////////////////////////////////////

#[derive(Deserialize)]
pub struct UpcomingParams {
    pub limit: Option<i64>,
    pub court_id: Option<i64>,
    pub host_id: Option<i64>,
}

#[derive(Deserialize)]
pub struct PlayerGamesParams {
    pub player_id: Option<i64>,
    #[serde(default)]
    pub upcoming: bool,
    #[serde(default)]
    pub include_declined: bool,
}

/// `game_id` plus any whitelisted fields; other keys are ignored.
#[derive(Deserialize)]
pub struct UpdateReq {
    pub game_id: Option<i64>,
    #[serde(flatten)]
    pub changes: GameChanges,
}

#[derive(Deserialize)]
pub struct GameIdReq {
    pub game_id: Option<i64>,
}

fn require_game_id(id: Option<i64>) -> Result<i64, AppError> {
    id.ok_or_else(|| AppError::validation("game_id required"))
}

//////////////////////////////////////////////////
// Handlers
//////////////////////////////////////////////////

/// GET /api/games/upcoming
#[get("/games/upcoming")]
pub async fn upcoming(
    svc: web::Data<Services>,
    web::Query(params): web::Query<UpcomingParams>,
) -> Result<HttpResponse, AppError> {
    let limit = params.limit.filter(|l| *l > 0).unwrap_or(DEFAULT_UPCOMING_LIMIT);
    let games = svc
        .queries
        .upcoming_games(limit, params.court_id, params.host_id)
        .await?;
    Ok(HttpResponse::Ok().json(games))
}

/// GET /api/games/player — `player_id` wins; otherwise the bearer's profile.
#[get("/games/player")]
pub async fn player_games(
    svc: web::Data<Services>,
    bearer: BearerToken,
    web::Query(params): web::Query<PlayerGamesParams>,
) -> Result<HttpResponse, AppError> {
    let player_id = match params.player_id {
        Some(id) => id,
        None => {
            svc.auth
                .resolve_request_player(bearer.as_deref())
                .await?
                .player_id
        }
    };
    let games = svc
        .queries
        .player_games(player_id, params.upcoming, params.include_declined)
        .await?;
    Ok(HttpResponse::Ok().json(games))
}

/// POST /api/games
#[post("/games")]
pub async fn create(
    svc: web::Data<Services>,
    info: web::Json<CreateGameInput>,
) -> Result<HttpResponse, AppError> {
    let game = svc.games.create(info.into_inner()).await?;
    Ok(HttpResponse::Created().json(game))
}

/// PATCH|POST /api/games/update (host only)
#[route("/games/update", method = "PATCH", method = "POST")]
pub async fn update(
    svc: web::Data<Services>,
    bearer: BearerToken,
    info: web::Json<UpdateReq>,
) -> Result<HttpResponse, AppError> {
    let UpdateReq { game_id, changes } = info.into_inner();
    let game_id = require_game_id(game_id)?;
    let game = svc.games.update(game_id, bearer.as_deref(), changes).await?;
    Ok(HttpResponse::Ok().json(json!({ "game": game })))
}

/// POST|DELETE /api/games/delete (host only); `game_id` from query or body.
#[route("/games/delete", method = "POST", method = "DELETE")]
pub async fn delete(
    svc: web::Data<Services>,
    bearer: BearerToken,
    web::Query(query): web::Query<GameIdReq>,
    body: Option<web::Json<GameIdReq>>,
) -> Result<HttpResponse, AppError> {
    let game_id = require_game_id(query.game_id.or_else(|| body.and_then(|b| b.game_id)))?;
    svc.games.delete(game_id, bearer.as_deref()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Game deleted" })))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(upcoming)
        .service(player_games)
        .service(create)
        .service(update)
        .service(delete);
}
