//! RSVP casting and per-game tallies.

use actix_web::{get, post, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;
use crate::Services;

#[derive(Deserialize)]
pub struct CountParams {
    pub game_id: Option<i64>,
}

#[derive(Deserialize)]
pub struct RsvpReq {
    pub player_id: Option<i64>,
    pub game_id: Option<i64>,
    pub status: Option<String>,
}

/// GET /api/rsvps/count?game_id=..
#[get("/rsvps/count")]
pub async fn count(
    svc: web::Data<Services>,
    web::Query(params): web::Query<CountParams>,
) -> Result<HttpResponse, AppError> {
    let game_id = params
        .game_id
        .ok_or_else(|| AppError::validation("Missing game_id parameter"))?;
    let counts = svc.rsvps.counts_by_status(game_id).await?;
    Ok(HttpResponse::Ok().json(counts))
}

/// POST /api/rsvps
#[post("/rsvps")]
pub async fn rsvp(svc: web::Data<Services>, info: web::Json<RsvpReq>) -> Result<HttpResponse, AppError> {
    let RsvpReq {
        player_id,
        game_id,
        status,
    } = info.into_inner();
    let (Some(player_id), Some(game_id), Some(status)) = (player_id, game_id, status) else {
        return Err(AppError::validation("Invalid request"));
    };

    svc.rsvps.upsert(player_id, game_id, &status).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "RSVP updated" })))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(count).service(rsvp);
}
