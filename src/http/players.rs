use actix_web::{get, web, HttpResponse};
use serde::Deserialize;

use crate::error::AppError;
use crate::players::DEFAULT_SEARCH_LIMIT;
use crate::Services;

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub search: String,
    pub limit: Option<i64>,
}

/// GET /api/players/search?search=..&limit=..
#[get("/players/search")]
pub async fn search(
    svc: web::Data<Services>,
    web::Query(params): web::Query<SearchParams>,
) -> Result<HttpResponse, AppError> {
    let rows = svc
        .players
        .search(&params.search, params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT))
        .await?;
    Ok(HttpResponse::Ok().json(rows))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(search);
}
