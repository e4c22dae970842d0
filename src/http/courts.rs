//! Court discovery and check-in.

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::geo::{parse_coordinate, NearbyCourt};
use crate::Services;

pub const DEFAULT_RADIUS_KM: f64 = 10.0;
pub const DEFAULT_NEARBY_LIMIT: usize = 50;

/// `lat`/`lng` stay raw so that missing and non-numeric values produce the
/// same validation error.
#[derive(Deserialize)]
pub struct NearbyParams {
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub radius_km: Option<f64>,
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct NearbyResponse {
    pub results: Vec<NearbyCourt>,
}

#[derive(Deserialize)]
pub struct CheckInReq {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// GET /api/courts/nearby?lat=..&lng=..&radius_km=..&limit=..
#[get("/courts/nearby")]
pub async fn nearby(
    svc: web::Data<Services>,
    web::Query(params): web::Query<NearbyParams>,
) -> Result<HttpResponse, AppError> {
    let lat = parse_coordinate("lat", params.lat.as_deref())?;
    let lng = parse_coordinate("lng", params.lng.as_deref())?;
    let results = svc
        .geo
        .nearby_courts(
            lat,
            lng,
            params.radius_km.unwrap_or(DEFAULT_RADIUS_KM),
            params.limit.unwrap_or(DEFAULT_NEARBY_LIMIT),
        )
        .await?;
    Ok(HttpResponse::Ok().json(NearbyResponse { results }))
}

/// POST /api/courts/{court_id}/check_in
#[post("/courts/{court_id}/check_in")]
pub async fn check_in(
    svc: web::Data<Services>,
    path: web::Path<i64>,
    info: web::Json<CheckInReq>,
) -> Result<HttpResponse, AppError> {
    let (lat, lng) = match (info.lat, info.lng) {
        (Some(lat), Some(lng)) => (lat, lng),
        _ => return Err(AppError::validation("lat and lng are required")),
    };
    let result = svc.geo.check_in(path.into_inner(), lat, lng).await?;
    Ok(HttpResponse::Ok().json(result))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(nearby).service(check_in);
}
