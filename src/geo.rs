//! Court discovery by distance, and the check-in proximity gate.
//!
//! Search is a two-stage filter: a latitude/longitude rectangle that the
//! store can answer with plain range predicates, then exact great-circle
//! distance in memory. The rectangle widens without bound towards the poles
//! and does not wrap across the antimeridian, so courts on the far side of
//! ±180° are never found. That is accepted for city-scale search.

use std::sync::Arc;

use serde::Serialize;

use crate::db::{models::Court, Store};
use crate::error::{AppError, Result};

pub const EARTH_RADIUS_KM: f64 = 6371.0;
/// Length of one degree of latitude, rounded.
pub const KM_PER_DEGREE: f64 = 111.0;
/// Upper bound on rows pulled from the store per search.
pub const CANDIDATE_CAP: i64 = 500;

/// Inclusive latitude/longitude rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    pub fn around(lat: f64, lng: f64, radius_km: f64) -> Self {
        let lat_delta = radius_km / KM_PER_DEGREE;
        let lng_delta = radius_km / (KM_PER_DEGREE * lat.to_radians().cos());
        BoundingBox {
            min_lat: lat - lat_delta,
            max_lat: lat + lat_delta,
            min_lng: lng - lng_delta,
            max_lng: lng + lng_delta,
        }
    }

    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lng >= self.min_lng && lng <= self.max_lng
    }
}

/// Great-circle distance in kilometres.
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Parse a raw `lat`/`lng` query value. Missing, empty or non-numeric input
/// is a validation error.
pub fn parse_coordinate(name: &str, raw: Option<&str>) -> Result<f64> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| !v.is_nan())
        .ok_or_else(|| AppError::validation(format!("{name} is a required numeric parameter")))
}

fn check_point(lat: f64, lng: f64) -> Result<()> {
    if !lat.is_finite() || !lng.is_finite() {
        return Err(AppError::validation("lat and lng must be finite numbers"));
    }
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(AppError::validation("lat/lng out of range"));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
pub struct NearbyCourt {
    #[serde(flatten)]
    pub court: Court,
    pub distance_km: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckIn {
    pub court_id: i64,
    pub distance_km: f64,
    pub checked_in: bool,
}

#[derive(Clone)]
pub struct GeoSearch {
    store: Arc<dyn Store>,
    check_in_radius_km: f64,
}

impl GeoSearch {
    pub fn new(store: Arc<dyn Store>, check_in_radius_km: f64) -> Self {
        GeoSearch {
            store,
            check_in_radius_km,
        }
    }

    /// Courts within `radius_km` of the point, nearest first, at most `limit`.
    pub async fn nearby_courts(
        &self,
        lat: f64,
        lng: f64,
        radius_km: f64,
        limit: usize,
    ) -> Result<Vec<NearbyCourt>> {
        check_point(lat, lng)?;
        if !radius_km.is_finite() || radius_km <= 0.0 {
            return Err(AppError::validation("radius_km must be a positive number"));
        }

        let bounds = BoundingBox::around(lat, lng, radius_km);
        let candidates = self.store.courts_in_bounds(&bounds, CANDIDATE_CAP).await?;
        let scanned = candidates.len();

        let mut results: Vec<NearbyCourt> = candidates
            .into_iter()
            .map(|court| {
                let distance_km = haversine_km(lat, lng, court.latitude, court.longitude);
                NearbyCourt { court, distance_km }
            })
            .filter(|c| c.distance_km <= radius_km)
            .collect();

        // Stable: equal distances keep store order.
        results.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        results.truncate(limit);

        log::debug!(
            "nearby courts ({lat}, {lng}) r={radius_km}km: {} of {scanned} candidates",
            results.len()
        );
        Ok(results)
    }

    /// Admit a check-in only when the caller's position is within the
    /// configured radius of the court.
    pub async fn check_in(&self, court_id: i64, lat: f64, lng: f64) -> Result<CheckIn> {
        check_point(lat, lng)?;
        let court = self
            .store
            .court(court_id)
            .await?
            .ok_or_else(|| AppError::not_found("Court not found"))?;

        let distance_km = haversine_km(lat, lng, court.latitude, court.longitude);
        if distance_km > self.check_in_radius_km {
            return Err(AppError::Forbidden(
                "You need to be at the court to check in".into(),
            ));
        }

        Ok(CheckIn {
            court_id,
            distance_km,
            checked_in: true,
        })
    }
}
