//! Simple liveness / readiness probe

use actix_web::{get, web, HttpResponse, Responder};

use crate::Services;

#[get("/healthz")]
pub async fn healthz(svc: web::Data<Services>) -> impl Responder {
    if let Err(e) = svc.store.ping().await {
        log::warn!("health check failed: {e}");
        return HttpResponse::ServiceUnavailable().body("db");
    }
    HttpResponse::Ok().body("ok")
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(healthz);
}
