use crate::http;
use actix_web::web;

/// Mount every HTTP sub-module under `/api`.
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(http::json_config())
            .app_data(http::query_config())
            .app_data(http::path_config())
            .configure(http::courts::init_routes)
            .configure(http::games::init_routes)
            .configure(http::rsvps::init_routes)
            .configure(http::players::init_routes)
            .configure(http::health::init_routes),
    );
}
