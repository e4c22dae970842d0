use std::sync::Arc;
use std::time::Duration;

use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use courtside_server::{
    auth::JwtVerifier,
    config::settings,
    db::{MemoryStore, PgStore, Store},
    http, metrics, Services,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cfg = settings();
    let secret = cfg.jwt_secret.as_deref().context("JWT_SECRET must be set")?;

    let store: Arc<dyn Store> = match &cfg.database_url {
        Some(url) => Arc::new(
            PgStore::connect(url, cfg.database_max_connections)
                .await
                .context("Failed to create Postgres pool")?,
        ),
        None => {
            log::warn!("DATABASE_URL not set; using the in-memory store");
            Arc::new(MemoryStore::new())
        }
    };
    let verifier = Arc::new(JwtVerifier::new(secret, cfg.jwt_audience.as_deref()));
    let services = web::Data::new(Services::new(store, verifier, cfg.check_in_radius_km));

    log::info!("listening on {}", cfg.server_addr);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(metrics::METRICS.clone())
            .app_data(services.clone())
            .configure(http::routes::init_routes)
    })
    .client_request_timeout(Duration::from_secs(cfg.request_timeout_secs))
    .bind(&cfg.server_addr)
    .with_context(|| format!("binding {}", cfg.server_addr))?
    .run()
    .await
    .context("server error")
}
