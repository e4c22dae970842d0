//! Runtime configuration for the Courtside server.

use once_cell::sync::Lazy;
use std::env;

#[derive(Debug)]
pub struct Settings {
    /// Postgres connection string; the in-memory store is used when unset.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub server_addr: String,
    /// HS256 secret shared with the token issuer.
    pub jwt_secret: Option<String>,
    pub jwt_audience: Option<String>,
    /// How close (km) a player must be to a court to check in.
    pub check_in_radius_km: f64,
    pub request_timeout_secs: u64,
}

fn parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Settings {
    pub fn from_env() -> Self {
        Settings {
            database_url: non_empty("DATABASE_URL"),
            database_max_connections: parsed("DATABASE_MAX_CONNECTIONS", 5),
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".into()),
            jwt_secret: non_empty("JWT_SECRET"),
            jwt_audience: non_empty("JWT_AUDIENCE"),
            check_in_radius_km: parsed("CHECK_IN_RADIUS_KM", 0.1), // ~100 m
            request_timeout_secs: parsed("REQUEST_TIMEOUT_SECS", 10),
        }
    }
}

static SETTINGS: Lazy<Settings> = Lazy::new(Settings::from_env);

pub fn settings() -> &'static Settings {
    &SETTINGS
}
