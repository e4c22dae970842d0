//! Courtside: pickup basketball games, courts and RSVPs over JSON/HTTP.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod game;
pub mod geo;
pub mod http;
pub mod metrics;
pub mod players;

use std::sync::Arc;

use auth::{AuthResolver, TokenVerifier};
use db::Store;
use game::{query::GameQueryComposer, registry::GameRegistry, rsvp::RsvpLedger};
use geo::GeoSearch;
use players::PlayerDirectory;

/// Every component, wired to one store handle. Shared with handlers as
/// `web::Data<Services>`.
#[derive(Clone)]
pub struct Services {
    pub store: Arc<dyn Store>,
    pub auth: AuthResolver,
    pub geo: GeoSearch,
    pub players: PlayerDirectory,
    pub rsvps: RsvpLedger,
    pub games: GameRegistry,
    pub queries: GameQueryComposer,
}

impl Services {
    pub fn new(store: Arc<dyn Store>, verifier: Arc<dyn TokenVerifier>, check_in_radius_km: f64) -> Self {
        let auth = AuthResolver::new(store.clone(), verifier);
        Services {
            geo: GeoSearch::new(store.clone(), check_in_radius_km),
            players: PlayerDirectory::new(store.clone()),
            rsvps: RsvpLedger::new(store.clone()),
            games: GameRegistry::new(store.clone(), auth.clone()),
            queries: GameQueryComposer::new(store.clone()),
            auth,
            store,
        }
    }
}
