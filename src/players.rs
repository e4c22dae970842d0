//! Player name search.

use std::sync::Arc;

use crate::db::{models::PlayerSummary, Store};
use crate::error::Result;

pub const DEFAULT_SEARCH_LIMIT: i64 = 10;
pub const MAX_SEARCH_LIMIT: i64 = 100;

#[derive(Clone)]
pub struct PlayerDirectory {
    store: Arc<dyn Store>,
}

impl PlayerDirectory {
    pub fn new(store: Arc<dyn Store>) -> Self {
        PlayerDirectory { store }
    }

    /// Case-insensitive substring match, ordered by name. An empty
    /// substring matches everyone, bounded by `limit`.
    pub async fn search(&self, substring: &str, limit: i64) -> Result<Vec<PlayerSummary>> {
        let limit = limit.clamp(1, MAX_SEARCH_LIMIT);
        self.store.search_players(substring.trim(), limit).await
    }
}
