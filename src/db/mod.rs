//! Persistence collaborator: the `Store` interface and its implementations.

pub mod memory;
pub mod models;
pub mod pg;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::Result;
use crate::geo::BoundingBox;
use models::{
    Court, GameChanges, GameFilter, NewGame, PickupGame, Player, PlayerSummary, Rsvp, RsvpStatus,
};

pub use memory::MemoryStore;
pub use pg::PgStore;

/// Queryable store over players, courts, pickup games and RSVPs.
///
/// Every method is a single round trip (or a single transaction) so that
/// handlers stay within a small, fixed number of store calls.
#[async_trait]
pub trait Store: Send + Sync {
    /// Liveness probe.
    async fn ping(&self) -> Result<()>;

    async fn player(&self, player_id: i64) -> Result<Option<Player>>;
    async fn player_by_user(&self, user_id: Uuid) -> Result<Option<Player>>;
    async fn players_by_ids(&self, ids: &[i64]) -> Result<Vec<PlayerSummary>>;
    /// Case-insensitive substring match on `name`, ordered by name.
    async fn search_players(&self, needle: &str, limit: i64) -> Result<Vec<PlayerSummary>>;

    async fn court(&self, court_id: i64) -> Result<Option<Court>>;
    /// At most `cap` courts inside `bounds`.
    async fn courts_in_bounds(&self, bounds: &BoundingBox, cap: i64) -> Result<Vec<Court>>;
    async fn courts_by_ids(&self, ids: &[i64]) -> Result<Vec<Court>>;

    async fn game(&self, game_id: i64) -> Result<Option<PickupGame>>;
    async fn games(&self, filter: &GameFilter) -> Result<Vec<PickupGame>>;
    /// Insert the game and the host's confirmed RSVP as one unit: either
    /// both rows exist afterwards or neither does.
    async fn insert_game_with_host_rsvp(&self, game: &NewGame) -> Result<PickupGame>;
    /// Apply `changes` only if `host_id` still hosts the game. `None` when
    /// no row matched.
    async fn update_game_as_host(
        &self,
        game_id: i64,
        host_id: i64,
        changes: &GameChanges,
    ) -> Result<Option<PickupGame>>;
    /// Delete only if `host_id` still hosts the game. `false` when no row
    /// matched.
    async fn delete_game_as_host(&self, game_id: i64, host_id: i64) -> Result<bool>;

    /// Insert-or-update keyed on (player_id, game_id), refreshing the game's
    /// RSVP counters in the same operation.
    async fn upsert_rsvp(&self, player_id: i64, game_id: i64, status: RsvpStatus) -> Result<Rsvp>;
    /// Games `player_id` has an RSVP in `statuses` for, excluding games they
    /// host, on or after `from_date` when given, ordered by `game_date`.
    async fn attended_games(
        &self,
        player_id: i64,
        statuses: &[RsvpStatus],
        from_date: Option<NaiveDate>,
    ) -> Result<Vec<PickupGame>>;
    /// Grouped count; statuses with no rows are omitted.
    async fn rsvp_counts(&self, game_id: i64) -> Result<Vec<(RsvpStatus, i64)>>;
}
