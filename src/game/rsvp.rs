//! RSVP ledger: one status row per (player, game).

use std::sync::Arc;

use crate::db::models::{Rsvp, RsvpCounts, RsvpStatus};
use crate::db::Store;
use crate::error::{AppError, Result};
use crate::metrics::{self, DomainEvent};

#[derive(Clone)]
pub struct RsvpLedger {
    store: Arc<dyn Store>,
}

impl RsvpLedger {
    pub fn new(store: Arc<dyn Store>) -> Self {
        RsvpLedger { store }
    }

    /// Record `status` for the pair, replacing any earlier answer.
    pub async fn upsert(&self, player_id: i64, game_id: i64, status: &str) -> Result<Rsvp> {
        let status: RsvpStatus = status.parse()?;

        if self.store.player(player_id).await?.is_none() {
            return Err(AppError::not_found("Player not found"));
        }
        if self.store.game(game_id).await?.is_none() {
            return Err(AppError::not_found("Game not found"));
        }

        let rsvp = self.store.upsert_rsvp(player_id, game_id, status).await?;
        metrics::record(DomainEvent::RsvpCast);
        log::info!("player {player_id} rsvp {status} for game {game_id}");
        Ok(rsvp)
    }

    pub async fn counts_by_status(&self, game_id: i64) -> Result<RsvpCounts> {
        let mut counts = RsvpCounts::default();
        for (status, n) in self.store.rsvp_counts(game_id).await? {
            match status {
                RsvpStatus::Confirmed => counts.confirmed = n,
                RsvpStatus::Maybe => counts.maybe = n,
                RsvpStatus::Declined => counts.declined = n,
            }
        }
        Ok(counts)
    }
}
