//! Read-side composition: per-player hosted/attended views and the
//! upcoming-games listing.
//!
//! Courts and hosts are fetched with one batched lookup per dimension and
//! joined in memory, never one lookup per game. A player's view costs four
//! store calls: hosted games, attended games, courts, hosts.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use serde::Serialize;

use super::today;
use crate::db::models::{Court, GameFilter, PickupGame, PlayerSummary, RsvpStatus};
use crate::db::Store;
use crate::error::Result;

pub const DEFAULT_UPCOMING_LIMIT: i64 = 20;

/// A game joined with its court and host.
#[derive(Debug, Clone, Serialize)]
pub struct GameView {
    #[serde(flatten)]
    pub game: PickupGame,
    pub court: Option<Court>,
    pub host: Option<PlayerSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerGames {
    pub hosted: Vec<GameView>,
    /// Games reached through the player's RSVPs, never repeating a hosted one.
    pub attended: Vec<GameView>,
}

#[derive(Clone)]
pub struct GameQueryComposer {
    store: Arc<dyn Store>,
}

impl GameQueryComposer {
    pub fn new(store: Arc<dyn Store>) -> Self {
        GameQueryComposer { store }
    }

    pub async fn player_games(
        &self,
        player_id: i64,
        upcoming_only: bool,
        include_declined: bool,
    ) -> Result<PlayerGames> {
        let from_date = upcoming_only.then(today);

        let hosted = self
            .store
            .games(&GameFilter {
                host_id: Some(player_id),
                from_date,
                ..Default::default()
            })
            .await?;
        let hosted_ids: HashSet<i64> = hosted.iter().map(|g| g.game_id).collect();

        let statuses: &[RsvpStatus] = if include_declined {
            &RsvpStatus::ALL
        } else {
            &[RsvpStatus::Confirmed, RsvpStatus::Maybe]
        };
        let attended: Vec<PickupGame> = self
            .store
            .attended_games(player_id, statuses, from_date)
            .await?
            .into_iter()
            .filter(|g| !hosted_ids.contains(&g.game_id))
            .collect();

        let (courts, hosts) = self.lookup_courts_and_hosts(hosted.iter().chain(&attended)).await?;
        let join = |games: Vec<PickupGame>| -> Vec<GameView> {
            games
                .into_iter()
                .map(|game| GameView {
                    court: courts.get(&game.court_id).cloned(),
                    host: hosts.get(&game.host_id).cloned(),
                    game,
                })
                .collect()
        };

        Ok(PlayerGames {
            hosted: join(hosted),
            attended: join(attended),
        })
    }

    /// Games on or after today, soonest first.
    pub async fn upcoming_games(
        &self,
        limit: i64,
        court_id: Option<i64>,
        host_id: Option<i64>,
    ) -> Result<Vec<PickupGame>> {
        self.store
            .games(&GameFilter {
                host_id,
                court_id,
                from_date: Some(today()),
                limit: Some(limit.max(0)),
                ..Default::default()
            })
            .await
    }

    async fn lookup_courts_and_hosts<'a>(
        &self,
        games: impl Iterator<Item = &'a PickupGame>,
    ) -> Result<(HashMap<i64, Court>, HashMap<i64, PlayerSummary>)> {
        let mut court_ids = BTreeSet::new();
        let mut host_ids = BTreeSet::new();
        for g in games {
            court_ids.insert(g.court_id);
            host_ids.insert(g.host_id);
        }

        let court_ids: Vec<i64> = court_ids.into_iter().collect();
        let host_ids: Vec<i64> = host_ids.into_iter().collect();

        let courts = if court_ids.is_empty() {
            HashMap::new()
        } else {
            self.store
                .courts_by_ids(&court_ids)
                .await?
                .into_iter()
                .map(|c| (c.court_id, c))
                .collect()
        };
        let hosts = if host_ids.is_empty() {
            HashMap::new()
        } else {
            self.store
                .players_by_ids(&host_ids)
                .await?
                .into_iter()
                .map(|p| (p.player_id, p))
                .collect()
        };
        Ok((courts, hosts))
    }
}
