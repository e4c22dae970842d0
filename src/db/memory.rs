//! In-process store backed by `DashMap`s. Used by the test-suite and for
//! running the server without a database.
//!
//! RSVPs are keyed by `(player_id, game_id)`, so the entry API gives the
//! same at-most-one-row guarantee as the unique constraint in Postgres.
//! Deleting a game leaves its RSVPs behind.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use super::models::{
    Court, GameChanges, GameFilter, NewGame, PickupGame, Player, PlayerSummary, Rsvp, RsvpStatus,
};
use super::Store;
use crate::error::Result;
use crate::geo::BoundingBox;

#[derive(Default)]
pub struct MemoryStore {
    players: DashMap<i64, Player>,
    courts: DashMap<i64, Court>,
    games: DashMap<i64, PickupGame>,
    rsvps: DashMap<(i64, i64), Rsvp>,
    next_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Provision a player profile for `user_id`.
    pub fn add_player(&self, user_id: Uuid, name: &str) -> Player {
        let player = Player {
            player_id: self.next_id(),
            user_id,
            name: name.to_owned(),
        };
        self.players.insert(player.player_id, player.clone());
        player
    }

    pub fn add_court(&self, name: &str, latitude: f64, longitude: f64) -> Court {
        let court = Court {
            court_id: self.next_id(),
            name: name.to_owned(),
            latitude,
            longitude,
            address: None,
            image: None,
        };
        self.courts.insert(court.court_id, court.clone());
        court
    }

    pub fn game_count(&self) -> usize {
        self.games.len()
    }

    pub fn rsvp_count(&self) -> usize {
        self.rsvps.len()
    }

    /// Every RSVP row held for `player_id`, whether or not its game survives.
    pub fn rsvps_of(&self, player_id: i64) -> Vec<Rsvp> {
        self.rsvps
            .iter()
            .filter(|r| r.player_id == player_id)
            .map(|r| r.value().clone())
            .collect()
    }

    fn refresh_counts(&self, game_id: i64) {
        let mut counts = [0i32; 3];
        for r in self.rsvps.iter().filter(|r| r.game_id == game_id) {
            let slot = match r.status {
                RsvpStatus::Confirmed => 0,
                RsvpStatus::Maybe => 1,
                RsvpStatus::Declined => 2,
            };
            counts[slot] += 1;
        }
        if let Some(mut game) = self.games.get_mut(&game_id) {
            game.confirmed_count = counts[0];
            game.maybe_count = counts[1];
            game.declined_count = counts[2];
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn player(&self, player_id: i64) -> Result<Option<Player>> {
        Ok(self.players.get(&player_id).map(|p| p.value().clone()))
    }

    async fn player_by_user(&self, user_id: Uuid) -> Result<Option<Player>> {
        Ok(self
            .players
            .iter()
            .find(|p| p.user_id == user_id)
            .map(|p| p.value().clone()))
    }

    async fn players_by_ids(&self, ids: &[i64]) -> Result<Vec<PlayerSummary>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.players.get(id))
            .map(|p| p.value().clone().into())
            .collect())
    }

    async fn search_players(&self, needle: &str, limit: i64) -> Result<Vec<PlayerSummary>> {
        let needle = needle.to_lowercase();
        let mut hits: Vec<PlayerSummary> = self
            .players
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .map(|p| p.value().clone().into())
            .collect();
        hits.sort_by(|a, b| a.name.cmp(&b.name).then(a.player_id.cmp(&b.player_id)));
        hits.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(hits)
    }

    async fn court(&self, court_id: i64) -> Result<Option<Court>> {
        Ok(self.courts.get(&court_id).map(|c| c.value().clone()))
    }

    async fn courts_in_bounds(&self, bounds: &BoundingBox, cap: i64) -> Result<Vec<Court>> {
        let mut hits: Vec<Court> = self
            .courts
            .iter()
            .filter(|c| bounds.contains(c.latitude, c.longitude))
            .map(|c| c.value().clone())
            .collect();
        hits.sort_by_key(|c| c.court_id);
        hits.truncate(usize::try_from(cap).unwrap_or(0));
        Ok(hits)
    }

    async fn courts_by_ids(&self, ids: &[i64]) -> Result<Vec<Court>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.courts.get(id))
            .map(|c| c.value().clone())
            .collect())
    }

    async fn game(&self, game_id: i64) -> Result<Option<PickupGame>> {
        Ok(self.games.get(&game_id).map(|g| g.value().clone()))
    }

    async fn games(&self, filter: &GameFilter) -> Result<Vec<PickupGame>> {
        let mut hits: Vec<PickupGame> = self
            .games
            .iter()
            .filter(|g| filter.matches(g.value()))
            .map(|g| g.value().clone())
            .collect();
        hits.sort_by_key(|g| (g.game_date, g.game_id));
        if let Some(limit) = filter.limit {
            hits.truncate(usize::try_from(limit).unwrap_or(0));
        }
        Ok(hits)
    }

    async fn insert_game_with_host_rsvp(&self, game: &NewGame) -> Result<PickupGame> {
        let created = PickupGame {
            game_id: self.next_id(),
            host_id: game.host_id,
            court_id: game.court_id,
            game_date: game.game_date,
            game_time: game.game_time.clone(),
            players_needed: game.players_needed,
            skill_level: game.skill_level.clone(),
            notes: game.notes.clone(),
            confirmed_count: 1,
            maybe_count: 0,
            declined_count: 0,
        };
        let rsvp = Rsvp {
            rsvp_id: self.next_id(),
            player_id: game.host_id,
            game_id: created.game_id,
            status: RsvpStatus::Confirmed,
            created_at: Utc::now(),
        };
        self.rsvps.insert((rsvp.player_id, rsvp.game_id), rsvp);
        self.games.insert(created.game_id, created.clone());
        Ok(created)
    }

    async fn update_game_as_host(
        &self,
        game_id: i64,
        host_id: i64,
        changes: &GameChanges,
    ) -> Result<Option<PickupGame>> {
        match self.games.get_mut(&game_id) {
            Some(mut game) if game.host_id == host_id => {
                changes.apply_to(&mut game);
                Ok(Some(game.value().clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_game_as_host(&self, game_id: i64, host_id: i64) -> Result<bool> {
        Ok(self
            .games
            .remove_if(&game_id, |_, g| g.host_id == host_id)
            .is_some())
    }

    async fn upsert_rsvp(&self, player_id: i64, game_id: i64, status: RsvpStatus) -> Result<Rsvp> {
        let rsvp = self
            .rsvps
            .entry((player_id, game_id))
            .and_modify(|r| r.status = status)
            .or_insert_with(|| Rsvp {
                rsvp_id: self.next_id(),
                player_id,
                game_id,
                status,
                created_at: Utc::now(),
            })
            .value()
            .clone();
        self.refresh_counts(game_id);
        Ok(rsvp)
    }

    async fn attended_games(
        &self,
        player_id: i64,
        statuses: &[RsvpStatus],
        from_date: Option<NaiveDate>,
    ) -> Result<Vec<PickupGame>> {
        let mut hits: Vec<PickupGame> = self
            .rsvps
            .iter()
            .filter(|r| r.player_id == player_id && statuses.contains(&r.status))
            .filter_map(|r| self.games.get(&r.game_id).map(|g| g.value().clone()))
            .filter(|g| g.host_id != player_id && from_date.map_or(true, |d| g.game_date >= d))
            .collect();
        hits.sort_by_key(|g| (g.game_date, g.game_id));
        Ok(hits)
    }

    async fn rsvp_counts(&self, game_id: i64) -> Result<Vec<(RsvpStatus, i64)>> {
        let mut out: Vec<(RsvpStatus, i64)> = Vec::new();
        for r in self.rsvps.iter().filter(|r| r.game_id == game_id) {
            match out.iter_mut().find(|(s, _)| *s == r.status) {
                Some((_, n)) => *n += 1,
                None => out.push((r.status, 1)),
            }
        }
        Ok(out)
    }
}
