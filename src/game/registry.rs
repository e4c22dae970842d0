//! Game creation and host-only mutation.
//!
//! Ownership is never cached: update and delete read the game to report
//! 404/403, then issue a write that is itself guarded on `host_id`, so a
//! host change between the read and the write cannot slip through.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::auth::AuthResolver;
use crate::db::models::{GameChanges, NewGame, PickupGame, Player};
use crate::db::Store;
use crate::error::{AppError, Result};
use crate::metrics::{self, DomainEvent};

/// Body of a create request. Every field but `notes` is required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateGameInput {
    pub host_id: Option<i64>,
    pub court_id: Option<i64>,
    pub game_date: Option<NaiveDate>,
    pub game_time: Option<String>,
    pub players_needed: Option<i32>,
    pub skill_level: Option<String>,
    pub notes: Option<String>,
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
}

impl CreateGameInput {
    pub fn validate(self) -> Result<NewGame> {
        let missing = || AppError::validation("Missing required fields");
        let players_needed = self.players_needed.ok_or_else(missing)?;
        if players_needed <= 0 {
            return Err(AppError::validation("players_needed must be positive"));
        }
        Ok(NewGame {
            host_id: self.host_id.ok_or_else(missing)?,
            court_id: self.court_id.ok_or_else(missing)?,
            game_date: self.game_date.ok_or_else(missing)?,
            game_time: non_blank(self.game_time).ok_or_else(missing)?,
            players_needed,
            skill_level: non_blank(self.skill_level).ok_or_else(missing)?,
            notes: self.notes,
        })
    }
}

#[derive(Clone)]
pub struct GameRegistry {
    store: Arc<dyn Store>,
    auth: AuthResolver,
}

impl GameRegistry {
    pub fn new(store: Arc<dyn Store>, auth: AuthResolver) -> Self {
        GameRegistry { store, auth }
    }

    /// Create a game and confirm its host in one store operation.
    pub async fn create(&self, input: CreateGameInput) -> Result<PickupGame> {
        let new_game = input.validate()?;

        if self.store.player(new_game.host_id).await?.is_none() {
            return Err(AppError::not_found("Host not found"));
        }
        if self.store.court(new_game.court_id).await?.is_none() {
            return Err(AppError::not_found("Court not found"));
        }

        let game = self.store.insert_game_with_host_rsvp(&new_game).await?;
        metrics::record(DomainEvent::GameCreated);
        log::info!(
            "game {} created by host {} at court {} on {}",
            game.game_id,
            game.host_id,
            game.court_id,
            game.game_date
        );
        Ok(game)
    }

    pub async fn update(
        &self,
        game_id: i64,
        token: Option<&str>,
        changes: GameChanges,
    ) -> Result<PickupGame> {
        let caller = self.auth.resolve_request_player(token).await?;
        self.authorize_host(game_id, &caller, "update").await?;

        let changes = self.validate_changes(changes).await?;
        match self
            .store
            .update_game_as_host(game_id, caller.player_id, &changes)
            .await?
        {
            Some(game) => {
                metrics::record(DomainEvent::GameUpdated);
                log::info!("game {game_id} updated by host {}", caller.player_id);
                Ok(game)
            }
            None => Err(self.guarded_miss(game_id, "update").await),
        }
    }

    /// Remove the game row. Its RSVP rows stay behind.
    pub async fn delete(&self, game_id: i64, token: Option<&str>) -> Result<()> {
        let caller = self.auth.resolve_request_player(token).await?;
        self.authorize_host(game_id, &caller, "delete").await?;

        if self.store.delete_game_as_host(game_id, caller.player_id).await? {
            metrics::record(DomainEvent::GameDeleted);
            log::info!("game {game_id} deleted by host {}", caller.player_id);
            Ok(())
        } else {
            Err(self.guarded_miss(game_id, "delete").await)
        }
    }

    async fn authorize_host(&self, game_id: i64, caller: &Player, action: &str) -> Result<PickupGame> {
        let game = self
            .store
            .game(game_id)
            .await?
            .ok_or_else(|| AppError::not_found("Game not found"))?;
        if game.host_id != caller.player_id {
            log::warn!(
                "player {} tried to {action} game {game_id} hosted by {}",
                caller.player_id,
                game.host_id
            );
            return Err(forbidden(action));
        }
        Ok(game)
    }

    async fn validate_changes(&self, mut changes: GameChanges) -> Result<GameChanges> {
        if changes.is_empty() {
            return Err(AppError::validation("No updatable fields provided"));
        }
        if matches!(changes.players_needed, Some(n) if n <= 0) {
            return Err(AppError::validation("players_needed must be positive"));
        }
        for field in [&mut changes.game_time, &mut changes.skill_level] {
            if let Some(v) = field.take() {
                *field = Some(non_blank(Some(v)).ok_or_else(|| AppError::validation("fields must not be blank"))?);
            }
        }
        if let Some(court_id) = changes.court_id {
            if self.store.court(court_id).await?.is_none() {
                return Err(AppError::not_found("Court not found"));
            }
        }
        Ok(changes)
    }

    /// The guarded write matched nothing: the game vanished or changed hands.
    async fn guarded_miss(&self, game_id: i64, action: &str) -> AppError {
        match self.store.game(game_id).await {
            Ok(Some(_)) => forbidden(action),
            Ok(None) => AppError::not_found("Game not found"),
            Err(e) => e,
        }
    }
}

fn forbidden(action: &str) -> AppError {
    AppError::Forbidden(format!("Forbidden - only host can {action} game"))
}
