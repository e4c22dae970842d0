use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::AppError;

/// Player profile, linked to exactly one auth identity.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Player {
    pub player_id: i64,
    pub user_id: Uuid,
    pub name: String,
}

/// Public projection of a player (search results, game hosts).
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct PlayerSummary {
    pub player_id: i64,
    pub name: String,
}

impl From<Player> for PlayerSummary {
    fn from(p: Player) -> Self {
        PlayerSummary {
            player_id: p.player_id,
            name: p.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Court {
    pub court_id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct PickupGame {
    pub game_id: i64,
    pub host_id: i64,
    pub court_id: i64,
    pub game_date: NaiveDate,
    pub game_time: String,
    pub players_needed: i32,
    pub skill_level: String,
    pub notes: Option<String>,
    pub confirmed_count: i32,
    pub maybe_count: i32,
    pub declined_count: i32,
}

/// A player's stated intent for one game. Transitions are unrestricted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsvpStatus {
    Confirmed,
    Maybe,
    Declined,
}

impl RsvpStatus {
    pub const ALL: [RsvpStatus; 3] = [RsvpStatus::Confirmed, RsvpStatus::Maybe, RsvpStatus::Declined];

    pub fn as_str(self) -> &'static str {
        match self {
            RsvpStatus::Confirmed => "confirmed",
            RsvpStatus::Maybe => "maybe",
            RsvpStatus::Declined => "declined",
        }
    }
}

impl fmt::Display for RsvpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RsvpStatus {
    type Err = AppError;

    /// Accepts the mobile client's `"no"` as `declined`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirmed" => Ok(RsvpStatus::Confirmed),
            "maybe" => Ok(RsvpStatus::Maybe),
            "declined" | "no" => Ok(RsvpStatus::Declined),
            other => Err(AppError::validation(format!("Invalid RSVP status: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rsvp {
    pub rsvp_id: i64,
    pub player_id: i64,
    pub game_id: i64,
    pub status: RsvpStatus,
    pub created_at: DateTime<Utc>,
}

/// Per-status tally for one game; absent statuses count as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RsvpCounts {
    pub confirmed: i64,
    pub maybe: i64,
    pub declined: i64,
}

/// Validated input for a new game.
#[derive(Debug, Clone)]
pub struct NewGame {
    pub host_id: i64,
    pub court_id: i64,
    pub game_date: NaiveDate,
    pub game_time: String,
    pub players_needed: i32,
    pub skill_level: String,
    pub notes: Option<String>,
}

/// The host-updatable fields of a game. Anything else in an update body is
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GameChanges {
    pub court_id: Option<i64>,
    pub game_date: Option<NaiveDate>,
    pub game_time: Option<String>,
    pub players_needed: Option<i32>,
    pub skill_level: Option<String>,
    /// `None`: leave as is. `Some(None)`: an explicit `null` clears the notes.
    #[serde(default, deserialize_with = "present")]
    pub notes: Option<Option<String>>,
}

/// Marks a field as present even when its value is `null`.
fn present<'de, D, T>(de: D) -> std::result::Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(de).map(Some)
}

impl GameChanges {
    pub fn is_empty(&self) -> bool {
        self.court_id.is_none()
            && self.game_date.is_none()
            && self.game_time.is_none()
            && self.players_needed.is_none()
            && self.skill_level.is_none()
            && self.notes.is_none()
    }

    pub fn apply_to(&self, game: &mut PickupGame) {
        if let Some(v) = self.court_id {
            game.court_id = v;
        }
        if let Some(v) = self.game_date {
            game.game_date = v;
        }
        if let Some(v) = &self.game_time {
            game.game_time = v.clone();
        }
        if let Some(v) = self.players_needed {
            game.players_needed = v;
        }
        if let Some(v) = &self.skill_level {
            game.skill_level = v.clone();
        }
        if let Some(v) = &self.notes {
            game.notes = v.clone();
        }
    }
}

/// Range/equality filter over `pickup_games`; results are ordered by
/// `game_date` ascending.
#[derive(Debug, Clone, Default)]
pub struct GameFilter {
    pub host_id: Option<i64>,
    pub court_id: Option<i64>,
    pub game_ids: Option<Vec<i64>>,
    pub from_date: Option<NaiveDate>,
    pub limit: Option<i64>,
}

impl GameFilter {
    pub fn matches(&self, game: &PickupGame) -> bool {
        self.host_id.map_or(true, |h| game.host_id == h)
            && self.court_id.map_or(true, |c| game.court_id == c)
            && self
                .game_ids
                .as_ref()
                .map_or(true, |ids| ids.contains(&game.game_id))
            && self.from_date.map_or(true, |d| game.game_date >= d)
    }
}
