//! PostgreSQL store (sqlx). Schema lives in `migrations/0001_init.sql`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::models::{
    Court, GameChanges, GameFilter, NewGame, PickupGame, Player, PlayerSummary, Rsvp, RsvpStatus,
};
use super::Store;
use crate::error::{AppError, Result};
use crate::geo::BoundingBox;

const GAME_COLUMNS: &str = "game_id, host_id, court_id, game_date, game_time, players_needed, \
                            skill_level, notes, confirmed_count, maybe_count, declined_count";

const COURT_COLUMNS: &str = "court_id, name, latitude, longitude, address, image";

const RSVP_COLUMNS: &str = "rsvp_id, player_id, game_id, status, created_at";

/// Recompute the denormalised tallies on `pickup_games` for game `$1`.
const REFRESH_COUNTS: &str = r#"
    UPDATE pickup_games g
       SET confirmed_count = c.confirmed,
           maybe_count     = c.maybe,
           declined_count  = c.declined
      FROM (SELECT COUNT(*) FILTER (WHERE status = 'confirmed') AS confirmed,
                   COUNT(*) FILTER (WHERE status = 'maybe')     AS maybe,
                   COUNT(*) FILTER (WHERE status = 'declined')  AS declined
              FROM rsvps
             WHERE game_id = $1) c
     WHERE g.game_id = $1
"#;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> std::result::Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(PgStore { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(FromRow)]
struct RsvpRow {
    rsvp_id: i64,
    player_id: i64,
    game_id: i64,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<RsvpRow> for Rsvp {
    type Error = AppError;

    fn try_from(row: RsvpRow) -> Result<Self> {
        let status = row
            .status
            .parse()
            .map_err(|_| AppError::Store(format!("rsvp {} has unknown status {:?}", row.rsvp_id, row.status)))?;
        Ok(Rsvp {
            rsvp_id: row.rsvp_id,
            player_id: row.player_id,
            game_id: row.game_id,
            status,
            created_at: row.created_at,
        })
    }
}

/// Wrap `needle` for ILIKE, escaping the pattern metacharacters.
pub(crate) fn like_pattern(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len() + 2);
    out.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('%');
    out
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn player(&self, player_id: i64) -> Result<Option<Player>> {
        let row = sqlx::query_as::<_, Player>(
            "SELECT player_id, user_id, name FROM players WHERE player_id = $1",
        )
        .bind(player_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn player_by_user(&self, user_id: Uuid) -> Result<Option<Player>> {
        let row = sqlx::query_as::<_, Player>(
            "SELECT player_id, user_id, name FROM players WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn players_by_ids(&self, ids: &[i64]) -> Result<Vec<PlayerSummary>> {
        let rows = sqlx::query_as::<_, PlayerSummary>(
            "SELECT player_id, name FROM players WHERE player_id = ANY($1)",
        )
        .bind(ids.to_vec())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn search_players(&self, needle: &str, limit: i64) -> Result<Vec<PlayerSummary>> {
        let rows = sqlx::query_as::<_, PlayerSummary>(
            r#"SELECT player_id, name
                 FROM players
                WHERE name ILIKE $1
                ORDER BY name, player_id
                LIMIT $2"#,
        )
        .bind(like_pattern(needle))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn court(&self, court_id: i64) -> Result<Option<Court>> {
        let sql = format!("SELECT {COURT_COLUMNS} FROM courts WHERE court_id = $1");
        let row = sqlx::query_as::<_, Court>(&sql)
            .bind(court_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn courts_in_bounds(&self, bounds: &BoundingBox, cap: i64) -> Result<Vec<Court>> {
        let sql = format!(
            "SELECT {COURT_COLUMNS}
               FROM courts
              WHERE latitude  BETWEEN $1 AND $2
                AND longitude BETWEEN $3 AND $4
              LIMIT $5"
        );
        let rows = sqlx::query_as::<_, Court>(&sql)
            .bind(bounds.min_lat)
            .bind(bounds.max_lat)
            .bind(bounds.min_lng)
            .bind(bounds.max_lng)
            .bind(cap)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn courts_by_ids(&self, ids: &[i64]) -> Result<Vec<Court>> {
        let sql = format!("SELECT {COURT_COLUMNS} FROM courts WHERE court_id = ANY($1)");
        let rows = sqlx::query_as::<_, Court>(&sql)
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn game(&self, game_id: i64) -> Result<Option<PickupGame>> {
        let sql = format!("SELECT {GAME_COLUMNS} FROM pickup_games WHERE game_id = $1");
        let row = sqlx::query_as::<_, PickupGame>(&sql)
            .bind(game_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn games(&self, filter: &GameFilter) -> Result<Vec<PickupGame>> {
        let mut qb =
            QueryBuilder::<Postgres>::new(format!("SELECT {GAME_COLUMNS} FROM pickup_games WHERE TRUE"));
        if let Some(host_id) = filter.host_id {
            qb.push(" AND host_id = ").push_bind(host_id);
        }
        if let Some(court_id) = filter.court_id {
            qb.push(" AND court_id = ").push_bind(court_id);
        }
        if let Some(ids) = &filter.game_ids {
            qb.push(" AND game_id = ANY(").push_bind(ids.clone()).push(")");
        }
        if let Some(from) = filter.from_date {
            qb.push(" AND game_date >= ").push_bind(from);
        }
        qb.push(" ORDER BY game_date, game_id");
        if let Some(limit) = filter.limit {
            qb.push(" LIMIT ").push_bind(limit);
        }

        let rows = qb.build_query_as::<PickupGame>().fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn insert_game_with_host_rsvp(&self, game: &NewGame) -> Result<PickupGame> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "INSERT INTO pickup_games (host_id, court_id, game_date, game_time,
                                       players_needed, skill_level, notes, confirmed_count)
             VALUES ($1, $2, $3, $4, $5, $6, $7, 1)
             RETURNING {GAME_COLUMNS}"
        );
        let created = sqlx::query_as::<_, PickupGame>(&sql)
            .bind(game.host_id)
            .bind(game.court_id)
            .bind(game.game_date)
            .bind(&game.game_time)
            .bind(game.players_needed)
            .bind(&game.skill_level)
            .bind(&game.notes)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO rsvps (player_id, game_id, status) VALUES ($1, $2, 'confirmed')")
            .bind(game.host_id)
            .bind(created.game_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(created)
    }

    async fn update_game_as_host(
        &self,
        game_id: i64,
        host_id: i64,
        changes: &GameChanges,
    ) -> Result<Option<PickupGame>> {
        let sql = format!(
            "UPDATE pickup_games
                SET court_id       = COALESCE($3, court_id),
                    game_date      = COALESCE($4, game_date),
                    game_time      = COALESCE($5, game_time),
                    players_needed = COALESCE($6, players_needed),
                    skill_level    = COALESCE($7, skill_level),
                    notes          = CASE WHEN $9 THEN $8 ELSE notes END
              WHERE game_id = $1
                AND host_id = $2
          RETURNING {GAME_COLUMNS}"
        );
        let row = sqlx::query_as::<_, PickupGame>(&sql)
            .bind(game_id)
            .bind(host_id)
            .bind(changes.court_id)
            .bind(changes.game_date)
            .bind(&changes.game_time)
            .bind(changes.players_needed)
            .bind(&changes.skill_level)
            .bind(changes.notes.clone().flatten())
            .bind(changes.notes.is_some())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_game_as_host(&self, game_id: i64, host_id: i64) -> Result<bool> {
        let rows = sqlx::query("DELETE FROM pickup_games WHERE game_id = $1 AND host_id = $2")
            .bind(game_id)
            .bind(host_id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows > 0)
    }

    async fn upsert_rsvp(&self, player_id: i64, game_id: i64, status: RsvpStatus) -> Result<Rsvp> {
        let mut tx = self.pool.begin().await?;

        // Serialise RSVPs per game so the recount below sees every committed row.
        sqlx::query("SELECT 1 FROM pickup_games WHERE game_id = $1 FOR UPDATE")
            .bind(game_id)
            .execute(&mut *tx)
            .await?;

        let sql = format!(
            "INSERT INTO rsvps (player_id, game_id, status)
             VALUES ($1, $2, $3)
             ON CONFLICT (player_id, game_id)
             DO UPDATE SET status = EXCLUDED.status
             RETURNING {RSVP_COLUMNS}"
        );
        let row = sqlx::query_as::<_, RsvpRow>(&sql)
            .bind(player_id)
            .bind(game_id)
            .bind(status.as_str())
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(REFRESH_COUNTS)
            .bind(game_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        row.try_into()
    }

    async fn attended_games(
        &self,
        player_id: i64,
        statuses: &[RsvpStatus],
        from_date: Option<NaiveDate>,
    ) -> Result<Vec<PickupGame>> {
        let wanted: Vec<String> = statuses.iter().map(|s| s.as_str().to_owned()).collect();
        let sql = format!(
            "SELECT {GAME_COLUMNS}
               FROM pickup_games
              WHERE game_id IN (SELECT game_id FROM rsvps
                                 WHERE player_id = $1 AND status = ANY($2))
                AND host_id <> $1
                AND ($3::date IS NULL OR game_date >= $3)
              ORDER BY game_date, game_id"
        );
        let rows = sqlx::query_as::<_, PickupGame>(&sql)
            .bind(player_id)
            .bind(wanted)
            .bind(from_date)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn rsvp_counts(&self, game_id: i64) -> Result<Vec<(RsvpStatus, i64)>> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            "SELECT status, COUNT(*) FROM rsvps WHERE game_id = $1 GROUP BY status",
        )
        .bind(game_id)
        .fetch_all(&self.pool)
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for (status, n) in rows {
            match status.parse::<RsvpStatus>() {
                Ok(s) => out.push((s, n)),
                Err(_) => log::warn!("ignoring {n} rsvps with unknown status {status:?} on game {game_id}"),
            }
        }
        Ok(out)
    }
}
