use crate::models::{PlayerRecord, SaveRequest};
use crate::services::cache::PlayerDirectory;
use crate::services::save_guard::PredictionStore;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// PostgreSQL client for the player directory and prediction persistence
///
/// Cheap to clone; clones share the underlying pool.
#[derive(Clone)]
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a client whose pool only connects on first use.
    ///
    /// No connection is attempted and no migrations run here; the first
    /// query pays the connection cost. Useful where the flow under
    /// exercise may never touch the database at all.
    pub fn connect_lazy(database_url: &str) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(5))
            .connect_lazy(database_url)?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
    ) -> Result<Self, PostgresError> {
        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
        )
        .await
    }

    /// Insert one accepted prediction and return its row id.
    ///
    /// Insert-only: rows are never updated, and replaying the same save
    /// creates a duplicate row by design.
    pub async fn insert_prediction_row(&self, record: &SaveRequest) -> Result<i64, PostgresError> {
        let username = record
            .username
            .as_deref()
            .ok_or_else(|| PostgresError::InvalidInput("username is required".to_string()))?;

        let query = r#"
            INSERT INTO predictions (
                username, player_1_id, player_2_id,
                player_1_win_probability, player_2_win_probability, confidence,
                winner_name, tourney_level, surface, best_of, round
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING prediction_id
        "#;

        let row = sqlx::query(query)
            .bind(username)
            .bind(record.player1_id)
            .bind(record.player2_id)
            .bind(record.player1_win_probability)
            .bind(record.player2_win_probability)
            .bind(record.confidence)
            .bind(&record.winner_name)
            .bind(&record.tourney_level)
            .bind(&record.surface)
            .bind(record.best_of)
            .bind(&record.round)
            .fetch_one(&self.pool)
            .await?;

        let prediction_id: i64 = row.get("prediction_id");
        tracing::debug!(
            "Inserted prediction {} for user {}",
            prediction_id,
            username
        );

        Ok(prediction_id)
    }

    /// Fetch the full player directory.
    pub async fn fetch_player_rows(&self) -> Result<Vec<PlayerRecord>, PostgresError> {
        let query = r#"
            SELECT player_id, first_name, last_name, ioc, hand, rank, elo
            FROM players
            ORDER BY last_name, first_name
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;

        let players: Vec<PlayerRecord> = rows
            .iter()
            .map(|row| PlayerRecord {
                player_id: row.get("player_id"),
                first_name: row.get("first_name"),
                last_name: row.get("last_name"),
                ioc: row.get("ioc"),
                hand: row.get("hand"),
                rank: row.get("rank"),
                elo: row.get("elo"),
            })
            .collect();

        tracing::debug!("Fetched {} players from directory", players.len());

        Ok(players)
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

impl PlayerDirectory for PostgresClient {
    type Error = PostgresError;

    async fn fetch_players(&self) -> Result<Vec<PlayerRecord>, PostgresError> {
        self.fetch_player_rows().await
    }
}

impl PredictionStore for PostgresClient {
    type Error = PostgresError;

    async fn insert_prediction(&self, record: &SaveRequest) -> Result<i64, PostgresError> {
        self.insert_prediction_row(record).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_username_error_message() {
        let err = PostgresError::InvalidInput("username is required".to_string());
        assert_eq!(err.to_string(), "Invalid input: username is required");
    }
}
