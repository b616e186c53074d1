//! `PostgreSQL` implementation of the `RoundStore` trait.
//!
//! Each request gets its own `PgConnection`; there is no pool. The
//! connection string is parsed once, when the store is built, so a malformed
//! `DATABASE_URL` fails at startup rather than on the first request.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::migrate::Migrator;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::types::Json;
use sqlx::{Connection, FromRow};
use tracing::{debug, instrument};
use uuid::Uuid;

use morra_core::error::DomainError;
use morra_core::repository::{RoundConnection, RoundEntry, RoundStore, StoredRound};

/// Schema migrations for the `rounds` table.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

fn infrastructure(context: &str, err: &sqlx::Error) -> DomainError {
    DomainError::Infrastructure(format!("{context}: {err}"))
}

/// PostgreSQL-backed round store.
#[derive(Debug, Clone)]
pub struct PgRoundStore {
    options: PgConnectOptions,
}

impl PgRoundStore {
    /// Creates a store from a connection string.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error::Configuration` if the connection string cannot be
    /// parsed.
    pub fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        Ok(Self::from_options(database_url.parse()?))
    }

    /// Creates a store from already-parsed connection options.
    #[must_use]
    pub fn from_options(options: PgConnectOptions) -> Self {
        Self { options }
    }

    /// Applies pending schema migrations over a short-lived connection.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the database cannot be reached
    /// or a migration fails.
    pub async fn run_migrations(&self) -> Result<(), DomainError> {
        let mut conn = PgConnection::connect_with(&self.options)
            .await
            .map_err(|e| infrastructure("failed to connect for migrations", &e))?;
        let migrated = MIGRATOR
            .run(&mut conn)
            .await
            .map_err(|e| DomainError::Infrastructure(format!("migration failed: {e}")));
        conn.close()
            .await
            .map_err(|e| infrastructure("failed to close migration connection", &e))?;
        migrated
    }
}

#[async_trait]
impl RoundStore for PgRoundStore {
    #[instrument(skip(self))]
    async fn connect(&self) -> Result<Box<dyn RoundConnection>, DomainError> {
        let conn = PgConnection::connect_with(&self.options)
            .await
            .map_err(|e| infrastructure("failed to connect to round store", &e))?;
        debug!("connected to round store");
        Ok(Box::new(PgRoundConnection { conn }))
    }
}

/// A single open connection to the round store.
struct PgRoundConnection {
    conn: PgConnection,
}

#[derive(FromRow)]
struct RoundRow {
    record_id: Uuid,
    game_id: String,
    round_number: i64,
    entries: Json<Vec<RoundEntry>>,
    recorded_at: DateTime<Utc>,
}

impl From<RoundRow> for StoredRound {
    fn from(row: RoundRow) -> Self {
        Self {
            record_id: row.record_id,
            game_id: row.game_id,
            round_number: row.round_number,
            entries: row.entries.0,
            recorded_at: row.recorded_at,
        }
    }
}

#[async_trait]
impl RoundConnection for PgRoundConnection {
    #[instrument(skip(self, round), fields(record_id = %round.record_id))]
    async fn insert_round(&mut self, round: &StoredRound) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO rounds (record_id, game_id, round_number, entries, recorded_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(round.record_id)
        .bind(round.game_id.as_str())
        .bind(round.round_number)
        .bind(Json(&round.entries))
        .bind(round.recorded_at)
        .execute(&mut self.conn)
        .await
        .map_err(|e| infrastructure("failed to insert round", &e))?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn load_rounds(&mut self, game_id: &str) -> Result<Vec<StoredRound>, DomainError> {
        let rows: Vec<RoundRow> = sqlx::query_as(
            "SELECT record_id, game_id, round_number, entries, recorded_at \
             FROM rounds WHERE game_id = $1 \
             ORDER BY round_number, recorded_at",
        )
        .bind(game_id)
        .fetch_all(&mut self.conn)
        .await
        .map_err(|e| infrastructure("failed to load rounds", &e))?;
        Ok(rows.into_iter().map(StoredRound::from).collect())
    }

    async fn release(self: Box<Self>) -> Result<(), DomainError> {
        self.conn
            .close()
            .await
            .map_err(|e| infrastructure("failed to close round store connection", &e))?;
        debug!("disconnected from round store");
        Ok(())
    }
}
