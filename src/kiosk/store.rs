//! Boarding pass storage.
//!
//! One row per enrolled template number. The table name is configurable, so it
//! is validated as a plain identifier before it is ever put into SQL.

use super::{boarding_pass::BoardingPass, device::TemplateNumber};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use regex::Regex;
use sqlx::{postgres::PgPoolOptions, Connection, PgPool};
use std::{sync::LazyLock, time::Duration};
use tracing::{debug, info, info_span, instrument, Instrument};

pub const DEFAULT_TABLE: &str = "boarding_passes";

static TABLE_NAME: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[a-z_][a-z0-9_]{0,62}$"));

const COLUMNS: &str = "verified_template_number, name, from_long, from_short, to_long, to_short, flight, time, gate, seat";

#[async_trait]
pub trait BoardingPassStore: Send + Sync {
    /// Look up the boarding pass stored under `number`.
    async fn find_by_template_number(
        &self,
        number: TemplateNumber,
    ) -> Result<Option<BoardingPass>, sqlx::Error>;

    /// Replace the boarding pass stored under `number`, creating it if absent.
    async fn upsert_by_template_number(
        &self,
        number: TemplateNumber,
        pass: &BoardingPass,
    ) -> Result<(), sqlx::Error>;

    /// Check the store is reachable.
    async fn ping(&self) -> Result<(), sqlx::Error>;

    /// Release the underlying connections.
    async fn close(&self);
}

/// Table names are interpolated into SQL, so only lower-case identifiers pass.
#[must_use]
pub fn valid_table_name(table: &str) -> bool {
    TABLE_NAME.as_ref().is_ok_and(|re| re.is_match(table))
}

#[derive(Debug, Clone)]
pub struct PgBoardingPassStore {
    pool: PgPool,
    table: String,
}

impl PgBoardingPassStore {
    /// Connect to the database and make sure the table exists.
    ///
    /// # Errors
    /// Returns an error if the table name is invalid, the connection fails, or
    /// the table cannot be created.
    pub async fn connect(dsn: &str, table: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .min_connections(1)
            .max_connections(5)
            .max_lifetime(Duration::from_secs(60 * 2))
            .test_before_acquire(true)
            .connect(dsn)
            .await
            .context("Failed to connect to database")?;

        let store = Self::from_pool(pool, table)?;
        store.ensure_schema().await?;

        Ok(store)
    }

    /// Wrap an existing pool.
    ///
    /// # Errors
    /// Returns an error if the table name is not a plain identifier.
    pub fn from_pool(pool: PgPool, table: &str) -> Result<Self> {
        if !valid_table_name(table) {
            return Err(anyhow!("Invalid table name: {table}"));
        }

        Ok(Self {
            pool,
            table: table.to_string(),
        })
    }

    /// Create the boarding pass table if it does not exist yet.
    ///
    /// # Errors
    /// Returns an error if the statement fails.
    pub async fn ensure_schema(&self) -> Result<()> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                verified_template_number BIGINT PRIMARY KEY,
                name TEXT NOT NULL,
                from_long TEXT NOT NULL,
                from_short TEXT NOT NULL,
                to_long TEXT NOT NULL,
                to_short TEXT NOT NULL,
                flight TEXT NOT NULL,
                time TIMESTAMP NOT NULL,
                gate TEXT NOT NULL,
                seat TEXT NOT NULL
            )",
            self.table
        );

        sqlx::query(&sql)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to create table {}", self.table))?;

        info!("Boarding pass table {} ready", self.table);

        Ok(())
    }
}

#[async_trait]
impl BoardingPassStore for PgBoardingPassStore {
    #[instrument(skip(self))]
    async fn find_by_template_number(
        &self,
        number: TemplateNumber,
    ) -> Result<Option<BoardingPass>, sqlx::Error> {
        let sql = format!(
            "SELECT {COLUMNS} FROM {} WHERE verified_template_number = $1",
            self.table
        );

        let span = info_span!("db.query", db.system = "postgresql", db.operation = "SELECT");
        sqlx::query_as::<_, BoardingPass>(&sql)
            .bind(number)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
    }

    #[instrument(skip(self, pass))]
    async fn upsert_by_template_number(
        &self,
        number: TemplateNumber,
        pass: &BoardingPass,
    ) -> Result<(), sqlx::Error> {
        // Single statement, every column replaced: no merge with the old row.
        let sql = format!(
            "INSERT INTO {} ({COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             ON CONFLICT (verified_template_number) DO UPDATE SET
                name = EXCLUDED.name,
                from_long = EXCLUDED.from_long,
                from_short = EXCLUDED.from_short,
                to_long = EXCLUDED.to_long,
                to_short = EXCLUDED.to_short,
                flight = EXCLUDED.flight,
                time = EXCLUDED.time,
                gate = EXCLUDED.gate,
                seat = EXCLUDED.seat",
            self.table
        );

        let span = info_span!("db.query", db.system = "postgresql", db.operation = "UPSERT");
        let result = sqlx::query(&sql)
            .bind(number)
            .bind(&pass.name)
            .bind(&pass.from_long)
            .bind(&pass.from_short)
            .bind(&pass.to_long)
            .bind(&pass.to_short)
            .bind(&pass.flight)
            .bind(pass.time)
            .bind(&pass.gate)
            .bind(&pass.seat)
            .execute(&self.pool)
            .instrument(span)
            .await?;

        debug!("Upserted {} row(s)", result.rows_affected());

        Ok(())
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        conn.ping().await
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
