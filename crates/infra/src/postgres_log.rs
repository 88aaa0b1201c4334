//! PostgreSQL log store
//!
//! Search events live in a single append-only table. Parameters are held
//! in a JSONB column; JSONB does not keep key order, so the canonical
//! ascending order is restored when a row is decoded into `SearchParams`.
//! Rows are read back in insertion order using a `BIGSERIAL` sequence.

use crate::sql_error::{map_sqlx_error, Operation};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cinelog_core::store::LogStore;
use cinelog_core::types::{SearchEvent, SearchParams};
use cinelog_core::{CinelogError, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

const STORE: &str = "log";

/// Log store backed by a PostgreSQL table
#[derive(Clone)]
pub struct PgLogStore {
    pool: PgPool,
    table: String,
}

impl std::fmt::Debug for PgLogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgLogStore")
            .field("table", &self.table)
            .finish()
    }
}

impl PgLogStore {
    /// Create a store over an existing pool
    ///
    /// `table` is always double-quoted in the generated SQL, so it is
    /// matched case-sensitively. `CinelogConfig::validate` only accepts
    /// plain, non-reserved identifiers for configured tables.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use cinelog_infra::postgres_log::PgLogStore;
    /// use sqlx::PgPool;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = PgPool::connect("postgresql://localhost/cinelog").await?;
    /// let store = PgLogStore::new(pool, "search_events");
    /// store.ensure_schema().await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(pool: PgPool, table: impl Into<String>) -> Self {
        Self {
            pool,
            table: table.into(),
        }
    }

    /// Connect a new pool
    pub async fn connect(url: &str, table: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(url)
            .await
            .map_err(|e| map_sqlx_error(STORE, Operation::Read, "Failed to connect", e))?;

        info!("Connected to PostgreSQL log store (table {})", table);
        Ok(Self::new(pool, table))
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Create the events table if it does not exist
    pub async fn ensure_schema(&self) -> Result<()> {
        let ddl = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                seq BIGSERIAL PRIMARY KEY,
                id UUID NOT NULL UNIQUE,
                search_type TEXT NOT NULL,
                parameters JSONB NOT NULL,
                result_count BIGINT NOT NULL CHECK (result_count >= 0),
                recorded_at TIMESTAMPTZ NOT NULL
            )
            "#,
            table = quote_identifier(&self.table)
        );

        sqlx::query(&ddl)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(STORE, Operation::Write, "Failed to create table", e))?;

        debug!("Ensured schema for table {}", self.table);
        Ok(())
    }

    /// Round-trip a trivial query
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(STORE, Operation::Read, "Ping failed", e))?;
        Ok(())
    }
}

#[async_trait]
impl LogStore for PgLogStore {
    async fn append(&self, event: &SearchEvent) -> Result<()> {
        let result_count = i64::try_from(event.result_count).map_err(|_| {
            CinelogError::write_rejected(format!(
                "result count {} exceeds the column range",
                event.result_count
            ))
        })?;

        let insert = format!(
            r#"
            INSERT INTO {} (id, search_type, parameters, result_count, recorded_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
            quote_identifier(&self.table)
        );

        sqlx::query(&insert)
            .bind(event.id)
            .bind(&event.search_type)
            .bind(Json(&event.parameters))
            .bind(result_count)
            .bind(event.timestamp)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(STORE, Operation::Write, "Failed to append event", e))?;

        debug!("Appended event {} to {}", event.id, self.table);
        Ok(())
    }

    async fn snapshot(&self) -> Result<Vec<SearchEvent>> {
        let select = format!(
            r#"
            SELECT id, search_type, parameters, result_count, recorded_at
            FROM {}
            ORDER BY seq
            "#,
            quote_identifier(&self.table)
        );

        let rows = sqlx::query(&select)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(STORE, Operation::Read, "Failed to read events", e))?;

        let mut events = Vec::with_capacity(rows.len());
        for row in rows {
            let decode = |column: &str, e: sqlx::Error| {
                map_sqlx_error(STORE, Operation::Read, &format!("Failed to get {}", column), e)
            };

            let id: Uuid = row.try_get("id").map_err(|e| decode("id", e))?;
            let search_type: String = row
                .try_get("search_type")
                .map_err(|e| decode("search_type", e))?;
            let Json(parameters): Json<SearchParams> = row
                .try_get("parameters")
                .map_err(|e| decode("parameters", e))?;
            let result_count: i64 = row
                .try_get("result_count")
                .map_err(|e| decode("result_count", e))?;
            let timestamp: DateTime<Utc> = row
                .try_get("recorded_at")
                .map_err(|e| decode("recorded_at", e))?;

            events.push(SearchEvent {
                id,
                search_type,
                parameters,
                result_count: u64::try_from(result_count).map_err(|_| {
                    CinelogError::query_failed(format!(
                        "event {} has negative result count {}",
                        id, result_count
                    ))
                })?,
                timestamp,
            });
        }

        info!("Read {} events from {}", events.len(), self.table);
        Ok(events)
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

/// Double-quote an identifier for interpolation into SQL
fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
