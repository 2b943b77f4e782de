//! MySQL result store

use std::collections::HashSet;

use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use sqlx::Row;
use tracing::{debug, info, instrument, warn};

use crate::config::ConnectionSource;
use crate::error::{ResultsError, Result};
use crate::query::{completed_instances_sql, insert_sql, IdQuery};
use crate::record::{AgentRecord, SqlValue};

/// Pool size used for URL connections
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// What happened to an insert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Row written
    Inserted,
    /// Row already present; nothing written
    Duplicate,
}

/// Agent and result tables in MySQL
#[derive(Clone)]
pub struct MySqlResultStore {
    pool: MySqlPool,
}

impl MySqlResultStore {
    /// Connect using file settings or a URL
    pub async fn connect(source: &ConnectionSource) -> Result<Self> {
        let pool = match source {
            ConnectionSource::Config(config) => {
                MySqlPoolOptions::new()
                    .max_connections(config.max_connections)
                    .connect_with(config.connect_options())
                    .await?
            }
            ConnectionSource::Url(url) => {
                MySqlPoolOptions::new()
                    .max_connections(DEFAULT_MAX_CONNECTIONS)
                    .connect(url)
                    .await?
            }
        };

        info!("Connected to MySQL");
        Ok(Self { pool })
    }

    /// Wrap an existing pool
    #[must_use]
    pub fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Get the connection pool
    #[must_use]
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Insert an agent row. A duplicate key is logged and reported, not retried.
    #[instrument(skip(self, record), fields(agent = record.tag().unwrap_or("?")))]
    pub async fn insert_agent(&self, table: &str, record: &AgentRecord) -> Result<InsertOutcome> {
        let sql = insert_sql(table, record.columns())?;
        let mut query = sqlx::query(&sql);
        for value in record.values() {
            query = match value {
                SqlValue::Null => query.bind(None::<String>),
                SqlValue::Bool(b) => query.bind(*b),
                SqlValue::Int(i) => query.bind(*i),
                SqlValue::Float(f) => query.bind(*f),
                SqlValue::Text(s) => query.bind(s.as_str()),
            };
        }

        match query.execute(&self.pool).await {
            Ok(_) => {
                debug!(table, "agent inserted");
                Ok(InsertOutcome::Inserted)
            }
            Err(e) => {
                let outcome = failed_insert_outcome(e)?;
                warn!(
                    table,
                    "Agent `{}` is already in the table",
                    record.tag().unwrap_or("?")
                );
                Ok(outcome)
            }
        }
    }

    /// Instance names the agent already has results for
    pub async fn completed_instances(
        &self,
        agent_table: &str,
        results_table: &str,
        agent_id: i64,
    ) -> Result<HashSet<String>> {
        let sql = completed_instances_sql(agent_table, results_table)?;
        let names: Vec<String> = sqlx::query_scalar(&sql)
            .bind(agent_id)
            .fetch_all(&self.pool)
            .await?;

        debug!(agent_id, count = names.len(), "completed instances");
        Ok(names.into_iter().collect())
    }

    /// Resolve a single id; no matching row is an error
    pub async fn select_id(&self, lookup: &IdQuery) -> Result<i64> {
        let sql = lookup.sql()?;
        let mut query = sqlx::query(&sql);
        for param in lookup.params() {
            query = query.bind(param);
        }

        let row = query
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ResultsError::NotFound {
                table: lookup.table.clone(),
                column: lookup.id_column.clone(),
            })?;

        // unsigned AUTO_INCREMENT keys decode only as u64
        match row.try_get::<i64, _>(0) {
            Ok(id) => Ok(id),
            Err(_) => {
                let id: u64 = row.try_get(0)?;
                i64::try_from(id)
                    .map_err(|_| ResultsError::InvalidRecord(format!("id {id} out of range")))
            }
        }
    }
}

/// A unique-key violation means the row is already there; anything else fails
fn failed_insert_outcome(error: sqlx::Error) -> Result<InsertOutcome> {
    match error {
        sqlx::Error::Database(e) if e.is_unique_violation() => Ok(InsertOutcome::Duplicate),
        e => Err(e.into()),
    }
}
