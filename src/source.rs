use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

use crate::error::QueryError;
use crate::queries::{Bind, CrashQuery};

// Anything that answers a CrashQuery with a JSON array of rows
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn query(&self, query: &CrashQuery) -> Result<Value, QueryError>;
}

// Postgres backed data source
pub struct PgDataSource {
    pool: PgPool,
}

impl PgDataSource {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        tracing::info!(max_connections, "connecting to postgres");

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .connect(database_url)
            .await?;

        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DataSource for PgDataSource {
    async fn query(&self, query: &CrashQuery) -> Result<Value, QueryError> {
        // let postgres build the JSON array so rows need no per-column decoding
        let sql = format!(
            "SELECT COALESCE(json_agg(t), '[]'::json) FROM ({}) t",
            query.sql()
        );

        let mut statement = sqlx::query_scalar::<_, Value>(&sql);
        for bind in query.binds() {
            statement = match bind {
                Bind::Text(text) => statement.bind(text),
                Bind::Int(int) => statement.bind(int),
            };
        }

        let rows = statement.fetch_one(&self.pool).await?;
        Ok(rows)
    }
}
