//! PostgreSQL store (networked backend)

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::DatabaseConfig;

/// Catalog and ledger held in a PostgreSQL database
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap an existing pool; the schema must already be migrated
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `config.url` and run the embedded migrations
    pub async fn connect(config: &DatabaseConfig) -> crate::error::AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect(&config.url)
            .await?;

        tracing::info!("Connected to PostgreSQL");

        sqlx::migrate!("./migrations/postgres").run(&pool).await?;

        tracing::info!("Database migrations completed");

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

super::sql::rental_store!(PgStore, ::sqlx::PgConnection);
