//! SQLite store (embedded, file-backed backend)

use std::{str::FromStr, time::Duration};

use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};

use crate::config::DatabaseConfig;

/// Catalog and ledger held in an SQLite database file
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database file at `config.url` and run
    /// the embedded migrations
    pub async fn connect(config: &DatabaseConfig) -> crate::error::AppResult<Self> {
        let options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let filename = options.clone().get_filename();
        if let Some(dir) = filename.parent() {
            if !dir.as_os_str().is_empty() {
                tokio::fs::create_dir_all(dir).await.map_err(|e| {
                    crate::error::AppError::Internal(format!("Cannot create {}: {}", dir.display(), e))
                })?;
            }
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_with(options)
            .await?;

        tracing::info!("Opened SQLite database {}", config.url);

        Self::migrated(pool).await
    }

    /// Private in-memory database on a single long-lived connection
    pub async fn in_memory() -> crate::error::AppResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        // Every connection to :memory: is a separate database, so the pool
        // must never open a second one or recycle the first
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::migrated(pool).await
    }

    async fn migrated(pool: SqlitePool) -> crate::error::AppResult<Self> {
        sqlx::migrate!("./migrations/sqlite").run(&pool).await?;
        tracing::info!("Database migrations completed");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

super::sql::rental_store!(SqliteStore, ::sqlx::SqliteConnection);
